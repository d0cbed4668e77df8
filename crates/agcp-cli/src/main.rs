#![forbid(unsafe_code)]

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use agcp_api::endpoint::console_app_info_url;
use agcp_api::model::AppInfoUpdate;
use agcp_api::{AppInfoResponse, ReleaseType};
use agcp_config::manifest::MANIFEST_FILE;
use agcp_engine::host::run_host_task;
use agcp_engine::plan::app_info_task_name;
use agcp_engine::{ExecuteOptions, Project, TaskDescriptor, TaskKind, TaskOutcome};
use agcp_variants::ArtifactType;

type CliResult = Result<(), Box<dyn Error>>;

#[derive(Debug, Parser)]
#[command(name = "agcp", about = "Publish Android apps to AppGallery Connect")]
#[command(version)]
struct Cli {
    /// Log debug output
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the planned tasks
    Tasks {
        /// Only list publish tasks for this artifact type (`apk` or `aab`)
        #[arg(long)]
        artifact: Option<ArtifactType>,
    },
    /// Run planned tasks by name
    Run {
        /// Task names, e.g. `publishAab` or `getAppIdRelease`
        #[arg(required = true)]
        tasks: Vec<String>,
        /// Skip the host build tasks that publish tasks depend on
        #[arg(long)]
        no_deps: bool,
        /// Keep running the remaining tasks after one fails
        #[arg(long = "continue")]
        keep_going: bool,
        /// Command that runs host build tasks
        #[arg(long, default_value = "./gradlew")]
        gradle: String,
        /// Release type: 1 (network) or 3 (phased); defaults to agcp.toml
        #[arg(long, value_parser = parse_release_type)]
        release_type: Option<ReleaseType>,
    },
    /// Update the basic app information for a build type
    UpdateInfo {
        /// Build type whose app metadata identifies the app
        build_type: String,
        /// Release type: 1 (network) or 3 (phased); defaults to agcp.toml
        #[arg(long, value_parser = parse_release_type)]
        release_type: Option<ReleaseType>,
        /// Default language, e.g. `en-US`
        #[arg(long)]
        default_lang: Option<String>,
        /// Privacy policy URL
        #[arg(long)]
        privacy_policy: Option<String>,
    },
}

fn parse_release_type(value: &str) -> Result<ReleaseType, String> {
    value
        .parse::<u8>()
        .ok()
        .and_then(ReleaseType::from_code)
        .ok_or_else(|| format!("invalid release type `{value}` — use 1 or 3"))
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Tasks { artifact } => cmd_tasks(artifact),
        Command::Run {
            tasks,
            no_deps,
            keep_going,
            gradle,
            release_type,
        } => cmd_run(&tasks, no_deps, keep_going, &gradle, release_type),
        Command::UpdateInfo {
            build_type,
            release_type,
            default_lang,
            privacy_policy,
        } => cmd_update_info(
            &build_type,
            release_type,
            AppInfoUpdate {
                default_lang,
                privacy_policy,
            },
        ),
    };

    if let Err(msg) = result {
        eprintln!("error: {msg}");
        process::exit(1);
    }
}

/// `info` by default, `debug` with `--verbose`; `RUST_LOG` wins over both.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

/// Find the project root by looking for `agcp.toml` in the current directory.
fn project_root() -> Result<PathBuf, Box<dyn Error>> {
    let cwd = std::env::current_dir()?;
    if !cwd.join(MANIFEST_FILE).exists() {
        return Err(format!(
            "no {MANIFEST_FILE} found in current directory — run agcp from the root project"
        )
        .into());
    }
    Ok(cwd)
}

fn execute_options(
    project: &Project,
    release_type: Option<ReleaseType>,
) -> Result<ExecuteOptions, Box<dyn Error>> {
    let release_type = match release_type {
        Some(release_type) => release_type,
        None => project.release_type()?,
    };
    Ok(ExecuteOptions {
        module_dir: project.module_dir.clone(),
        endpoints: project.endpoints(),
        release_type,
    })
}

fn cmd_tasks(artifact: Option<ArtifactType>) -> CliResult {
    let project = Project::load(&project_root()?)?;
    if project.graph.is_empty() {
        eprintln!("No tasks planned — check signing configs and agconnect-services.json files");
        return Ok(());
    }
    println!("Tasks in group `{}`", agcp_engine::plan::TASK_GROUP);
    let selected = project.graph.iter().filter(|task| match artifact {
        Some(artifact_type) => {
            task.kind == TaskKind::Publish && task.inputs.variant.artifact_type == artifact_type
        }
        None => true,
    });
    for task in selected {
        println!("{:<32} {}", task.name, task.description());
        if let Some(dependency) = &task.depends_on {
            println!("{:<32}   after {dependency}", "");
        }
    }
    Ok(())
}

fn cmd_run(
    names: &[String],
    no_deps: bool,
    keep_going: bool,
    gradle: &str,
    release_type: Option<ReleaseType>,
) -> CliResult {
    let root = project_root()?;
    let project = Project::load(&root)?;
    let options = execute_options(&project, release_type)?;

    // Unknown names fail before anything runs.
    let tasks = names
        .iter()
        .map(|name| project.graph.require(name))
        .collect::<Result<Vec<_>, _>>()?;

    let mut failed = Vec::new();
    for task in tasks {
        match run_task(&root, task, &options, no_deps, gradle) {
            Ok(()) => {}
            Err(e) if keep_going => {
                eprintln!("error: {}: {e}", task.name);
                failed.push(task.name.as_str());
            }
            Err(e) => return Err(format!("{}: {e}", task.name).into()),
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(format!("{} task(s) failed: {}", failed.len(), failed.join(", ")).into())
    }
}

fn run_task(
    root: &Path,
    task: &TaskDescriptor,
    options: &ExecuteOptions,
    no_deps: bool,
    gradle: &str,
) -> CliResult {
    if let Some(dependency) = task.depends_on.as_deref() {
        if no_deps {
            log::debug!("skipping host task {dependency}");
        } else {
            eprintln!("     Running {dependency}");
            run_host_task(root, gradle, dependency)?;
        }
    }

    eprintln!("     Running {} ({})", task.name, task.inputs.variant);
    match agcp_engine::execute(task, options)? {
        TaskOutcome::Published { app_id, receipt } => {
            eprintln!(
                "   Published {} to app {app_id} ({} bytes, sha256 {})",
                receipt.file_name, receipt.size, receipt.sha256
            );
            if !receipt.pkg_versions.is_empty() {
                eprintln!("             package version {}", receipt.pkg_versions.join(", "));
            }
        }
        TaskOutcome::AppInfo { app_id, response } => print_app_info(app_id, &response),
        TaskOutcome::AppId {
            package_name,
            app_id,
        } => println!("{package_name}: {app_id}"),
    }
    Ok(())
}

fn print_app_info(app_id: i64, response: &AppInfoResponse) {
    let info = &response.app_info;
    println!("app id:         {app_id}");
    if let Some(version) = &info.version_number {
        println!("version:        {version}");
    }
    if let Some(state) = info.release_state {
        println!("release state:  {state}");
    }
    if let Some(lang) = &info.default_lang {
        println!("default lang:   {lang}");
    }
    if let Some(updated) = &info.update_time {
        println!("updated:        {updated}");
    }
    if let Some(phased) = &info.phased_release_info {
        println!(
            "phased release: {} {}%",
            phased.state.as_deref().unwrap_or("-"),
            phased.phased_release_percent.as_deref().unwrap_or("-")
        );
    }
    for language in &response.languages {
        println!(
            "  {:<8} {}",
            language.lang,
            language.app_name.as_deref().unwrap_or_default()
        );
    }
    println!("console:        {}", console_app_info_url(app_id));
}

fn cmd_update_info(
    build_type: &str,
    release_type: Option<ReleaseType>,
    update: AppInfoUpdate,
) -> CliResult {
    let project = Project::load(&project_root()?)?;
    let options = execute_options(&project, release_type)?;
    let task = project.graph.require(&app_info_task_name(build_type))?;

    let app_id = agcp_engine::update_app_info(&task.inputs, &options, &update)?;
    eprintln!("     Updated app info of app {app_id}");
    Ok(())
}
