//! Run a planned task against the publishing API.
//!
//! Each run reads its unit's files, builds its own transport, obtains a fresh
//! token and then performs the operation. Nothing is shared between runs.

use std::path::{Path, PathBuf};

use agcp_api::endpoint::console_app_info_url;
use agcp_api::model::{AppInfoUpdate, PublishReceipt};
use agcp_api::{
    AppInfoResponse, AuthClient, AuthError, Endpoints, HttpSettings, PublishingClient, ReleaseType,
};
use agcp_config::{ApiCredentials, AppIdentity};
use agcp_util::fs::is_readable_file;

use crate::artifact::locate_artifact;
use crate::enumerate::PublishableUnit;
use crate::error::EngineError;
use crate::plan::{TaskDescriptor, TaskKind};

/// Run-time options shared by every task of one invocation.
#[derive(Debug, Clone)]
pub struct ExecuteOptions {
    pub module_dir: PathBuf,
    pub endpoints: Endpoints,
    pub release_type: ReleaseType,
}

/// What a successful task produced.
#[derive(Debug)]
pub enum TaskOutcome {
    Published {
        app_id: i64,
        receipt: PublishReceipt,
    },
    AppInfo {
        app_id: i64,
        response: AppInfoResponse,
    },
    AppId {
        package_name: String,
        app_id: i64,
    },
}

/// Run one task.
///
/// A publish task fails before any request if its artifact is missing.
///
/// # Errors
/// Returns an error if the app metadata or credentials cannot be read,
/// authentication fails, or the operation itself fails.
pub fn execute(task: &TaskDescriptor, options: &ExecuteOptions) -> Result<TaskOutcome, EngineError> {
    let unit = &task.inputs;
    match task.kind {
        TaskKind::Publish => {
            let dependency = task.depends_on.as_deref().unwrap_or_default();
            let artifact =
                locate_artifact(&options.module_dir, &task.name, dependency, &unit.variant)?;
            let (identity, client) = connect(unit, &options.endpoints)?;
            log::info!(
                "uploading {} to app {} ({})",
                artifact.display(),
                identity.app_id,
                identity.package_name
            );
            let receipt = client.publish(
                identity.app_id,
                unit.variant.artifact_type,
                &artifact,
                options.release_type,
            )?;
            log_console_url(unit, identity.app_id);
            Ok(TaskOutcome::Published {
                app_id: identity.app_id,
                receipt,
            })
        }
        TaskKind::AppInfo => {
            let (identity, client) = connect(unit, &options.endpoints)?;
            let response = client.get_app_info(identity.app_id)?;
            log_console_url(unit, identity.app_id);
            Ok(TaskOutcome::AppInfo {
                app_id: identity.app_id,
                response,
            })
        }
        TaskKind::AppId => {
            let (identity, client) = connect(unit, &options.endpoints)?;
            let app_id = client.get_app_id(&identity.package_name)?;
            Ok(TaskOutcome::AppId {
                package_name: identity.package_name,
                app_id,
            })
        }
    }
}

/// Update the basic app information of the unit's app.
///
/// Returns the app id that was updated.
///
/// # Errors
/// Returns an error if the unit's files cannot be read, authentication fails,
/// or the update is rejected.
pub fn update_app_info(
    unit: &PublishableUnit,
    options: &ExecuteOptions,
    update: &AppInfoUpdate,
) -> Result<i64, EngineError> {
    let (identity, client) = connect(unit, &options.endpoints)?;
    client.update_app_info_basic(identity.app_id, options.release_type, update)?;
    log_console_url(unit, identity.app_id);
    Ok(identity.app_id)
}

/// Read the unit's files and authenticate.
fn connect(
    unit: &PublishableUnit,
    endpoints: &Endpoints,
) -> Result<(AppIdentity, PublishingClient), EngineError> {
    let identity = AppIdentity::from_path(&unit.app_config_path)?;
    let credentials = load_credentials(&unit.api_config_path)?;

    let auth = AuthClient::new(HttpSettings {
        endpoints: endpoints.clone(),
        log_http: unit.log_http,
        verbose: unit.verbose,
        ..HttpSettings::default()
    });
    let token = auth.authenticate(&credentials)?;
    Ok((identity, PublishingClient::new(&auth, token)))
}

fn load_credentials(path: &Path) -> Result<ApiCredentials, EngineError> {
    if !is_readable_file(path) {
        log::warn!("AGConnect API config not found: {}", path.display());
        return Err(AuthError::MissingCredentials {
            path: path.display().to_string(),
        }
        .into());
    }
    let credentials = ApiCredentials::from_path(path)?;
    if credentials.client_credentials().is_none() {
        log::warn!(
            "AGConnect API config {} is of type \"{}\"; a team client with role App administrator is required",
            path.display(),
            credentials.kind
        );
        return Err(AuthError::UnsupportedCredentials {
            kind: credentials.kind,
        }
        .into());
    }
    Ok(credentials)
}

fn log_console_url(unit: &PublishableUnit, app_id: i64) {
    if unit.verbose {
        log::info!("{}", console_app_info_url(app_id));
    }
}
