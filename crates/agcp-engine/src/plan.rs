//! Turn publishable units into named tasks on a host registry.
//!
//! Every unit yields a publish task (unless it is a debug bundle), an app-info
//! task and an app-id task. Names collide across units by construction, so
//! registration is first-wins and a collision is silently ignored.

use std::collections::BTreeMap;

use agcp_util::text::{capitalize, to_csv};
use agcp_variants::BuildVariant;

use crate::enumerate::PublishableUnit;
use crate::error::EngineError;

/// Group shown next to every planned task.
pub const TASK_GROUP: &str = "agconnect";

/// What a planned task does when run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Upload the unit's artifact and attach it to the app.
    Publish,
    /// Query the app record.
    AppInfo,
    /// Look up the app id by package name.
    AppId,
}

/// A named, lazily executed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDescriptor {
    pub name: String,
    pub group: &'static str,
    pub kind: TaskKind,
    /// Host build task that must run first; publish tasks only.
    pub depends_on: Option<String>,
    pub inputs: PublishableUnit,
}

impl TaskDescriptor {
    pub fn description(&self) -> String {
        let variant = &self.inputs.variant;
        match self.kind {
            TaskKind::Publish => format!(
                "Publish the {} of variant `{}`",
                variant.artifact_type.suffix().to_uppercase(),
                variant.name()
            ),
            TaskKind::AppInfo => format!("Get the app info for build type `{}`", variant.build_type),
            TaskKind::AppId => format!("Get the app id for build type `{}`", variant.build_type),
        }
    }
}

/// The host's task container.
pub trait TaskRegistry {
    /// Register `descriptor` under its name unless that name is taken.
    ///
    /// Returns whether it was registered.
    fn register_if_absent(&mut self, descriptor: TaskDescriptor) -> bool;
}

/// In-memory registry listing tasks in name order.
#[derive(Debug, Default)]
pub struct TaskGraph {
    tasks: BTreeMap<String, TaskDescriptor>,
}

impl TaskGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&TaskDescriptor> {
        self.tasks.get(name)
    }

    /// Look up a task the user asked for by name.
    ///
    /// # Errors
    /// Returns `EngineError::UnknownTask`, listing the available names.
    pub fn require(&self, name: &str) -> Result<&TaskDescriptor, EngineError> {
        self.tasks.get(name).ok_or_else(|| EngineError::UnknownTask {
            name: name.to_owned(),
            available: if self.tasks.is_empty() {
                "none".to_owned()
            } else {
                to_csv(&self.names())
            },
        })
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tasks.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaskDescriptor> {
        self.tasks.values()
    }
}

impl TaskRegistry for TaskGraph {
    fn register_if_absent(&mut self, descriptor: TaskDescriptor) -> bool {
        if self.tasks.contains_key(&descriptor.name) {
            return false;
        }
        self.tasks.insert(descriptor.name.clone(), descriptor);
        true
    }
}

/// `publish<Variant><Apk|Aab>`, where the variant part is empty without a flavor.
pub fn publish_task_name(variant: &BuildVariant) -> String {
    let infix = if variant.product_flavor.is_some() {
        capitalize(&variant.name())
    } else {
        String::new()
    };
    format!(
        "publish{infix}{}",
        capitalize(variant.artifact_type.suffix())
    )
}

/// `getAppInfo<BuildType>`.
pub fn app_info_task_name(build_type: &str) -> String {
    format!("getAppInfo{}", capitalize(build_type))
}

/// `getAppId<BuildType>`.
pub fn app_id_task_name(build_type: &str) -> String {
    format!("getAppId{}", capitalize(build_type))
}

/// `:<project>:assemble<Variant>` or `:<project>:bundle<Variant>`.
pub fn host_dependency(project_name: &str, variant: &BuildVariant) -> String {
    format!(
        ":{project_name}:{}{}",
        variant.artifact_type.host_task_prefix(),
        capitalize(&variant.name())
    )
}

/// Registers the tasks of one project.
#[derive(Debug, Clone)]
pub struct TaskPlanner {
    project_name: String,
}

impl TaskPlanner {
    pub fn new(project_name: &str) -> Self {
        Self {
            project_name: project_name.to_owned(),
        }
    }

    /// Register the tasks of every unit, in unit order.
    ///
    /// Returns the number of newly registered tasks. Planning twice against
    /// the same registry registers nothing the second time.
    pub fn plan<R: TaskRegistry>(&self, units: &[PublishableUnit], registry: &mut R) -> usize {
        let mut registered = 0;
        for unit in units {
            for descriptor in self.descriptors(unit) {
                let name = descriptor.name.clone();
                if registry.register_if_absent(descriptor) {
                    log::debug!("registered task `{name}` for {}", unit.variant);
                    registered += 1;
                }
            }
        }
        registered
    }

    /// Plan into a fresh [`TaskGraph`].
    pub fn plan_graph(&self, units: &[PublishableUnit]) -> TaskGraph {
        let mut graph = TaskGraph::new();
        self.plan(units, &mut graph);
        graph
    }

    fn descriptors(&self, unit: &PublishableUnit) -> Vec<TaskDescriptor> {
        let variant = &unit.variant;
        let mut tasks = Vec::with_capacity(3);
        if variant.is_publishable() {
            tasks.push(TaskDescriptor {
                name: publish_task_name(variant),
                group: TASK_GROUP,
                kind: TaskKind::Publish,
                depends_on: Some(host_dependency(&self.project_name, variant)),
                inputs: unit.clone(),
            });
        }
        tasks.push(TaskDescriptor {
            name: app_info_task_name(&variant.build_type),
            group: TASK_GROUP,
            kind: TaskKind::AppInfo,
            depends_on: None,
            inputs: unit.clone(),
        });
        tasks.push(TaskDescriptor {
            name: app_id_task_name(&variant.build_type),
            group: TASK_GROUP,
            kind: TaskKind::AppId,
            depends_on: None,
            inputs: unit.clone(),
        });
        tasks
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use agcp_variants::ArtifactType;

    fn unit(build_type: &str, flavor: Option<&str>, artifact_type: ArtifactType) -> PublishableUnit {
        let source_set = flavor.map_or_else(
            || build_type.to_owned(),
            |f| agcp_variants::compute_variant_name(Some(f), build_type),
        );
        PublishableUnit {
            variant: BuildVariant::new(build_type, flavor, artifact_type),
            app_config_path: PathBuf::from(format!("mobile/src/{source_set}/agconnect-services.json")),
            api_config_path: PathBuf::from("credentials/agc-apiclient.json"),
            log_http: false,
            verbose: false,
        }
    }

    fn flavorless_units() -> Vec<PublishableUnit> {
        vec![
            unit("debug", None, ArtifactType::Apk),
            unit("debug", None, ArtifactType::Aab),
            unit("release", None, ArtifactType::Apk),
            unit("release", None, ArtifactType::Aab),
        ]
    }

    /// Records every call, accepting names first-wins.
    #[derive(Default)]
    struct RecordingRegistry {
        calls: Vec<String>,
        accepted: Vec<TaskDescriptor>,
    }

    impl TaskRegistry for RecordingRegistry {
        fn register_if_absent(&mut self, descriptor: TaskDescriptor) -> bool {
            self.calls.push(descriptor.name.clone());
            if self.accepted.iter().any(|t| t.name == descriptor.name) {
                return false;
            }
            self.accepted.push(descriptor);
            true
        }
    }

    #[test]
    fn task_names() {
        let plain = BuildVariant::new("release", None, ArtifactType::Aab);
        let flavored = BuildVariant::new("release", Some("huawei"), ArtifactType::Apk);
        assert_eq!(publish_task_name(&plain), "publishAab");
        assert_eq!(publish_task_name(&flavored), "publishHuaweiReleaseApk");
        assert_eq!(app_info_task_name("release"), "getAppInfoRelease");
        assert_eq!(app_id_task_name("debug"), "getAppIdDebug");
    }

    #[test]
    fn host_dependency_names() {
        let plain = BuildVariant::new("release", None, ArtifactType::Aab);
        let flavored = BuildVariant::new("debug", Some("huawei"), ArtifactType::Apk);
        assert_eq!(host_dependency("mobile", &plain), ":mobile:bundleRelease");
        assert_eq!(host_dependency("mobile", &flavored), ":mobile:assembleHuaweiDebug");
    }

    #[test]
    fn flavorless_project_yields_six_tasks() {
        let graph = TaskPlanner::new("mobile").plan_graph(&flavorless_units());
        assert_eq!(
            graph.names(),
            vec![
                "getAppIdDebug",
                "getAppIdRelease",
                "getAppInfoDebug",
                "getAppInfoRelease",
                "publishAab",
                "publishApk",
            ]
        );

        // publishApk is claimed by debug, publishAab only by release.
        let apk = graph.get("publishApk").unwrap();
        assert_eq!(apk.inputs.variant.build_type, "debug");
        assert_eq!(apk.depends_on.as_deref(), Some(":mobile:assembleDebug"));
        let aab = graph.get("publishAab").unwrap();
        assert_eq!(aab.inputs.variant.build_type, "release");
        assert_eq!(aab.depends_on.as_deref(), Some(":mobile:bundleRelease"));
        assert!(graph.iter().all(|t| t.group == TASK_GROUP));
    }

    #[test]
    fn debug_bundle_plans_only_info_tasks() {
        let units = vec![unit("debug", None, ArtifactType::Aab)];
        let graph = TaskPlanner::new("mobile").plan_graph(&units);
        assert_eq!(graph.names(), vec!["getAppIdDebug", "getAppInfoDebug"]);
        assert!(graph.iter().all(|t| t.depends_on.is_none()));
    }

    #[test]
    fn planning_twice_registers_nothing_new() {
        let planner = TaskPlanner::new("mobile");
        let mut registry = RecordingRegistry::default();
        let first = planner.plan(&flavorless_units(), &mut registry);
        let second = planner.plan(&flavorless_units(), &mut registry);
        assert_eq!(first, 6);
        assert_eq!(second, 0);
        assert_eq!(registry.accepted.len(), 6);
    }

    #[test]
    fn registration_follows_unit_order() {
        let mut registry = RecordingRegistry::default();
        TaskPlanner::new("mobile").plan(&flavorless_units(), &mut registry);
        assert_eq!(
            registry.calls.iter().take(6).map(String::as_str).collect::<Vec<_>>(),
            vec![
                "publishApk",
                "getAppInfoDebug",
                "getAppIdDebug",
                "getAppInfoDebug",
                "getAppIdDebug",
                "publishApk",
            ]
        );
    }

    #[test]
    fn flavors_share_info_tasks_first_wins() {
        let units = vec![
            unit("release", Some("google"), ArtifactType::Apk),
            unit("release", Some("huawei"), ArtifactType::Apk),
        ];
        let graph = TaskPlanner::new("mobile").plan_graph(&units);
        assert!(graph.get("publishGoogleReleaseApk").is_some());
        assert!(graph.get("publishHuaweiReleaseApk").is_some());
        let info = graph.get("getAppInfoRelease").unwrap();
        assert_eq!(info.inputs.variant.product_flavor.as_deref(), Some("google"));
        assert_eq!(graph.len(), 4);
    }

    #[test]
    fn require_lists_available_tasks() {
        let graph = TaskPlanner::new("mobile").plan_graph(&[unit("debug", None, ArtifactType::Aab)]);
        assert!(graph.require("getAppIdDebug").is_ok());
        let msg = graph.require("publishAab").unwrap_err().to_string();
        assert!(msg.contains("getAppIdDebug, getAppInfoDebug"), "error was: {msg}");
    }

    #[test]
    fn descriptions_name_the_variant() {
        let graph = TaskPlanner::new("mobile")
            .plan_graph(&[unit("release", Some("huawei"), ArtifactType::Aab)]);
        let publish = graph.get("publishHuaweiReleaseAab").unwrap();
        assert_eq!(publish.description(), "Publish the AAB of variant `huaweiRelease`");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn publish_tasks_bounded_by_units(
                build_types in proptest::collection::btree_set("[a-z]{1,6}", 1..4),
                flavors in proptest::collection::btree_set("[a-z]{1,6}", 0..3),
            ) {
                let flavors: Vec<Option<&str>> = if flavors.is_empty() {
                    vec![None]
                } else {
                    flavors.iter().map(|f| Some(f.as_str())).collect()
                };
                let mut units = Vec::new();
                for flavor in &flavors {
                    for build_type in &build_types {
                        for artifact_type in ArtifactType::ALL {
                            units.push(unit(build_type, *flavor, artifact_type));
                        }
                    }
                }
                let graph = TaskPlanner::new("app").plan_graph(&units);
                let publish = graph.iter().filter(|t| t.kind == TaskKind::Publish).count();
                let info = graph.iter().filter(|t| t.kind == TaskKind::AppInfo).count();
                prop_assert!(publish <= units.len());
                prop_assert_eq!(info, build_types.len());
                // Planning is idempotent.
                let mut again = graph;
                prop_assert_eq!(TaskPlanner::new("app").plan(&units, &mut again), 0);
            }
        }
    }
}
