//! Planning pipeline and fixed parameter bundles for move_group.

use panda_launch::ParamMap;

/// Adapter chain shared by the OMPL and Pilz pipelines.
pub const REQUEST_ADAPTERS: &str = concat!(
    "default_planner_request_adapters/AddTimeOptimalParameterization ",
    "default_planner_request_adapters/ResolveConstraintFrames ",
    "default_planner_request_adapters/FixWorkspaceBounds ",
    "default_planner_request_adapters/FixStartStateBounds ",
    "default_planner_request_adapters/FixStartStateCollision ",
    "default_planner_request_adapters/FixStartStatePathConstraints",
);

const CHECK_REQUEST_ADAPTERS: &str = concat!(
    "default_planning_request_adapters/CheckStartStateBounds",
    "default_planning_request_adapters/CheckStartStateCollision",
    "default_planning_request_adapters/ValidateWorkspaceBounds",
);

pub const OMPL_PLANNING_PLUGIN: &str = "ompl_interface/OMPLPlanner";
pub const PILZ_PLANNING_PLUGIN: &str = "pilz_industrial_motion_planner/CommandPlanner";

const START_STATE_MAX_BOUNDS_ERROR: f64 = 0.1;

fn base_pipeline(plugin: &str, adapters: &str) -> ParamMap {
    let mut move_group = ParamMap::new();
    move_group.insert("planning_plugin", plugin);
    move_group.insert("request_adapters", adapters);
    move_group.insert("start_state_max_bounds_error", START_STATE_MAX_BOUNDS_ERROR);
    move_group
}

fn merged(mut move_group: ParamMap, overrides: Option<ParamMap>) -> ParamMap {
    if let Some(overrides) = overrides {
        move_group.merge(overrides);
    }
    move_group.scoped("move_group")
}

/// The OMPL pipeline: defaults merged with the planner tuning file, the
/// file winning on key collision.
pub fn ompl_pipeline(overrides: Option<ParamMap>) -> ParamMap {
    merged(base_pipeline(OMPL_PLANNING_PLUGIN, REQUEST_ADAPTERS), overrides)
}

/// The Pilz industrial-motion pipeline.
pub fn pilz_pipeline(overrides: Option<ParamMap>) -> ParamMap {
    merged(base_pipeline(PILZ_PLANNING_PLUGIN, REQUEST_ADAPTERS), overrides)
}

/// The pipeline actually handed to move_group: the plugin is chosen by the
/// `planner` argument, and cartesian limits ride along for the Pilz case.
pub fn combined_pipeline(planner: &str, overrides: Option<ParamMap>) -> ParamMap {
    let mut move_group = base_pipeline(
        planner,
        &format!("{REQUEST_ADAPTERS}{CHECK_REQUEST_ADAPTERS}"),
    );
    move_group.insert("default_planner_config", "PTP");
    let mut pipeline = merged(move_group, overrides);
    pipeline.merge(
        cartesian_limits()
            .scoped("cartesian_limits")
            .scoped("robot_description_planning"),
    );
    pipeline
}

fn cartesian_limits() -> ParamMap {
    let mut limits = ParamMap::new();
    limits.insert("max_trans_vel", 0.2);
    limits.insert("max_trans_acc", 1.0);
    limits.insert("max_trans_dec", -1.0);
    limits.insert("max_rot_vel", 0.5);
    limits
}

pub fn trajectory_execution() -> ParamMap {
    let mut params = ParamMap::new();
    params.insert("moveit_manage_controllers", true);
    params.insert("trajectory_execution.allowed_execution_duration_scaling", 1.2);
    params.insert("trajectory_execution.allowed_goal_duration_margin", 0.5);
    params.insert("trajectory_execution.allowed_start_tolerance", 0.01);
    params
}

pub fn planning_scene_monitor() -> ParamMap {
    let mut params = ParamMap::new();
    params.insert("publish_planning_scene", true);
    params.insert("publish_geometry_updates", true);
    params.insert("publish_state_updates", true);
    params.insert("publish_transforms_updates", true);
    params
}

/// Bridges move_group to the controller manager. An absent controller
/// definition file turns into an explicit null so the consumer sees what it
/// was (not) given.
pub fn controller_bridge(simple_controllers: Option<ParamMap>) -> ParamMap {
    let mut params = ParamMap::new();
    match simple_controllers {
        Some(controllers) => params.insert(
            "moveit_simple_controller_manager",
            serde_yaml::Value::Mapping(controllers.into_mapping()),
        ),
        None => params.insert("moveit_simple_controller_manager", serde_yaml::Value::Null),
    };
    params.insert(
        "moveit_controller_manager",
        "moveit_simple_controller_manager/MoveItSimpleControllerManager",
    );
    params
}

#[cfg(test)]
mod tests {
    use serde_yaml::Value;

    use super::*;

    #[test]
    fn adapter_chain_spellings() {
        assert_eq!(
            REQUEST_ADAPTERS,
            "default_planner_request_adapters/AddTimeOptimalParameterization \
             default_planner_request_adapters/ResolveConstraintFrames \
             default_planner_request_adapters/FixWorkspaceBounds \
             default_planner_request_adapters/FixStartStateBounds \
             default_planner_request_adapters/FixStartStateCollision \
             default_planner_request_adapters/FixStartStatePathConstraints",
        );
        assert_eq!(REQUEST_ADAPTERS.split(' ').count(), 6);
    }

    fn move_group(pipeline: &ParamMap) -> &serde_yaml::Mapping {
        pipeline.get("move_group").unwrap().as_mapping().unwrap()
    }

    #[test]
    fn ompl_pipeline_defaults() {
        let pipeline = ompl_pipeline(None);
        let inner = move_group(&pipeline);
        assert_eq!(
            inner.get("planning_plugin"),
            Some(&Value::from(OMPL_PLANNING_PLUGIN))
        );
        assert_eq!(
            inner.get("start_state_max_bounds_error"),
            Some(&Value::from(0.1))
        );
    }

    #[test]
    fn tuning_file_wins_on_collision_and_extends_otherwise() {
        let mut overrides = ParamMap::new();
        overrides.insert("start_state_max_bounds_error", 0.25);
        overrides.insert("planner_configs", "RRTConnect");
        let pipeline = ompl_pipeline(Some(overrides));
        let inner = move_group(&pipeline);
        assert_eq!(
            inner.get("start_state_max_bounds_error"),
            Some(&Value::from(0.25))
        );
        assert_eq!(inner.get("planner_configs"), Some(&Value::from("RRTConnect")));
        // non-overlapping defaults survive
        assert_eq!(
            inner.get("planning_plugin"),
            Some(&Value::from(OMPL_PLANNING_PLUGIN))
        );
    }

    #[test]
    fn pilz_pipeline_uses_the_pilz_plugin() {
        let pipeline = pilz_pipeline(None);
        assert_eq!(
            move_group(&pipeline).get("planning_plugin"),
            Some(&Value::from(PILZ_PLANNING_PLUGIN)),
        );
    }

    #[test]
    fn combined_pipeline_takes_the_planner_argument() {
        let pipeline = combined_pipeline(PILZ_PLANNING_PLUGIN, None);
        let inner = move_group(&pipeline);
        assert_eq!(
            inner.get("planning_plugin"),
            Some(&Value::from(PILZ_PLANNING_PLUGIN))
        );
        assert_eq!(inner.get("default_planner_config"), Some(&Value::from("PTP")));
        let adapters = inner.get("request_adapters").unwrap().as_str().unwrap();
        assert!(adapters.starts_with("default_planner_request_adapters/AddTimeOptimalParameterization"));
        assert!(adapters.contains("ValidateWorkspaceBounds"));

        let limits = pipeline.get("robot_description_planning").unwrap();
        assert_eq!(
            limits["cartesian_limits"]["max_trans_vel"],
            Value::from(0.2)
        );
        assert_eq!(
            limits["cartesian_limits"]["max_trans_dec"],
            Value::from(-1.0)
        );
    }

    #[test]
    fn trajectory_execution_tolerances() {
        let params = trajectory_execution();
        assert_eq!(
            params.get("moveit_manage_controllers"),
            Some(&Value::from(true))
        );
        assert_eq!(
            params.get("trajectory_execution.allowed_execution_duration_scaling"),
            Some(&Value::from(1.2))
        );
        assert_eq!(
            params.get("trajectory_execution.allowed_goal_duration_margin"),
            Some(&Value::from(0.5))
        );
        assert_eq!(
            params.get("trajectory_execution.allowed_start_tolerance"),
            Some(&Value::from(0.01))
        );
    }

    #[test]
    fn controller_bridge_reports_an_absent_definition_as_null() {
        let params = controller_bridge(None);
        assert_eq!(
            params.get("moveit_simple_controller_manager"),
            Some(&Value::Null)
        );
        assert_eq!(
            params.get("moveit_controller_manager"),
            Some(&Value::from(
                "moveit_simple_controller_manager/MoveItSimpleControllerManager"
            ))
        );
    }
}
