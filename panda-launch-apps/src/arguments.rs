//! The launch arguments the bringup exposes to the invoking shell.

use panda_launch::{ArgumentSet, LaunchArgument};

pub const ROBOT_IP: &str = "robot_ip";
pub const USE_FAKE_HARDWARE: &str = "use_fake_hardware";
pub const FAKE_SENSOR_COMMANDS: &str = "fake_sensor_commands";
pub const LOAD_GRIPPER: &str = "load_gripper";
pub const LOAD_CAMERA: &str = "load_camera";
pub const PLANNER: &str = "planner";
pub const CAMERA_ID: &str = "serial";
pub const CAMERA_MODEL: &str = "camera_type";
pub const DB: &str = "db";

/// Declares every bringup argument. `robot_ip` is the only one without a
/// default.
pub fn declare_arguments() -> ArgumentSet {
    let mut arguments = ArgumentSet::new();
    arguments.declare(LaunchArgument::required(
        ROBOT_IP,
        "Hostname or IP address of the robot.",
    ));
    arguments.declare(LaunchArgument::with_default(
        USE_FAKE_HARDWARE,
        "false",
        "Use fake hardware",
    ));
    arguments.declare(LaunchArgument::with_default(
        FAKE_SENSOR_COMMANDS,
        "false",
        "Fake sensor commands. Only valid when 'use_fake_hardware' is true",
    ));
    arguments.declare(LaunchArgument::with_default(
        LOAD_GRIPPER,
        "false",
        "Use Franka Gripper as an end-effector, otherwise, the robot is loaded \
         without an end-effector.",
    ));
    arguments.declare(LaunchArgument::with_default(
        LOAD_CAMERA,
        "true",
        "Use Flir camera as an end-effector, otherwise, the robot is loaded \
         without an end-effector.",
    ));
    arguments.declare(LaunchArgument::with_default(
        PLANNER,
        "ompl_interface/OMPLPlanner",
        "Choose planner to be used for arm control",
    ));
    arguments.declare(LaunchArgument::with_default(
        CAMERA_ID,
        "'22141921'",
        "Camera id, serial number.",
    ));
    arguments.declare(LaunchArgument::with_default(
        CAMERA_MODEL,
        "blackfly_s",
        "Camera model, example blackfly_s.",
    ));
    arguments.declare(LaunchArgument::with_default(DB, "false", "Database flag"));
    arguments
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn nine_arguments_and_only_robot_ip_is_required() {
        let arguments = declare_arguments();
        assert_eq!(arguments.iter().count(), 9);
        let required: Vec<_> = arguments
            .iter()
            .filter(|a| a.default.is_none())
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(required, vec![ROBOT_IP]);
    }

    #[test]
    fn defaults_match_the_bringup_contract() {
        let arguments = declare_arguments();
        let default = |name: &str| arguments.get(name).unwrap().default.as_deref();
        assert_eq!(default(USE_FAKE_HARDWARE), Some("false"));
        assert_eq!(default(FAKE_SENSOR_COMMANDS), Some("false"));
        assert_eq!(default(LOAD_GRIPPER), Some("false"));
        assert_eq!(default(LOAD_CAMERA), Some("true"));
        assert_eq!(default(PLANNER), Some("ompl_interface/OMPLPlanner"));
        assert_eq!(default(CAMERA_ID), Some("'22141921'"));
        assert_eq!(default(CAMERA_MODEL), Some("blackfly_s"));
        assert_eq!(default(DB), Some("false"));
    }

    #[test]
    fn resolution_without_robot_ip_fails() {
        let err = declare_arguments().resolve(&HashMap::new()).unwrap_err();
        assert!(matches!(
            err,
            panda_launch::Error::MissingArgument(name) if name == ROBOT_IP
        ));
    }
}
