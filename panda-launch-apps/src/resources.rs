//! Locations of the YAML, SRDF, and rviz resources the bringup ships, and
//! the soft-loading rules for them.

use std::path::PathBuf;

use panda_launch::{load_yaml, ParamMap};

use crate::{BringupConfig, Error};

pub const KINEMATICS_FILE: &str = "config/kinematics.yaml";
pub const OMPL_PLANNING_FILE: &str = "config/ompl_planning.yaml";
pub const PILZ_PLANNING_FILE: &str = "config/pilz_planning.yaml";
pub const SIMPLE_CONTROLLERS_FILE: &str = "config/panda_controllers.yaml";
pub const ROS_CONTROLLERS_FILE: &str = "config/panda_ros_controllers.yaml";
pub const MOCK_ROS_CONTROLLERS_FILE: &str = "config/panda_mock_ros_controllers.yaml";
pub const URDF_XACRO_FILE: &str = "robots/panda_arm_platform.urdf.xacro";
pub const SRDF_XACRO_FILE: &str = "srdf/panda_arm_platform.srdf.xacro";
pub const RVIZ_CONFIG_FILE: &str = "rviz/moveit.rviz";

/// Solver configuration for the arm group. Absent when the file is missing.
pub fn kinematics(config: &BringupConfig) -> Result<Option<ParamMap>, Error> {
    Ok(load_yaml(&config.share_dir.join(KINEMATICS_FILE))?)
}

/// OMPL planner tuning, merged over the pipeline defaults.
pub fn ompl_planning(config: &BringupConfig) -> Result<Option<ParamMap>, Error> {
    Ok(load_yaml(&config.share_dir.join(OMPL_PLANNING_FILE))?)
}

/// Pilz planner tuning, merged over the pipeline defaults.
pub fn pilz_planning(config: &BringupConfig) -> Result<Option<ParamMap>, Error> {
    Ok(load_yaml(&config.share_dir.join(PILZ_PLANNING_FILE))?)
}

/// Controller definitions for the simple controller manager.
pub fn simple_controllers(config: &BringupConfig) -> Result<Option<ParamMap>, Error> {
    Ok(load_yaml(&config.share_dir.join(SIMPLE_CONTROLLERS_FILE))?)
}

/// The ros2_control controller definitions: mock controllers under fake
/// hardware, the real ones otherwise.
pub fn ros2_controllers_path(config: &BringupConfig) -> PathBuf {
    let file = if config.use_fake_hardware {
        MOCK_ROS_CONTROLLERS_FILE
    } else {
        ROS_CONTROLLERS_FILE
    };
    config.share_dir.join(file)
}

pub fn urdf_xacro_path(config: &BringupConfig) -> PathBuf {
    config.description_dir().join(URDF_XACRO_FILE)
}

pub fn srdf_xacro_path(config: &BringupConfig) -> PathBuf {
    config.share_dir.join(SRDF_XACRO_FILE)
}

pub fn rviz_config_path(config: &BringupConfig) -> PathBuf {
    config.share_dir.join(RVIZ_CONFIG_FILE)
}
