use std::path::{Path, PathBuf};

use panda_launch::ResolvedArguments;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    arguments::{
        CAMERA_ID, CAMERA_MODEL, DB, FAKE_SENSOR_COMMANDS, LOAD_CAMERA, LOAD_GRIPPER, PLANNER,
        ROBOT_IP, USE_FAKE_HARDWARE,
    },
    utils, Error,
};

/// Typed view of the resolved launch arguments, plus where the bringup's
/// own resources live.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct BringupConfig {
    /// Hostname or IP address of the robot.
    pub robot_ip: String,
    #[serde(default)]
    pub use_fake_hardware: bool,
    /// Only honored by the hardware layer when `use_fake_hardware` is set.
    #[serde(default)]
    pub fake_sensor_commands: bool,
    #[serde(default)]
    pub load_gripper: bool,
    #[serde(default = "default_true")]
    pub load_camera: bool,
    /// Planning plugin handed to the combined pipeline.
    #[serde(default = "default_planner")]
    pub planner: String,
    /// Camera id (serial number).
    #[serde(default = "default_camera_id")]
    pub serial: String,
    #[serde(default = "default_camera_model")]
    pub camera_type: String,
    /// Start the warehouse database bridge.
    #[serde(default)]
    pub db: bool,
    /// Directory holding `config/`, `srdf/` and `rviz/`.
    #[serde(default = "default_share_dir")]
    pub share_dir: PathBuf,
    /// Directory holding `robots/<arm>.urdf.xacro`; `share_dir` when unset.
    #[serde(default)]
    pub description_dir: Option<PathBuf>,
    /// Overwrite scripts applied to the combined planning pipeline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param_overrides: Option<String>,
}

impl Default for BringupConfig {
    fn default() -> Self {
        Self {
            robot_ip: String::new(),
            use_fake_hardware: false,
            fake_sensor_commands: false,
            load_gripper: false,
            load_camera: default_true(),
            planner: default_planner(),
            serial: default_camera_id(),
            camera_type: default_camera_model(),
            db: false,
            share_dir: default_share_dir(),
            description_dir: None,
            param_overrides: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_planner() -> String {
    "ompl_interface/OMPLPlanner".to_owned()
}

fn default_camera_id() -> String {
    "'22141921'".to_owned()
}

fn default_camera_model() -> String {
    "blackfly_s".to_owned()
}

fn default_share_dir() -> PathBuf {
    utils::get_share_dir(None)
}

impl BringupConfig {
    /// Builds the typed view from fully resolved launch arguments.
    pub fn from_resolved(arguments: &ResolvedArguments) -> Result<Self, Error> {
        let config = Self {
            robot_ip: arguments.str(ROBOT_IP)?.to_owned(),
            use_fake_hardware: arguments.bool(USE_FAKE_HARDWARE)?,
            fake_sensor_commands: arguments.bool(FAKE_SENSOR_COMMANDS)?,
            load_gripper: arguments.bool(LOAD_GRIPPER)?,
            load_camera: arguments.bool(LOAD_CAMERA)?,
            planner: arguments.str(PLANNER)?.to_owned(),
            serial: arguments.str(CAMERA_ID)?.to_owned(),
            camera_type: arguments.str(CAMERA_MODEL)?.to_owned(),
            db: arguments.bool(DB)?,
            ..Self::default()
        };
        debug!("{:?}", config);
        Ok(config)
    }

    pub fn description_dir(&self) -> &Path {
        self.description_dir.as_deref().unwrap_or(&self.share_dir)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::arguments::declare_arguments;

    #[test]
    fn default_matches_declared_argument_defaults() {
        let config = BringupConfig::default();
        assert!(config.robot_ip.is_empty());
        assert!(!config.use_fake_hardware);
        assert!(!config.fake_sensor_commands);
        assert!(!config.load_gripper);
        assert!(config.load_camera);
        assert_eq!(config.planner, "ompl_interface/OMPLPlanner");
        assert_eq!(config.serial, "'22141921'");
        assert_eq!(config.camera_type, "blackfly_s");
        assert!(!config.db);
    }

    #[test]
    fn from_resolved_parses_booleans() {
        let overrides = HashMap::from([
            ("robot_ip".to_owned(), "172.16.0.2".to_owned()),
            ("use_fake_hardware".to_owned(), "1".to_owned()),
            ("load_gripper".to_owned(), "yes".to_owned()),
        ]);
        let resolved = declare_arguments().resolve(&overrides).unwrap();
        let config = BringupConfig::from_resolved(&resolved).unwrap();
        assert_eq!(config.robot_ip, "172.16.0.2");
        assert!(config.use_fake_hardware);
        assert!(config.load_gripper);
        assert!(config.load_camera);
    }

    #[test]
    fn from_resolved_rejects_non_boolean_flags() {
        let overrides = HashMap::from([
            ("robot_ip".to_owned(), "172.16.0.2".to_owned()),
            ("db".to_owned(), "mongo".to_owned()),
        ]);
        let resolved = declare_arguments().resolve(&overrides).unwrap();
        assert!(matches!(
            BringupConfig::from_resolved(&resolved),
            Err(Error::Launch(panda_launch::Error::InvalidBool(_)))
        ));
    }

    #[test]
    fn yaml_round_trip() {
        let config = BringupConfig {
            robot_ip: "panda.local".to_owned(),
            ..Default::default()
        };
        let text = serde_yaml::to_string(&config).unwrap();
        let back: BringupConfig = serde_yaml::from_str(&text).unwrap();
        assert_eq!(back.robot_ip, "panda.local");
        assert_eq!(back.camera_type, config.camera_type);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<BringupConfig, _> =
            serde_yaml::from_str("robot_ip: panda.local\nrobot_ipp: typo\n");
        assert!(result.is_err());
    }
}
