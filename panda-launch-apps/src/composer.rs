//! Assembles the full launch description for the Panda MoveIt stack.

use panda_launch::{
    CommandParam, Condition, ExecProcess, LaunchDescription, NodeDescriptor, OnExit, Output,
    ParamMap, SubLaunch,
};

use crate::{
    arguments::{self, DB, LOAD_CAMERA, LOAD_GRIPPER},
    pipelines, resources, BringupConfig, Error,
};

const CONTROLLERS_TO_SPAWN: &[&str] = &["panda_arm_controller", "joint_state_broadcaster"];

/// Builds the declarative launch description: argument declarations first,
/// then every node, the conditional database bridge, the conditional gripper
/// and camera sub-launches, and the controller spawners.
///
/// The description still carries its conditions; realize it against the
/// resolved arguments to get the entities that will actually run.
pub fn compose(config: &BringupConfig) -> Result<LaunchDescription, Error> {
    if config.robot_ip.is_empty() {
        return Err(Error::EmptyRobotIp);
    }

    let robot_description = CommandParam::new("robot_description", "xacro")
        .arg(resources::urdf_xacro_path(config).display().to_string())
        .arg(format!("hand:={}", config.load_gripper))
        .arg(format!("camera:={}", config.load_camera))
        .arg(format!("camera_model:={}", config.camera_type))
        .arg(format!("robot_ip:={}", config.robot_ip))
        .arg(format!("use_fake_hardware:={}", config.use_fake_hardware))
        .arg(format!("fake_sensor_commands:={}", config.fake_sensor_commands));

    let robot_description_semantic = CommandParam::new("robot_description_semantic", "xacro")
        .arg(resources::srdf_xacro_path(config).display().to_string())
        .arg(format!("hand:={}", config.load_gripper))
        .arg(format!("camera:={}", config.load_camera));

    let kinematics = resources::kinematics(config)?;
    let ompl_tuning = resources::ompl_planning(config)?;

    let ompl_pipeline = pipelines::ompl_pipeline(ompl_tuning.clone());
    let combined_pipeline = apply_param_overrides(
        pipelines::combined_pipeline(&config.planner, ompl_tuning),
        config.param_overrides.as_deref(),
    )?;

    let mut publish_semantic = ParamMap::new();
    publish_semantic.insert("publish_robot_description_semantic", true);

    let mut description = LaunchDescription::new();
    for argument in arguments::declare_arguments().iter() {
        description.add_argument(argument.clone());
    }

    description.add_node(
        NodeDescriptor::new("rviz2", "rviz2")
            .name("rviz2")
            .output(Output::Log)
            .argument("-d")
            .argument(resources::rviz_config_path(config).display().to_string())
            .command_parameter(robot_description.clone())
            .command_parameter(robot_description_semantic.clone())
            .parameters(ompl_pipeline)
            .parameters_opt(kinematics.clone()),
    );

    description.add_node(
        NodeDescriptor::new("moveit_ros_move_group", "move_group")
            .command_parameter(robot_description.clone())
            .command_parameter(robot_description_semantic)
            .parameters_opt(kinematics)
            .parameters(combined_pipeline)
            .parameters(pipelines::trajectory_execution())
            .parameters(pipelines::controller_bridge(resources::simple_controllers(
                config,
            )?))
            .parameters(pipelines::planning_scene_monitor())
            .parameters(publish_semantic),
    );

    description.add_node(
        NodeDescriptor::new("robot_state_publisher", "robot_state_publisher")
            .name("robot_state_publisher")
            .command_parameter(robot_description.clone())
            .remap("joint_states", "franka/joint_states"),
    );

    description.add_node(
        NodeDescriptor::new("controller_manager", "ros2_control_node")
            .command_parameter(robot_description)
            .params_file(resources::ros2_controllers_path(config))
            .remap("joint_states", "franka/joint_states")
            .on_exit(OnExit::ShutdownAll),
    );

    let mut warehouse = ParamMap::new();
    warehouse.insert("warehouse_port", 33829);
    warehouse.insert("warehouse_host", "localhost");
    warehouse.insert(
        "warehouse_plugin",
        "warehouse_ros_mongo::MongoDatabaseConnection",
    );
    description.add_node(
        NodeDescriptor::new("warehouse_ros_mongo", "mongo_wrapper_ros.py")
            .parameters(warehouse)
            .condition(Condition::If(DB.to_owned())),
    );

    let mut joint_states = ParamMap::new();
    joint_states.insert(
        "source_list",
        serde_yaml::Value::from(vec!["franka/joint_states", "panda_gripper/joint_states"]),
    );
    joint_states.insert("rate", 30);
    description.add_node(
        NodeDescriptor::new("joint_state_publisher", "joint_state_publisher")
            .name("joint_state_publisher")
            .parameters(joint_states),
    );

    description.add_sub_launch(
        SubLaunch::new("franka_gripper", "gripper.launch.py")
            .forward("robot_ip", &config.robot_ip)
            .forward("use_fake_hardware", config.use_fake_hardware.to_string())
            .condition(Condition::If(LOAD_GRIPPER.to_owned())),
    );

    description.add_sub_launch(
        SubLaunch::new("spinnaker_camera_driver", "driver_node.launch.py")
            .forward("camera_type", &config.camera_type)
            .forward("serial", &config.serial)
            .condition(Condition::If(LOAD_CAMERA.to_owned())),
    );

    for &controller in CONTROLLERS_TO_SPAWN {
        description.add_process(ExecProcess::new([
            "ros2",
            "run",
            "controller_manager",
            "spawner",
            controller,
        ]));
    }

    Ok(description)
}

fn apply_param_overrides(
    pipeline: ParamMap,
    scripts: Option<&str>,
) -> Result<ParamMap, Error> {
    let Some(scripts) = scripts else {
        return Ok(pipeline);
    };
    let mut doc = serde_yaml::Value::Mapping(pipeline.into_mapping());
    panda_launch_config::overwrite(&mut doc, scripts).map_err(Error::ParamOverrides)?;
    Ok(ParamMap::from_serialize(&doc)?)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn test_config() -> BringupConfig {
        BringupConfig {
            robot_ip: "172.16.0.2".to_owned(),
            share_dir: PathBuf::from("/nowhere"),
            ..Default::default()
        }
    }

    #[test]
    fn empty_robot_ip_is_rejected() {
        let config = BringupConfig {
            share_dir: PathBuf::from("/nowhere"),
            ..Default::default()
        };
        assert!(matches!(compose(&config), Err(Error::EmptyRobotIp)));
    }

    #[test]
    fn xacro_arguments_follow_the_config() {
        let config = BringupConfig {
            load_gripper: true,
            ..test_config()
        };
        let description = compose(&config).unwrap();
        let node = description
            .entities()
            .iter()
            .find_map(|e| match e {
                panda_launch::Entity::Node(n) if n.executable == "move_group" => Some(n),
                _ => None,
            })
            .unwrap();
        let urdf = &node.command_parameters[0];
        assert_eq!(urdf.name, "robot_description");
        assert_eq!(urdf.program, "xacro");
        assert!(urdf.args.contains(&"hand:=true".to_owned()));
        assert!(urdf.args.contains(&"robot_ip:=172.16.0.2".to_owned()));
        assert!(urdf.args.contains(&"use_fake_hardware:=false".to_owned()));

        let srdf = &node.command_parameters[1];
        assert_eq!(srdf.name, "robot_description_semantic");
        assert_eq!(srdf.args.len(), 3);
    }

    #[test]
    fn param_overrides_reach_the_combined_pipeline() {
        let config = BringupConfig {
            param_overrides: Some("move_group.start_state_max_bounds_error = 0.3".to_owned()),
            ..test_config()
        };
        let description = compose(&config).unwrap();
        let node = description
            .entities()
            .iter()
            .find_map(|e| match e {
                panda_launch::Entity::Node(n) if n.executable == "move_group" => Some(n),
                _ => None,
            })
            .unwrap();
        let merged = node.merged_parameters();
        let move_group = merged.get("move_group").unwrap().as_mapping().unwrap();
        assert_eq!(
            move_group.get("start_state_max_bounds_error"),
            Some(&serde_yaml::Value::from(0.3)),
        );
    }

    #[test]
    fn bad_override_script_is_an_error() {
        let config = BringupConfig {
            param_overrides: Some("no equals sign".to_owned()),
            ..test_config()
        };
        assert!(matches!(
            compose(&config),
            Err(Error::ParamOverrides(_))
        ));
    }
}
