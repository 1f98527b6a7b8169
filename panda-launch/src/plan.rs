//! Serializable record of a realized launch, plus ROS command-line
//! generation for the executor.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_yaml::Mapping;

use crate::{
    argument::LaunchArgument,
    description::{Entity, RealizedLaunch},
    include::SubLaunch,
    node::{NodeDescriptor, OnExit, Output, Remapping},
    Error,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanEntity {
    Argument(LaunchArgument),
    Node(NodePlan),
    Process(ProcessPlan),
    SubLaunch(SubLaunchPlan),
}

#[derive(Debug, Clone, Serialize)]
pub struct NodePlan {
    pub package: String,
    pub executable: String,
    pub name: String,
    pub output: Output,
    #[serde(skip_serializing_if = "Mapping::is_empty")]
    pub parameters: Mapping,
    /// Commands still to be expanded (present only before resolution).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub command_parameters: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params_files: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub remappings: Vec<Remapping>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<String>,
    pub on_exit: OnExit,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessPlan {
    pub command: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubLaunchPlan {
    pub package: String,
    pub launch_file: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<(String, String)>,
}

/// Everything the launch runtime will be handed, in declaration order.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct LaunchPlan {
    pub entities: Vec<PlanEntity>,
}

impl LaunchPlan {
    pub fn from_realized(realized: &RealizedLaunch) -> Self {
        let entities = realized
            .entities()
            .iter()
            .map(|entity| match entity {
                Entity::Argument(argument) => PlanEntity::Argument(argument.clone()),
                Entity::Node(node) => PlanEntity::Node(NodePlan {
                    package: node.package.clone(),
                    executable: node.executable.clone(),
                    name: node.node_name().to_owned(),
                    output: node.output,
                    parameters: node.merged_parameters().into_mapping(),
                    command_parameters: node
                        .command_parameters
                        .iter()
                        .map(|c| c.command_line())
                        .collect(),
                    params_files: node.params_files.clone(),
                    remappings: node.remappings.clone(),
                    arguments: node.arguments.clone(),
                    on_exit: node.on_exit,
                }),
                Entity::Process(process) => PlanEntity::Process(ProcessPlan {
                    command: process.command.clone(),
                }),
                Entity::SubLaunch(sub_launch) => PlanEntity::SubLaunch(SubLaunchPlan {
                    package: sub_launch.package.clone(),
                    launch_file: sub_launch.launch_file.clone(),
                    arguments: sub_launch.forwarded.clone(),
                }),
            })
            .collect();
        Self { entities }
    }

    pub fn to_yaml(&self) -> Result<String, Error> {
        serde_yaml::to_string(self).map_err(Error::Serialize)
    }
}

/// Command line starting a node, ROS 2 style:
/// `ros2 run <package> <executable> [args..] --ros-args -r __node:=<name>
/// [-r from:=to ..] [--params-file <file>]`.
pub fn node_command(node: &NodeDescriptor, params_file: Option<&Path>) -> Vec<String> {
    let mut cmd = vec![
        "ros2".to_owned(),
        "run".to_owned(),
        node.package.clone(),
        node.executable.clone(),
    ];
    cmd.extend(node.arguments.iter().cloned());
    cmd.push("--ros-args".to_owned());
    cmd.push("-r".to_owned());
    cmd.push(format!("__node:={}", node.node_name()));
    for remapping in &node.remappings {
        cmd.push("-r".to_owned());
        cmd.push(format!("{}:={}", remapping.from, remapping.to));
    }
    for params_file in &node.params_files {
        cmd.push("--params-file".to_owned());
        cmd.push(params_file.display().to_string());
    }
    if let Some(params_file) = params_file {
        cmd.push("--params-file".to_owned());
        cmd.push(params_file.display().to_string());
    }
    cmd
}

/// Command line delegating a sub-launch:
/// `ros2 launch <package> <file> [name:=value ..]`.
pub fn sub_launch_command(sub_launch: &SubLaunch) -> Vec<String> {
    let mut cmd = vec![
        "ros2".to_owned(),
        "launch".to_owned(),
        sub_launch.package.clone(),
        sub_launch.launch_file.clone(),
    ];
    for (name, value) in &sub_launch.forwarded {
        cmd.push(format!("{name}:={value}"));
    }
    cmd
}

/// Writes the node's merged parameters as a ROS 2 parameter file
/// (`<node>: {ros__parameters: {..}}`) into `dir`, returning its path.
/// Nothing is written when the node has no parameters.
pub fn write_params_file(node: &NodeDescriptor, dir: &Path) -> Result<Option<PathBuf>, Error> {
    let merged = node.merged_parameters();
    if merged.is_empty() {
        return Ok(None);
    }
    let document = merged
        .scoped("ros__parameters")
        .scoped(node.node_name().to_owned());
    let text = serde_yaml::to_string(&document).map_err(Error::Serialize)?;
    let path = dir.join(format!("{}.yaml", node.node_name()));
    fs_err::write(&path, text)
        .map_err(|e| Error::ParamsFile(node.node_name().to_owned(), e))?;
    Ok(Some(path))
}
