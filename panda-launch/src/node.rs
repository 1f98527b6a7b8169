//! Descriptors for the external executables a launch starts.

use std::path::PathBuf;

use serde::Serialize;

use crate::{command::CommandParam, condition::Condition, param::ParamMap};

/// Where a node's stdout/stderr should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Output {
    Screen,
    Log,
}

/// What happens to the rest of the launch when this process exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OnExit {
    Ignore,
    /// Exit of this process tears down every other spawned process.
    ShutdownAll,
}

/// Renaming of one logical data channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Remapping {
    pub from: String,
    pub to: String,
}

/// An external package/executable pair plus everything it is started with.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDescriptor {
    pub package: String,
    pub executable: String,
    pub name: Option<String>,
    pub output: Output,
    /// Parameter bundles, merged in order at realization.
    pub parameters: Vec<ParamMap>,
    /// Parameters computed by running an external tool.
    pub command_parameters: Vec<CommandParam>,
    /// Parameter files passed through verbatim (already in ROS 2
    /// `ros__parameters` form).
    pub params_files: Vec<PathBuf>,
    /// Plain process arguments placed before the ROS argument block.
    pub arguments: Vec<String>,
    pub remappings: Vec<Remapping>,
    pub on_exit: OnExit,
    pub condition: Option<Condition>,
}

impl NodeDescriptor {
    pub fn new(package: impl Into<String>, executable: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            executable: executable.into(),
            name: None,
            output: Output::Screen,
            parameters: Vec::new(),
            command_parameters: Vec::new(),
            params_files: Vec::new(),
            arguments: Vec::new(),
            remappings: Vec::new(),
            on_exit: OnExit::Ignore,
            condition: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn output(mut self, output: Output) -> Self {
        self.output = output;
        self
    }

    pub fn parameters(mut self, parameters: ParamMap) -> Self {
        self.parameters.push(parameters);
        self
    }

    /// Adds a parameter bundle only when the resource was actually loaded.
    pub fn parameters_opt(mut self, parameters: Option<ParamMap>) -> Self {
        if let Some(parameters) = parameters {
            self.parameters.push(parameters);
        }
        self
    }

    pub fn command_parameter(mut self, parameter: CommandParam) -> Self {
        self.command_parameters.push(parameter);
        self
    }

    pub fn params_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.params_files.push(path.into());
        self
    }

    pub fn argument(mut self, argument: impl Into<String>) -> Self {
        self.arguments.push(argument.into());
        self
    }

    pub fn remap(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.remappings.push(Remapping {
            from: from.into(),
            to: to.into(),
        });
        self
    }

    pub fn on_exit(mut self, on_exit: OnExit) -> Self {
        self.on_exit = on_exit;
        self
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// The node name: explicit name if given, executable name otherwise.
    pub fn node_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.executable)
    }

    /// All parameter bundles collapsed into one dictionary, later bundles
    /// winning on key collision.
    pub fn merged_parameters(&self) -> ParamMap {
        let mut merged = ParamMap::new();
        for bundle in &self.parameters {
            merged.merge(bundle.clone());
        }
        merged
    }
}

/// A raw subprocess, used where the launch runs a command rather than a
/// package node (controller spawners).
#[derive(Debug, Clone, PartialEq)]
pub struct ExecProcess {
    pub command: Vec<String>,
    pub output: Output,
    pub condition: Option<Condition>,
}

impl ExecProcess {
    pub fn new<I, S>(command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: command.into_iter().map(Into::into).collect(),
            output: Output::Screen,
            condition: None,
        }
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_name_falls_back_to_executable() {
        let node = NodeDescriptor::new("moveit_ros_move_group", "move_group");
        assert_eq!(node.node_name(), "move_group");
        let node = NodeDescriptor::new("rviz2", "rviz2").name("rviz_main");
        assert_eq!(node.node_name(), "rviz_main");
    }

    #[test]
    fn later_bundle_wins_in_merged_parameters() {
        let mut first = ParamMap::new();
        first.insert("rate", 10);
        first.insert("source_list", "franka/joint_states");
        let mut second = ParamMap::new();
        second.insert("rate", 30);

        let node = NodeDescriptor::new("joint_state_publisher", "joint_state_publisher")
            .parameters(first)
            .parameters(second);
        let merged = node.merged_parameters();
        assert_eq!(merged.get("rate"), Some(&serde_yaml::Value::from(30)));
        assert!(merged.get("source_list").is_some());
    }

    #[test]
    fn parameters_opt_skips_absent_resources() {
        let node = NodeDescriptor::new("rviz2", "rviz2").parameters_opt(None);
        assert!(node.parameters.is_empty());
    }
}
