//! The ordered list of entities a launch is made of.

use crate::{
    argument::{LaunchArgument, ResolvedArguments},
    include::SubLaunch,
    node::{ExecProcess, NodeDescriptor},
    param::ParamMap,
    Error,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Argument(LaunchArgument),
    Node(NodeDescriptor),
    Process(ExecProcess),
    SubLaunch(SubLaunch),
}

/// Declarative shape of the launch: everything the composer produced, in
/// declaration order, conditions still attached.
#[derive(Debug, Clone, Default)]
pub struct LaunchDescription {
    entities: Vec<Entity>,
}

impl LaunchDescription {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entity: Entity) -> &mut Self {
        self.entities.push(entity);
        self
    }

    pub fn add_argument(&mut self, argument: LaunchArgument) -> &mut Self {
        self.add(Entity::Argument(argument))
    }

    pub fn add_node(&mut self, node: NodeDescriptor) -> &mut Self {
        self.add(Entity::Node(node))
    }

    pub fn add_process(&mut self, process: ExecProcess) -> &mut Self {
        self.add(Entity::Process(process))
    }

    pub fn add_sub_launch(&mut self, sub_launch: SubLaunch) -> &mut Self {
        self.add(Entity::SubLaunch(sub_launch))
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Evaluates every condition against the resolved arguments and keeps
    /// the active entities, preserving declaration order. Argument
    /// declarations pass through unconditionally.
    pub fn realize(&self, arguments: &ResolvedArguments) -> Result<RealizedLaunch, Error> {
        let mut entities = Vec::with_capacity(self.entities.len());
        for entity in &self.entities {
            let condition = match entity {
                Entity::Argument(_) => None,
                Entity::Node(node) => node.condition.as_ref(),
                Entity::Process(process) => process.condition.as_ref(),
                Entity::SubLaunch(sub_launch) => sub_launch.condition.as_ref(),
            };
            let active = match condition {
                Some(condition) => condition.evaluate(arguments)?,
                None => true,
            };
            if active {
                entities.push(entity.clone());
            }
        }
        Ok(RealizedLaunch { entities })
    }
}

/// A launch description after condition evaluation: only the entities that
/// will actually run.
#[derive(Debug, Clone, Default)]
pub struct RealizedLaunch {
    entities: Vec<Entity>,
}

impl RealizedLaunch {
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeDescriptor> {
        self.entities.iter().filter_map(|e| match e {
            Entity::Node(node) => Some(node),
            _ => None,
        })
    }

    pub fn processes(&self) -> impl Iterator<Item = &ExecProcess> {
        self.entities.iter().filter_map(|e| match e {
            Entity::Process(process) => Some(process),
            _ => None,
        })
    }

    pub fn sub_launches(&self) -> impl Iterator<Item = &SubLaunch> {
        self.entities.iter().filter_map(|e| match e {
            Entity::SubLaunch(sub_launch) => Some(sub_launch),
            _ => None,
        })
    }

    pub fn find_node(&self, executable: &str) -> Option<&NodeDescriptor> {
        self.nodes().find(|n| n.executable == executable)
    }

    /// Runs every command parameter and folds its output into the owning
    /// node's parameter bundles. After this returns, every bundle is a plain
    /// dictionary and the executor never has to expand anything itself.
    pub fn resolve_commands(&mut self) -> Result<(), Error> {
        for entity in &mut self.entities {
            let Entity::Node(node) = entity else {
                continue;
            };
            for command in std::mem::take(&mut node.command_parameters) {
                let value = command.run()?;
                let mut bundle = ParamMap::new();
                bundle.insert(command.name, value);
                node.parameters.push(bundle);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::{
        argument::ArgumentSet,
        command::CommandParam,
        condition::Condition,
    };

    fn arguments() -> ResolvedArguments {
        let mut set = ArgumentSet::new();
        set.declare(LaunchArgument::with_default("db", "false", "Database flag"));
        set.declare(LaunchArgument::with_default("load_gripper", "true", ""));
        set.resolve(&HashMap::new()).unwrap()
    }

    fn description() -> LaunchDescription {
        let mut description = LaunchDescription::new();
        description.add_node(NodeDescriptor::new("rviz2", "rviz2"));
        description.add_node(
            NodeDescriptor::new("warehouse_ros_mongo", "mongo_wrapper_ros.py")
                .condition(Condition::If("db".into())),
        );
        description.add_sub_launch(
            SubLaunch::new("franka_gripper", "gripper.launch.py")
                .condition(Condition::If("load_gripper".into())),
        );
        description.add_process(
            ExecProcess::new(["ros2", "bag", "record", "-a"])
                .condition(Condition::Unless("db".into())),
        );
        description
    }

    #[test]
    fn realize_filters_by_condition_and_keeps_order() {
        let realized = description().realize(&arguments()).unwrap();
        assert_eq!(realized.entities().len(), 3);
        assert!(matches!(&realized.entities()[0], Entity::Node(n) if n.executable == "rviz2"));
        assert!(matches!(&realized.entities()[1], Entity::SubLaunch(_)));
        assert!(matches!(&realized.entities()[2], Entity::Process(_)));
        assert!(realized.find_node("mongo_wrapper_ros.py").is_none());
    }

    #[test]
    fn resolve_commands_folds_output_into_parameters() {
        let mut description = LaunchDescription::new();
        description.add_node(
            NodeDescriptor::new("robot_state_publisher", "robot_state_publisher")
                .command_parameter(CommandParam::new("robot_description", "echo").arg("<robot/>")),
        );
        let mut realized = description
            .realize(&ArgumentSet::new().resolve(&HashMap::new()).unwrap())
            .unwrap();
        realized.resolve_commands().unwrap();

        let node = realized.find_node("robot_state_publisher").unwrap();
        assert!(node.command_parameters.is_empty());
        assert_eq!(
            node.merged_parameters().get("robot_description"),
            Some(&serde_yaml::Value::from("<robot/>")),
        );
    }
}
