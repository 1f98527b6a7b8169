//! References to launch descriptions owned by other packages.

use serde::Serialize;

use crate::condition::Condition;

/// A pointer to another package's launch file, parameterized by a subset of
/// the current arguments and gated like any other entity.
///
/// The target file is externally owned; this side only records what to
/// forward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubLaunch {
    pub package: String,
    pub launch_file: String,
    /// `(argument name, resolved value)` pairs, forwarded unchanged.
    pub forwarded: Vec<(String, String)>,
    pub condition: Option<Condition>,
}

impl SubLaunch {
    pub fn new(package: impl Into<String>, launch_file: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            launch_file: launch_file.into(),
            forwarded: Vec::new(),
            condition: None,
        }
    }

    pub fn forward(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.forwarded.push((name.into(), value.into()));
        self
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn forwarded_value(&self, name: &str) -> Option<&str> {
        self.forwarded
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwards_named_values() {
        let sub = SubLaunch::new("franka_gripper", "gripper.launch.py")
            .forward("robot_ip", "172.16.0.2")
            .forward("use_fake_hardware", "false");
        assert_eq!(sub.forwarded_value("robot_ip"), Some("172.16.0.2"));
        assert_eq!(sub.forwarded_value("use_fake_hardware"), Some("false"));
        assert_eq!(sub.forwarded_value("serial"), None);
    }
}
