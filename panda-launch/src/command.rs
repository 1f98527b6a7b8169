//! Parameters whose value is the output of an external expansion tool.

use std::process::Command;

use serde::Serialize;

use crate::Error;

/// A parameter computed by running a command (typically `xacro`) and
/// capturing its stdout.
///
/// The command is carried symbolically through composition and only executed
/// when the description is resolved for execution, so a dry run never spawns
/// anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandParam {
    /// Parameter key the output lands under, e.g. `robot_description`.
    pub name: String,
    pub program: String,
    pub args: Vec<String>,
}

impl CommandParam {
    pub fn new(name: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// The command in shell-like form, for plan rendering.
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    /// Runs the command and returns its stdout with trailing newlines
    /// stripped. A non-zero exit carries the child's stderr.
    pub fn run(&self) -> Result<String, Error> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|source| Error::CommandSpawn {
                program: self.program.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(Error::CommandFailure {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        let mut stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        while stdout.ends_with('\n') || stdout.ends_with('\r') {
            stdout.pop();
        }
        Ok(stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_rendering() {
        let param = CommandParam::new("robot_description", "xacro")
            .arg("panda_arm_platform.urdf.xacro")
            .arg("hand:=false");
        assert_eq!(
            param.command_line(),
            "xacro panda_arm_platform.urdf.xacro hand:=false"
        );
    }

    #[test]
    fn captures_stdout_without_trailing_newline() {
        let param = CommandParam::new("out", "echo").arg("expanded");
        assert_eq!(param.run().unwrap(), "expanded");
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let param = CommandParam::new("out", "definitely-not-a-real-binary");
        assert!(matches!(param.run(), Err(Error::CommandSpawn { .. })));
    }

    #[test]
    fn failing_program_reports_status() {
        let param = CommandParam::new("out", "false");
        assert!(matches!(param.run(), Err(Error::CommandFailure { .. })));
    }
}
