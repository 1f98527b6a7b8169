//! Spawns a realized launch and babysits the children.

use std::{
    process::{Child, Command, ExitStatus, Stdio},
    thread,
    time::Duration,
};

use tempfile::TempDir;
use tracing::{info, warn};

use crate::{
    description::{Entity, RealizedLaunch},
    node::{OnExit, Output},
    plan::{node_command, sub_launch_command, write_params_file},
    Error,
};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// One spawned child and how its exit is handled.
#[derive(Debug)]
struct Spawned {
    label: String,
    child: Child,
    on_exit: OnExit,
}

/// Spawns every realized entity as a subprocess and waits.
///
/// The executor owns no ordering or restart policy: processes start in
/// declaration order and run until they exit on their own, except that the
/// exit of a process marked [`OnExit::ShutdownAll`] tears the rest down.
#[derive(Debug)]
pub struct Executor {
    params_dir: TempDir,
}

impl Executor {
    pub fn new() -> Result<Self, Error> {
        let params_dir = tempfile::tempdir().map_err(|e| Error::ParamsFile("launch".into(), e))?;
        Ok(Self { params_dir })
    }

    /// Runs the launch to completion. Returns the exit status of the process
    /// that ended it when a shutdown-triggering child exits, `None` when all
    /// children finish on their own.
    pub fn run(&self, realized: &RealizedLaunch) -> Result<Option<ExitStatus>, Error> {
        let mut children = Vec::new();
        for entity in realized.entities() {
            match entity {
                Entity::Argument(_) => {}
                Entity::Node(node) => {
                    let params_file = write_params_file(node, self.params_dir.path())?;
                    let cmd = node_command(node, params_file.as_deref());
                    let child = spawn(&cmd, node.output)?;
                    children.push(Spawned {
                        label: node.node_name().to_owned(),
                        child,
                        on_exit: node.on_exit,
                    });
                }
                Entity::Process(process) => {
                    let child = spawn(&process.command, process.output)?;
                    children.push(Spawned {
                        label: process.command.join(" "),
                        child,
                        on_exit: OnExit::Ignore,
                    });
                }
                Entity::SubLaunch(sub_launch) => {
                    let cmd = sub_launch_command(sub_launch);
                    let child = spawn(&cmd, Output::Screen)?;
                    children.push(Spawned {
                        label: format!("{}/{}", sub_launch.package, sub_launch.launch_file),
                        child,
                        on_exit: OnExit::Ignore,
                    });
                }
            }
        }

        self.wait(children)
    }

    fn wait(&self, mut children: Vec<Spawned>) -> Result<Option<ExitStatus>, Error> {
        while !children.is_empty() {
            let mut finished = Vec::new();
            for (index, spawned) in children.iter_mut().enumerate() {
                match spawned.child.try_wait() {
                    Ok(Some(status)) => {
                        info!("{} exited with {}", spawned.label, status);
                        finished.push((index, status, spawned.on_exit));
                    }
                    Ok(None) => {}
                    Err(e) => warn!("could not poll {}: {}", spawned.label, e),
                }
            }
            for (index, status, on_exit) in finished.into_iter().rev() {
                children.remove(index);
                if on_exit == OnExit::ShutdownAll {
                    info!("shutting down remaining {} processes", children.len());
                    shutdown(&mut children);
                    return Ok(Some(status));
                }
            }
            thread::sleep(POLL_INTERVAL);
        }
        Ok(None)
    }
}

fn spawn(cmd: &[String], output: Output) -> Result<Child, Error> {
    let (program, args) = cmd.split_first().expect("command is never empty");
    let mut command = Command::new(program);
    command.args(args);
    if output == Output::Log {
        command.stdout(Stdio::null());
    }
    info!("starting {}", cmd.join(" "));
    command.spawn().map_err(|source| Error::CommandSpawn {
        program: program.clone(),
        source,
    })
}

fn shutdown(children: &mut [Spawned]) {
    for spawned in children.iter_mut() {
        if let Err(e) = spawned.child.kill() {
            warn!("could not stop {}: {}", spawned.label, e);
        }
    }
    for spawned in children.iter_mut() {
        let _ = spawned.child.wait();
    }
}
