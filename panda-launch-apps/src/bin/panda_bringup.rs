use std::{collections::HashMap, path::PathBuf};

use anyhow::Result;
use clap::Parser;
use panda_launch::{parse_overrides, Executor, LaunchPlan};
use panda_launch_apps::{compose, declare_arguments, utils, BringupConfig};
use tracing::info;

/// Brings up the MoveIt stack for a Franka Panda arm.
#[derive(Parser, Debug)]
#[command(name = env!("CARGO_BIN_NAME"), version)]
struct Args {
    /// Launch argument overrides, as `name:=value`.
    #[arg(value_name = "NAME:=VALUE")]
    overrides: Vec<String>,
    /// Print the realized launch plan as YAML instead of starting anything.
    #[arg(long)]
    dry_run: bool,
    /// List the declared launch arguments and exit.
    #[arg(long)]
    show_args: bool,
    /// Directory holding config/, srdf/ and rviz/ resources.
    #[arg(long)]
    share_dir: Option<PathBuf>,
    /// Directory holding the robot URDF xacro (defaults to the share dir).
    #[arg(long)]
    description_dir: Option<PathBuf>,
    /// Overwrite scripts applied to the combined planning pipeline. These
    /// settings take priority over the shipped planner tuning files.
    #[arg(long)]
    param_overrides: Option<String>,
}

fn main() -> Result<()> {
    utils::init_tracing();
    let args = Args::parse();
    info!("ParsedArgs {:?}", args);

    let argument_set = declare_arguments();
    if args.show_args {
        println!("Declared arguments:");
        for argument in argument_set.iter() {
            match &argument.default {
                Some(default) => println!("  {} (default: {})", argument.name, default),
                None => println!("  {} (required)", argument.name),
            }
            println!("      {}", argument.description);
        }
        return Ok(());
    }

    // `$(command)` and `${ENV}` literals in override values are expanded
    // before resolution, so e.g. `robot_ip:=${PANDA_IP}` works.
    let overrides = parse_overrides(&args.overrides)?
        .into_iter()
        .map(|(name, value)| Ok((name, panda_launch_config::evaluate(&value, None)?)))
        .collect::<Result<HashMap<_, _>>>()?;
    let resolved = argument_set.resolve(&overrides)?;

    let mut config = BringupConfig::from_resolved(&resolved)?;
    config.share_dir = utils::get_share_dir(args.share_dir);
    config.description_dir = args.description_dir;
    config.param_overrides = args.param_overrides;

    let description = compose(&config)?;
    let mut realized = description.realize(&resolved)?;

    if args.dry_run {
        print!("{}", LaunchPlan::from_realized(&realized).to_yaml()?);
        return Ok(());
    }

    realized.resolve_commands()?;
    match Executor::new()?.run(&realized)? {
        Some(status) => info!("launch ended by controller manager exit ({status})"),
        None => info!("all launch processes finished"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn parse_args() {
        let bin = env!("CARGO_BIN_NAME");
        assert!(Args::try_parse_from([bin]).is_ok());
        assert!(Args::try_parse_from([bin, "--show-args"]).is_ok());
        assert!(Args::try_parse_from([bin, "robot_ip:=172.16.0.2", "--dry-run"]).is_ok());
        assert!(Args::try_parse_from([
            bin,
            "robot_ip:=172.16.0.2",
            "load_gripper:=true",
            "--share-dir",
            "share",
            "--param-overrides",
            "move_group.default_planner_config = LIN",
        ])
        .is_ok());
        assert!(Args::try_parse_from([bin, "--no-such-flag"]).is_err());
    }

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }
}
