use clap::Parser;
use panda_launch_apps::BringupConfig;
use schemars::schema_for;
use tracing::debug;

/// Inspects the bringup configuration.
#[derive(Parser, Debug)]
#[command(name = env!("CARGO_BIN_NAME"), version)]
struct Args {
    #[command(subcommand)]
    subcommand: Subcommand,
}

#[derive(Debug, clap::Subcommand)]
enum Subcommand {
    /// Generate JSON schema for the bringup config.
    Schema,
    /// Print the default bringup config as YAML.
    Default,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    debug!(?args);

    match args.subcommand {
        Subcommand::Schema => {
            let schema = schema_for!(BringupConfig);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        Subcommand::Default => {
            print!("{}", serde_yaml::to_string(&BringupConfig::default())?);
        }
    }
    Ok(())
}
