use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

const SHARE_DIR_ENV_NAME: &str = "PANDA_LAUNCH_SHARE_DIR";

/// Get the resource directory from input or env PANDA_LAUNCH_SHARE_DIR,
/// falling back to the working directory.
pub fn get_share_dir(dir: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = dir {
        return dir;
    }
    match std::env::var(SHARE_DIR_ENV_NAME) {
        Ok(s) => {
            tracing::warn!("### ENV VAR {} is used ###", s);
            PathBuf::from(s)
        }
        Err(_) => PathBuf::from("."),
    }
}

/// Do something needed to start the program
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}
