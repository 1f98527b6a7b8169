use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("panda-launch-apps: `robot_ip` must not be empty.")]
    EmptyRobotIp,
    #[error("panda-launch-apps: parameter override script failed: {:?}", .0)]
    ParamOverrides(anyhow::Error),
    #[error("panda-launch-apps: launch: {:?}", .0)]
    Launch(#[from] panda_launch::Error),
}
