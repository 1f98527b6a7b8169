use std::{path::PathBuf, process::ExitStatus};

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("panda-launch: no value given for argument `{}` and no default is declared", .0)]
    MissingArgument(String),
    #[error("panda-launch: unknown argument `{}`", .0)]
    UnknownArgument(String),
    #[error("panda-launch: malformed override `{}` (expected `name:=value`)", .0)]
    MalformedOverride(String),
    #[error("panda-launch: `{}` is not a boolean (expected true/false, 1/0, yes/no, on/off)", .0)]
    InvalidBool(String),
    #[error("panda-launch: failed to parse {:?} as yaml ({})", .0, .1)]
    YamlParseFailure(PathBuf, #[source] serde_yaml::Error),
    #[error("panda-launch: {:?} does not contain a top-level mapping", .0)]
    NotAMapping(PathBuf),
    #[error("panda-launch: expected a mapping when converting parameters, got {}", .0)]
    NotParameters(String),
    #[error("panda-launch: could not run `{}` ({})", .program, .source)]
    CommandSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("panda-launch: `{}` exited with {}: {}", .program, .status, .stderr)]
    CommandFailure {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("panda-launch: could not write parameter file for `{}` ({})", .0, .1)]
    ParamsFile(String, #[source] std::io::Error),
    #[error("panda-launch: yaml serialization failed ({})", .0)]
    Serialize(#[source] serde_yaml::Error),
}
