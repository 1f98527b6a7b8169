//! Launch argument declaration and one-shot resolution.
//!
//! Arguments are declared once, resolved once against the `name:=value`
//! overrides given on the command line, and immutable afterwards.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::{condition::parse_bool, Error};

/// A named, externally settable parameter with an optional default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchArgument {
    pub name: String,
    pub default: Option<String>,
    pub description: String,
}

impl LaunchArgument {
    /// An argument that must be supplied by the caller.
    pub fn required(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
            description: description.into(),
        }
    }

    pub fn with_default(
        name: impl Into<String>,
        default: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            default: Some(default.into()),
            description: description.into(),
        }
    }
}

/// Ordered set of argument declarations.
#[derive(Debug, Clone, Default)]
pub struct ArgumentSet {
    arguments: Vec<LaunchArgument>,
}

impl ArgumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, argument: LaunchArgument) -> &mut Self {
        self.arguments.push(argument);
        self
    }

    pub fn get(&self, name: &str) -> Option<&LaunchArgument> {
        self.arguments.iter().find(|a| a.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LaunchArgument> {
        self.arguments.iter()
    }

    /// Resolves every declared argument, in declaration order.
    ///
    /// An override wins over the declared default. A declaration without a
    /// default that receives no override fails with
    /// [`Error::MissingArgument`]; an override naming an undeclared argument
    /// fails with [`Error::UnknownArgument`].
    pub fn resolve(
        &self,
        overrides: &HashMap<String, String>,
    ) -> Result<ResolvedArguments, Error> {
        for name in overrides.keys() {
            if self.get(name).is_none() {
                return Err(Error::UnknownArgument(name.clone()));
            }
        }
        let mut values = HashMap::new();
        for argument in &self.arguments {
            let value = match overrides.get(&argument.name) {
                Some(value) => value.clone(),
                None => argument
                    .default
                    .clone()
                    .ok_or_else(|| Error::MissingArgument(argument.name.clone()))?,
            };
            values.insert(argument.name.clone(), value);
        }
        debug!(?values, "resolved launch arguments");
        Ok(ResolvedArguments { values })
    }
}

/// Parses a single `name:=value` override pair.
pub fn parse_override(pair: &str) -> Result<(String, String), Error> {
    let (name, value) = pair
        .split_once(":=")
        .ok_or_else(|| Error::MalformedOverride(pair.to_owned()))?;
    if name.is_empty() {
        return Err(Error::MalformedOverride(pair.to_owned()));
    }
    Ok((name.to_owned(), value.to_owned()))
}

/// Parses `name:=value` pairs into an override map. A name given twice keeps
/// the later value.
pub fn parse_overrides<I, S>(pairs: I) -> Result<HashMap<String, String>, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut overrides = HashMap::new();
    for pair in pairs {
        let (name, value) = parse_override(pair.as_ref())?;
        overrides.insert(name, value);
    }
    Ok(overrides)
}

/// Immutable view of all argument values after resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedArguments {
    values: HashMap<String, String>,
}

impl ResolvedArguments {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Value of a resolved argument. All declared arguments are present
    /// after [`ArgumentSet::resolve`] succeeds.
    pub fn str(&self, name: &str) -> Result<&str, Error> {
        self.get(name)
            .ok_or_else(|| Error::UnknownArgument(name.to_owned()))
    }

    pub fn bool(&self, name: &str) -> Result<bool, Error> {
        parse_bool(self.str(name)?)
    }
}
