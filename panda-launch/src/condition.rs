//! Boolean gating of launch entities by argument value.

use serde::Serialize;

use crate::{argument::ResolvedArguments, Error};

/// Activation condition referencing a boolean-valued launch argument.
///
/// Entities carrying a condition that evaluates to `false` are dropped when
/// the launch description is realized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Condition {
    /// Active when the named argument is truthy.
    If(String),
    /// Active when the named argument is not truthy.
    Unless(String),
}

impl Condition {
    pub fn evaluate(&self, arguments: &ResolvedArguments) -> Result<bool, Error> {
        let (name, invert) = match self {
            Condition::If(name) => (name, false),
            Condition::Unless(name) => (name, true),
        };
        let value = arguments
            .get(name)
            .ok_or_else(|| Error::UnknownArgument(name.clone()))?;
        Ok(is_truthy(value) != invert)
    }
}

/// Loose boolean reading used for conditions. Anything that is not an
/// affirmative spelling counts as false.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

/// Strict boolean reading used for typed argument views.
pub fn parse_bool(value: &str) -> Result<bool, Error> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(Error::InvalidBool(value.to_owned())),
    }
}
