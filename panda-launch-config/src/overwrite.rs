use anyhow::{bail, Context, Result};
use serde_yaml::{Mapping, Value};
use tracing::debug;

/// Replaces the contents of the specified YAML document based on the
/// specified scripts.
///
/// You can specify multiple scripts at once (newline-separated).
///
/// # Set operation
///
/// Syntax:
///
/// ```text
/// <key> = <value>
/// ```
///
/// - If the specified key or sequence index exists, replace its value.
/// - If the specified key does not exist, create the specified key and value.
/// - If the specified sequence index is one past the end, append the
///   specified value to the sequence.
/// - If the intermediate data structures do not exist, create them.
///
/// # Delete operation
///
/// Syntax:
///
/// ```text
/// <key> =
/// ```
///
/// - Deletes the specified key and its value or specified sequence element.
/// - If the specified key or sequence index does not exist, it will be
///   ignored.
///
/// # Keys
///
/// Keys are dot-separated paths. ROS parameter names themselves contain
/// dots (`trajectory_execution.allowed_start_tolerance`), so a segment may
/// be double-quoted to keep its dots:
///
/// ```text
/// move_group."trajectory_execution.allowed_start_tolerance" = 0.05
/// ```
pub fn overwrite(doc: &mut Value, scripts: &str) -> Result<()> {
    let scripts = parse_scripts(scripts)?;

    for script in scripts {
        let path = &script.path;
        let line = script.line;
        match script.operation {
            Operation::Set(value) => {
                debug!(?path, ?line, ?value, "executing set operation");
                set(doc, path, value)
                    .with_context(|| format!("set operation at line {line} failed"))?;
            }
            Operation::Delete => {
                debug!(?path, ?line, "executing delete operation");
                delete(doc, path);
            }
        }
    }

    Ok(())
}

/// Replaces the contents of the specified YAML document based on the
/// specified scripts, returning the edited document as a string.
///
/// See [`overwrite`] for more.
pub fn overwrite_str(doc: &str, scripts: &str) -> Result<String> {
    let mut doc: Value = serde_yaml::from_str(doc)?;
    if doc.is_null() {
        doc = Value::Mapping(Mapping::new());
    }
    overwrite(&mut doc, scripts)?;
    Ok(serde_yaml::to_string(&doc)?)
}

#[derive(Debug)]
struct Script {
    line: usize,
    path: Vec<String>,
    operation: Operation,
}

#[derive(Debug)]
enum Operation {
    Set(Value),
    Delete,
}

fn parse_scripts(s: &str) -> Result<Vec<Script>> {
    let mut scripts = vec![];

    for (i, line) in s
        .lines()
        .map(str::trim)
        .enumerate()
        .filter(|(_, s)| !s.is_empty())
    {
        if !line.contains('=') {
            bail!(
                "invalid script syntax at line {}: not found `=`: {}",
                i + 1,
                line
            );
        }

        let mut iter = line.splitn(2, '=');
        let key = iter.next().unwrap().trim();
        let value = iter.next().unwrap().trim();

        let path = parse_path(key)
            .with_context(|| format!("invalid key at line {}: {}", i + 1, line))?;
        let operation = if value.is_empty() {
            Operation::Delete
        } else {
            let value: Value = serde_yaml::from_str(value)
                .with_context(|| format!("invalid value at line {}: {}", i + 1, line))?;
            Operation::Set(value)
        };
        scripts.push(Script {
            line: i + 1,
            path,
            operation,
        });
    }

    Ok(scripts)
}

/// Splits a dotted key, keeping double-quoted segments intact.
fn parse_path(key: &str) -> Result<Vec<String>> {
    let mut segments = vec![];
    let mut rest = key;
    loop {
        let segment;
        if let Some(quoted) = rest.strip_prefix('"') {
            let end = match quoted.find('"') {
                Some(end) => end,
                None => bail!("unclosed quote in key {:?}", key),
            };
            segment = quoted[..end].to_owned();
            rest = &quoted[end + 1..];
            if let Some(r) = rest.strip_prefix('.') {
                rest = r;
            } else if !rest.is_empty() {
                bail!("expected `.` after quoted segment in key {:?}", key);
            } else {
                segments.push(segment);
                break;
            }
        } else {
            match rest.find('.') {
                Some(pos) => {
                    segment = rest[..pos].to_owned();
                    rest = &rest[pos + 1..];
                }
                None => {
                    segment = rest.to_owned();
                    rest = "";
                }
            }
            if rest.is_empty() {
                if segment.is_empty() {
                    bail!("empty segment in key {:?}", key);
                }
                segments.push(segment);
                break;
            }
        }
        if segment.is_empty() {
            bail!("empty segment in key {:?}", key);
        }
        segments.push(segment);
    }
    Ok(segments)
}

fn set(doc: &mut Value, path: &[String], value: Value) -> Result<()> {
    let (last, parents) = path.split_last().expect("path is never empty");

    let mut current = doc;
    for segment in parents {
        current = match current {
            Value::Mapping(mapping) => {
                let key = Value::String(segment.clone());
                mapping
                    .entry(key)
                    .or_insert_with(|| Value::Mapping(Mapping::new()))
            }
            Value::Sequence(sequence) => {
                let index: usize = segment
                    .parse()
                    .with_context(|| format!("expected sequence index, got {segment:?}"))?;
                sequence
                    .get_mut(index)
                    .with_context(|| format!("sequence index {index} out of range"))?
            }
            other => bail!(
                "cannot descend into {} at segment {:?}",
                type_name(other),
                segment
            ),
        };
    }

    match current {
        Value::Mapping(mapping) => {
            mapping.insert(Value::String(last.clone()), value);
        }
        Value::Sequence(sequence) => {
            let index: usize = last
                .parse()
                .with_context(|| format!("expected sequence index, got {last:?}"))?;
            if index < sequence.len() {
                sequence[index] = value;
            } else if index == sequence.len() {
                sequence.push(value);
            } else {
                bail!("sequence index {} out of range", index);
            }
        }
        other => bail!("cannot set a key on {}", type_name(other)),
    }
    Ok(())
}

fn delete(doc: &mut Value, path: &[String]) {
    let (last, parents) = match path.split_last() {
        Some(split) => split,
        None => return,
    };

    let mut current = doc;
    for segment in parents {
        let next = match current {
            Value::Mapping(mapping) => mapping.get_mut(segment.as_str()),
            Value::Sequence(sequence) => segment
                .parse::<usize>()
                .ok()
                .and_then(|index| sequence.get_mut(index)),
            _ => None,
        };
        match next {
            Some(next) => current = next,
            None => {
                debug!(
                    ?path,
                    "delete operation was not executed because value did not exist"
                );
                return;
            }
        }
    }

    match current {
        Value::Mapping(mapping) => {
            mapping.remove(last.as_str());
        }
        Value::Sequence(sequence) => {
            if let Ok(index) = last.parse::<usize>() {
                if index < sequence.len() {
                    sequence.remove(index);
                }
            }
        }
        _ => {}
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
