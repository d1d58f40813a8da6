pub mod file;
pub mod stdin;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Load a command's input from `--input`, or from piped stdin, then apply
/// overrides. `as_of` is filled in when the document does not carry one.
pub fn load<T: DeserializeOwned>(
    path: Option<&str>,
    as_of: NaiveDate,
    overrides: impl FnOnce(&mut Map<String, Value>) -> Result<(), Box<dyn std::error::Error>>,
) -> Result<T, Box<dyn std::error::Error>> {
    let value = match path {
        Some(path) => file::read_value(path)?,
        None => stdin::read_stdin()?.ok_or("--input file is required (or pipe JSON or YAML on stdin)")?,
    };
    let Value::Object(mut map) = value else {
        return Err("input must be a JSON or YAML object".into());
    };
    if !map.contains_key("as_of") {
        log::debug!("no as_of in input; using {as_of}");
        map.insert("as_of".into(), Value::String(as_of.to_string()));
    }
    overrides(&mut map)?;
    Ok(serde_json::from_value(Value::Object(map))?)
}
