use serde_json::Value;
use std::io::{self, Read};

/// Read a piped document from stdin. `None` when stdin is a terminal or the
/// pipe is empty.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_document(&buffer)
}

/// Piped input has no extension to go by: JSON first, then YAML.
fn parse_document(text: &str) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match serde_json::from_str(trimmed) {
        Ok(value) => Ok(Some(value)),
        Err(json_err) => {
            log::debug!("stdin is not JSON ({json_err}); trying YAML");
            let value: Value = serde_yaml::from_str(trimmed)
                .map_err(|e| format!("stdin is neither JSON nor YAML: {e}"))?;
            Ok(Some(value))
        }
    }
}
