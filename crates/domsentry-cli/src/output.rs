//! JSON result writer, grounded on `riptide-cli/src/output/json.rs`'s
//! pretty-vs-compact formatter pair.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

pub struct JsonFormatter;

impl JsonFormatter {
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }
}

/// Write `data` to `path`, when given, otherwise to stdout.
pub fn write_result<T: Serialize>(data: &T, path: Option<&Path>) -> Result<()> {
    let json = JsonFormatter::format(data)?;
    match path {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("writing result to {}", path.display()))?;
        }
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn format_is_pretty_printed() {
        let data = json!({"a": 1});
        let out = JsonFormatter::format(&data).unwrap();
        assert!(out.contains('\n'));
    }
}
