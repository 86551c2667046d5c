//! Variable-set loading.
//!
//! Variable files are ordinary YAML or JSON; values pass through the
//! template engine and are stringified there, so normal scalar coercion is
//! fine here (unlike the rendered document itself, which needs the
//! literal-preserving loader).

use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use super::VariableSet;

#[derive(Debug, Error)]
pub enum VarsError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },
    #[error("{path}: variable file must be a mapping")]
    NotAMapping { path: String },
}

/// Load a variable set from a YAML or JSON file. An empty file yields an
/// empty set.
pub fn load_variables(path: &Path) -> Result<VariableSet, VarsError> {
    let display = path.display().to_string();
    let text = std::fs::read_to_string(path).map_err(|source| VarsError::Io {
        path: display.clone(),
        source,
    })?;
    if text.trim().is_empty() {
        return Ok(VariableSet::new());
    }

    let parsed: Value = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&text).map_err(|e| VarsError::Parse {
            path: display.clone(),
            message: e.to_string(),
        })?
    } else {
        serde_yaml::from_str(&text).map_err(|e| VarsError::Parse {
            path: display.clone(),
            message: e.to_string(),
        })?
    };

    match parsed {
        Value::Object(map) => Ok(map),
        _ => Err(VarsError::NotAMapping { path: display }),
    }
}
