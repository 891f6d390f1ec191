/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # Kubeconfig Context Switching
//!
//! kubeshift addresses both clusters through one kubeconfig file. Before each
//! pass the `current-context` key is rewritten in place, and a fresh client is
//! built from the file afterwards.
//!
//! The file is handled as an untyped YAML mapping so that keys this tool does
//! not know about survive the round trip, in their original order. Only
//! `current-context` is touched.
//!
//! The rewrite is not atomic: a crash while writing can leave a truncated file.

use crate::error::KubeconfigError;
use kubeshift_utils::logging::prelude::*;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

pub const CURRENT_CONTEXT_KEY: &str = "current-context";

/// Points the kubeconfig at `path` to `context`.
///
/// Reads the whole document, sets (or inserts) `current-context` and writes
/// the document back over the original file.
///
/// The document is re-serialized, so the first switch drops comments and
/// normalizes quoting and indentation; values and key order are kept.
///
/// # Arguments
/// * `path` - Path of the kubeconfig file
/// * `context` - Name of the context to make current
///
/// # Returns
/// * `Result<(), KubeconfigError>` - `Io` if the file cannot be read or written,
///   `Parse`/`NotAMapping` if its content is not a YAML mapping
pub fn switch_context(path: &Path, context: &str) -> Result<(), KubeconfigError> {
    let mut document = read_document(path)?;

    let key = Value::String(CURRENT_CONTEXT_KEY.to_string());
    let previous = document.insert(key, Value::String(context.to_string()));
    debug!(
        "Replacing current-context {:?} with '{}' in {}",
        previous.as_ref().and_then(Value::as_str),
        context,
        path.display()
    );

    let serialized = serde_yaml::to_string(&document).map_err(|source| KubeconfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, serialized).map_err(|source| KubeconfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Switched kubeconfig {} to context '{}'", path.display(), context);
    Ok(())
}

/// Returns the `current-context` of the kubeconfig at `path`, if it has one.
pub fn current_context(path: &Path) -> Result<Option<String>, KubeconfigError> {
    let document = read_document(path)?;
    Ok(document
        .get(CURRENT_CONTEXT_KEY)
        .and_then(Value::as_str)
        .map(str::to_string))
}

fn read_document(path: &Path) -> Result<Mapping, KubeconfigError> {
    let content = fs::read_to_string(path).map_err(|source| KubeconfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let value: Value = serde_yaml::from_str(&content).map_err(|source| KubeconfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Mapping(mapping) => Ok(mapping),
        _ => Err(KubeconfigError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}
