//! CLI command implementations

pub mod envelope;
pub mod inspect;
pub mod json_output;
pub mod render;
pub mod transpose;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use tonescore_engine::SessionConfig;

/// Loads a session file, or the default session when no path is given.
pub(crate) fn load_session(path: Option<&str>) -> Result<SessionConfig> {
    match path {
        Some(path) => SessionConfig::from_json_file(Path::new(path))
            .with_context(|| format!("Failed to load session file: {}", path)),
        None => Ok(SessionConfig::default()),
    }
}
