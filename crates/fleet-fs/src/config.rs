//! Format-agnostic configuration loading

use serde::de::DeserializeOwned;

use crate::{Error, NormalizedPath, Result, io};

/// Loads fleet configuration files.
///
/// The format is chosen from the file extension:
/// - `.yaml`, `.yml` -> YAML
/// - `.toml` -> TOML
/// - `.json` -> JSON
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Read and deserialize a configuration file.
    pub fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        let content = io::read_text(path)?;
        self.parse(path, &content)
    }

    /// Deserialize already-read content, using `path` for format detection
    /// and error messages.
    pub fn parse<T: DeserializeOwned>(&self, path: &NormalizedPath, content: &str) -> Result<T> {
        let extension = path.extension().unwrap_or("");
        let parse_error = |format: &str, message: String| Error::ConfigParse {
            path: path.to_native(),
            format: format.into(),
            message,
        };

        match extension.to_lowercase().as_str() {
            "yaml" | "yml" => {
                serde_yaml::from_str(content).map_err(|e| parse_error("YAML", e.to_string()))
            }
            "toml" => toml::from_str(content).map_err(|e| parse_error("TOML", e.to_string())),
            "json" => {
                serde_json::from_str(content).map_err(|e| parse_error("JSON", e.to_string()))
            }
            _ => Err(Error::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }
}
