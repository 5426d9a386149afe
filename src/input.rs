use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::error::BrandError;

/// Serialization format of a design or kit file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Local file not found: {path}. Hint: check the path relative to the current working directory or use an absolute path.")]
    FileNotFound { path: String },
    #[error("Unsupported file extension '{extension}'. Supported input extensions: {supported}.")]
    UnsupportedExtension {
        extension: String,
        supported: String,
    },
}

impl From<InputError> for BrandError {
    fn from(err: InputError) -> Self {
        BrandError::Config(err.to_string())
    }
}

const JSON_EXTENSIONS: &[&str] = &["json"];
const YAML_EXTENSIONS: &[&str] = &["yaml", "yml"];

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self, InputError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        if JSON_EXTENSIONS.contains(&extension.as_str()) {
            Ok(InputFormat::Json)
        } else if YAML_EXTENSIONS.contains(&extension.as_str()) {
            Ok(InputFormat::Yaml)
        } else {
            Err(InputError::UnsupportedExtension {
                extension: if extension.is_empty() {
                    "<none>".to_string()
                } else {
                    extension
                },
                supported: supported_extensions(),
            })
        }
    }
}

fn supported_extensions() -> String {
    JSON_EXTENSIONS
        .iter()
        .chain(YAML_EXTENSIONS)
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn read_input(path: &Path) -> Result<String, BrandError> {
    if !path.exists() {
        return Err(InputError::FileNotFound {
            path: path.display().to_string(),
        }
        .into());
    }
    Ok(fs::read_to_string(path)?)
}

/// Reads and deserializes a JSON or YAML document, picked by extension.
pub fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T, BrandError> {
    let format = InputFormat::from_path(path)?;
    let content = read_input(path)?;
    match format {
        InputFormat::Json => Ok(serde_json::from_str(&content)?),
        InputFormat::Yaml => Ok(serde_yaml::from_str(&content)?),
    }
}
