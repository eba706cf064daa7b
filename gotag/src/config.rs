use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::CONFIG_FILENAME;

#[derive(Debug, Deserialize, Default, Clone)]
/// Top-level configuration struct.
pub struct Config {
    #[serde(default)]
    /// The `[gotag]` table.
    pub gotag: GotagConfig,
    /// The path to the configuration file this was loaded from.
    /// `None` if no file was found.
    #[serde(skip)]
    pub config_file_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
/// Defaults for the command-line options.
pub struct GotagConfig {
    /// Tag key to add when `--tag` is not given.
    pub tag: Option<String>,
    /// Value prefix when `--prefix` is not given.
    pub prefix: Option<String>,
    /// Value suffix when `--suffix` is not given.
    pub suffix: Option<String>,
    /// Write the result back to the file instead of printing it.
    pub write: Option<bool>,
}

impl Config {
    /// Loads configuration from the current directory upwards.
    #[must_use]
    pub fn load() -> Self {
        Self::load_from_path(Path::new("."))
    }

    /// Loads configuration starting from a specific path and traversing up.
    ///
    /// The first [`CONFIG_FILENAME`] found wins. A file that cannot be read
    /// or parsed is reported and treated as absent.
    #[must_use]
    pub fn load_from_path(path: &Path) -> Self {
        let mut current = path.to_path_buf();
        if current.is_file() {
            current.pop();
        }
        // A bare file name has an empty parent; start from the working directory
        if current.as_os_str().is_empty() {
            current = PathBuf::from(".");
        }
        if let Ok(absolute) = current.canonicalize() {
            current = absolute;
        }

        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                match Self::read(&candidate) {
                    Ok(config) => {
                        tracing::debug!(path = %candidate.display(), "loaded config");
                        return config;
                    }
                    Err(message) => {
                        tracing::warn!(path = %candidate.display(), "ignoring config: {message}");
                        return Config::default();
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        Config::default()
    }

    fn read(path: &Path) -> Result<Self, String> {
        let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
        let mut config = toml::from_str::<Config>(&content).map_err(|e| e.to_string())?;
        config.config_file_path = Some(path.to_path_buf());
        Ok(config)
    }
}
