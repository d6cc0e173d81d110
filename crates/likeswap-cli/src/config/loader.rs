/*
 *  Copyright 2025-2026 Likeswap Contributors
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::debug;

use super::{ConfigError, LikeswapConfig};

pub struct ConfigLoader {
    search_paths: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Loader over the default search paths, in priority order.
    pub fn new() -> Self {
        let mut search_paths = vec![PathBuf::from("./likeswap.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            search_paths.push(config_dir.join("likeswap").join("config.toml"));
        }

        search_paths.push(PathBuf::from("/etc/likeswap/config.toml"));

        Self::with_search_paths(search_paths)
    }

    pub fn with_search_paths(search_paths: Vec<PathBuf>) -> Self {
        Self { search_paths }
    }

    /// Loads `config_file` if given, else the first file found on the search
    /// paths, else the defaults.
    ///
    /// An explicitly named file that does not exist is an error.
    pub fn load_config(&self, config_file: Option<&Path>) -> Result<LikeswapConfig, ConfigError> {
        match config_file {
            Some(path) if !path.is_file() => Err(ConfigError::ConfigNotFound {
                path: path.to_path_buf(),
            }),
            Some(path) => self.load_config_from_file(path),
            None => match self.find_config_file() {
                Some(path) => self.load_config_from_file(&path),
                None => {
                    debug!(search_paths = ?self.search_paths, "No configuration file found, using defaults");
                    Ok(LikeswapConfig::default())
                }
            },
        }
    }

    pub fn load_config_from_file(&self, path: &Path) -> Result<LikeswapConfig, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

        let substituted = substitute_env_vars(&content)?;

        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") | None => toml::from_str::<LikeswapConfig>(&substituted)?,
            Some(ext) => {
                return Err(ConfigError::UnsupportedFormat {
                    extension: ext.to_string(),
                })
            }
        };

        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn find_config_file(&self) -> Option<PathBuf> {
        self.search_paths.iter().find(|p| p.is_file()).cloned()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Expands `${VAR}`, `${VAR:-default}` and `${VAR:?message}`.
fn substitute_env_vars(content: &str) -> Result<String, ConfigError> {
    let pattern = Regex::new(r"\$\{([^}]+)\}")
        .map_err(|e| ConfigError::EnvSubstitutionError(e.to_string()))?;
    let mut result = String::with_capacity(content.len());
    let mut last = 0;

    for cap in pattern.captures_iter(content) {
        let Some(whole) = cap.get(0) else { continue };
        result.push_str(&content[last..whole.start()]);
        result.push_str(&process_var_expression(&cap[1])?);
        last = whole.end();
    }
    result.push_str(&content[last..]);

    Ok(result)
}

/// Resolves "VAR", "VAR:-default" or "VAR:?message".
fn process_var_expression(expr: &str) -> Result<String, ConfigError> {
    if let Some((name, default)) = expr.split_once(":-") {
        Ok(env::var(name).unwrap_or_else(|_| default.to_string()))
    } else if let Some((name, message)) = expr.split_once(":?") {
        env::var(name).map_err(|_| {
            ConfigError::EnvSubstitutionError(format!(
                "Required environment variable '{}' is not set: {}",
                name, message
            ))
        })
    } else {
        env::var(expr).map_err(|_| {
            ConfigError::EnvSubstitutionError(format!(
                "Required environment variable '{}' is not set",
                expr
            ))
        })
    }
}
