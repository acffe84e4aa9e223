// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Start-up parameters for a pipe registry, loadable from TOML.
//
//   buffer_size = 4096     # bytes per pipe
//   channel_count = 4      # number of independent pipes
//   name_prefix = "pipe"   # pipes are named pipe0, pipe1, ...
//   first_minor = 0        # index of the first pipe

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::channel::DEFAULT_PIPE_SIZE;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipeConfig {
    /// Ring capacity of every pipe, in bytes.
    pub buffer_size: usize,
    /// How many pipes the registry creates.
    pub channel_count: usize,
    /// Name stem; pipe `i` is named `{name_prefix}{first_minor + i}`.
    pub name_prefix: String,
    /// Number given to the first pipe.
    pub first_minor: u32,
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_PIPE_SIZE,
            channel_count: 1,
            name_prefix: "pipe".to_string(),
            first_minor: 0,
        }
    }
}

impl PipeConfig {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_size == 0 {
            return Err(ConfigError::Invalid("buffer_size must be positive".into()));
        }
        if self.channel_count == 0 {
            return Err(ConfigError::Invalid("channel_count must be positive".into()));
        }
        let last = u32::try_from(self.channel_count - 1)
            .ok()
            .and_then(|n| self.first_minor.checked_add(n));
        if last.is_none() {
            return Err(ConfigError::Invalid(format!(
                "{} pipes starting at {} overflow the minor number range",
                self.channel_count, self.first_minor
            )));
        }
        Ok(())
    }

    /// Name of the pipe at `index` (0-based).
    pub fn channel_name(&self, index: usize) -> String {
        format!("{}{}", self.name_prefix, self.first_minor as usize + index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = PipeConfig::default();
        assert_eq!(cfg.buffer_size, 4096);
        assert_eq!(cfg.channel_count, 1);
        assert_eq!(cfg.channel_name(0), "pipe0");
        cfg.validate().expect("defaults are valid");
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg = PipeConfig::from_toml_str("channel_count = 3\nfirst_minor = 2\n").expect("parse");
        assert_eq!(cfg.buffer_size, 4096);
        assert_eq!(cfg.channel_count, 3);
        assert_eq!(cfg.channel_name(2), "pipe4");
    }

    #[test]
    fn rejects_zero_sizes() {
        assert!(matches!(
            PipeConfig::from_toml_str("buffer_size = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            PipeConfig::from_toml_str("channel_count = 0"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_minor_overflow() {
        let cfg = PipeConfig {
            channel_count: 2,
            first_minor: u32::MAX,
            ..PipeConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(matches!(
            PipeConfig::from_toml_str("pipe_sise = 10"),
            Err(ConfigError::Parse(_))
        ));
    }
}
