// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Owner of a fixed set of independent pipe channels, built once from a
// PipeConfig and passed to whoever hands out sessions.

use std::collections::HashMap;
use std::sync::Arc;

use crate::channel::{Channel, OpenOptions, Session};
use crate::config::PipeConfig;
use crate::error::{ConfigError, PipeError, Result};

/// A collection of named channels, addressable by name or index.
pub struct PipeRegistry {
    channels: Vec<Arc<Channel>>,
    by_name: HashMap<String, usize>,
}

impl PipeRegistry {
    /// Create `cfg.channel_count` idle channels of `cfg.buffer_size` bytes.
    pub fn new(cfg: &PipeConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;

        let mut channels = Vec::with_capacity(cfg.channel_count);
        let mut by_name = HashMap::with_capacity(cfg.channel_count);
        for i in 0..cfg.channel_count {
            let name = cfg.channel_name(i);
            let ch = Channel::with_name(name.clone(), cfg.buffer_size)
                .map_err(|e| ConfigError::Invalid(e.to_string()))?;
            by_name.insert(name, i);
            channels.push(ch);
        }

        log::info!(
            "created {} pipe(s) {}..{} of {} bytes",
            channels.len(),
            cfg.channel_name(0),
            cfg.channel_name(cfg.channel_count - 1),
            cfg.buffer_size
        );
        Ok(Self { channels, by_name })
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Channel at `index` (0-based, independent of `first_minor`).
    pub fn get(&self, index: usize) -> Result<&Arc<Channel>> {
        self.channels
            .get(index)
            .ok_or_else(|| PipeError::NoSuchChannel(format!("#{index}")))
    }

    pub fn by_name(&self, name: &str) -> Result<&Arc<Channel>> {
        self.by_name
            .get(name)
            .map(|&i| &self.channels[i])
            .ok_or_else(|| PipeError::NoSuchChannel(name.to_string()))
    }

    /// Look up `name` and open a session on it.
    pub fn open(&self, name: &str, opts: &OpenOptions) -> Result<Session> {
        self.by_name(name)?.open(opts)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Channel>> {
        self.channels.iter()
    }
}
