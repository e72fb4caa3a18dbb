// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration loading from environment variables.

/// Default bound on return-chain traversal.
pub const DEFAULT_MAX_STACK_TRAVERSAL: usize = 100;

/// Stack engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum number of stacks visited by a single resolution
    pub max_stack_traversal: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_stack_traversal: DEFAULT_MAX_STACK_TRAVERSAL,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional (with defaults):
    /// - `FLOWSTACK_MAX_STACK_TRAVERSAL`: Traversal bound for return chains (default: 100)
    pub fn from_env() -> Result<Self, ConfigError> {
        let max_stack_traversal: usize = std::env::var("FLOWSTACK_MAX_STACK_TRAVERSAL")
            .unwrap_or_else(|_| DEFAULT_MAX_STACK_TRAVERSAL.to_string())
            .parse()
            .map_err(|_| {
                ConfigError::Invalid(
                    "FLOWSTACK_MAX_STACK_TRAVERSAL",
                    "must be a positive integer",
                )
            })?;

        if max_stack_traversal == 0 {
            return Err(ConfigError::Invalid(
                "FLOWSTACK_MAX_STACK_TRAVERSAL",
                "must be greater than zero",
            ));
        }

        Ok(Self {
            max_stack_traversal,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    #[error("invalid value for {0}: {1}")]
    Invalid(&'static str, &'static str),
}
