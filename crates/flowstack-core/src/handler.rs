// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! The stack handler and its injected collaborators.
//!
//! [`StackHandler`] carries no per-call state. Every operation takes the
//! call's [`StackSet`](crate::StackSet) explicitly; the orchestrator owns
//! the set and guarantees a single writer per call.

use uuid::Uuid;

use crate::config::EngineConfig;

/// Produces fresh stack identifiers.
pub trait IdGenerator {
    /// Return a new unique id.
    fn new_id(&self) -> Uuid;
}

/// Random (v4) UUID generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn new_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

impl<F> IdGenerator for F
where
    F: Fn() -> Uuid,
{
    fn new_id(&self) -> Uuid {
        self()
    }
}

/// Entry point for stack repository, locator, resolution and mutation operations.
#[derive(Debug, Clone, Default)]
pub struct StackHandler<G: IdGenerator = UuidGenerator> {
    pub(crate) config: EngineConfig,
    pub(crate) id_generator: G,
}

impl StackHandler<UuidGenerator> {
    /// Create a handler with the default config and random ids.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<G: IdGenerator> StackHandler<G> {
    /// Create a handler with an explicit config and id generator.
    pub fn with_parts(config: EngineConfig, id_generator: G) -> Self {
        Self {
            config,
            id_generator,
        }
    }

    /// Replace the config.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// The active config.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub(crate) fn max_traversal(&self) -> usize {
        self.config.max_stack_traversal
    }
}
