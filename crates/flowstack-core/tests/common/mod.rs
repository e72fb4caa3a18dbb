// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Common test infrastructure for flowstack-core integration tests.
//!
//! Provides deterministic id generation, call flow builders and a
//! persistence round trip that mimics the orchestrator storing the stack set
//! between steps.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};

use flowstack_core::{Action, ActionType, EngineConfig, IdGenerator, StackHandler, StackSet};
use uuid::Uuid;

/// Hands out `ffffffff-0000-0000-0000-<n>` ids in order.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl IdGenerator for SequentialIds {
    fn new_id(&self) -> Uuid {
        let n = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        Uuid::from_u128((0xffff_ffff_u128 << 96) | u128::from(n))
    }
}

/// Handler with sequential stack ids and the default config.
pub fn handler() -> StackHandler<SequentialIds> {
    StackHandler::with_parts(EngineConfig::default(), SequentialIds::default())
}

/// Deterministic action id for readable fixtures.
pub fn uid(n: u128) -> Uuid {
    Uuid::from_u128((0xa000_0000_u128 << 96) | n)
}

/// Build an action with a deterministic id.
pub fn act(n: u128, action_type: ActionType) -> Action {
    Action::new(uid(n), action_type)
}

/// Serialize and deserialize the stack set, as the orchestrator does between steps.
pub fn persist(set: &StackSet) -> StackSet {
    let raw = serde_json::to_string(set).expect("serialize stack set");
    serde_json::from_str(&raw).expect("deserialize stack set")
}

/// Ids of the actions in a stack, in order.
pub fn action_ids(set: &StackSet, stack_id: Uuid) -> Vec<Uuid> {
    set.get(stack_id)
        .map(|s| s.actions.iter().map(|a| a.id).collect())
        .unwrap_or_default()
}
