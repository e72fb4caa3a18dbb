// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Typed option schemas for the action types whose payload refers to other actions.
//!
//! The engine itself never decodes options. These schemas exist for effect
//! handlers that resolve jump targets or update loop counters in place
//! through [`Action::parse_option`](crate::Action::parse_option) and
//! [`Action::set_option`](crate::Action::set_option).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn is_zero(v: &i64) -> bool {
    *v == 0
}

/// Option of the `goto` action.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OptionGoto {
    /// Action to jump to.
    #[serde(default)]
    pub target_id: Uuid,
    /// Remaining iterations. Decremented in place on every jump.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub loop_count: i64,
}

/// Option of the `branch` action.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OptionBranch {
    /// Variable whose value selects the branch.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub variable: String,
    /// Target when no branch matches.
    #[serde(default)]
    pub default_target_id: Uuid,
    /// Branch value to target action.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub target_ids: BTreeMap<String, Uuid>,
}

impl OptionBranch {
    /// Target action for the given variable value, falling back to the default.
    pub fn target_for(&self, value: &str) -> Uuid {
        self.target_ids
            .get(value)
            .copied()
            .unwrap_or(self.default_target_id)
    }
}

/// Option of the `condition_call_digits` action.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OptionConditionCallDigits {
    /// Digit count that satisfies the condition.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub length: i64,
    /// Digit key that satisfies the condition.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub key: String,
    /// Target when the condition fails.
    #[serde(default)]
    pub false_target_id: Uuid,
}

/// Option of the `fetch_flow` action.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OptionFetchFlow {
    /// Flow whose actions are pushed as a new stack.
    #[serde(default)]
    pub flow_id: Uuid,
}
