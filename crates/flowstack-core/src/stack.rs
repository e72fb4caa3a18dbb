// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Stacks and stack sets.
//!
//! A [`StackSet`] is an arena of [`Stack`]s keyed by stack id. Stacks refer
//! to each other only by id (the return address), never by pointer, so a
//! set can be persisted between steps and return chains with cycles are
//! representable and caught by a traversal bound.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::action::{self, Action};

/// No stack.
pub const ID_EMPTY: Uuid = Uuid::nil();

/// The root stack. Always present, never deleted, no return address.
pub const ID_MAIN: Uuid = Uuid::from_u128(1);

/// A named, ordered action list plus the address to resume at once it is exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stack {
    /// Unique within the stack set.
    pub id: Uuid,
    /// Order defines fall-through succession.
    #[serde(default)]
    pub actions: Vec<Action>,
    /// Stack to resume when this one is exhausted. Empty on the main stack.
    #[serde(default)]
    pub return_stack_id: Uuid,
    /// Action to resume from in the return stack. Empty on the main stack.
    #[serde(default)]
    pub return_action_id: Uuid,
}

impl Stack {
    /// Returns true for the root stack.
    pub fn is_main(&self) -> bool {
        self.id == ID_MAIN
    }

    /// Returns the first action, if any.
    pub fn first_action(&self) -> Option<&Action> {
        self.actions.first()
    }

    /// Returns true if the stack has a return address.
    pub fn has_return(&self) -> bool {
        self.return_stack_id != ID_EMPTY
    }
}

/// Position of an action inside a stack set.
///
/// Valid until the next operation that deletes a stack or splices actions
/// into the stack it points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionHandle {
    /// Stack owning the action.
    pub stack_id: Uuid,
    /// Index into the stack's action list.
    pub index: usize,
}

/// The complete nested-flow state of one call.
///
/// Persisted as a JSON object keyed by stack id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StackSet {
    stacks: BTreeMap<Uuid, Stack>,
}

impl StackSet {
    /// Create a set holding only the main stack with the given actions.
    pub fn new(actions: Vec<Action>) -> Self {
        let mut stacks = BTreeMap::new();
        stacks.insert(
            ID_MAIN,
            Stack {
                id: ID_MAIN,
                actions,
                return_stack_id: ID_EMPTY,
                return_action_id: action::ID_EMPTY,
            },
        );
        Self { stacks }
    }

    /// Create a set with no stacks at all. Only useful before a push of the main stack.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of stacks in the set.
    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    /// Returns true if the set holds no stacks.
    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    /// Returns true if a stack with this id is present.
    pub fn contains(&self, stack_id: Uuid) -> bool {
        self.stacks.contains_key(&stack_id)
    }

    /// Look up a stack.
    pub fn get(&self, stack_id: Uuid) -> Option<&Stack> {
        self.stacks.get(&stack_id)
    }

    /// Look up a stack for mutation.
    pub fn get_mut(&mut self, stack_id: Uuid) -> Option<&mut Stack> {
        self.stacks.get_mut(&stack_id)
    }

    /// Remove a stack. Removing the main stack is a no-op.
    pub fn remove(&mut self, stack_id: Uuid) -> Option<Stack> {
        if stack_id == ID_MAIN {
            return None;
        }
        self.stacks.remove(&stack_id)
    }

    /// Iterate over stack ids in key order.
    pub fn ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.stacks.keys().copied()
    }

    /// Iterate over stacks in key order.
    pub fn stacks(&self) -> impl Iterator<Item = (&Uuid, &Stack)> {
        self.stacks.iter()
    }

    /// Resolve a handle to the action it points at.
    pub fn action(&self, handle: &ActionHandle) -> Option<&Action> {
        self.stacks
            .get(&handle.stack_id)
            .and_then(|s| s.actions.get(handle.index))
    }

    /// Resolve a handle to the live action, for in-place mutation.
    pub fn action_mut(&mut self, handle: &ActionHandle) -> Option<&mut Action> {
        self.stacks
            .get_mut(&handle.stack_id)
            .and_then(|s| s.actions.get_mut(handle.index))
    }

    /// Insert or replace. Callers guard against duplicates.
    pub(crate) fn insert_unchecked(&mut self, stack: Stack) -> &mut Stack {
        match self.stacks.entry(stack.id) {
            Entry::Vacant(entry) => entry.insert(stack),
            Entry::Occupied(mut entry) => {
                entry.insert(stack);
                entry.into_mut()
            }
        }
    }
}
