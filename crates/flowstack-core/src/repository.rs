// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Stack repository: create, get, insert, push, pop and delete stacks.
//!
//! Leaf operations with no recursion. The main stack is protected: deleting
//! it is a no-op and popping it is an error.

use tracing::debug;
use uuid::Uuid;

use crate::action::Action;
use crate::error::{Result, StackError};
use crate::handler::{IdGenerator, StackHandler};
use crate::stack::{self, Stack, StackSet};

impl<G: IdGenerator> StackHandler<G> {
    /// Look up a stack, failing if it is absent.
    pub fn get_stack<'a>(&self, set: &'a StackSet, stack_id: Uuid) -> Result<&'a Stack> {
        set.get(stack_id)
            .ok_or(StackError::StackNotFound { stack_id })
    }

    /// Build a stack without inserting it. An Empty `stack_id` gets a fresh id.
    pub fn create_stack(
        &self,
        stack_id: Uuid,
        actions: Vec<Action>,
        return_stack_id: Uuid,
        return_action_id: Uuid,
    ) -> Stack {
        let id = if stack_id == stack::ID_EMPTY {
            self.id_generator.new_id()
        } else {
            stack_id
        };

        Stack {
            id,
            actions,
            return_stack_id,
            return_action_id,
        }
    }

    /// Remove a stack if present. Deleting the main stack is a no-op.
    pub fn delete_stack(&self, set: &mut StackSet, stack_id: Uuid) {
        if set.remove(stack_id).is_some() {
            debug!(stack_id = %stack_id, "Released stack");
        }
    }

    /// Insert a fully built stack. Fails on a duplicate id and leaves the set unchanged.
    pub fn insert_stack(&self, set: &mut StackSet, stack: Stack) -> Result<()> {
        if set.contains(stack.id) {
            return Err(StackError::StackAlreadyExists { stack_id: stack.id });
        }
        set.insert_unchecked(stack);
        Ok(())
    }

    /// Remove and return a stack.
    pub fn pop_stack(&self, set: &mut StackSet, stack_id: Uuid) -> Result<Stack> {
        if stack_id == stack::ID_MAIN {
            return Err(StackError::MainStackProtected);
        }
        let res = set
            .remove(stack_id)
            .ok_or(StackError::StackNotFound { stack_id })?;

        debug!(stack_id = %stack_id, "Popped stack");
        Ok(res)
    }

    /// Enter a sub-flow.
    ///
    /// Creates a stack holding `actions` whose return address is the caller's
    /// current position, inserts it, and returns it with its first action.
    /// An Empty `stack_id` gets a fresh id. Fails without touching the set if
    /// the id is already taken or `actions` is empty.
    pub fn push_stack<'a>(
        &self,
        set: &'a mut StackSet,
        stack_id: Uuid,
        actions: Vec<Action>,
        current_stack_id: Uuid,
        current_action_id: Uuid,
    ) -> Result<(&'a Stack, &'a Action)> {
        if stack_id != stack::ID_EMPTY && set.contains(stack_id) {
            return Err(StackError::StackAlreadyExists { stack_id });
        }

        let new_stack = self.create_stack(stack_id, actions, current_stack_id, current_action_id);
        if new_stack.actions.is_empty() {
            return Err(StackError::EmptyActions {
                stack_id: new_stack.id,
            });
        }
        if set.contains(new_stack.id) {
            return Err(StackError::StackAlreadyExists {
                stack_id: new_stack.id,
            });
        }

        debug!(
            stack_id = %new_stack.id,
            return_stack_id = %current_stack_id,
            return_action_id = %current_action_id,
            actions = new_stack.actions.len(),
            "Pushed stack"
        );

        let inserted: &'a Stack = set.insert_unchecked(new_stack);
        match inserted.actions.first() {
            Some(first) => Ok((inserted, first)),
            None => Err(StackError::EmptyActions {
                stack_id: inserted.id,
            }),
        }
    }
}
