// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Action lookup within one stack or across a whole stack set.
//!
//! Lookups hand back live references (or [`ActionHandle`]s), never copies,
//! so callers can update an action's option in place.

use uuid::Uuid;

use crate::action::Action;
use crate::error::{Result, StackError};
use crate::handler::{IdGenerator, StackHandler};
use crate::stack::{self, ActionHandle, StackSet};

/// Index of the action with the given id.
pub fn position(actions: &[Action], action_id: Uuid) -> Option<usize> {
    actions.iter().position(|a| a.id == action_id)
}

/// Find an action by id, returning its index and a live reference.
pub fn find_action(actions: &mut [Action], action_id: Uuid) -> Option<(usize, &mut Action)> {
    actions
        .iter_mut()
        .enumerate()
        .find(|(_, a)| a.id == action_id)
}

impl<G: IdGenerator> StackHandler<G> {
    /// Locate an action, returning a handle to it.
    ///
    /// With a concrete `stack_id` only that stack is searched. With the
    /// Empty stack id every stack is scanned and the first match wins; ids
    /// duplicated across stacks are a caller error.
    pub fn search_action_handle(
        &self,
        set: &StackSet,
        stack_id: Uuid,
        action_id: Uuid,
    ) -> Result<ActionHandle> {
        if stack_id != stack::ID_EMPTY {
            let target = self.get_stack(set, stack_id)?;
            return position(&target.actions, action_id)
                .map(|index| ActionHandle { stack_id, index })
                .ok_or(StackError::ActionNotFound {
                    stack_id,
                    action_id,
                });
        }

        set.stacks()
            .find_map(|(id, s)| {
                position(&s.actions, action_id).map(|index| ActionHandle {
                    stack_id: *id,
                    index,
                })
            })
            .ok_or(StackError::ActionNotFound {
                stack_id,
                action_id,
            })
    }

    /// Locate an action and return its owning stack id plus a live reference.
    pub fn search_action<'a>(
        &self,
        set: &'a mut StackSet,
        stack_id: Uuid,
        action_id: Uuid,
    ) -> Result<(Uuid, &'a mut Action)> {
        let handle = self.search_action_handle(set, stack_id, action_id)?;
        let act = set.action_mut(&handle).ok_or(StackError::ActionNotFound {
            stack_id: handle.stack_id,
            action_id,
        })?;
        Ok((handle.stack_id, act))
    }
}
