// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Mid-stream action injection.

use tracing::debug;
use uuid::Uuid;

use crate::action::Action;
use crate::error::{Result, StackError};
use crate::handler::{IdGenerator, StackHandler};
use crate::locator::position;
use crate::stack::StackSet;

impl<G: IdGenerator> StackHandler<G> {
    /// Splice `actions` into a stack immediately after `target_action_id`.
    ///
    /// Actions that followed the target keep their relative order after the
    /// inserted block. Fails without touching the set if the stack or the
    /// target action is missing. Invalidates every [`ActionHandle`](crate::ActionHandle)
    /// into the stack.
    pub fn add_actions(
        &self,
        set: &mut StackSet,
        target_stack_id: Uuid,
        target_action_id: Uuid,
        actions: Vec<Action>,
    ) -> Result<()> {
        let target = set
            .get_mut(target_stack_id)
            .ok_or(StackError::StackNotFound {
                stack_id: target_stack_id,
            })?;
        let index = position(&target.actions, target_action_id).ok_or(
            StackError::ActionNotFound {
                stack_id: target_stack_id,
                action_id: target_action_id,
            },
        )?;

        let count = actions.len();
        target.actions.splice(index + 1..index + 1, actions);

        debug!(
            stack_id = %target_stack_id,
            action_id = %target_action_id,
            count,
            "Added actions"
        );
        Ok(())
    }
}
