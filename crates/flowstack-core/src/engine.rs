// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Resolution engine.
//!
//! Two entry points with different error regimes:
//!
//! - [`StackHandler::get_action`] resolves an arbitrary jump target, walking
//!   up the return chain from a start stack. It is strict and returns a
//!   [`StackError`] when the target can not be reached.
//! - [`StackHandler::get_next_action`] advances the program counter after an
//!   action has executed. It is total: every failure degrades to the Finish
//!   action so a live call always has something to do next.
//!
//! Both walks are bounded by [`EngineConfig::max_stack_traversal`](crate::EngineConfig)
//! so a corrupted return chain with a cycle terminates.

use tracing::{debug, warn};
use uuid::Uuid;

use crate::action::{self, Action};
use crate::error::{Result, StackError};
use crate::handler::{IdGenerator, StackHandler};
use crate::locator::position;
use crate::stack::{self, ActionHandle, Stack, StackSet};

impl<G: IdGenerator> StackHandler<G> {
    /// Resolve `target_action_id` starting from `start_stack_id`, returning a handle.
    ///
    /// The start stack is searched first, then each stack up its return
    /// chain. With `release_stack` set, every stack that was searched
    /// without a match is deleted as the walk moves past it. The Start
    /// action resolves to the first action of the stack being searched.
    pub fn locate_action(
        &self,
        set: &mut StackSet,
        start_stack_id: Uuid,
        target_action_id: Uuid,
        release_stack: bool,
    ) -> Result<ActionHandle> {
        if start_stack_id == stack::ID_EMPTY || target_action_id == action::ID_EMPTY {
            return Err(StackError::InvalidTarget {
                stack_id: start_stack_id,
                action_id: target_action_id,
            });
        }

        let mut current_id = start_stack_id;
        for _ in 0..self.max_traversal() {
            if current_id == stack::ID_EMPTY {
                return Err(StackError::NoStackLeft {
                    action_id: target_action_id,
                });
            }

            let current = self.get_stack(set, current_id)?;
            if start_stack_id == stack::ID_MAIN && current.actions.is_empty() {
                return Err(StackError::EmptyActions {
                    stack_id: current_id,
                });
            }

            if target_action_id == action::ID_START {
                if current.actions.is_empty() {
                    return Err(StackError::EmptyActions {
                        stack_id: current_id,
                    });
                }
                return Ok(ActionHandle {
                    stack_id: current_id,
                    index: 0,
                });
            }

            if let Some(index) = position(&current.actions, target_action_id) {
                return Ok(ActionHandle {
                    stack_id: current_id,
                    index,
                });
            }

            let return_stack_id = current.return_stack_id;
            if release_stack {
                self.delete_stack(set, current_id);
            }
            debug!(
                stack_id = %current_id,
                return_stack_id = %return_stack_id,
                action_id = %target_action_id,
                "Action not in stack, moving to return stack"
            );
            current_id = return_stack_id;
        }

        Err(StackError::TraversalExceeded {
            limit: self.max_traversal(),
        })
    }

    /// Resolve `target_action_id` and return its owning stack id plus a live reference.
    ///
    /// See [`locate_action`](Self::locate_action). Mutating the returned
    /// action updates the stack set in place; this is how loop counters are
    /// decremented between steps, typically with `release_stack` unset.
    pub fn get_action<'a>(
        &self,
        set: &'a mut StackSet,
        start_stack_id: Uuid,
        target_action_id: Uuid,
        release_stack: bool,
    ) -> Result<(Uuid, &'a mut Action)> {
        let handle = self.locate_action(set, start_stack_id, target_action_id, release_stack)?;
        let act = set.action_mut(&handle).ok_or(StackError::ActionNotFound {
            stack_id: handle.stack_id,
            action_id: target_action_id,
        })?;
        Ok((handle.stack_id, act))
    }

    /// Compute the action to run after `current_action` finished in `current_stack_id`.
    ///
    /// Resolution order:
    /// 1. The Start action yields the first action of the current stack.
    /// 2. An explicit `next_id` is resolved through [`get_action`](Self::get_action)
    ///    with release enabled.
    /// 3. Otherwise the positional successor, resolved the same way.
    /// 4. At the end of a stack, control returns to the stack's return
    ///    address (releasing the exhausted stack if `release_stack` is set)
    ///    and resolution repeats from the return action.
    ///
    /// Never fails. Anything unresolvable yields the Finish action.
    pub fn get_next_action(
        &self,
        set: &mut StackSet,
        current_stack_id: Uuid,
        current_action: &Action,
        release_stack: bool,
    ) -> (Uuid, Action) {
        let mut stack_id = current_stack_id;
        let mut action_id = current_action.id;

        for _ in 0..self.max_traversal() {
            if action_id == action::ID_START {
                return match set.get(stack_id).and_then(Stack::first_action) {
                    Some(first) => (stack_id, first.clone()),
                    None => degrade(stack::ID_MAIN, stack_id, action_id, "no action to start from"),
                };
            }

            let Some(current) = set.get(stack_id) else {
                return degrade(stack::ID_EMPTY, stack_id, action_id, "stack not found");
            };
            let Some(index) = position(&current.actions, action_id) else {
                return degrade(stack::ID_EMPTY, stack_id, action_id, "action not found");
            };

            if let Some(target_id) = current.actions[index].jump_target() {
                debug!(
                    stack_id = %stack_id,
                    action_id = %action_id,
                    target_id = %target_id,
                    "Following explicit next action"
                );
                return self.resolve_or_finish(set, stack_id, target_id);
            }

            if let Some(next_id) = current.actions.get(index + 1).map(|a| a.id) {
                return self.resolve_or_finish(set, stack_id, next_id);
            }

            if stack_id == stack::ID_MAIN {
                debug!(action_id = %action_id, "Main stack exhausted");
                return (stack::ID_MAIN, Action::finish());
            }

            let (return_stack_id, return_action_id) =
                (current.return_stack_id, current.return_action_id);
            if release_stack {
                self.delete_stack(set, stack_id);
            }
            debug!(
                stack_id = %stack_id,
                return_stack_id = %return_stack_id,
                return_action_id = %return_action_id,
                "Stack exhausted, returning"
            );
            stack_id = return_stack_id;
            action_id = return_action_id;
        }

        warn!(
            stack_id = %stack_id,
            limit = self.max_traversal(),
            "Exceeded max stack traversal, finishing"
        );
        (stack::ID_MAIN, Action::finish())
    }

    fn resolve_or_finish(
        &self,
        set: &mut StackSet,
        stack_id: Uuid,
        target_id: Uuid,
    ) -> (Uuid, Action) {
        match self.get_action(set, stack_id, target_id, true) {
            Ok((owner_id, act)) => (owner_id, act.clone()),
            Err(e) => {
                warn!(
                    stack_id = %stack_id,
                    target_id = %target_id,
                    error = %e,
                    code = e.error_code(),
                    "Could not resolve next action, finishing"
                );
                (stack::ID_MAIN, Action::finish())
            }
        }
    }
}

fn degrade(root: Uuid, stack_id: Uuid, action_id: Uuid, reason: &'static str) -> (Uuid, Action) {
    warn!(
        stack_id = %stack_id,
        action_id = %action_id,
        reason,
        "Could not resolve next action, finishing"
    );
    (root, Action::finish())
}
