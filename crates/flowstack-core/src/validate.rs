// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Structural validation of a stack set.
//!
//! Meant to run after loading persisted state, before handing the set to the
//! resolution engine. The engine tolerates every problem reported here (it
//! bounds traversal and degrades to Finish), so validation is advisory:
//! - The main stack exists and has no return address
//! - Map keys agree with stack ids
//! - Return addresses point at existing stacks and actions
//! - Return chains are acyclic
//! - Action ids are unique within a stack

use std::collections::{BTreeSet, HashSet};

use uuid::Uuid;

use crate::action;
use crate::stack::{self, StackSet};

// ============================================================================
// Validation Result Types
// ============================================================================

/// Result of stack set validation containing errors and warnings.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// Structural errors that break the stack set invariants.
    pub errors: Vec<StackValidationError>,
    /// Suspicious but resolvable state.
    pub warnings: Vec<StackValidationWarning>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are allowed).
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns true if there are any warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Invariant violations in a stack set.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum StackValidationError {
    /// The main stack is absent.
    MainStackMissing,
    /// The main stack carries a return address.
    MainStackHasReturn {
        return_stack_id: Uuid,
        return_action_id: Uuid,
    },
    /// A map key differs from the id of the stack stored under it.
    StackIdMismatch { key: Uuid, stack_id: Uuid },
    /// A non-main stack has no return stack.
    MissingReturn { stack_id: Uuid },
    /// A return address points at a stack that is not in the set.
    ReturnStackNotFound {
        stack_id: Uuid,
        return_stack_id: Uuid,
    },
    /// The return chain loops. `stack_ids` lists the loop in walk order.
    ReturnCycle { stack_ids: Vec<Uuid> },
    /// Two actions in one stack share an id.
    DuplicateActionId { stack_id: Uuid, action_id: Uuid },
}

impl std::fmt::Display for StackValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MainStackMissing => write!(f, "[S001] Main stack is missing"),
            Self::MainStackHasReturn {
                return_stack_id,
                return_action_id,
            } => write!(
                f,
                "[S002] Main stack has return address '{}'/'{}'",
                return_stack_id, return_action_id
            ),
            Self::StackIdMismatch { key, stack_id } => write!(
                f,
                "[S003] Stack stored under '{}' has id '{}'",
                key, stack_id
            ),
            Self::MissingReturn { stack_id } => {
                write!(f, "[S004] Stack '{}' has no return stack", stack_id)
            }
            Self::ReturnStackNotFound {
                stack_id,
                return_stack_id,
            } => write!(
                f,
                "[S005] Stack '{}' returns to missing stack '{}'",
                stack_id, return_stack_id
            ),
            Self::ReturnCycle { stack_ids } => {
                let ids: Vec<String> = stack_ids.iter().map(Uuid::to_string).collect();
                write!(f, "[S006] Return chain cycle: {}", ids.join(" -> "))
            }
            Self::DuplicateActionId {
                stack_id,
                action_id,
            } => write!(
                f,
                "[S007] Action '{}' appears more than once in stack '{}'",
                action_id, stack_id
            ),
        }
    }
}

impl std::error::Error for StackValidationError {}

/// Suspicious state the engine still resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum StackValidationWarning {
    /// A non-main stack has no actions; it returns immediately when entered.
    EmptyStack { stack_id: Uuid },
    /// The return action is not in the return stack; unwinding into it finishes the call.
    ReturnActionNotFound {
        stack_id: Uuid,
        return_stack_id: Uuid,
        return_action_id: Uuid,
    },
    /// An action uses a reserved sentinel id.
    ReservedActionId { stack_id: Uuid, action_id: Uuid },
}

impl std::fmt::Display for StackValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyStack { stack_id } => {
                write!(f, "[W001] Stack '{}' has no actions", stack_id)
            }
            Self::ReturnActionNotFound {
                stack_id,
                return_stack_id,
                return_action_id,
            } => write!(
                f,
                "[W002] Stack '{}' returns to action '{}' which is not in stack '{}'",
                stack_id, return_action_id, return_stack_id
            ),
            Self::ReservedActionId {
                stack_id,
                action_id,
            } => write!(
                f,
                "[W003] Stack '{}' contains reserved action id '{}'",
                stack_id, action_id
            ),
        }
    }
}

// ============================================================================
// Entry Points
// ============================================================================

/// Validate a stack set, collecting errors and warnings.
pub fn validate_stack_set(set: &StackSet) -> ValidationResult {
    let mut result = ValidationResult::default();

    validate_main(set, &mut result);
    validate_stacks(set, &mut result);
    validate_return_chains(set, &mut result);

    result
}

/// Validate a stack set and return only the errors.
pub fn validate(set: &StackSet) -> Vec<StackValidationError> {
    validate_stack_set(set).errors
}

// ============================================================================
// Checks
// ============================================================================

fn validate_main(set: &StackSet, result: &mut ValidationResult) {
    match set.get(stack::ID_MAIN) {
        None => result.errors.push(StackValidationError::MainStackMissing),
        Some(main) => {
            if main.return_stack_id != stack::ID_EMPTY
                || main.return_action_id != action::ID_EMPTY
            {
                result.errors.push(StackValidationError::MainStackHasReturn {
                    return_stack_id: main.return_stack_id,
                    return_action_id: main.return_action_id,
                });
            }
        }
    }
}

fn validate_stacks(set: &StackSet, result: &mut ValidationResult) {
    for (key, s) in set.stacks() {
        if *key != s.id {
            result.errors.push(StackValidationError::StackIdMismatch {
                key: *key,
                stack_id: s.id,
            });
        }

        let mut seen = HashSet::new();
        for act in &s.actions {
            if !seen.insert(act.id) {
                result.errors.push(StackValidationError::DuplicateActionId {
                    stack_id: *key,
                    action_id: act.id,
                });
            }
            if act.is_sentinel() {
                result.warnings.push(StackValidationWarning::ReservedActionId {
                    stack_id: *key,
                    action_id: act.id,
                });
            }
        }

        if s.is_main() {
            continue;
        }

        if s.actions.is_empty() {
            result
                .warnings
                .push(StackValidationWarning::EmptyStack { stack_id: *key });
        }

        if !s.has_return() {
            result
                .errors
                .push(StackValidationError::MissingReturn { stack_id: *key });
            continue;
        }

        match set.get(s.return_stack_id) {
            None => result.errors.push(StackValidationError::ReturnStackNotFound {
                stack_id: *key,
                return_stack_id: s.return_stack_id,
            }),
            Some(parent) => {
                let resolvable = s.return_action_id == action::ID_START
                    || parent.actions.iter().any(|a| a.id == s.return_action_id);
                if !resolvable {
                    result
                        .warnings
                        .push(StackValidationWarning::ReturnActionNotFound {
                            stack_id: *key,
                            return_stack_id: s.return_stack_id,
                            return_action_id: s.return_action_id,
                        });
                }
            }
        }
    }
}

fn validate_return_chains(set: &StackSet, result: &mut ValidationResult) {
    // Each cycle is reported once, keyed by its smallest member.
    let mut reported: BTreeSet<Uuid> = BTreeSet::new();

    for start in set.ids() {
        let mut path: Vec<Uuid> = Vec::new();
        let mut current = start;

        while current != stack::ID_EMPTY {
            if let Some(pos) = path.iter().position(|id| *id == current) {
                let cycle = path[pos..].to_vec();
                if let Some(min) = cycle.iter().min().copied() {
                    if reported.insert(min) {
                        result
                            .errors
                            .push(StackValidationError::ReturnCycle { stack_ids: cycle });
                    }
                }
                break;
            }

            let Some(s) = set.get(current) else {
                break;
            };
            path.push(current);
            current = s.return_stack_id;
        }
    }
}
