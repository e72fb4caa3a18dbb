// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for flowstack-core.
//!
//! Only the strict API returns these. `get_next_action` never does; it
//! degrades to the Finish action instead.

use thiserror::Error;
use uuid::Uuid;

/// Result type using StackError
pub type Result<T> = std::result::Result<T, StackError>;

/// Errors returned by stack repository, locator and jump resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StackError {
    /// The start stack or the target action was the Empty sentinel.
    #[error("invalid resolution target: stack '{stack_id}', action '{action_id}'")]
    InvalidTarget {
        /// Requested start stack.
        stack_id: Uuid,
        /// Requested target action.
        action_id: Uuid,
    },

    /// The stack is not present in the stack set.
    #[error("stack '{stack_id}' not found")]
    StackNotFound {
        /// The stack ID that was not found.
        stack_id: Uuid,
    },

    /// The action is not present in the searched stack(s).
    #[error("action '{action_id}' not found in stack '{stack_id}'")]
    ActionNotFound {
        /// The searched stack, or the Empty sentinel when every stack was scanned.
        stack_id: Uuid,
        /// The action ID that was not found.
        action_id: Uuid,
    },

    /// The stack has no actions to execute.
    #[error("stack '{stack_id}' has no actions")]
    EmptyActions {
        /// The stack with an empty action list.
        stack_id: Uuid,
    },

    /// A stack with this ID is already present (duplicate push).
    #[error("stack '{stack_id}' already exists")]
    StackAlreadyExists {
        /// The duplicated stack ID.
        stack_id: Uuid,
    },

    /// The return chain ran out before the action was found.
    #[error("no stack left while searching for action '{action_id}'")]
    NoStackLeft {
        /// The action ID that was being resolved.
        action_id: Uuid,
    },

    /// The return chain is longer than the configured bound (likely a cycle).
    #[error("exceeded max stack traversal of {limit}")]
    TraversalExceeded {
        /// The configured traversal bound.
        limit: usize,
    },

    /// The main stack can not be removed.
    #[error("the main stack can not be removed")]
    MainStackProtected,
}

impl StackError {
    /// Get the error code string for this error type.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTarget { .. } => "INVALID_TARGET",
            Self::StackNotFound { .. } => "STACK_NOT_FOUND",
            Self::ActionNotFound { .. } => "ACTION_NOT_FOUND",
            Self::EmptyActions { .. } => "EMPTY_ACTIONS",
            Self::StackAlreadyExists { .. } => "STACK_ALREADY_EXISTS",
            Self::NoStackLeft { .. } => "NO_STACK_LEFT",
            Self::TraversalExceeded { .. } => "TRAVERSAL_EXCEEDED",
            Self::MainStackProtected => "MAIN_STACK_PROTECTED",
        }
    }
}
