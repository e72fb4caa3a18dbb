// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Flowstack Core - Flow Execution Stack Engine
//!
//! Decides, for a single in-progress call, which action runs next. A call's
//! behavior is one or more ordered action lists; actions can enter nested
//! lists (sub-flows) that return control to the point that entered them.
//! The instruction pointer lives in explicit, serializable data so it
//! survives process restarts and asynchronous telephony events between steps.
//!
//! # Data Model
//!
//! ```text
//! StackSet (one per call, persisted by the orchestrator)
//! ├── Main  [a0, a1, a2]                      return: -
//! ├── S1    [b0, b1]                          return: Main / a1
//! └── S2    [c0]                              return: S1 / b0
//! ```
//!
//! Stacks refer to each other only by id. Every walk up a return chain is
//! bounded by [`EngineConfig::max_stack_traversal`].
//!
//! # Operations
//!
//! | Operation | Module | Errors |
//! |-----------|--------|--------|
//! | `get_stack` / `create_stack` / `delete_stack` | [`repository`] | strict |
//! | `push_stack` / `pop_stack` / `insert_stack` | [`repository`] | strict |
//! | `find_action` / `search_action` | [`locator`] | strict |
//! | `get_action` / `locate_action` | [`engine`] | strict |
//! | `get_next_action` | [`engine`] | never, degrades to Finish |
//! | `add_actions` | [`mutator`] | strict |
//! | `validate` | [`mod@validate`] | reports, never fails |
//!
//! # Example
//!
//! ```
//! use flowstack_core::{Action, ActionType, StackHandler, StackSet, stack};
//! use uuid::Uuid;
//!
//! let handler = StackHandler::new();
//! let answer = Action::new(Uuid::new_v4(), ActionType::Answer);
//! let hangup = Action::new(Uuid::new_v4(), ActionType::Hangup);
//! let mut set = StackSet::new(vec![answer.clone(), hangup.clone()]);
//!
//! let (stack_id, next) = handler.get_next_action(&mut set, stack::ID_MAIN, &Action::start(), true);
//! assert_eq!((stack_id, &next), (stack::ID_MAIN, &answer));
//!
//! let (_, next) = handler.get_next_action(&mut set, stack_id, &next, true);
//! assert_eq!(next, hangup);
//!
//! let (_, next) = handler.get_next_action(&mut set, stack_id, &next, true);
//! assert!(next.is_finish());
//! ```
//!
//! # Configuration
//!
//! | Variable | Required | Default | Description |
//! |----------|----------|---------|-------------|
//! | `FLOWSTACK_MAX_STACK_TRAVERSAL` | No | `100` | Bound on stacks visited per resolution |
//!
//! # Concurrency
//!
//! Everything here is synchronous. The orchestrator owns each call's
//! [`StackSet`] and must not run two steps for the same call at once.

#![deny(missing_docs)]

/// Actions and action sentinel ids.
pub mod action;

/// Engine configuration loaded from environment variables.
pub mod config;

/// Jump and next-action resolution.
pub mod engine;

/// Error types with error code mapping.
pub mod error;

/// The stack handler and id generation.
pub mod handler;

/// Action lookup by id.
pub mod locator;

/// Mid-stream action injection.
pub mod mutator;

/// Typed option schemas for jump-carrying action types.
pub mod option;

/// Stack create, get, push, pop and delete.
pub mod repository;

/// Stacks, stack sets and action handles.
pub mod stack;

/// Structural validation of persisted stack sets.
pub mod validate;

pub use action::{Action, ActionType};
pub use config::{ConfigError, EngineConfig};
pub use error::{Result, StackError};
pub use handler::{IdGenerator, StackHandler, UuidGenerator};
pub use locator::find_action;
pub use option::{OptionBranch, OptionConditionCallDigits, OptionFetchFlow, OptionGoto};
pub use stack::{ActionHandle, Stack, StackSet};
pub use validate::{
    StackValidationError, StackValidationWarning, ValidationResult, validate, validate_stack_set,
};
