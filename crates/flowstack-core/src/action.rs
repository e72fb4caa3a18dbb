// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Actions: single instructions in a call flow.
//!
//! The engine routes actions only by `id`, `next_id` and position. The
//! `action_type` and `option` payload are carried through untouched for the
//! orchestrator's effect handlers.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// No action / no target.
pub const ID_EMPTY: Uuid = Uuid::nil();

/// Virtual entry point. Resolves to the first action of the stack it is looked up in.
pub const ID_START: Uuid = Uuid::from_u128(1);

/// Virtual terminal action, returned when nothing is left to execute.
pub const ID_FINISH: Uuid = Uuid::from_u128(2);

/// Virtual "advance normally" marker.
pub const ID_NEXT: Uuid = Uuid::from_u128(3);

/// Action kinds known to the call flow services.
///
/// Serialized as a snake_case string. A type string this crate does not know
/// is kept in [`ActionType::Other`] and written back unchanged.
#[allow(missing_docs)] // Variant names match the wire names
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(from = "String", into = "String")]
#[strum(serialize_all = "snake_case")]
pub enum ActionType {
    /// No type set. Sentinel actions carry this.
    #[default]
    #[strum(serialize = "")]
    Unspecified,
    AgentCall,
    AiSummary,
    AiTalk,
    AiTask,
    Amd,
    Answer,
    Beep,
    Block,
    Branch,
    Call,
    ChatbotTalk,
    ConditionCallDigits,
    ConditionCallStatus,
    ConditionDatetime,
    ConditionVariable,
    ConfbridgeJoin,
    ConferenceJoin,
    Connect,
    ConversationSend,
    DigitsReceive,
    DigitsSend,
    DtmfReceive,
    DtmfSend,
    Echo,
    EmailSend,
    Empty,
    ExternalMediaStart,
    ExternalMediaStop,
    Fetch,
    FetchFlow,
    Goto,
    Hangup,
    MessageSend,
    Patch,
    PatchFlow,
    Play,
    QueueJoin,
    RecordStart,
    RecordStop,
    RecordingStart,
    RecordingStop,
    Sleep,
    Stop,
    StreamEcho,
    Talk,
    TranscribeRecording,
    TranscribeStart,
    VariableSet,
    WebhookSend,
    /// A type string not listed above, kept verbatim.
    #[strum(default)]
    Other(String),
}

impl From<String> for ActionType {
    fn from(s: String) -> Self {
        s.parse().unwrap_or(ActionType::Other(s))
    }
}

impl From<ActionType> for String {
    fn from(t: ActionType) -> Self {
        match t {
            ActionType::Other(s) => s,
            known => known.to_string(),
        }
    }
}

/// One instruction in a call flow.
///
/// Persisted as `{"id", "next_id", "type", "option"}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Action {
    /// Unique within the owning stack.
    pub id: Uuid,
    /// Explicit jump target. Empty (or Next) means the positional successor.
    #[serde(default)]
    pub next_id: Uuid,
    /// Action kind. Opaque to the engine.
    #[serde(rename = "type", default)]
    pub action_type: ActionType,
    /// Type specific payload. Opaque to the engine.
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Map::is_empty"
    )]
    pub option: Map<String, Value>,
}

// Older writers persist a missing option as `null`.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Action {
    /// Create an action with no jump target and an empty option.
    pub fn new(id: Uuid, action_type: ActionType) -> Self {
        Self {
            id,
            action_type,
            ..Default::default()
        }
    }

    /// The Finish sentinel action.
    pub fn finish() -> Self {
        Self {
            id: ID_FINISH,
            ..Default::default()
        }
    }

    /// The Start sentinel action.
    pub fn start() -> Self {
        Self {
            id: ID_START,
            ..Default::default()
        }
    }

    /// Set the explicit jump target.
    pub fn with_next_id(mut self, next_id: Uuid) -> Self {
        self.next_id = next_id;
        self
    }

    /// Set the option payload from a typed schema.
    pub fn with_option<T: Serialize>(mut self, option: &T) -> serde_json::Result<Self> {
        self.set_option(option)?;
        Ok(self)
    }

    /// Returns true if this action is Finish.
    pub fn is_finish(&self) -> bool {
        self.id == ID_FINISH
    }

    /// Returns true if the id is one of the reserved sentinel ids.
    pub fn is_sentinel(&self) -> bool {
        is_sentinel_id(self.id)
    }

    /// Returns the explicit jump target, if any.
    pub fn jump_target(&self) -> Option<Uuid> {
        if self.next_id == ID_EMPTY || self.next_id == ID_NEXT {
            None
        } else {
            Some(self.next_id)
        }
    }

    /// Decode the option payload into a typed schema.
    pub fn parse_option<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_value(Value::Object(self.option.clone()))
    }

    /// Replace the option payload with a typed schema, in place.
    ///
    /// Fails if the schema does not serialize to a JSON object.
    pub fn set_option<T: Serialize>(&mut self, option: &T) -> serde_json::Result<()> {
        match serde_json::to_value(option)? {
            Value::Object(map) => {
                self.option = map;
                Ok(())
            }
            other => Err(serde::ser::Error::custom(format!(
                "option must serialize to an object, got {}",
                other
            ))),
        }
    }
}

/// Returns true if the id is a reserved action sentinel.
pub fn is_sentinel_id(id: Uuid) -> bool {
    id == ID_EMPTY || id == ID_START || id == ID_FINISH || id == ID_NEXT
}
