use serde::{de::IgnoredAny, Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::recipe::RecipeCreate;

/// Role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
    Tool,
}

/// Structured content attached to an assistant message (recipe cards,
/// ingredient tables, ...). Only `type` is fixed; the rest is block-specific.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ContentBlock {
    pub fn text(&self) -> Option<&str> {
        self.fields.get("text").and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.fields.get("title").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackRating {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageFeedback {
    pub rating: FeedbackRating,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub blocks: Vec<ContentBlock>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub feedback: Option<FeedbackRating>,
}

impl ChatMessage {
    pub fn user(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: ChatRole::User,
            content: content.into(),
            blocks: Vec::new(),
            created_at: None,
            feedback: None,
        }
    }

    pub fn assistant(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            ..Self::user(id, content)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

impl ConversationSummary {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled conversation")
    }
}

/// Long-lived notes the assistant keeps about the household
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatMemory {
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Body of the chat stream endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatStreamRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl ChatStreamRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
        }
    }
}

/// An AI-extracted recipe awaiting review, reachable via a signed link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDraft {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    pub recipe: RecipeCreate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolActionStatus {
    Proposed,
    Running,
    Completed,
    Canceled,
    Failed,
}

/// A tool call the assistant proposed, shown to the user for approval
#[derive(Debug, Clone, PartialEq)]
pub struct ToolAction {
    pub action_id: String,
    pub tool: String,
    pub arguments: Value,
    pub status: ToolActionStatus,
    pub result: Option<Value>,
}

// ─── Stream events ───────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StatusData {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DeltaData {
    #[serde(default, alias = "text")]
    pub delta: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BlocksAppendData {
    #[serde(default)]
    pub blocks: Vec<ContentBlock>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MessageCompleteData {
    #[serde(default)]
    pub message: Option<ChatMessage>,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StreamErrorData {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub correlation_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DoneData {
    #[serde(default)]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ToolEventData {
    #[serde(default, alias = "id")]
    pub action_id: Option<String>,
    #[serde(default, alias = "name")]
    pub tool: Option<String>,
    #[serde(default)]
    pub arguments: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MemoryUpdatedData {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SummaryUpdatedData {
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub summary: String,
}

/// Payload of one chat stream frame, keyed by its `event` tag
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ChatEvent {
    #[serde(rename = "status")]
    Status(StatusData),
    #[serde(rename = "message.delta")]
    MessageDelta(DeltaData),
    #[serde(rename = "blocks.append")]
    BlocksAppend(BlocksAppendData),
    #[serde(rename = "message.complete")]
    MessageComplete(MessageCompleteData),
    #[serde(rename = "error")]
    Error(StreamErrorData),
    #[serde(rename = "done")]
    Done(DoneData),
    #[serde(rename = "tool.started")]
    ToolStarted(ToolEventData),
    #[serde(rename = "tool.proposed")]
    ToolProposed(ToolEventData),
    #[serde(rename = "tool.result")]
    ToolResult(ToolEventData),
    #[serde(rename = "tool.canceled")]
    ToolCanceled(ToolEventData),
    #[serde(rename = "memory.updated")]
    MemoryUpdated(MemoryUpdatedData),
    #[serde(rename = "summary.updated")]
    SummaryUpdated(SummaryUpdatedData),
}

/// A frame this client has no variant for, or whose payload does not fit one
#[derive(Deserialize)]
#[serde(untagged)]
enum DecodedEvent {
    Known(ChatEvent),
    Unrecognized(#[allow(dead_code)] IgnoredAny),
}

impl ChatEvent {
    pub fn tag(&self) -> &'static str {
        match self {
            ChatEvent::Status(_) => "status",
            ChatEvent::MessageDelta(_) => "message.delta",
            ChatEvent::BlocksAppend(_) => "blocks.append",
            ChatEvent::MessageComplete(_) => "message.complete",
            ChatEvent::Error(_) => "error",
            ChatEvent::Done(_) => "done",
            ChatEvent::ToolStarted(_) => "tool.started",
            ChatEvent::ToolProposed(_) => "tool.proposed",
            ChatEvent::ToolResult(_) => "tool.result",
            ChatEvent::ToolCanceled(_) => "tool.canceled",
            ChatEvent::MemoryUpdated(_) => "memory.updated",
            ChatEvent::SummaryUpdated(_) => "summary.updated",
        }
    }

    /// Decode a payload for `tag`. Unknown tags and payloads that fit no
    /// variant yield `Ok(None)`.
    pub fn from_parts(tag: &str, data: Value) -> Result<Option<Self>, serde_json::Error> {
        // Terminal events are often sent without a payload
        let data = if data.is_null() {
            Value::Object(Map::new())
        } else {
            data
        };
        let mut frame = Map::new();
        frame.insert("event".to_string(), Value::String(tag.to_string()));
        frame.insert("data".to_string(), data);
        Ok(match serde_json::from_value(Value::Object(frame))? {
            DecodedEvent::Known(event) => Some(event),
            DecodedEvent::Unrecognized(_) => None,
        })
    }
}

#[derive(Deserialize)]
struct RawStreamEvent {
    event: String,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    message_id: Option<String>,
}

/// One decoded frame of the chat stream
#[derive(Debug, Clone, PartialEq)]
pub struct ChatStreamEvent {
    pub message_id: Option<String>,
    pub event: ChatEvent,
}

impl ChatStreamEvent {
    /// Parse the JSON body of a `data:` line. Unknown event tags yield `Ok(None)`.
    pub fn from_json(json: &str) -> Result<Option<Self>, serde_json::Error> {
        let raw: RawStreamEvent = serde_json::from_str(json)?;
        Ok(ChatEvent::from_parts(&raw.event, raw.data)?.map(|event| Self {
            message_id: raw.message_id,
            event,
        }))
    }

    /// `done` and `error` end the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self.event, ChatEvent::Done(_) | ChatEvent::Error(_))
    }
}
