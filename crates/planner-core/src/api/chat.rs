use planner_types::{
    chat::{
        ChatMemory, ChatMessage, ChatStreamRequest, ConversationSummary, MessageFeedback,
        RecipeDraft,
    },
    Result,
};
use serde_json::Value;

use super::endpoint;
use crate::client::{ApiClient, RequestOptions};
use crate::ports::Method;
use crate::sse::ChatStream;

pub async fn get_memory(client: &ApiClient) -> Result<ChatMemory> {
    let memory: Option<ChatMemory> = client.get(&endpoint("/chat/memory")).await?;
    Ok(memory.unwrap_or_default())
}

pub async fn put_memory(client: &ApiClient, content: &str) -> Result<ChatMemory> {
    let body = ChatMemory {
        content: content.to_string(),
        updated_at: None,
    };
    client.put(&endpoint("/chat/memory"), &body).await
}

pub async fn list_conversations(client: &ApiClient) -> Result<Vec<ConversationSummary>> {
    let list: Option<Vec<ConversationSummary>> =
        client.get(&endpoint("/chat/conversations")).await?;
    Ok(list.unwrap_or_default())
}

pub async fn conversation_messages(client: &ApiClient, conversation_id: &str) -> Result<Vec<ChatMessage>> {
    let path = endpoint(&format!("/chat/conversations/{}/messages", conversation_id));
    let messages: Option<Vec<ChatMessage>> = client.get(&path).await?;
    Ok(messages.unwrap_or_default())
}

/// Start a new conversation with `request.message`.
pub fn stream_new(client: &ApiClient, request: &ChatStreamRequest) -> Result<ChatStream> {
    let body = serde_json::to_value(request)?;
    Ok(client.open_chat_stream(&endpoint("/chat/stream"), body))
}

/// Continue an existing conversation.
pub fn stream_conversation(
    client: &ApiClient,
    conversation_id: &str,
    request: &ChatStreamRequest,
) -> Result<ChatStream> {
    let body = serde_json::to_value(request)?;
    let path = endpoint(&format!("/chat/conversations/{}/stream", conversation_id));
    Ok(client.open_chat_stream(&path, body))
}

/// Approve a tool call the assistant proposed. Returns the tool's result.
pub async fn accept_action(client: &ApiClient, action_id: &str) -> Result<Value> {
    let path = endpoint(&format!("/chat/actions/{}/accept", action_id));
    client.execute(&path, RequestOptions::new(Method::Post)).await
}

pub async fn cancel_action(client: &ApiClient, action_id: &str) -> Result<()> {
    let path = endpoint(&format!("/chat/actions/{}/cancel", action_id));
    client.execute(&path, RequestOptions::new(Method::Post)).await?;
    Ok(())
}

pub async fn message_feedback(client: &ApiClient, message_id: &str, feedback: &MessageFeedback) -> Result<()> {
    let path = endpoint(&format!("/messages/{}/feedback", message_id));
    let opts = RequestOptions::new(Method::Post).json(serde_json::to_value(feedback)?);
    client.execute(&path, opts).await?;
    Ok(())
}

/// Fetch a draft through its signed link. Works without a session, and a
/// rejected token never logs the current user out.
pub async fn get_recipe_draft(client: &ApiClient, draft_id: &str, token: &str) -> Result<RecipeDraft> {
    let path = endpoint(&format!("/ai/drafts/{}", draft_id));
    let opts = RequestOptions::new(Method::Get).query("token", token);
    client.request(&path, opts).await
}
