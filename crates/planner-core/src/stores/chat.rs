//! Chat assistant state: conversations, the streaming reply, tool proposals.

use std::cell::RefCell;
use std::rc::Rc;

use futures::StreamExt;
use planner_types::{
    chat::{
        ChatEvent, ChatMemory, ChatMessage, ChatStreamEvent, ChatStreamRequest, ContentBlock,
        ConversationSummary, FeedbackRating, MessageFeedback, StreamErrorData, ToolAction,
        ToolActionStatus, ToolEventData,
    },
    ApiError, PlannerError, Result,
};

use crate::api::chat as api;
use crate::cancel::CancelToken;
use crate::client::ApiClient;
use crate::humanize::{user_friendly_message, ErrorContext};

/// Assistant reply being assembled from stream events
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamingReply {
    pub message_id: Option<String>,
    pub text: String,
    pub blocks: Vec<ContentBlock>,
    pub status: Option<String>,
}

impl StreamingReply {
    fn into_message(self) -> Option<ChatMessage> {
        if self.text.is_empty() && self.blocks.is_empty() {
            return None;
        }
        let id = self
            .message_id
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let mut message = ChatMessage::assistant(id, self.text);
        message.blocks = self.blocks;
        Some(message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChatState {
    pub conversations: Vec<ConversationSummary>,
    pub active_conversation: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub reply: Option<StreamingReply>,
    pub tool_actions: Vec<ToolAction>,
    pub memory: ChatMemory,
    pub summary: Option<String>,
    pub error: Option<String>,
    cancel: Option<CancelToken>,
}

impl ChatState {
    pub fn is_streaming(&self) -> bool {
        self.cancel.is_some()
    }

    /// Fold one stream event into the state. Returns `true` for terminal events.
    pub fn apply(&mut self, item: ChatStreamEvent) -> bool {
        let terminal = item.is_terminal();
        let message_id = item.message_id;
        match item.event {
            ChatEvent::Status(data) => {
                let reply = self.reply_mut(message_id);
                reply.status = Some(data.message.unwrap_or(data.status));
            }
            ChatEvent::MessageDelta(data) => {
                self.reply_mut(message_id).text.push_str(&data.delta);
            }
            ChatEvent::BlocksAppend(data) => {
                self.reply_mut(message_id).blocks.extend(data.blocks);
            }
            ChatEvent::MessageComplete(data) => {
                let partial = self.reply.take();
                let message = data
                    .message
                    .or_else(|| partial.and_then(StreamingReply::into_message));
                if let Some(message) = message {
                    self.messages.push(message);
                }
                if data.conversation_id.is_some() {
                    self.active_conversation = data.conversation_id;
                }
            }
            ChatEvent::Error(data) => {
                self.finish_reply();
                self.error = Some(stream_error_message(&data));
            }
            ChatEvent::Done(data) => {
                self.finish_reply();
                if data.conversation_id.is_some() {
                    self.active_conversation = data.conversation_id;
                }
            }
            ChatEvent::ToolStarted(data) => self.upsert_action(data, ToolActionStatus::Running),
            ChatEvent::ToolProposed(data) => self.upsert_action(data, ToolActionStatus::Proposed),
            ChatEvent::ToolResult(data) => self.upsert_action(data, ToolActionStatus::Completed),
            ChatEvent::ToolCanceled(data) => self.upsert_action(data, ToolActionStatus::Canceled),
            ChatEvent::MemoryUpdated(data) => self.memory.content = data.content,
            ChatEvent::SummaryUpdated(data) => {
                if let Some(id) = &data.conversation_id {
                    if let Some(c) = self.conversations.iter_mut().find(|c| &c.id == id) {
                        c.summary = Some(data.summary.clone());
                    }
                }
                self.summary = Some(data.summary);
            }
        }
        terminal
    }

    /// Tool proposals still waiting for the user.
    pub fn pending_actions(&self) -> Vec<&ToolAction> {
        self.tool_actions
            .iter()
            .filter(|a| a.status == ToolActionStatus::Proposed)
            .collect()
    }

    fn reply_mut(&mut self, message_id: Option<String>) -> &mut StreamingReply {
        let reply = self.reply.get_or_insert_with(StreamingReply::default);
        if reply.message_id.is_none() {
            reply.message_id = message_id;
        }
        reply
    }

    /// Keep whatever arrived of an interrupted reply.
    fn finish_reply(&mut self) {
        if let Some(message) = self.reply.take().and_then(StreamingReply::into_message) {
            self.messages.push(message);
        }
    }

    fn upsert_action(&mut self, data: ToolEventData, status: ToolActionStatus) {
        let Some(action_id) = data.action_id else {
            log::debug!("chat: tool event without an action id");
            return;
        };
        match self.tool_actions.iter_mut().find(|a| a.action_id == action_id) {
            Some(action) => {
                action.status = status;
                if let Some(result) = data.result {
                    action.result = Some(result);
                }
                if let Some(arguments) = data.arguments {
                    action.arguments = arguments;
                }
            }
            None => self.tool_actions.push(ToolAction {
                action_id,
                tool: data.tool.unwrap_or_default(),
                arguments: data.arguments.unwrap_or_default(),
                status,
                result: data.result,
            }),
        }
    }

    fn set_action_status(&mut self, action_id: &str, status: ToolActionStatus) {
        if let Some(action) = self.tool_actions.iter_mut().find(|a| a.action_id == action_id) {
            action.status = status;
        }
    }
}

fn stream_error_message(data: &StreamErrorData) -> String {
    let error = ApiError {
        message: data.message.clone(),
        status: None,
        error_type: data.error_type.clone(),
        correlation_id: data.correlation_id.clone(),
        body: None,
    };
    user_friendly_message(&error, Some(&ErrorContext::action("chat")))
}

#[derive(Clone)]
pub struct ChatStore {
    state: Rc<RefCell<ChatState>>,
    client: ApiClient,
}

impl ChatStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            state: Rc::new(RefCell::new(ChatState::default())),
            client,
        }
    }

    pub fn snapshot(&self) -> ChatState {
        self.state.borrow().clone()
    }

    pub fn is_streaming(&self) -> bool {
        self.state.borrow().is_streaming()
    }

    pub fn clear_error(&self) {
        self.state.borrow_mut().error = None;
    }

    pub async fn load_conversations(&self) -> Result<()> {
        let conversations = api::list_conversations(&self.client).await?;
        self.state.borrow_mut().conversations = conversations;
        Ok(())
    }

    pub async fn open_conversation(&self, conversation_id: &str) -> Result<()> {
        let messages = api::conversation_messages(&self.client, conversation_id).await?;
        let mut state = self.state.borrow_mut();
        state.active_conversation = Some(conversation_id.to_string());
        state.messages = messages;
        state.reply = None;
        state.tool_actions.clear();
        state.summary = state
            .conversations
            .iter()
            .find(|c| c.id == conversation_id)
            .and_then(|c| c.summary.clone());
        Ok(())
    }

    pub fn new_conversation(&self) {
        let mut state = self.state.borrow_mut();
        state.active_conversation = None;
        state.messages.clear();
        state.reply = None;
        state.tool_actions.clear();
        state.summary = None;
        state.error = None;
    }

    /// Send a message and consume the reply stream until it ends.
    pub async fn send_message(&self, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }
        if self.is_streaming() {
            return Err(PlannerError::Other("a reply is already in progress".into()));
        }

        let request = ChatStreamRequest::new(text);
        let active = self.state.borrow().active_conversation.clone();
        let mut stream = match active {
            Some(id) => api::stream_conversation(&self.client, &id, &request)?,
            None => api::stream_new(&self.client, &request)?,
        };
        let cancel = stream.cancel_token();
        {
            let mut state = self.state.borrow_mut();
            let id = uuid::Uuid::new_v4().to_string();
            state.messages.push(ChatMessage::user(id, text));
            state.reply = Some(StreamingReply::default());
            state.error = None;
            state.cancel = Some(cancel.clone());
        }

        let mut outcome = Ok(());
        let mut done = false;
        while let Some(item) = stream.next().await {
            match item {
                Ok(event) => {
                    let is_done = matches!(event.event, ChatEvent::Done(_));
                    self.state.borrow_mut().apply(event);
                    done |= is_done;
                }
                Err(e) => {
                    let context = ErrorContext::action("chat");
                    self.state.borrow_mut().error = Some(user_friendly_message(&e, Some(&context)));
                    outcome = Err(e);
                    break;
                }
            }
        }

        {
            let mut state = self.state.borrow_mut();
            state.finish_reply();
            state.cancel = None;
        }
        if cancel.is_cancelled() {
            log::info!("chat: reply cancelled");
        }
        if done {
            if let Err(e) = self.load_conversations().await {
                log::warn!("chat: failed to refresh conversations: {}", e);
            }
        }
        outcome
    }

    /// Stop the in-flight reply, keeping what has arrived so far.
    pub fn cancel(&self) {
        let token = self.state.borrow().cancel.clone();
        if let Some(token) = token {
            token.cancel();
        }
    }

    pub async fn accept_action(&self, action_id: &str) -> Result<()> {
        self.state
            .borrow_mut()
            .set_action_status(action_id, ToolActionStatus::Running);
        match api::accept_action(&self.client, action_id).await {
            Ok(result) => {
                let mut state = self.state.borrow_mut();
                if let Some(action) = state.tool_actions.iter_mut().find(|a| a.action_id == action_id) {
                    action.status = ToolActionStatus::Completed;
                    action.result = Some(result);
                }
                Ok(())
            }
            Err(e) => {
                self.state
                    .borrow_mut()
                    .set_action_status(action_id, ToolActionStatus::Failed);
                Err(e)
            }
        }
    }

    pub async fn cancel_action(&self, action_id: &str) -> Result<()> {
        api::cancel_action(&self.client, action_id).await?;
        self.state
            .borrow_mut()
            .set_action_status(action_id, ToolActionStatus::Canceled);
        Ok(())
    }

    pub async fn feedback(&self, message_id: &str, rating: FeedbackRating) -> Result<()> {
        let feedback = MessageFeedback {
            rating,
            comment: None,
        };
        api::message_feedback(&self.client, message_id, &feedback).await?;
        let mut state = self.state.borrow_mut();
        if let Some(message) = state.messages.iter_mut().find(|m| m.id == message_id) {
            message.feedback = Some(rating);
        }
        Ok(())
    }

    pub async fn load_memory(&self) -> Result<()> {
        let memory = api::get_memory(&self.client).await?;
        self.state.borrow_mut().memory = memory;
        Ok(())
    }

    pub async fn save_memory(&self, content: &str) -> Result<()> {
        let memory = api::put_memory(&self.client, content).await?;
        self.state.borrow_mut().memory = memory;
        Ok(())
    }
}
