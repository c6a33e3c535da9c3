//! Assistant chat: conversation list, message history, the streaming reply
//! and tool proposals waiting for approval.

use egui::{self, Align, Color32, Layout, RichText, ScrollArea, Vec2};
use planner_core::stores::chat::{ChatState, StreamingReply};
use planner_types::chat::{ChatMessage, ChatRole, ContentBlock, FeedbackRating, ToolAction, ToolActionStatus};

use super::error_line;
use crate::state::UiState;
use crate::theme::*;

const SIDEBAR_WIDTH: f32 = 190.0;

#[derive(Debug, Clone, PartialEq)]
pub enum ChatAction {
    Send(String),
    /// Abort the reply being streamed
    Stop,
    NewConversation,
    OpenConversation(String),
    AcceptAction(String),
    CancelAction(String),
    Feedback { message_id: String, rating: FeedbackRating },
    SaveMemory(String),
    DismissError,
}

/// Render the chat panel. Returns an action when the user did something.
pub fn chat_panel(ui: &mut egui::Ui, state: &mut UiState, view: &ChatState) -> Option<ChatAction> {
    let mut action = None;

    ui.horizontal_top(|ui| {
        ui.vertical(|ui| {
            ui.set_width(SIDEBAR_WIDTH);
            if let Some(a) = conversation_list(ui, state, view) {
                action = Some(a);
            }
        });
        ui.separator();
        ui.vertical(|ui| {
            if let Some(a) = conversation_view(ui, state, view) {
                action = Some(a);
            }
        });
    });

    action
}

fn conversation_list(ui: &mut egui::Ui, state: &mut UiState, view: &ChatState) -> Option<ChatAction> {
    let mut action = None;

    if ui
        .add_enabled(!view.is_streaming(), primary_button("New chat", !view.is_streaming()))
        .clicked()
    {
        action = Some(ChatAction::NewConversation);
    }
    ui.add_space(4.0);

    ScrollArea::vertical()
        .id_salt("conversations")
        .max_height(ui.available_height() - 40.0)
        .show(ui, |ui| {
            for conv in &view.conversations {
                let active = view.active_conversation.as_deref() == Some(conv.id.as_str());
                let label = ui.selectable_label(
                    active,
                    RichText::new(conv.display_title()).color(TEXT_PRIMARY),
                );
                let label = match &conv.summary {
                    Some(summary) => label.on_hover_text(summary),
                    None => label,
                };
                if label.clicked() && !active && !view.is_streaming() {
                    action = Some(ChatAction::OpenConversation(conv.id.clone()));
                }
            }
        });

    ui.add_space(4.0);
    if ui.selectable_label(state.show_memory, "Household memory").clicked() {
        state.show_memory = !state.show_memory;
        if state.show_memory {
            state.memory_text = view.memory.content.clone();
        }
    }

    action
}

fn conversation_view(ui: &mut egui::Ui, state: &mut UiState, view: &ChatState) -> Option<ChatAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.heading(RichText::new("Assistant").color(TEXT_PRIMARY).strong());
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            let (text, color) = match view.reply.as_ref().and_then(|r| r.status.as_deref()) {
                Some(status) if view.is_streaming() => (status.to_string(), WARNING),
                _ if view.is_streaming() => ("Thinking...".to_string(), WARNING),
                _ => ("Ready".to_string(), SUCCESS),
            };
            ui.label(RichText::new(text).color(color).small());
        });
    });
    if let Some(summary) = &view.summary {
        ui.label(RichText::new(summary).color(TEXT_SECONDARY).small().italics());
    }
    ui.separator();

    if state.show_memory {
        if let Some(a) = memory_editor(ui, state) {
            action = Some(a);
        }
        ui.separator();
    }

    if let Some(err) = &view.error {
        ui.horizontal(|ui| {
            error_line(ui, err);
            if ui.small_button("✕").clicked() {
                action = Some(ChatAction::DismissError);
            }
        });
    }

    let available_height = ui.available_height() - 50.0;
    ScrollArea::vertical()
        .id_salt("chat_messages")
        .max_height(available_height)
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for message in &view.messages {
                if let Some(a) = render_message(ui, message) {
                    action = Some(a);
                }
                ui.add_space(4.0);
            }

            if let Some(reply) = &view.reply {
                render_reply(ui, reply, view.is_streaming());
            }

            for tool in &view.tool_actions {
                if let Some(a) = render_tool_action(ui, tool) {
                    action = Some(a);
                }
                ui.add_space(4.0);
            }
        });

    ui.add_space(8.0);

    ui.horizontal(|ui| {
        let input = egui::TextEdit::singleline(&mut state.chat_input)
            .hint_text("Ask about recipes, plans or groceries...")
            .desired_width(ui.available_width() - 70.0)
            .font(egui::FontId::proportional(14.0));
        let response = ui.add(input);

        if view.is_streaming() {
            let stop = egui::Button::new(RichText::new("Stop").color(Color32::WHITE))
                .fill(ERROR)
                .corner_radius(PANEL_ROUNDING)
                .min_size(Vec2::new(60.0, 0.0));
            if ui.add(stop).clicked() {
                action = Some(ChatAction::Stop);
            }
            return;
        }

        let send_enabled = !state.chat_input.trim().is_empty();
        let send_btn = ui.add_enabled(
            send_enabled,
            egui::Button::new(RichText::new("Send").color(Color32::WHITE))
                .fill(if send_enabled { ACCENT } else { BG_SURFACE })
                .corner_radius(PANEL_ROUNDING)
                .min_size(Vec2::new(60.0, 0.0)),
        );

        // Submit on Enter or button click
        if (response.lost_focus()
            && ui.input(|i| i.key_pressed(egui::Key::Enter))
            && send_enabled)
            || send_btn.clicked()
        {
            action = Some(ChatAction::Send(state.chat_input.trim().to_string()));
            state.chat_input.clear();
            response.request_focus();
        }
    });

    action
}

fn memory_editor(ui: &mut egui::Ui, state: &mut UiState) -> Option<ChatAction> {
    let mut action = None;
    ui.label(
        RichText::new("Things the assistant remembers about your household")
            .color(TEXT_SECONDARY)
            .small(),
    );
    ui.add(
        egui::TextEdit::multiline(&mut state.memory_text)
            .desired_rows(4)
            .desired_width(f32::INFINITY),
    );
    ui.horizontal(|ui| {
        if ui.add(primary_button("Save memory", true)).clicked() {
            action = Some(ChatAction::SaveMemory(state.memory_text.clone()));
        }
        if ui.button("Close").clicked() {
            state.show_memory = false;
        }
    });
    action
}

fn render_message(ui: &mut egui::Ui, message: &ChatMessage) -> Option<ChatAction> {
    let mut action = None;
    let (label, label_color, bg) = match message.role {
        ChatRole::User => ("You", ACCENT, BG_SECONDARY),
        ChatRole::Assistant => ("Assistant", SUCCESS, BG_SURFACE),
        ChatRole::Tool => ("[tool]", WARNING, BG_SURFACE),
        ChatRole::System => ("System", TEXT_SECONDARY, BG_SECONDARY),
    };

    egui::Frame::default()
        .fill(bg)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(RichText::new(label).color(label_color).strong().small());
            if !message.content.is_empty() {
                ui.label(RichText::new(&message.content).color(TEXT_PRIMARY));
            }
            for block in &message.blocks {
                render_block(ui, block);
            }
            if message.role == ChatRole::Assistant {
                ui.horizontal(|ui| {
                    for (rating, glyph) in [(FeedbackRating::Up, "👍"), (FeedbackRating::Down, "👎")] {
                        let chosen = message.feedback == Some(rating);
                        if ui.selectable_label(chosen, glyph).clicked() && !chosen {
                            action = Some(ChatAction::Feedback {
                                message_id: message.id.clone(),
                                rating,
                            });
                        }
                    }
                });
            }
        });

    action
}

fn render_reply(ui: &mut egui::Ui, reply: &StreamingReply, streaming: bool) {
    egui::Frame::default()
        .fill(BG_SURFACE)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(RichText::new("Assistant").color(SUCCESS).strong().small());
            if !reply.text.is_empty() {
                ui.label(RichText::new(&reply.text).color(TEXT_PRIMARY));
            }
            for block in &reply.blocks {
                render_block(ui, block);
            }
            if streaming {
                ui.label(RichText::new("▌").color(ACCENT).strong());
            }
        });
}

fn render_block(ui: &mut egui::Ui, block: &ContentBlock) {
    egui::Frame::default()
        .fill(BG_PRIMARY)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(6.0)
        .show(ui, |ui| {
            if let Some(title) = block.title() {
                ui.label(RichText::new(title).color(ACCENT).strong());
            }
            match block.text() {
                Some(text) => {
                    ui.label(RichText::new(text).color(TEXT_PRIMARY));
                }
                None if block.title().is_none() => {
                    ui.label(RichText::new(format!("[{}]", block.kind)).color(TEXT_SECONDARY).small());
                }
                None => {}
            }
        });
}

fn render_tool_action(ui: &mut egui::Ui, tool: &ToolAction) -> Option<ChatAction> {
    let mut action = None;
    let (status, color) = match tool.status {
        ToolActionStatus::Proposed => ("waiting for approval", WARNING),
        ToolActionStatus::Running => ("running", WARNING),
        ToolActionStatus::Completed => ("done", SUCCESS),
        ToolActionStatus::Canceled => ("canceled", TEXT_SECONDARY),
        ToolActionStatus::Failed => ("failed", ERROR),
    };

    egui::Frame::default()
        .fill(BG_SECONDARY)
        .stroke(egui::Stroke::new(1.0, color))
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(RichText::new(&tool.tool).color(TEXT_PRIMARY).strong().monospace());
                ui.label(RichText::new(status).color(color).small());
            });
            if !tool.arguments.is_null() {
                ui.label(
                    RichText::new(tool.arguments.to_string())
                        .color(TEXT_SECONDARY)
                        .small()
                        .monospace(),
                );
            }
            if tool.status == ToolActionStatus::Proposed {
                ui.horizontal(|ui| {
                    if ui.add(primary_button("Accept", true)).clicked() {
                        action = Some(ChatAction::AcceptAction(tool.action_id.clone()));
                    }
                    if ui.button("Cancel").clicked() {
                        action = Some(ChatAction::CancelAction(tool.action_id.clone()));
                    }
                });
            }
        });

    action
}
