pub mod auth;
pub mod chat;
pub mod grocery;
pub mod meal_plan;
pub mod profile;
pub mod recipes;

use egui::RichText;
use crate::theme::*;

/// Red inline message under a form or list
pub(crate) fn error_line(ui: &mut egui::Ui, message: &str) {
    egui::Frame::default()
        .fill(ERROR_BG)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(6.0)
        .show(ui, |ui| {
            ui.label(RichText::new(message).color(ERROR));
        });
}

pub(crate) fn field_label(ui: &mut egui::Ui, text: &str) {
    ui.label(RichText::new(text).color(TEXT_SECONDARY).small());
}
