//! UI theme constants

use egui::{Color32, CornerRadius, Stroke, Vec2};

pub const BG_PRIMARY: Color32 = Color32::from_rgb(250, 248, 244);
pub const BG_SECONDARY: Color32 = Color32::from_rgb(241, 237, 229);
pub const BG_SURFACE: Color32 = Color32::from_rgb(228, 222, 210);
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(40, 38, 34);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(112, 106, 96);
pub const ACCENT: Color32 = Color32::from_rgb(46, 125, 80);
pub const SUCCESS: Color32 = Color32::from_rgb(34, 140, 74);
pub const ERROR: Color32 = Color32::from_rgb(200, 50, 50);
pub const WARNING: Color32 = Color32::from_rgb(196, 130, 20);
pub const ERROR_BG: Color32 = Color32::from_rgb(252, 228, 226);
pub const COOKED: Color32 = Color32::from_rgb(150, 146, 138);

pub const PANEL_ROUNDING: CornerRadius = CornerRadius::same(6);
pub const PANEL_PADDING: Vec2 = Vec2::new(12.0, 8.0);

/// Width of one day column in the weekly planner
pub const DAY_COLUMN_WIDTH: f32 = 150.0;

/// Apply the light kitchen theme to an egui context
pub fn apply_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    style.visuals = egui::Visuals::light();
    style.visuals.panel_fill = BG_PRIMARY;
    style.visuals.window_fill = BG_SECONDARY;
    style.visuals.extreme_bg_color = Color32::WHITE;

    style.visuals.widgets.inactive.bg_fill = BG_SURFACE;
    style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, TEXT_SECONDARY);
    style.visuals.widgets.hovered.bg_fill = BG_SURFACE;
    style.visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);
    style.visuals.widgets.active.bg_fill = ACCENT;
    style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, Color32::WHITE);

    style.visuals.selection.bg_fill = ACCENT.linear_multiply(0.3);
    style.visuals.selection.stroke = Stroke::new(1.0, ACCENT);

    style.spacing.item_spacing = Vec2::new(8.0, 6.0);

    ctx.set_style(style);
}

/// Filled accent button used for the primary action of a form
pub fn primary_button(text: &str, enabled: bool) -> egui::Button<'static> {
    egui::Button::new(egui::RichText::new(text.to_string()).color(Color32::WHITE))
        .fill(if enabled { ACCENT } else { BG_SURFACE })
        .corner_radius(PANEL_ROUNDING)
        .min_size(Vec2::new(80.0, 0.0))
}
