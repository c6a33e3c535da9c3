//! Account details, household preferences and sign-out.

use egui::{self, RichText};
use planner_types::user::{UserPreferences, UserSummary, UserUpdate};

use super::{error_line, field_label};
use crate::state::UiState;
use crate::theme::*;

#[derive(Debug, Clone)]
pub enum ProfileAction {
    SaveProfile(UserUpdate),
    SavePreferences(UserPreferences),
    ResendVerification(String),
    Logout,
}

const WEEKDAYS: [&str; 7] = [
    "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
];

pub fn profile_panel(
    ui: &mut egui::Ui,
    state: &mut UiState,
    user: Option<&UserSummary>,
) -> Option<ProfileAction> {
    let mut action = None;

    ui.heading(RichText::new("Profile").color(TEXT_PRIMARY).strong());
    ui.separator();

    egui::Frame::default()
        .fill(BG_SECONDARY)
        .inner_margin(PANEL_PADDING)
        .corner_radius(PANEL_ROUNDING)
        .show(ui, |ui| {
            ui.set_max_width(420.0);
            ui.label(RichText::new("Account").color(ACCENT).strong());
            if let Some(user) = user {
                ui.label(RichText::new(&user.email).color(TEXT_PRIMARY));
                if !user.is_verified {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new("Email not verified").color(WARNING).small());
                        if ui.small_button("Resend link").clicked() {
                            action = Some(ProfileAction::ResendVerification(user.email.clone()));
                        }
                    });
                }
            }
            field_label(ui, "Name");
            ui.text_edit_singleline(&mut state.profile.full_name);
            if ui.button("Save name").clicked() {
                action = Some(ProfileAction::SaveProfile(state.profile.user_update()));
            }

            ui.add_space(8.0);
            ui.label(RichText::new("Household").color(ACCENT).strong());
            if !state.profile.loaded {
                ui.spinner();
            }
            let form = &mut state.profile;
            field_label(ui, "Dietary restrictions (comma separated)");
            ui.text_edit_singleline(&mut form.dietary_restrictions);
            field_label(ui, "Disliked ingredients (comma separated)");
            ui.text_edit_singleline(&mut form.disliked_ingredients);
            field_label(ui, "Household size");
            ui.add(egui::TextEdit::singleline(&mut form.household_size).desired_width(50.0));
            field_label(ui, "Week starts on");
            egui::ComboBox::from_id_salt("week_start_day")
                .selected_text(capitalized(&form.week_start_day))
                .show_ui(ui, |ui| {
                    for day in WEEKDAYS {
                        ui.selectable_value(&mut form.week_start_day, day.to_string(), capitalized(day));
                    }
                });

            let prefs = form.preferences();
            if let Err(e) = &prefs {
                error_line(ui, e);
            }
            ui.add_space(4.0);
            if ui
                .add_enabled(prefs.is_ok(), primary_button("Save preferences", prefs.is_ok()))
                .clicked()
            {
                if let Ok(prefs) = prefs {
                    action = Some(ProfileAction::SavePreferences(prefs));
                }
            }
        });

    ui.add_space(12.0);
    if ui.button(RichText::new("Log out").color(ERROR)).clicked() {
        action = Some(ProfileAction::Logout);
    }

    action
}

fn capitalized(day: &str) -> String {
    let mut chars = day.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "Default".to_string(),
    }
}
