//! Login, registration and account-recovery forms.

use egui::{self, RichText};
use planner_types::auth::{LoginCredentials, RegisterRequest};

use super::{error_line, field_label};
use crate::state::{Page, UiState};
use crate::theme::*;

/// What the caller should do after rendering an auth form
#[derive(Debug, Clone)]
pub enum AuthAction {
    Login(LoginCredentials),
    Register(RegisterRequest),
    ForgotPassword { email: String },
    ResetPassword { token: String, new_password: String },
    VerifyEmail { token: String },
    ResendVerification { email: String },
}

/// Render the form for `page`. Navigation between the forms is handled here.
pub fn auth_panel(ui: &mut egui::Ui, state: &mut UiState, page: Page) -> Option<AuthAction> {
    let mut action = None;
    let busy = state.is_busy();

    ui.vertical_centered(|ui| {
        ui.add_space(40.0);
        egui::Frame::default()
            .fill(BG_SECONDARY)
            .inner_margin(PANEL_PADDING)
            .corner_radius(PANEL_ROUNDING)
            .show(ui, |ui| {
                ui.set_max_width(360.0);
                ui.heading(RichText::new(page.label()).color(TEXT_PRIMARY));
                ui.separator();

                action = match page {
                    Page::Register => register_form(ui, state, busy),
                    Page::ForgotPassword => forgot_form(ui, state, busy),
                    Page::ResetPassword => reset_form(ui, state, busy),
                    Page::VerifyEmail => verify_form(ui, state, busy),
                    _ => login_form(ui, state, busy),
                };

                if let Some(err) = &state.auth.error {
                    ui.add_space(4.0);
                    error_line(ui, err);
                }

                ui.add_space(8.0);
                ui.horizontal_wrapped(|ui| {
                    let links: &[Page] = match page {
                        Page::Register => &[Page::Login],
                        Page::ForgotPassword | Page::ResetPassword => &[Page::Login],
                        Page::VerifyEmail => &[Page::Login, Page::Register],
                        _ => &[Page::Register, Page::ForgotPassword, Page::VerifyEmail],
                    };
                    for target in links {
                        if ui.link(target.label()).clicked() {
                            state.navigate(*target);
                        }
                    }
                });
            });
    });

    action
}

fn email_field(ui: &mut egui::Ui, email: &mut String) -> egui::Response {
    field_label(ui, "Email");
    ui.add(
        egui::TextEdit::singleline(email)
            .hint_text("you@example.com")
            .desired_width(f32::INFINITY),
    )
}

fn password_field(ui: &mut egui::Ui, label: &str, value: &mut String) -> egui::Response {
    field_label(ui, label);
    ui.add(
        egui::TextEdit::singleline(value)
            .password(true)
            .desired_width(f32::INFINITY),
    )
}

fn submitted(ui: &egui::Ui, last_field: &egui::Response) -> bool {
    last_field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter))
}

fn login_form(ui: &mut egui::Ui, state: &mut UiState, busy: bool) -> Option<AuthAction> {
    email_field(ui, &mut state.auth.email);
    let pw = password_field(ui, "Password", &mut state.auth.password);
    ui.add_space(6.0);
    let clicked = ui.add_enabled(!busy, primary_button("Log in", !busy)).clicked();
    if !(clicked || (!busy && submitted(ui, &pw))) {
        return None;
    }
    match state.auth.credentials() {
        Ok(creds) => {
            state.auth.error = None;
            Some(AuthAction::Login(creds))
        }
        Err(e) => {
            state.auth.error = Some(e);
            None
        }
    }
}

fn register_form(ui: &mut egui::Ui, state: &mut UiState, busy: bool) -> Option<AuthAction> {
    field_label(ui, "Name (optional)");
    ui.add(egui::TextEdit::singleline(&mut state.auth.full_name).desired_width(f32::INFINITY));
    email_field(ui, &mut state.auth.email);
    password_field(ui, "Password", &mut state.auth.password);
    let confirm = password_field(ui, "Confirm password", &mut state.auth.confirm_password);
    ui.add_space(6.0);
    let clicked = ui
        .add_enabled(!busy, primary_button("Create account", !busy))
        .clicked();
    if !(clicked || (!busy && submitted(ui, &confirm))) {
        return None;
    }
    match state.auth.registration() {
        Ok(request) => {
            state.auth.error = None;
            Some(AuthAction::Register(request))
        }
        Err(e) => {
            state.auth.error = Some(e);
            None
        }
    }
}

fn forgot_form(ui: &mut egui::Ui, state: &mut UiState, busy: bool) -> Option<AuthAction> {
    ui.label(
        RichText::new("We'll email you a link to choose a new password.")
            .color(TEXT_SECONDARY),
    );
    let email = email_field(ui, &mut state.auth.email);
    ui.add_space(6.0);
    let clicked = ui
        .add_enabled(!busy, primary_button("Send reset link", !busy))
        .clicked();
    if !(clicked || (!busy && submitted(ui, &email))) {
        return None;
    }
    if !state.auth.email.contains('@') {
        state.auth.error = Some("Please enter a valid email address.".to_string());
        return None;
    }
    state.auth.error = None;
    Some(AuthAction::ForgotPassword {
        email: state.auth.email.trim().to_string(),
    })
}

fn reset_form(ui: &mut egui::Ui, state: &mut UiState, busy: bool) -> Option<AuthAction> {
    field_label(ui, "Reset token");
    ui.add(egui::TextEdit::singleline(&mut state.auth.token).desired_width(f32::INFINITY));
    password_field(ui, "New password", &mut state.auth.password);
    let confirm = password_field(ui, "Confirm password", &mut state.auth.confirm_password);
    ui.add_space(6.0);
    let clicked = ui
        .add_enabled(!busy, primary_button("Set password", !busy))
        .clicked();
    if !(clicked || (!busy && submitted(ui, &confirm))) {
        return None;
    }
    match state.auth.new_password() {
        Ok(new_password) => {
            state.auth.error = None;
            Some(AuthAction::ResetPassword {
                token: state.auth.token.trim().to_string(),
                new_password,
            })
        }
        Err(e) => {
            state.auth.error = Some(e);
            None
        }
    }
}

fn verify_form(ui: &mut egui::Ui, state: &mut UiState, busy: bool) -> Option<AuthAction> {
    field_label(ui, "Verification token");
    ui.add(egui::TextEdit::singleline(&mut state.auth.token).desired_width(f32::INFINITY));
    ui.add_space(6.0);
    if ui.add_enabled(!busy, primary_button("Verify", !busy)).clicked() {
        let token = state.auth.token.trim().to_string();
        if token.is_empty() {
            state.auth.error = Some("Paste the token from your verification email.".to_string());
            return None;
        }
        state.auth.error = None;
        return Some(AuthAction::VerifyEmail { token });
    }

    ui.add_space(8.0);
    ui.separator();
    ui.label(RichText::new("Didn't get the email?").color(TEXT_SECONDARY));
    email_field(ui, &mut state.auth.email);
    if ui.add_enabled(!busy, egui::Button::new("Resend")).clicked() {
        if !state.auth.email.contains('@') {
            state.auth.error = Some("Please enter a valid email address.".to_string());
            return None;
        }
        state.auth.error = None;
        return Some(AuthAction::ResendVerification {
            email: state.auth.email.trim().to_string(),
        });
    }
    None
}
