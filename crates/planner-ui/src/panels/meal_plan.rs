//! Weekly meal planner: one column per day, meals grouped by type.

use egui::{self, Align, Layout, RichText, ScrollArea};
use planner_core::stores::meal_plan::MealPlanState;
use planner_types::{
    meal_plan::{Meal, MealCreate, MealType},
    recipe::Recipe,
};

use super::{error_line, field_label};
use crate::state::{MealForm, UiState};
use crate::theme::*;

#[derive(Debug, Clone, PartialEq)]
pub enum MealPlanAction {
    PreviousWeek,
    NextWeek,
    ThisWeek,
    AddMeal(MealCreate),
    DeleteMeal(String),
    MarkCooked(String),
    SaveWeek,
    GenerateGroceryList,
}

pub fn meal_plan_panel(
    ui: &mut egui::Ui,
    state: &mut UiState,
    view: &MealPlanState,
    recipes: &[Recipe],
) -> Option<MealPlanAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        if ui.button("◀").clicked() {
            action = Some(MealPlanAction::PreviousWeek);
        }
        ui.heading(
            RichText::new(week_title(view))
                .color(TEXT_PRIMARY)
                .strong(),
        );
        if ui.button("▶").clicked() {
            action = Some(MealPlanAction::NextWeek);
        }
        if ui.button("This week").clicked() {
            action = Some(MealPlanAction::ThisWeek);
        }
        if view.loading {
            ui.spinner();
        }
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            let has_meals = !view.plan.meals.is_empty();
            if ui
                .add_enabled(has_meals, primary_button("Make grocery list", has_meals))
                .clicked()
            {
                action = Some(MealPlanAction::GenerateGroceryList);
            }
            if ui.add_enabled(has_meals, egui::Button::new("Save week")).clicked() {
                action = Some(MealPlanAction::SaveWeek);
            }
        });
    });
    ui.separator();

    if let Some(err) = &view.error {
        error_line(ui, err);
    }

    ScrollArea::horizontal()
        .id_salt("meal_week")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.horizontal_top(|ui| {
                for day in view.plan.days() {
                    ui.vertical(|ui| {
                        ui.set_width(DAY_COLUMN_WIDTH);
                        egui::Frame::default()
                            .fill(BG_SECONDARY)
                            .corner_radius(PANEL_ROUNDING)
                            .inner_margin(6.0)
                            .show(ui, |ui| {
                                ui.set_min_width(DAY_COLUMN_WIDTH - 12.0);
                                ui.label(
                                    RichText::new(day.format("%a %b %-d").to_string())
                                        .color(ACCENT)
                                        .strong(),
                                );
                                let meals = view.plan.meals_on(day);
                                for meal_type in MealType::all() {
                                    for meal in meals.iter().filter(|m| m.meal_type == *meal_type) {
                                        if let Some(a) = meal_card(ui, meal) {
                                            action = Some(a);
                                        }
                                    }
                                }
                                if ui.small_button("+ Add").clicked() {
                                    state.meal_form = Some(MealForm::open_for(day));
                                }
                            });
                    });
                }
            });
        });

    let ctx = ui.ctx().clone();
    if let Some(a) = meal_form_window(&ctx, state, recipes) {
        action = Some(a);
    }

    action
}

/// "Week of Mar 3 – Mar 9"
pub fn week_title(view: &MealPlanState) -> String {
    format!(
        "Week of {} – {}",
        view.plan.week_start.format("%b %-d"),
        view.plan.week_end().format("%b %-d")
    )
}

fn meal_card(ui: &mut egui::Ui, meal: &Meal) -> Option<MealPlanAction> {
    let mut action = None;
    egui::Frame::default()
        .fill(BG_PRIMARY)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(4.0)
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(RichText::new(meal.meal_type.label()).color(TEXT_SECONDARY).small());
            let title = RichText::new(meal.title());
            let title = if meal.cooked {
                title.color(COOKED).strikethrough()
            } else {
                title.color(TEXT_PRIMARY)
            };
            ui.label(title);
            if let Some(s) = meal.servings {
                ui.label(RichText::new(format!("serves {}", s)).color(TEXT_SECONDARY).small());
            }
            ui.horizontal(|ui| {
                if !meal.cooked && ui.small_button("Cooked").clicked() {
                    action = Some(MealPlanAction::MarkCooked(meal.id.clone()));
                }
                if ui.small_button("Remove").clicked() {
                    action = Some(MealPlanAction::DeleteMeal(meal.id.clone()));
                }
            });
        });
    action
}

fn meal_form_window(
    ctx: &egui::Context,
    state: &mut UiState,
    recipes: &[Recipe],
) -> Option<MealPlanAction> {
    let mut action = None;
    let mut close = false;
    let form = state.meal_form.as_mut()?;
    let heading = match form.date {
        Some(d) => format!("Add meal for {}", d.format("%A %b %-d")),
        None => "Add meal".to_string(),
    };

    egui::Window::new(heading)
        .id(egui::Id::new("meal_form"))
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            field_label(ui, "Meal");
            egui::ComboBox::from_id_salt("meal_type")
                .selected_text(form.meal_type.label())
                .show_ui(ui, |ui| {
                    for t in MealType::all() {
                        ui.selectable_value(&mut form.meal_type, *t, t.label());
                    }
                });

            field_label(ui, "Recipe");
            let selected = form
                .recipe_id
                .as_deref()
                .and_then(|id| recipes.iter().find(|r| r.id == id))
                .map(|r| r.title.clone())
                .unwrap_or_else(|| "None".to_string());
            egui::ComboBox::from_id_salt("meal_recipe")
                .selected_text(selected)
                .width(220.0)
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut form.recipe_id, None, "None");
                    for r in recipes {
                        ui.selectable_value(&mut form.recipe_id, Some(r.id.clone()), r.title.as_str());
                    }
                });

            field_label(ui, "Servings");
            ui.add(egui::TextEdit::singleline(&mut form.servings).desired_width(50.0));
            field_label(ui, "Notes");
            ui.text_edit_singleline(&mut form.notes);

            if let Some(err) = &form.error {
                error_line(ui, err);
            }

            ui.horizontal(|ui| {
                if ui.add(primary_button("Add", true)).clicked() {
                    match form.to_create() {
                        Ok(meal) => {
                            action = Some(MealPlanAction::AddMeal(meal));
                            close = true;
                        }
                        Err(e) => form.error = Some(e),
                    }
                }
                if ui.button("Cancel").clicked() {
                    close = true;
                }
            });
        });

    if close {
        state.meal_form = None;
    }
    action
}
