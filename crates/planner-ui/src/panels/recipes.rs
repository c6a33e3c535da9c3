//! Recipe list with filters, detail view, editor window and the duplicate
//! prompt shown when the backend answers a create with 409.

use egui::{self, Align, Layout, RichText, ScrollArea};
use planner_core::stores::recipes::{PendingDuplicate, RecipeFilters, RecipeState, SortKey};
use planner_types::recipe::{Difficulty, Recipe, RecipeCreate, RecipeUpdate};

use super::{error_line, field_label};
use crate::state::{format_ingredient, FilterForm, RecipeEditor, UiState};
use crate::theme::*;

#[derive(Debug, Clone, PartialEq)]
pub enum RecipeAction {
    Refresh,
    SetFilters(RecipeFilters),
    SetSort(SortKey),
    Create(RecipeCreate),
    Update { id: String, changes: RecipeUpdate },
    Delete(String),
    /// Open the recipe the duplicate check pointed at
    ViewExisting(String),
    /// Re-send the held payload with `force=true`
    CreateAnyway,
    DismissDuplicate,
}

pub fn recipes_panel(
    ui: &mut egui::Ui,
    state: &mut UiState,
    view: &RecipeState,
) -> Option<RecipeAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.heading(RichText::new("Recipes").color(TEXT_PRIMARY).strong());
        if view.loading {
            ui.spinner();
        }
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            if ui.add(primary_button("New recipe", true)).clicked() {
                state.editor = Some(RecipeEditor::default());
            }
            if ui.button("Refresh").clicked() {
                action = Some(RecipeAction::Refresh);
            }
            egui::ComboBox::from_id_salt("recipe_sort")
                .selected_text(format!("Sort: {}", view.sort.label()))
                .show_ui(ui, |ui| {
                    for key in SortKey::all() {
                        if ui.selectable_label(view.sort == *key, key.label()).clicked() {
                            action = Some(RecipeAction::SetSort(*key));
                        }
                    }
                });
        });
    });
    ui.separator();

    if let Some(err) = &view.error {
        error_line(ui, err);
    }

    ui.columns(2, |cols| {
        if let Some(filters) = filter_sidebar(&mut cols[0], state, view) {
            action = Some(RecipeAction::SetFilters(filters));
        }
        if let Some(a) = recipe_list(&mut cols[1], state, view) {
            action = Some(a);
        }
    });

    let ctx = ui.ctx().clone();
    if let Some(a) = editor_window(&ctx, state) {
        action = Some(a);
    }
    if let Some(pending) = &view.duplicate {
        if let Some(a) = duplicate_window(&ctx, pending) {
            action = Some(a);
        }
    }

    action
}

/// Returns the new filter set when anything changed this frame.
fn filter_sidebar(
    ui: &mut egui::Ui,
    state: &mut UiState,
    view: &RecipeState,
) -> Option<RecipeFilters> {
    let mut filters = view.filters.clone();
    let mut changed = false;

    egui::Frame::default()
        .fill(BG_SECONDARY)
        .inner_margin(PANEL_PADDING)
        .corner_radius(PANEL_ROUNDING)
        .show(ui, |ui| {
            field_label(ui, "Search");
            let form = &mut state.filters;
            changed |= ui
                .add(egui::TextEdit::singleline(&mut form.query).hint_text("Title or ingredient"))
                .changed();

            ui.add_space(4.0);
            field_label(ui, "Difficulty");
            ui.horizontal(|ui| {
                for d in Difficulty::all() {
                    let mut on = filters.difficulties.contains(d);
                    if ui.checkbox(&mut on, d.label()).changed() {
                        if on {
                            filters.difficulties.insert(*d);
                        } else {
                            filters.difficulties.remove(d);
                        }
                        changed = true;
                    }
                }
            });

            let categories = known_categories(&view.recipes);
            if !categories.is_empty() {
                ui.add_space(4.0);
                field_label(ui, "Category");
                ui.horizontal_wrapped(|ui| {
                    for c in categories {
                        let mut on = filters.categories.contains(&c);
                        if ui.checkbox(&mut on, c.as_str()).changed() {
                            if on {
                                filters.categories.insert(c);
                            } else {
                                filters.categories.remove(&c);
                            }
                            changed = true;
                        }
                    }
                });
            }

            ui.add_space(4.0);
            field_label(ui, "Total time (minutes)");
            ui.horizontal(|ui| {
                changed |= ui
                    .add(egui::TextEdit::singleline(&mut form.min_time).hint_text("min").desired_width(50.0))
                    .changed();
                ui.label("to");
                changed |= ui
                    .add(egui::TextEdit::singleline(&mut form.max_time).hint_text("max").desired_width(50.0))
                    .changed();
            });

            ui.add_space(4.0);
            field_label(ui, "Must include");
            changed |= ui
                .add(egui::TextEdit::singleline(&mut form.include).hint_text("eggs, milk"))
                .changed();
            field_label(ui, "Leave out");
            changed |= ui
                .add(egui::TextEdit::singleline(&mut form.exclude).hint_text("nuts"))
                .changed();

            if !view.filters.is_empty() && ui.button("Clear filters").clicked() {
                *form = FilterForm::default();
                filters = RecipeFilters::default();
                changed = true;
            }

            filters.query = form.query.clone();
            filters.min_total_time = FilterForm::parse_time(&form.min_time);
            filters.max_total_time = FilterForm::parse_time(&form.max_time);
            filters.include_ingredients = FilterForm::split_list(&form.include);
            filters.exclude_ingredients = FilterForm::split_list(&form.exclude);
        });

    (changed && filters != view.filters).then_some(filters)
}

fn known_categories(recipes: &[Recipe]) -> Vec<String> {
    let mut out: Vec<String> = recipes
        .iter()
        .filter_map(|r| r.category.clone())
        .filter(|c| !c.trim().is_empty())
        .collect();
    out.sort();
    out.dedup();
    out
}

fn recipe_list(ui: &mut egui::Ui, state: &mut UiState, view: &RecipeState) -> Option<RecipeAction> {
    let mut action = None;

    if view.visible.is_empty() && !view.loading {
        let text = if view.recipes.is_empty() {
            "No recipes yet. Add your first one!"
        } else {
            "No recipes match these filters."
        };
        ui.label(RichText::new(text).color(TEXT_SECONDARY));
        return None;
    }

    ui.label(
        RichText::new(format!("{} of {} recipes", view.visible.len(), view.recipes.len()))
            .color(TEXT_SECONDARY)
            .small(),
    );

    ScrollArea::vertical()
        .id_salt("recipe_list")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for recipe in &view.visible {
                let selected = state.selected_recipe.as_deref() == Some(recipe.id.as_str());
                egui::Frame::default()
                    .fill(if selected { BG_SURFACE } else { BG_SECONDARY })
                    .corner_radius(PANEL_ROUNDING)
                    .inner_margin(8.0)
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            let title = RichText::new(&recipe.title).color(TEXT_PRIMARY).strong();
                            if ui.selectable_label(selected, title).clicked() {
                                state.selected_recipe = if selected { None } else { Some(recipe.id.clone()) };
                            }
                            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                if ui.small_button("Delete").clicked() {
                                    action = Some(RecipeAction::Delete(recipe.id.clone()));
                                }
                                if ui.small_button("Edit").clicked() {
                                    state.editor = Some(RecipeEditor::from_recipe(recipe));
                                }
                            });
                        });
                        ui.label(RichText::new(recipe_meta(recipe)).color(TEXT_SECONDARY).small());
                        if selected {
                            recipe_details(ui, recipe);
                        }
                    });
                ui.add_space(4.0);
            }
        });

    action
}

/// "45 min · Easy · Dinner · serves 4"
pub fn recipe_meta(recipe: &Recipe) -> String {
    let mut parts = Vec::new();
    if let Some(t) = recipe.total_time_minutes() {
        parts.push(format!("{} min", t));
    }
    if let Some(d) = recipe.difficulty {
        parts.push(d.label().to_string());
    }
    if let Some(c) = recipe.category.as_deref().filter(|c| !c.is_empty()) {
        parts.push(c.to_string());
    }
    if let Some(s) = recipe.servings {
        parts.push(format!("serves {}", s));
    }
    parts.join(" · ")
}

fn recipe_details(ui: &mut egui::Ui, recipe: &Recipe) {
    ui.add_space(4.0);
    if let Some(desc) = &recipe.description {
        ui.label(RichText::new(desc).color(TEXT_PRIMARY));
    }
    if !recipe.ingredients.is_empty() {
        ui.label(RichText::new("Ingredients").color(ACCENT).strong());
        for ingredient in &recipe.ingredients {
            ui.label(format!("• {}", format_ingredient(ingredient)));
        }
    }
    if !recipe.instructions.is_empty() {
        ui.label(RichText::new("Steps").color(ACCENT).strong());
        for (i, step) in recipe.instructions.iter().enumerate() {
            ui.label(format!("{}. {}", i + 1, step));
        }
    }
    if !recipe.tags.is_empty() {
        ui.label(RichText::new(recipe.tags.join(", ")).color(TEXT_SECONDARY).small());
    }
}

fn editor_window(ctx: &egui::Context, state: &mut UiState) -> Option<RecipeAction> {
    let mut action = None;
    let mut close = false;
    let editor = state.editor.as_mut()?;
    let title = if editor.editing_id.is_some() { "Edit recipe" } else { "New recipe" };

    egui::Window::new(title)
        .collapsible(false)
        .resizable(true)
        .default_width(420.0)
        .show(ctx, |ui| {
            field_label(ui, "Title");
            ui.add(egui::TextEdit::singleline(&mut editor.title).desired_width(f32::INFINITY));
            field_label(ui, "Description");
            ui.add(egui::TextEdit::multiline(&mut editor.description).desired_rows(2).desired_width(f32::INFINITY));

            egui::Grid::new("recipe_editor_numbers").num_columns(4).show(ui, |ui| {
                field_label(ui, "Prep (min)");
                ui.add(egui::TextEdit::singleline(&mut editor.prep_time).desired_width(50.0));
                field_label(ui, "Cook (min)");
                ui.add(egui::TextEdit::singleline(&mut editor.cook_time).desired_width(50.0));
                ui.end_row();
                field_label(ui, "Servings");
                ui.add(egui::TextEdit::singleline(&mut editor.servings).desired_width(50.0));
                field_label(ui, "Difficulty");
                egui::ComboBox::from_id_salt("recipe_editor_difficulty")
                    .selected_text(editor.difficulty.map(|d| d.label()).unwrap_or("Any"))
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut editor.difficulty, None, "Any");
                        for d in Difficulty::all() {
                            ui.selectable_value(&mut editor.difficulty, Some(*d), d.label());
                        }
                    });
                ui.end_row();
            });

            field_label(ui, "Category");
            ui.text_edit_singleline(&mut editor.category);
            field_label(ui, "Ingredients (one per line, e.g. \"2 cup flour\")");
            ui.add(egui::TextEdit::multiline(&mut editor.ingredients).desired_rows(5).desired_width(f32::INFINITY));
            field_label(ui, "Steps (one per line)");
            ui.add(egui::TextEdit::multiline(&mut editor.instructions).desired_rows(5).desired_width(f32::INFINITY));
            field_label(ui, "Tags (comma separated)");
            ui.text_edit_singleline(&mut editor.tags);

            if let Some(err) = &editor.error {
                error_line(ui, err);
            }

            ui.horizontal(|ui| {
                if ui.add(primary_button("Save", true)).clicked() {
                    let built = match &editor.editing_id {
                        Some(id) => editor.to_update().map(|changes| RecipeAction::Update {
                            id: id.clone(),
                            changes,
                        }),
                        None => editor.to_create().map(RecipeAction::Create),
                    };
                    match built {
                        Ok(a) => {
                            action = Some(a);
                            close = true;
                        }
                        Err(e) => editor.error = Some(e),
                    }
                }
                if ui.button("Cancel").clicked() {
                    close = true;
                }
            });
        });

    if close {
        state.editor = None;
    }
    action
}

fn duplicate_window(ctx: &egui::Context, pending: &PendingDuplicate) -> Option<RecipeAction> {
    let mut action = None;
    let info = &pending.info;

    egui::Window::new("Possible duplicate")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            let message = info.message.clone().unwrap_or_else(|| {
                format!("A recipe similar to \"{}\" already exists.", pending.payload.title)
            });
            ui.label(RichText::new(message).color(TEXT_PRIMARY));
            for similar in &info.similar_recipes {
                ui.label(
                    RichText::new(format!(
                        "• {} ({:.0}% similar)",
                        similar.title,
                        similar.similarity * 100.0
                    ))
                    .color(TEXT_SECONDARY),
                );
            }
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                if let Some(id) = info.best_match_id() {
                    if ui.button("View existing").clicked() {
                        action = Some(RecipeAction::ViewExisting(id.to_string()));
                    }
                }
                if ui.add(primary_button("Create anyway", true)).clicked() {
                    action = Some(RecipeAction::CreateAnyway);
                }
                if ui.button("Cancel").clicked() {
                    action = Some(RecipeAction::DismissDuplicate);
                }
            });
        });

    action
}
