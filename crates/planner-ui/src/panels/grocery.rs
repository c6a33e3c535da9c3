//! Grocery list generated from the current week, grouped by aisle category.

use egui::{self, RichText, ScrollArea};
use planner_core::stores::meal_plan::MealPlanState;

use super::error_line;
use crate::theme::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroceryAction {
    Generate,
    /// Index into `GroceryList::items`
    Toggle(usize),
}

pub fn grocery_panel(ui: &mut egui::Ui, view: &MealPlanState) -> Option<GroceryAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.heading(RichText::new("Groceries").color(TEXT_PRIMARY).strong());
        if view.loading {
            ui.spinner();
        }
    });
    ui.separator();

    if let Some(err) = &view.error {
        error_line(ui, err);
    }

    let Some(list) = &view.grocery_list else {
        ui.label(
            RichText::new("No list yet. Build one from this week's meal plan.")
                .color(TEXT_SECONDARY),
        );
        if ui.add(primary_button("Make grocery list", true)).clicked() {
            action = Some(GroceryAction::Generate);
        }
        return action;
    };

    ui.horizontal(|ui| {
        ui.label(
            RichText::new(list.name.as_deref().unwrap_or("Grocery list"))
                .color(ACCENT)
                .strong(),
        );
        ui.label(
            RichText::new(format!("{} of {} left", list.remaining(), list.items.len()))
                .color(TEXT_SECONDARY)
                .small(),
        );
        if ui.button("Rebuild").clicked() {
            action = Some(GroceryAction::Generate);
        }
    });

    ScrollArea::vertical()
        .id_salt("grocery_items")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for (category, items) in list.by_category() {
                ui.add_space(4.0);
                ui.label(RichText::new(category).color(TEXT_SECONDARY).strong());
                for (index, item) in items {
                    let mut checked = item.checked;
                    let text = RichText::new(item.display());
                    let text = if checked { text.strikethrough().color(COOKED) } else { text };
                    if ui.checkbox(&mut checked, text).changed() {
                        action = Some(GroceryAction::Toggle(index));
                    }
                }
            }
        });

    action
}
