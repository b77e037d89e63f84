//! Read-only view of one settings set

use eframe::egui;

use crate::config::OptionValue;
use crate::settings::{ItemKind, SettingsItem, SettingsSet};

// Import constants from parent module
use super::super::constants::{ITEM_SPACING, SECTION_SPACING, STATUS_WARN};

/// Renders every group of a settings set
pub fn ui(ui: &mut egui::Ui, set: &SettingsSet) {
    for group in &set.groups {
        ui.group(|ui| {
            ui.label(egui::RichText::new(&group.title).heading().strong());
            ui.add_space(ITEM_SPACING);

            for item in &group.items {
                item_ui(ui, item);
                ui.add_space(ITEM_SPACING);
            }
        });

        ui.add_space(SECTION_SPACING);
    }
}

fn item_ui(ui: &mut egui::Ui, item: &SettingsItem) {
    match (&item.kind, &item.value) {
        (ItemKind::Switch, OptionValue::Bool(value)) => {
            let mut checked = *value;
            ui.add_enabled(false, egui::Checkbox::new(&mut checked, item.title));
        }
        (ItemKind::Choice(choices), value) => {
            ui.horizontal(|ui| {
                ui.label(format!("{}:", item.title));
                ui.add_space(5.0);
                ui.monospace(value.to_string())
                    .on_hover_text(format!("One of: {}", choices.join(", ")));
                if !item.recognized {
                    ui.colored_label(STATUS_WARN, "(unrecognized)");
                }
            });
        }
        (_, value) => {
            ui.horizontal(|ui| {
                ui.label(format!("{}:", item.title));
                ui.add_space(5.0);
                ui.monospace(value.to_string());
            });
        }
    }

    ui.label(egui::RichText::new(item.description).small().italics());
}
