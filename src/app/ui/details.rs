use eframe::egui::{RichText, Ui};

use crate::bucket::Source;
use crate::util::format_size;

use super::super::ViewModel;

struct ConnectionRow {
    other_id: String,
    other_name: String,
    outgoing: bool,
    description: String,
}

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui, now: f64) {
        let Some(selected_id) = self.interaction.selected().map(str::to_owned) else {
            return;
        };

        ui.horizontal(|ui| {
            ui.heading("Source");
            if ui.small_button("Close").clicked() {
                self.interaction.select(None);
            }
        });
        ui.add_space(6.0);

        let Some(source) = self.snapshot.source(&selected_id).cloned() else {
            ui.label("This source is no longer in the bucket.");
            return;
        };

        Self::draw_source_fields(ui, &source);

        let rows = self.connection_rows(&selected_id);
        ui.separator();
        ui.label(RichText::new(format!("Connections ({})", rows.len())).strong());
        if rows.is_empty() {
            ui.label("No connections.");
            return;
        }

        let mut jump_to = None;
        for row in &rows {
            ui.horizontal_wrapped(|ui| {
                ui.label(if row.outgoing { "->" } else { "<-" });
                if ui.link(row.other_name.as_str()).clicked() {
                    jump_to = Some(row.other_id.clone());
                }
            });
            if !row.description.is_empty() {
                ui.small(row.description.as_str());
            }
            ui.add_space(4.0);
        }

        if let Some(source_id) = jump_to
            && let Some(handle) = self.simulation.handle_of(&source_id)
        {
            self.interaction.focus_node(handle, &self.simulation, now);
            self.interaction.select(Some(source_id));
        }
    }

    fn draw_source_fields(ui: &mut Ui, source: &Source) {
        ui.label(RichText::new(source.name.as_str()).strong());
        ui.small(source.source_id.as_str());
        ui.add_space(6.0);

        ui.label(format!("Type: {}", source.kind.label()));
        if let Some(url) = &source.url {
            ui.hyperlink_to(url.as_str(), url.as_str());
        }
        ui.label(format!("Size: {}", format_size(source.size)));
        if !source.created.is_empty() {
            ui.label(format!("Created: {}", source.created));
        }
        if !source.updated.is_empty() {
            ui.label(format!("Updated: {}", source.updated));
        }
    }

    fn connection_rows(&self, source_id: &str) -> Vec<ConnectionRow> {
        self.snapshot
            .connections_of(source_id)
            .map(|connection| {
                let outgoing = connection.from_source_id == source_id;
                let other_id = if outgoing {
                    &connection.to_source_id
                } else {
                    &connection.from_source_id
                };
                let other_name = self
                    .snapshot
                    .source(other_id)
                    .map(|source| source.name.clone())
                    .unwrap_or_else(|| format!("{other_id} (missing)"));
                let description = match &connection.data.name {
                    Some(name) if !name.is_empty() && connection.data.description.is_empty() => {
                        name.clone()
                    }
                    Some(name) if !name.is_empty() => {
                        format!("{name}: {}", connection.data.description)
                    }
                    _ => connection.data.description.clone(),
                };
                ConnectionRow {
                    other_id: other_id.clone(),
                    other_name,
                    outgoing,
                    description,
                }
            })
            .collect()
    }
}
