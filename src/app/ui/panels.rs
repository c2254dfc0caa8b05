use std::sync::Arc;

use eframe::egui::{self, Align, Context, Layout};

use crate::bucket::BucketSnapshot;
use crate::config::GraphConfig;

use super::super::gesture::Interaction;
use super::super::graph::build_simulation;
use super::super::labels::LabelRenderer;
use super::super::physics::EdgeFade;
use super::super::theme::{Palette, ThemeName};
use super::super::{ViewModel, ViewRequests};

impl ViewModel {
    pub(in crate::app) fn new(
        snapshot: BucketSnapshot,
        config: Arc<GraphConfig>,
        labels: Box<dyn LabelRenderer>,
        theme: ThemeName,
    ) -> Self {
        let simulation = build_simulation(&snapshot, &config);
        let interaction = Interaction::new(&config.camera);
        let edge_fade = EdgeFade::new(config.highlight.edge_fade_millis);

        Self {
            snapshot,
            simulation,
            interaction,
            labels,
            edge_fade,
            palette: Palette::for_theme(theme),
            theme,
            search: String::new(),
            search_match_cache: None,
            revision: 0,
            trash_armed: false,
            config,
        }
    }

    /// Swaps in a refetched bucket. The running layout is stopped before the
    /// new one starts, so only one simulation ever advances.
    pub(in crate::app) fn replace_snapshot(&mut self, snapshot: BucketSnapshot) {
        self.simulation.stop();
        self.simulation = build_simulation(&snapshot, &self.config);
        self.snapshot = snapshot;
        self.interaction.rebind(&self.simulation);
        self.edge_fade = EdgeFade::new(self.config.highlight.edge_fade_millis);
        self.revision = self.revision.wrapping_add(1);
        self.search_match_cache = None;
        self.trash_armed = false;
    }

    pub(in crate::app) fn set_theme(&mut self, theme: ThemeName) {
        self.theme = theme;
        self.palette = Palette::for_theme(theme);
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        bucket_id: &str,
        requests: &mut ViewRequests,
        is_syncing: bool,
        now: f64,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("bucket-graph");
                    ui.separator();
                    ui.label(format!("bucket: {bucket_id}"));
                    ui.label(format!("sources: {}", self.snapshot.sources.len()));
                    ui.label(format!("connections: {}", self.snapshot.connections.len()));

                    let mut theme = self.theme;
                    egui::ComboBox::from_id_salt("theme")
                        .selected_text(theme.label())
                        .show_ui(ui, |ui| {
                            for option in [ThemeName::Light, ThemeName::Dark] {
                                ui.selectable_value(&mut theme, option, option.label());
                            }
                        });
                    if theme != self.theme {
                        requests.theme = Some(theme);
                    }

                    let reload_button = ui.add_enabled(!is_syncing, egui::Button::new("Reload"));
                    if reload_button.clicked() {
                        requests.reload = true;
                    }
                    if is_syncing {
                        ui.spinner();
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let search = ui.add(
                            egui::TextEdit::singleline(&mut self.search)
                                .hint_text("Search sources")
                                .desired_width(220.0),
                        );
                        if search.lost_focus() && ui.input(|input| input.key_pressed(egui::Key::Enter)) {
                            self.focus_best_match(now);
                        }
                        if !self.simulation.is_running() {
                            ui.label("settled");
                        } else {
                            let strengths = self.simulation.strengths();
                            ui.label(format!(
                                "phase {}  alpha {:.3}  link {:.1}  collide {:.1}",
                                self.simulation.phase(),
                                self.simulation.alpha(),
                                strengths.link,
                                strengths.collision
                            ));
                        }
                    });
                });
            });

        if self.interaction.selected().is_some() {
            egui::SidePanel::right("details")
                .resizable(true)
                .default_width(340.0)
                .min_width(240.0)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical()
                        .auto_shrink([false, false])
                        .show(ui, |ui| self.draw_details(ui, now));
                });
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                if let Some(delete) = self.draw_graph(ui, now) {
                    requests.delete = Some(delete);
                }
            });
    }
}
