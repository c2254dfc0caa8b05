use std::collections::HashSet;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};

use crate::bucket::{BucketSnapshot, SourceStore, collect_bucket, delete_and_refetch};
use crate::config::GraphConfig;

mod camera;
mod gesture;
mod graph;
mod highlight;
mod labels;
mod physics;
mod render_utils;
mod theme;
mod ui;

use gesture::Interaction;
use labels::{LabelRenderer, RenderCapabilities, label_renderer};
use physics::{EdgeFade, NodeHandle, Simulation};
use theme::{Palette, ThemeName};
use ui::toasts::{ToastKind, Toasts};

pub struct BucketGraphApp {
    store: Arc<dyn SourceStore>,
    bucket_id: String,
    config: Arc<GraphConfig>,
    caps: RenderCapabilities,
    theme: ThemeName,
    state: AppState,
    sync_rx: Option<Receiver<SyncOutcome>>,
    toasts: Toasts,
}

enum AppState {
    Loading { rx: Receiver<SyncOutcome> },
    Ready(Box<ViewModel>),
    Error(String),
}

#[derive(Clone, Debug)]
enum SyncRequest {
    Reload,
    Delete { source_id: String, name: String },
}

struct SyncOutcome {
    request: SyncRequest,
    result: Result<BucketSnapshot, String>,
}

/// What the graph view asks the host to do after a frame.
#[derive(Default)]
struct ViewRequests {
    reload: bool,
    delete: Option<(String, String)>,
    theme: Option<ThemeName>,
}

struct ViewModel {
    snapshot: BucketSnapshot,
    config: Arc<GraphConfig>,
    simulation: Simulation,
    interaction: Interaction,
    labels: Box<dyn LabelRenderer>,
    edge_fade: EdgeFade,
    palette: Palette,
    theme: ThemeName,
    search: String,
    search_match_cache: Option<SearchMatchCache>,
    revision: u64,
    trash_armed: bool,
}

struct SearchMatchCache {
    query: String,
    revision: u64,
    matches: Arc<HashSet<NodeHandle>>,
    best: Option<NodeHandle>,
}

impl BucketGraphApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        store: Arc<dyn SourceStore>,
        bucket_id: String,
        config: GraphConfig,
        theme: &str,
    ) -> Self {
        let theme = ThemeName::parse(theme);
        cc.egui_ctx.set_visuals(theme.visuals());
        let caps = RenderCapabilities::from_strategy(config.labels.strategy);
        tracing::info!(
            bucket_id = %bucket_id,
            theme = theme.label(),
            rich_text_wrap = caps.rich_text_wrap,
            "starting graph view"
        );

        let state = AppState::Loading {
            rx: Self::spawn_sync(Arc::clone(&store), bucket_id.clone(), SyncRequest::Reload),
        };
        Self {
            store,
            bucket_id,
            config: Arc::new(config),
            caps,
            theme,
            state,
            sync_rx: None,
            toasts: Toasts::default(),
        }
    }

    fn spawn_sync(
        store: Arc<dyn SourceStore>,
        bucket_id: String,
        request: SyncRequest,
    ) -> Receiver<SyncOutcome> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = match &request {
                SyncRequest::Reload => collect_bucket(store.as_ref(), &bucket_id),
                SyncRequest::Delete { source_id, .. } => {
                    delete_and_refetch(store.as_ref(), &bucket_id, source_id)
                }
            };
            if let Err(error) = &result {
                tracing::warn!(error = %format!("{error:#}"), ?request, "bucket sync failed");
            }
            let _ = tx.send(SyncOutcome {
                request,
                result: result.map_err(|error| format!("{error:#}")),
            });
        });

        rx
    }

    fn start_load(&self) -> AppState {
        AppState::Loading {
            rx: Self::spawn_sync(
                Arc::clone(&self.store),
                self.bucket_id.clone(),
                SyncRequest::Reload,
            ),
        }
    }

    fn view_model(&self, snapshot: BucketSnapshot) -> ViewModel {
        ViewModel::new(
            snapshot,
            Arc::clone(&self.config),
            label_renderer(self.caps, &self.config.labels),
            self.theme,
        )
    }

    fn set_theme(&mut self, ctx: &Context, theme: ThemeName) {
        if self.theme == theme {
            return;
        }
        self.theme = theme;
        ctx.set_visuals(theme.visuals());
        if let AppState::Ready(model) = &mut self.state {
            model.set_theme(theme);
        }
        tracing::debug!(theme = theme.label(), "theme changed");
    }

    fn apply_outcome(&mut self, outcome: SyncOutcome, now: f64) {
        let AppState::Ready(model) = &mut self.state else {
            return;
        };

        match (outcome.request, outcome.result) {
            (SyncRequest::Reload, Ok(snapshot)) => {
                model.replace_snapshot(snapshot);
                self.toasts.push(ToastKind::Info, "Bucket reloaded", now);
            }
            (SyncRequest::Delete { name, .. }, Ok(snapshot)) => {
                model.replace_snapshot(snapshot);
                self.toasts
                    .push(ToastKind::Info, format!("Deleted \"{name}\""), now);
            }
            (SyncRequest::Reload, Err(error)) => {
                self.toasts
                    .push(ToastKind::Error, format!("Reload failed: {error}"), now);
            }
            (SyncRequest::Delete { name, .. }, Err(error)) => {
                self.toasts.push(
                    ToastKind::Error,
                    format!("Could not delete \"{name}\": {error}"),
                    now,
                );
            }
        }
    }
}

impl eframe::App for BucketGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let now = ctx.input(|input| input.time);
        let mut transition = None;
        let mut loaded = None;
        let mut retry = false;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(outcome) => loaded = Some(outcome.result),
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition =
                            Some(AppState::Error("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading(format!("Loading bucket {}...", self.bucket_id));
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load bucket");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    retry = ui.button("Retry").clicked();
                });
            }
            AppState::Ready(model) => {
                let mut requests = ViewRequests::default();
                let is_syncing = self.sync_rx.is_some();
                model.show(ctx, &self.bucket_id, &mut requests, is_syncing, now);

                if let Some(theme) = requests.theme {
                    self.set_theme(ctx, theme);
                }

                if self.sync_rx.is_none() {
                    let request = if let Some((source_id, name)) = requests.delete {
                        Some(SyncRequest::Delete { source_id, name })
                    } else if requests.reload {
                        Some(SyncRequest::Reload)
                    } else {
                        None
                    };
                    if let Some(request) = request {
                        self.sync_rx = Some(Self::spawn_sync(
                            Arc::clone(&self.store),
                            self.bucket_id.clone(),
                            request,
                        ));
                    }
                } else if let Some((_, name)) = requests.delete {
                    self.toasts.push(
                        ToastKind::Error,
                        format!("Still syncing, \"{name}\" was not deleted"),
                        now,
                    );
                }

                if let Some(rx) = self.sync_rx.take() {
                    match rx.try_recv() {
                        Ok(outcome) => self.apply_outcome(outcome, now),
                        Err(TryRecvError::Empty) => {
                            self.sync_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            self.toasts.push(
                                ToastKind::Error,
                                "Background sync worker disconnected",
                                now,
                            );
                        }
                    }
                }
            }
        }

        match loaded {
            Some(Ok(snapshot)) => {
                transition = Some(AppState::Ready(Box::new(self.view_model(snapshot))));
            }
            Some(Err(error)) => transition = Some(AppState::Error(error)),
            None => {}
        }
        if retry {
            transition = Some(self.start_load());
        }

        self.toasts.show(ctx, now);

        if let Some(next_state) = transition {
            self.sync_rx = None;
            self.state = next_state;
        }
    }
}
