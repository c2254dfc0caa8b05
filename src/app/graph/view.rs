use eframe::egui::{self, Align2, Color32, FontId, Painter, Pos2, Sense, Stroke, Ui, Vec2, vec2};

use super::super::ViewModel;
use super::super::gesture::GestureEvent;
use super::super::highlight::{Highlight, edge_style, label_style, node_style};
use super::super::labels::{LabelBlock, TextMeasure};
use super::super::render_utils::{
    blend_color, circle_visible, draw_background, edge_visible, trash_rect, with_opacity,
};

const TRASH_SIZE: Vec2 = vec2(96.0, 72.0);
const TRASH_MARGIN: f32 = 16.0;

/// Measures label text with the host font at its unscaled size.
struct PainterMeasure<'a> {
    painter: &'a Painter,
    font: FontId,
}

impl TextMeasure for PainterMeasure<'_> {
    fn width(&self, text: &str) -> f32 {
        self.painter
            .layout_no_wrap(text.to_owned(), self.font.clone(), Color32::WHITE)
            .size()
            .x
    }
}

impl ViewModel {
    /// Draws one frame of the canvas. Returns `(source_id, name)` when a node
    /// was dropped on the trash and should be deleted.
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui, now: f64) -> Option<(String, String)> {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        self.interaction.set_canvas(rect);
        let center = vec2(self.config.layout.center[0], self.config.layout.center[1]);
        self.interaction.apply_initial_view(&self.config.camera, center);

        let trash = trash_rect(rect, TRASH_SIZE, TRASH_MARGIN);
        let event = self.handle_graph_input(ui, &response, trash, now);

        let running = self.simulation.tick();
        self.edge_fade.observe(self.simulation.edges_revealed(), now);
        let animating = self.interaction.animate(now);
        if running
            || animating
            || self.edge_fade.is_animating(now)
            || self.interaction.is_busy()
        {
            ui.ctx().request_repaint();
        }

        let transform = self.interaction.transform();
        draw_background(
            &painter,
            rect,
            transform,
            self.palette.background,
            self.palette.grid,
        );

        if self.simulation.len() == 0 {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "This bucket has no sources yet.",
                FontId::proportional(14.0),
                self.palette.text,
            );
        } else {
            self.paint_graph(&painter, rect, now);
        }

        self.paint_trash(&painter, trash);

        match event {
            Some(GestureEvent::DroppedOnTrash { source_id, .. }) => {
                let name = self
                    .snapshot
                    .source(&source_id)
                    .map(|source| source.name.clone())
                    .unwrap_or_else(|| source_id.clone());
                Some((source_id, name))
            }
            Some(GestureEvent::Clicked { .. })
            | Some(GestureEvent::DragStarted(_))
            | Some(GestureEvent::DragEnded(_))
            | None => None,
        }
    }

    fn paint_graph(&mut self, painter: &Painter, rect: egui::Rect, now: f64) {
        let search_matches = self.search_matches();
        let highlight = self
            .interaction
            .focus()
            .map(|focus| Highlight::compute(self.simulation.links(), focus));
        let highlight = highlight.as_ref();
        let scale = self.interaction.transform().scale;
        let reveal = self.edge_fade.progress(now);
        let palette = self.palette;
        let config = &self.config.highlight;

        if reveal > 0.0 {
            for &link in self.simulation.links() {
                let (start, end) = self.simulation.link_endpoints(link);
                let start = self.interaction.to_screen(start);
                let end = self.interaction.to_screen(end);
                if !edge_visible(rect, start, end, 2.0) {
                    continue;
                }
                let style = edge_style(highlight, link, reveal, &palette, config);
                if style.opacity <= 0.0 {
                    continue;
                }
                painter.line_segment(
                    [start, end],
                    Stroke::new(style.width * scale.sqrt(), with_opacity(style.color, style.opacity)),
                );
            }
        }

        let selected = self
            .interaction
            .selected()
            .and_then(|id| self.simulation.handle_of(id));

        for (handle, node) in self.simulation.nodes() {
            let position = self.interaction.to_screen(node.position);
            let radius = node.radius * scale;
            if !circle_visible(rect, position, radius) {
                continue;
            }

            let style = node_style(highlight, handle, &palette, config);
            let is_match = search_matches
                .as_ref()
                .is_some_and(|matches| matches.contains(&handle));
            let fill = if is_match {
                blend_color(style.color, palette.search_match, 0.6)
            } else {
                style.color
            };
            painter.circle_filled(position, radius, with_opacity(fill, style.opacity));

            let outline = if selected == Some(handle) {
                Stroke::new(3.0, palette.selected_stroke)
            } else {
                Stroke::new(1.0, with_opacity(palette.node_outline, style.opacity))
            };
            painter.circle_stroke(position, radius, outline);
        }

        let font_size = self.labels.font_size();
        let measure = PainterMeasure {
            painter,
            font: FontId::proportional(font_size),
        };
        let font = FontId::proportional((font_size * scale).max(1.0));

        for (handle, node) in self.simulation.nodes() {
            let position = self.interaction.to_screen(node.position);
            if !circle_visible(rect, position, node.radius * scale + 150.0 * scale) {
                continue;
            }

            let style = label_style(highlight, handle, &palette, config);
            let color = with_opacity(style.color, style.opacity);
            let name = self
                .snapshot
                .source(&node.id)
                .map(|source| source.name.as_str())
                .unwrap_or(node.id.as_str());
            let block = self
                .labels
                .layout(name, node.position, node.radius, &measure);
            let anchor = self
                .interaction
                .to_screen(block.anchor() + vec2(0.0, style.nudge));

            match block {
                LabelBlock::Wrapped {
                    text, wrap_width, ..
                } => {
                    let galley = painter.layout(text, font.clone(), color, wrap_width * scale);
                    let top_left = Pos2::new(anchor.x - galley.size().x / 2.0, anchor.y);
                    painter.galley(top_left, galley, color);
                }
                LabelBlock::Lines { lines, .. } => {
                    for line in lines {
                        painter.text(
                            anchor + line.offset * scale,
                            Align2::CENTER_TOP,
                            line.text,
                            font.clone(),
                            color,
                        );
                    }
                }
            }
        }
    }

    fn paint_trash(&self, painter: &Painter, trash: egui::Rect) {
        let dragging = self.interaction.dragging().is_some();
        let fill = if self.trash_armed {
            self.palette.trash_armed
        } else {
            self.palette.trash
        };
        let opacity = if dragging { 0.95 } else { 0.55 };
        painter.rect_filled(trash, 8.0, with_opacity(fill, opacity));
        painter.text(
            trash.center(),
            Align2::CENTER_CENTER,
            if self.trash_armed { "Release to delete" } else { "Trash" },
            FontId::proportional(12.0),
            self.palette.text,
        );
    }
}
