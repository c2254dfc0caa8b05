use eframe::egui::{self, Rect, Response, Ui};

use super::super::ViewModel;
use super::super::gesture::{DropTarget, GestureEvent};

impl ViewModel {
    /// Feeds this frame's primary-pointer and zoom input into the gesture
    /// machine.
    pub(in crate::app) fn handle_graph_input(
        &mut self,
        ui: &Ui,
        response: &Response,
        trash: Rect,
        now: f64,
    ) -> Option<GestureEvent> {
        let (pressed, released, pointer, scroll, zoom_delta) = ui.input(|input| {
            (
                input.pointer.primary_pressed(),
                input.pointer.primary_released(),
                input.pointer.interact_pos(),
                input.raw_scroll_delta.y,
                input.zoom_delta(),
            )
        });

        let mut event = None;
        if let Some(pointer) = pointer {
            if pressed && response.hovered() {
                self.interaction.pointer_down(pointer, &self.simulation);
            }
            if self.interaction.is_busy() || response.hovered() {
                event = self.interaction.pointer_move(pointer, &mut self.simulation);
            } else {
                self.interaction.pointer_left();
            }
            if released && self.interaction.is_busy() {
                event = self
                    .interaction
                    .pointer_up(pointer, &mut self.simulation, &trash, now)
                    .or(event);
            }
        } else {
            self.interaction.pointer_left();
        }

        self.trash_armed = self.interaction.dragging().is_some()
            && pointer.is_some_and(|pointer| DropTarget::contains(&trash, pointer));

        if response.hovered() {
            let anchor = pointer.unwrap_or_else(|| self.interaction.canvas().center());
            if (zoom_delta - 1.0).abs() > f32::EPSILON {
                self.interaction.zoom(zoom_delta, anchor);
            } else if scroll.abs() > f32::EPSILON {
                let sensitivity = self.config.camera.wheel_sensitivity;
                let factor = (1.0 + (scroll * sensitivity)).clamp(0.85, 1.15);
                self.interaction.zoom(factor, anchor);
            }
        }

        if self.interaction.dragging().is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::Grabbing);
        } else if self.interaction.hovered().is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }

        event
    }
}
