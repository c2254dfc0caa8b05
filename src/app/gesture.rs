use eframe::egui::{Pos2, Rect, Vec2, vec2};

use crate::config::CameraConfig;

use super::camera::{ScaleExtent, ViewTransform, ZoomAnimation};
use super::physics::{NodeHandle, Simulation};

/// Something a dragged node can be released onto, in screen coordinates.
pub(in crate::app) trait DropTarget {
    fn contains(&self, screen: Pos2) -> bool;
}

impl DropTarget for Rect {
    fn contains(&self, screen: Pos2) -> bool {
        screen.x >= self.left()
            && screen.x <= self.right()
            && screen.y >= self.top()
            && screen.y <= self.bottom()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Gesture {
    Idle,
    Pressed {
        handle: NodeHandle,
        origin: Pos2,
        grab_offset: Vec2,
    },
    Dragging {
        handle: NodeHandle,
        grab_offset: Vec2,
    },
    Panning {
        last: Pos2,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(in crate::app) enum GestureEvent {
    DragStarted(NodeHandle),
    DragEnded(NodeHandle),
    DroppedOnTrash {
        handle: NodeHandle,
        source_id: String,
    },
    Clicked {
        handle: NodeHandle,
        source_id: String,
    },
}

/// Pointer handling for the graph canvas: camera pan/zoom, node drag with
/// pinning, click-to-focus, and drop-to-delete.
pub(in crate::app) struct Interaction {
    transform: ViewTransform,
    extent: ScaleExtent,
    canvas: Rect,
    drag_threshold: f32,
    focus_scale: f32,
    focus_millis: u64,
    gesture: Gesture,
    animation: Option<ZoomAnimation>,
    hovered: Option<NodeHandle>,
    selected: Option<String>,
    initial_applied: bool,
}

impl Interaction {
    pub(in crate::app) fn new(camera: &CameraConfig) -> Self {
        Self {
            transform: ViewTransform::default(),
            extent: ScaleExtent::from_config(camera),
            canvas: Rect::from_min_size(Pos2::ZERO, vec2(1.0, 1.0)),
            drag_threshold: camera.drag_threshold.max(0.0),
            focus_scale: camera.zoom_to_node_scale,
            focus_millis: camera.zoom_to_node_millis,
            gesture: Gesture::Idle,
            animation: None,
            hovered: None,
            selected: None,
            initial_applied: false,
        }
    }

    pub(in crate::app) fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub(in crate::app) fn canvas(&self) -> Rect {
        self.canvas
    }

    pub(in crate::app) fn set_canvas(&mut self, canvas: Rect) {
        self.canvas = canvas;
    }

    /// Applies the desktop or mobile preset once, before any user input.
    pub(in crate::app) fn apply_initial_view(&mut self, camera: &CameraConfig, layout_center: Vec2) {
        if self.initial_applied {
            return;
        }
        let size = self.canvas.size();
        let preset = if size.x < camera.mobile_breakpoint {
            &camera.mobile
        } else {
            &camera.desktop
        };
        self.transform = ViewTransform::initial(preset, layout_center, size, self.extent);
        self.initial_applied = true;
        tracing::debug!(
            width = size.x,
            scale = self.transform.scale,
            "applied initial view"
        );
    }

    pub(in crate::app) fn to_world(&self, screen: Pos2) -> Vec2 {
        self.transform.to_world(self.canvas.min, screen)
    }

    pub(in crate::app) fn to_screen(&self, world: Vec2) -> Pos2 {
        self.transform.to_screen(self.canvas.min, world)
    }

    pub(in crate::app) fn hovered(&self) -> Option<NodeHandle> {
        self.hovered
    }

    pub(in crate::app) fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub(in crate::app) fn dragging(&self) -> Option<NodeHandle> {
        match self.gesture {
            Gesture::Dragging { handle, .. } => Some(handle),
            _ => None,
        }
    }

    /// Node that drives neighbour highlighting: the dragged node, otherwise
    /// the hovered one.
    pub(in crate::app) fn focus(&self) -> Option<NodeHandle> {
        match self.gesture {
            Gesture::Dragging { handle, .. } => Some(handle),
            Gesture::Panning { .. } => None,
            Gesture::Idle | Gesture::Pressed { .. } => self.hovered,
        }
    }

    pub(in crate::app) fn is_busy(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    pub(in crate::app) fn pointer_down(&mut self, screen: Pos2, simulation: &Simulation) {
        let world = self.to_world(screen);
        self.gesture = match simulation.node_at(world) {
            Some(handle) => {
                let node_position = simulation.position_of(Some(handle));
                Gesture::Pressed {
                    handle,
                    origin: screen,
                    grab_offset: node_position - world,
                }
            }
            None => Gesture::Panning { last: screen },
        };
    }

    pub(in crate::app) fn pointer_move(
        &mut self,
        screen: Pos2,
        simulation: &mut Simulation,
    ) -> Option<GestureEvent> {
        match self.gesture {
            Gesture::Idle => {
                self.hovered = simulation.node_at(self.to_world(screen));
                None
            }
            Gesture::Pressed {
                handle,
                origin,
                grab_offset,
            } => {
                if (screen - origin).length() <= self.drag_threshold {
                    return None;
                }
                simulation.pin(handle, simulation.position_of(Some(handle)));
                simulation.reheat();
                simulation.pin(handle, self.to_world(screen) + grab_offset);
                self.gesture = Gesture::Dragging {
                    handle,
                    grab_offset,
                };
                self.hovered = Some(handle);
                tracing::debug!(node = handle.index(), "drag started");
                Some(GestureEvent::DragStarted(handle))
            }
            Gesture::Dragging {
                handle,
                grab_offset,
            } => {
                simulation.pin(handle, self.to_world(screen) + grab_offset);
                None
            }
            Gesture::Panning { last } => {
                self.animation = None;
                self.transform.pan_by(screen - last);
                self.gesture = Gesture::Panning { last: screen };
                None
            }
        }
    }

    pub(in crate::app) fn pointer_up(
        &mut self,
        screen: Pos2,
        simulation: &mut Simulation,
        trash: &dyn DropTarget,
        now: f64,
    ) -> Option<GestureEvent> {
        let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
        match gesture {
            Gesture::Idle | Gesture::Panning { .. } => None,
            Gesture::Pressed { handle, .. } => {
                let source_id = simulation.node(handle)?.id.clone();
                self.focus_node(handle, simulation, now);
                self.selected = Some(source_id.clone());
                tracing::debug!(source_id = %source_id, "node clicked");
                Some(GestureEvent::Clicked { handle, source_id })
            }
            Gesture::Dragging { handle, .. } => {
                simulation.unpin(handle);
                simulation.cool();
                self.hovered = None;

                if trash.contains(screen) {
                    let source_id = simulation.node(handle)?.id.clone();
                    self.forget_source(&source_id, simulation);
                    tracing::info!(source_id = %source_id, "node dropped on trash");
                    return Some(GestureEvent::DroppedOnTrash { handle, source_id });
                }
                Some(GestureEvent::DragEnded(handle))
            }
        }
    }

    pub(in crate::app) fn pointer_left(&mut self) {
        if matches!(self.gesture, Gesture::Idle) {
            self.hovered = None;
        }
    }

    /// Wheel or pinch zoom about the pointer.
    pub(in crate::app) fn zoom(&mut self, factor: f32, screen_anchor: Pos2) {
        self.animation = None;
        let anchor = screen_anchor - self.canvas.min;
        self.transform.zoom_about(factor, anchor, self.extent);
    }

    /// Starts the eased camera move that centres `handle` at the focus scale.
    pub(in crate::app) fn focus_node(&mut self, handle: NodeHandle, simulation: &Simulation, now: f64) {
        let Some(node) = simulation.node(handle) else {
            return;
        };
        let target = ViewTransform::centered_on(
            node.position,
            self.canvas.size(),
            self.focus_scale,
            self.extent,
        );
        self.animation = Some(ZoomAnimation::new(
            self.transform,
            target,
            now,
            self.focus_millis,
        ));
    }

    pub(in crate::app) fn select(&mut self, source_id: Option<String>) {
        self.selected = source_id;
    }

    /// Steps the camera animation; returns whether it is still running.
    pub(in crate::app) fn animate(&mut self, now: f64) -> bool {
        let Some(animation) = self.animation else {
            return false;
        };
        self.transform = animation.sample(now);
        if animation.finished(now) {
            self.transform = animation.target();
            self.animation = None;
            return false;
        }
        true
    }

    /// Drops every reference to a deleted source: selection, hover, and any
    /// in-flight gesture on it.
    pub(in crate::app) fn forget_source(&mut self, source_id: &str, simulation: &mut Simulation) {
        let handle = simulation.handle_of(source_id);
        if self.selected.as_deref() == Some(source_id) {
            self.selected = None;
        }
        if handle.is_some() && self.hovered == handle {
            self.hovered = None;
        }
        let gesture_handle = match self.gesture {
            Gesture::Pressed { handle, .. } | Gesture::Dragging { handle, .. } => Some(handle),
            Gesture::Idle | Gesture::Panning { .. } => None,
        };
        if let Some(handle) = handle
            && gesture_handle == Some(handle)
        {
            simulation.unpin(handle);
            self.gesture = Gesture::Idle;
        }
    }

    /// Handles from an old simulation mean nothing in a new one.
    pub(in crate::app) fn rebind(&mut self, simulation: &Simulation) {
        self.gesture = Gesture::Idle;
        self.hovered = None;
        if let Some(selected) = &self.selected
            && simulation.handle_of(selected).is_none()
        {
            self.selected = None;
        }
    }
}
