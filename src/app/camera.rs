use eframe::egui::{Pos2, Vec2, vec2};

use crate::config::{CameraConfig, InitialView};

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct ScaleExtent {
    pub min: f32,
    pub max: f32,
}

impl ScaleExtent {
    pub(in crate::app) fn from_config(camera: &CameraConfig) -> Self {
        let [min, max] = camera.scale_extent;
        Self { min, max }
    }

    pub(in crate::app) fn clamp(self, scale: f32) -> f32 {
        if scale.is_nan() {
            return self.min;
        }
        scale.clamp(self.min, self.max)
    }
}

/// Camera over world space: `screen = canvas_origin + translate + world * scale`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct ViewTransform {
    pub translate: Vec2,
    pub scale: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl ViewTransform {
    pub(in crate::app) fn to_screen(self, canvas_origin: Pos2, world: Vec2) -> Pos2 {
        canvas_origin + self.translate + world * self.scale
    }

    pub(in crate::app) fn to_world(self, canvas_origin: Pos2, screen: Pos2) -> Vec2 {
        (screen - canvas_origin - self.translate) / self.scale
    }

    pub(in crate::app) fn pan_by(&mut self, delta: Vec2) {
        self.translate += delta;
    }

    /// Scales by `factor` keeping the canvas-local `anchor` fixed.
    pub(in crate::app) fn zoom_about(&mut self, factor: f32, anchor: Vec2, extent: ScaleExtent) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let world = (anchor - self.translate) / self.scale;
        self.scale = extent.clamp(self.scale * factor);
        self.translate = anchor - world * self.scale;
    }

    /// Transform that puts `world` at the middle of a viewport of `size`.
    pub(in crate::app) fn centered_on(world: Vec2, size: Vec2, scale: f32, extent: ScaleExtent) -> Self {
        let scale = extent.clamp(scale);
        Self {
            translate: size * 0.5 - world * scale,
            scale,
        }
    }

    pub(in crate::app) fn initial(
        preset: &InitialView,
        layout_center: Vec2,
        size: Vec2,
        extent: ScaleExtent,
    ) -> Self {
        let mut transform = Self::centered_on(layout_center, size, preset.scale, extent);
        transform.pan_by(vec2(preset.offset[0], preset.offset[1]));
        transform
    }

    fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            translate: self.translate + (other.translate - self.translate) * t,
            scale: self.scale + (other.scale - self.scale) * t,
        }
    }
}

pub(in crate::app) fn ease_cubic_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[derive(Clone, Copy, Debug)]
pub(in crate::app) struct ZoomAnimation {
    from: ViewTransform,
    to: ViewTransform,
    started_at: f64,
    duration_secs: f64,
}

impl ZoomAnimation {
    pub(in crate::app) fn new(
        from: ViewTransform,
        to: ViewTransform,
        started_at: f64,
        duration_millis: u64,
    ) -> Self {
        Self {
            from,
            to,
            started_at,
            duration_secs: duration_millis as f64 / 1000.0,
        }
    }

    pub(in crate::app) fn progress(&self, now: f64) -> f32 {
        if self.duration_secs <= 0.0 {
            return 1.0;
        }
        ((now - self.started_at) / self.duration_secs).clamp(0.0, 1.0) as f32
    }

    pub(in crate::app) fn sample(&self, now: f64) -> ViewTransform {
        self.from.lerp(self.to, ease_cubic_in_out(self.progress(now)))
    }

    pub(in crate::app) fn finished(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }

    pub(in crate::app) fn target(&self) -> ViewTransform {
        self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extent() -> ScaleExtent {
        ScaleExtent::from_config(&CameraConfig::default())
    }

    #[test]
    fn screen_world_roundtrip() {
        let transform = ViewTransform {
            translate: vec2(40.0, -10.0),
            scale: 2.5,
        };
        let origin = Pos2::new(100.0, 50.0);
        let world = vec2(12.0, 7.0);
        let screen = transform.to_screen(origin, world);
        assert!((transform.to_world(origin, screen) - world).length() < 1e-4);
    }

    #[test]
    fn zoom_sequence_stays_in_extent() {
        let mut transform = ViewTransform::default();
        let factors = [1.5, 3.0, 10.0, 0.01, 0.5, 100.0, 0.2, 0.0001, 7.0, 1.1];
        for (step, factor) in factors.iter().cycle().take(200).enumerate() {
            transform.zoom_about(*factor, vec2(step as f32, 20.0), extent());
            assert!((0.1..=4.0).contains(&transform.scale));
        }
        transform.zoom_about(1_000.0, Vec2::ZERO, extent());
        assert_eq!(transform.scale, 4.0);
        transform.zoom_about(0.000_01, Vec2::ZERO, extent());
        assert_eq!(transform.scale, 0.1);
    }

    #[test]
    fn zoom_keeps_anchor_fixed() {
        let mut transform = ViewTransform {
            translate: vec2(30.0, 30.0),
            scale: 1.0,
        };
        let anchor = vec2(200.0, 120.0);
        let world_before = (anchor - transform.translate) / transform.scale;
        transform.zoom_about(2.0, anchor, extent());
        let world_after = (anchor - transform.translate) / transform.scale;
        assert!((world_before - world_after).length() < 1e-3);
    }

    #[test]
    fn invalid_zoom_factor_is_ignored() {
        let mut transform = ViewTransform::default();
        transform.zoom_about(f32::NAN, Vec2::ZERO, extent());
        transform.zoom_about(-2.0, Vec2::ZERO, extent());
        assert_eq!(transform, ViewTransform::default());
    }

    #[test]
    fn centered_on_places_world_point_mid_viewport() {
        let size = vec2(800.0, 600.0);
        let transform = ViewTransform::centered_on(vec2(100.0, 50.0), size, 3.0, extent());
        let screen = transform.to_screen(Pos2::ZERO, vec2(100.0, 50.0));
        assert!((screen - Pos2::new(400.0, 300.0)).length() < 1e-3);
        assert_eq!(transform.scale, 3.0);
    }

    #[test]
    fn initial_view_applies_preset_offset() {
        let camera = CameraConfig::default();
        let size = vec2(400.0, 800.0);
        let transform = ViewTransform::initial(&camera.mobile, Vec2::ZERO, size, extent());
        assert_eq!(transform.scale, camera.mobile.scale);
        assert_eq!(transform.translate, vec2(200.0, 400.0 - 40.0));
    }

    #[test]
    fn animation_eases_between_endpoints() {
        let from = ViewTransform::default();
        let to = ViewTransform {
            translate: vec2(100.0, 0.0),
            scale: 3.0,
        };
        let animation = ZoomAnimation::new(from, to, 10.0, 750);
        assert_eq!(animation.sample(10.0), from);
        let halfway = animation.sample(10.375);
        assert!((halfway.scale - 2.0).abs() < 1e-4);
        assert!(!animation.finished(10.5));
        assert_eq!(animation.sample(11.0), to);
        assert!(animation.finished(11.0));
    }

    #[test]
    fn easing_is_monotonic() {
        let mut previous = 0.0;
        for step in 0..=100 {
            let value = ease_cubic_in_out(step as f32 / 100.0);
            assert!(value >= previous);
            previous = value;
        }
        assert_eq!(ease_cubic_in_out(1.0), 1.0);
    }
}
