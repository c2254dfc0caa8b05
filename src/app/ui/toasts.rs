use eframe::egui::{self, Align2, Color32, Context, RichText, vec2};

const TOAST_SECS: f64 = 4.0;
const MAX_TOASTS: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum ToastKind {
    Info,
    Error,
}

#[derive(Clone, Debug)]
struct Toast {
    kind: ToastKind,
    text: String,
    expires_at: f64,
}

#[derive(Default)]
pub(in crate::app) struct Toasts {
    items: Vec<Toast>,
}

impl Toasts {
    pub(in crate::app) fn push(&mut self, kind: ToastKind, text: impl Into<String>, now: f64) {
        let text = text.into();
        match kind {
            ToastKind::Info => tracing::info!(message = %text, "toast"),
            ToastKind::Error => tracing::warn!(message = %text, "toast"),
        }
        self.items.push(Toast {
            kind,
            text,
            expires_at: now + TOAST_SECS,
        });
        if self.items.len() > MAX_TOASTS {
            let overflow = self.items.len() - MAX_TOASTS;
            self.items.drain(..overflow);
        }
    }

    fn prune(&mut self, now: f64) {
        self.items.retain(|toast| toast.expires_at > now);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.items.len()
    }

    pub(in crate::app) fn show(&mut self, ctx: &Context, now: f64) {
        self.prune(now);
        if self.items.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("toasts"))
            .anchor(Align2::LEFT_BOTTOM, vec2(12.0, -12.0))
            .interactable(false)
            .show(ctx, |ui| {
                for toast in &self.items {
                    let (fill, text_color) = match toast.kind {
                        ToastKind::Info => (Color32::from_rgb(38, 58, 82), Color32::from_gray(235)),
                        ToastKind::Error => (Color32::from_rgb(110, 36, 40), Color32::WHITE),
                    };
                    egui::Frame::popup(ui.style())
                        .fill(fill)
                        .show(ui, |ui| {
                            ui.label(RichText::new(toast.text.as_str()).color(text_color));
                        });
                    ui.add_space(4.0);
                }
            });

        if let Some(next_expiry) = self
            .items
            .iter()
            .map(|toast| toast.expires_at)
            .min_by(f64::total_cmp)
        {
            ctx.request_repaint_after(std::time::Duration::from_secs_f64(
                (next_expiry - now).max(0.0),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_expire() {
        let mut toasts = Toasts::default();
        toasts.push(ToastKind::Info, "first", 0.0);
        toasts.push(ToastKind::Error, "second", 2.0);

        toasts.prune(3.9);
        assert_eq!(toasts.len(), 2);
        toasts.prune(4.0);
        assert_eq!(toasts.len(), 1);
        toasts.prune(6.5);
        assert_eq!(toasts.len(), 0);
    }

    #[test]
    fn oldest_toasts_are_dropped_first() {
        let mut toasts = Toasts::default();
        for index in 0..8 {
            toasts.push(ToastKind::Info, format!("toast {index}"), 0.0);
        }
        assert_eq!(toasts.len(), MAX_TOASTS);
        assert_eq!(toasts.items[0].text, "toast 3");
    }
}
