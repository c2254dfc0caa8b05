use std::borrow::Cow;

/// Tiny deterministic offset used to split coincident points.
pub fn jiggle(seed: usize) -> f32 {
    let t = ((seed as f64 + 1.0) * 0.618_033_988_75).fract();
    ((t - 0.5) * 1e-6) as f32
}

/// Cuts `text` to at most `max_chars` characters, ending in an ellipsis when
/// anything was removed.
pub fn truncate_chars(text: &str, max_chars: usize) -> Cow<'_, str> {
    if text.chars().count() <= max_chars {
        return Cow::Borrowed(text);
    }

    let keep = max_chars.saturating_sub(3);
    let mut truncated = text.chars().take(keep).collect::<String>();
    let trimmed_len = truncated.trim_end().len();
    truncated.truncate(trimmed_len);
    truncated.push_str("...");
    Cow::Owned(truncated)
}

pub fn format_size(size: Option<f64>) -> String {
    match size {
        Some(size) if size.fract() == 0.0 => format!("{size:.0}"),
        Some(size) => format!("{size:.2}"),
        None => "unknown".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jiggle_is_tiny_and_nonzero() {
        for seed in 0..1_000 {
            let value = jiggle(seed);
            assert!(value != 0.0);
            assert!(value.abs() <= 5e-7);
        }
    }

    #[test]
    fn short_text_is_borrowed() {
        assert!(matches!(truncate_chars("short", 10), Cow::Borrowed("short")));
    }

    #[test]
    fn long_text_is_cut_to_budget() {
        let text = "A very long research article title that keeps going";
        let cut = truncate_chars(text, 20);
        assert_eq!(cut.chars().count(), 20);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let cut = truncate_chars("ääääääääää", 6);
        assert_eq!(cut, "äää...");
    }

    #[test]
    fn size_formatting() {
        assert_eq!(format_size(Some(12.0)), "12");
        assert_eq!(format_size(Some(1.5)), "1.50");
        assert_eq!(format_size(None), "unknown");
    }
}
