use eframe::egui::{Vec2, vec2};

use crate::config::{LabelConfig, LabelStrategy};
use crate::util::truncate_chars;

/// What the host text engine can do, decided once at start-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) struct RenderCapabilities {
    pub rich_text_wrap: bool,
}

impl RenderCapabilities {
    pub(in crate::app) fn from_strategy(strategy: LabelStrategy) -> Self {
        let rich_text_wrap = match strategy {
            LabelStrategy::Auto | LabelStrategy::Rich => true,
            LabelStrategy::Manual => false,
        };
        Self { rich_text_wrap }
    }
}

pub(in crate::app) trait TextMeasure {
    fn width(&self, text: &str) -> f32;
}

#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) struct LabelLine {
    pub text: String,
    /// Offset from the block anchor.
    pub offset: Vec2,
}

/// A label positioned below its node, top-centred on `anchor`.
#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) enum LabelBlock {
    /// One block handed to the host text engine with a wrap width.
    Wrapped {
        anchor: Vec2,
        text: String,
        wrap_width: f32,
    },
    /// Pre-broken lines.
    Lines { anchor: Vec2, lines: Vec<LabelLine> },
}

impl LabelBlock {
    pub(in crate::app) fn anchor(&self) -> Vec2 {
        match self {
            Self::Wrapped { anchor, .. } | Self::Lines { anchor, .. } => *anchor,
        }
    }
}

pub(in crate::app) fn label_anchor(node_position: Vec2, radius: f32, offset: f32) -> Vec2 {
    vec2(node_position.x, node_position.y + radius + offset)
}

pub(in crate::app) trait LabelRenderer {
    fn layout(
        &self,
        name: &str,
        node_position: Vec2,
        radius: f32,
        measure: &dyn TextMeasure,
    ) -> LabelBlock;

    fn font_size(&self) -> f32;
}

pub(in crate::app) struct RichWrapRenderer {
    max_chars: usize,
    wrap_width: f32,
    font_size: f32,
    offset: f32,
}

impl RichWrapRenderer {
    pub(in crate::app) fn new(config: &LabelConfig) -> Self {
        Self {
            max_chars: config.max_chars,
            wrap_width: config.wrap_width,
            font_size: config.font_size,
            offset: config.offset,
        }
    }
}

impl LabelRenderer for RichWrapRenderer {
    fn layout(
        &self,
        name: &str,
        node_position: Vec2,
        radius: f32,
        _measure: &dyn TextMeasure,
    ) -> LabelBlock {
        LabelBlock::Wrapped {
            anchor: label_anchor(node_position, radius, self.offset),
            text: truncate_chars(name, self.max_chars).into_owned(),
            wrap_width: self.wrap_width,
        }
    }

    fn font_size(&self) -> f32 {
        self.font_size
    }
}

pub(in crate::app) struct ManualWrapRenderer {
    max_chars: usize,
    wrap_width: f32,
    font_size: f32,
    line_height: f32,
    offset: f32,
}

impl ManualWrapRenderer {
    pub(in crate::app) fn new(config: &LabelConfig) -> Self {
        Self {
            max_chars: config.max_chars,
            wrap_width: config.wrap_width,
            font_size: config.font_size,
            line_height: config.line_height,
            offset: config.offset,
        }
    }

    /// Greedy fill: a word goes on the current line while the line still
    /// fits, otherwise it starts a new one. A word wider than the wrap width
    /// sits alone on its line.
    pub(in crate::app) fn wrap(&self, text: &str, measure: &dyn TextMeasure) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();

        for word in text.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }

            let candidate = format!("{current} {word}");
            if measure.width(&candidate) <= self.wrap_width {
                current = candidate;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }
}

impl LabelRenderer for ManualWrapRenderer {
    fn layout(
        &self,
        name: &str,
        node_position: Vec2,
        radius: f32,
        measure: &dyn TextMeasure,
    ) -> LabelBlock {
        let text = truncate_chars(name, self.max_chars);
        let step = self.line_height * self.font_size;
        let lines = self
            .wrap(&text, measure)
            .into_iter()
            .enumerate()
            .map(|(index, text)| LabelLine {
                text,
                offset: vec2(0.0, index as f32 * step),
            })
            .collect();

        LabelBlock::Lines {
            anchor: label_anchor(node_position, radius, self.offset),
            lines,
        }
    }

    fn font_size(&self) -> f32 {
        self.font_size
    }
}

pub(in crate::app) fn label_renderer(
    caps: RenderCapabilities,
    config: &LabelConfig,
) -> Box<dyn LabelRenderer> {
    if caps.rich_text_wrap {
        Box::new(RichWrapRenderer::new(config))
    } else {
        Box::new(ManualWrapRenderer::new(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every character is 7 px wide.
    struct FixedWidth;

    impl TextMeasure for FixedWidth {
        fn width(&self, text: &str) -> f32 {
            text.chars().count() as f32 * 7.0
        }
    }

    fn manual(wrap_width: f32) -> ManualWrapRenderer {
        ManualWrapRenderer::new(&LabelConfig {
            strategy: LabelStrategy::Manual,
            wrap_width,
            max_chars: 200,
            ..LabelConfig::default()
        })
    }

    #[test]
    fn capabilities_follow_strategy() {
        assert!(RenderCapabilities::from_strategy(LabelStrategy::Auto).rich_text_wrap);
        assert!(RenderCapabilities::from_strategy(LabelStrategy::Rich).rich_text_wrap);
        assert!(!RenderCapabilities::from_strategy(LabelStrategy::Manual).rich_text_wrap);
    }

    #[test]
    fn anchor_sits_below_node() {
        let renderer = label_renderer(
            RenderCapabilities {
                rich_text_wrap: true,
            },
            &LabelConfig::default(),
        );
        let block = renderer.layout("paper", vec2(100.0, 50.0), 14.0, &FixedWidth);
        assert_eq!(block.anchor(), vec2(100.0, 70.0));
    }

    #[test]
    fn rich_renderer_keeps_one_block() {
        let renderer = RichWrapRenderer::new(&LabelConfig::default());
        let block = renderer.layout("a fairly long source name", Vec2::ZERO, 10.0, &FixedWidth);
        let LabelBlock::Wrapped {
            text, wrap_width, ..
        } = block
        else {
            panic!("expected a wrapped block");
        };
        assert_eq!(text, "a fairly long source name");
        assert_eq!(wrap_width, 300.0);
    }

    #[test]
    fn long_names_are_truncated_before_layout() {
        let name = "x".repeat(80);
        for caps in [true, false] {
            let renderer = label_renderer(
                RenderCapabilities {
                    rich_text_wrap: caps,
                },
                &LabelConfig::default(),
            );
            let text = match renderer.layout(&name, Vec2::ZERO, 10.0, &FixedWidth) {
                LabelBlock::Wrapped { text, .. } => text,
                LabelBlock::Lines { lines, .. } => {
                    lines.into_iter().map(|line| line.text).collect::<Vec<_>>().join(" ")
                }
            };
            assert_eq!(text.chars().count(), 56);
            assert!(text.ends_with("..."));
        }
    }

    #[test]
    fn manual_wrap_is_greedy() {
        // 70 px fits ten characters.
        let lines = manual(70.0).wrap("alpha beta gamma delta", &FixedWidth);
        assert_eq!(lines, vec!["alpha beta", "gamma", "delta"]);
    }

    #[test]
    fn overlong_word_gets_its_own_line() {
        let lines = manual(70.0).wrap("tiny supercalifragilistic end", &FixedWidth);
        assert_eq!(lines, vec!["tiny", "supercalifragilistic", "end"]);
    }

    #[test]
    fn manual_lines_step_by_line_height() {
        let renderer = manual(70.0);
        let LabelBlock::Lines { lines, .. } =
            renderer.layout("alpha beta gamma delta", Vec2::ZERO, 10.0, &FixedWidth)
        else {
            panic!("expected pre-broken lines");
        };
        let offsets = lines.iter().map(|line| line.offset.y).collect::<Vec<_>>();
        let step = 1.2 * 12.0;
        assert_eq!(offsets, vec![0.0, step, 2.0 * step]);
    }

    #[test]
    fn blank_name_has_no_lines() {
        assert!(manual(70.0).wrap("   ", &FixedWidth).is_empty());
    }
}
