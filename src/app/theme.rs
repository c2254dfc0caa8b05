use eframe::egui::{Color32, Visuals};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum ThemeName {
    Light,
    Dark,
}

impl ThemeName {
    /// Anything that is not "light" renders with the dark palette.
    pub(in crate::app) fn parse(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("light") {
            Self::Light
        } else {
            Self::Dark
        }
    }

    pub(in crate::app) fn label(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub(in crate::app) fn visuals(self) -> Visuals {
        match self {
            Self::Light => Visuals::light(),
            Self::Dark => Visuals::dark(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct Palette {
    pub background: Color32,
    pub grid: Color32,
    pub node: Color32,
    pub node_active: Color32,
    pub node_outline: Color32,
    pub selected_stroke: Color32,
    pub edge: Color32,
    pub edge_active: Color32,
    pub text: Color32,
    pub text_active: Color32,
    pub search_match: Color32,
    pub trash: Color32,
    pub trash_armed: Color32,
}

impl Palette {
    pub(in crate::app) fn for_theme(theme: ThemeName) -> Self {
        match theme {
            ThemeName::Dark => Self {
                background: Color32::from_rgb(19, 23, 29),
                grid: Color32::from_rgba_unmultiplied(60, 70, 80, 70),
                node: Color32::from_rgb(94, 164, 255),
                node_active: Color32::from_rgb(255, 164, 101),
                node_outline: Color32::from_rgba_unmultiplied(15, 15, 15, 190),
                selected_stroke: Color32::from_rgb(245, 206, 93),
                edge: Color32::from_rgb(120, 130, 145),
                edge_active: Color32::from_rgb(241, 146, 94),
                text: Color32::from_gray(225),
                text_active: Color32::from_rgb(255, 196, 140),
                search_match: Color32::from_rgb(103, 196, 255),
                trash: Color32::from_rgb(90, 46, 50),
                trash_armed: Color32::from_rgb(214, 72, 72),
            },
            ThemeName::Light => Self {
                background: Color32::from_rgb(246, 247, 250),
                grid: Color32::from_rgba_unmultiplied(150, 160, 175, 60),
                node: Color32::from_rgb(37, 99, 235),
                node_active: Color32::from_rgb(234, 88, 12),
                node_outline: Color32::from_rgba_unmultiplied(255, 255, 255, 220),
                selected_stroke: Color32::from_rgb(202, 138, 4),
                edge: Color32::from_rgb(148, 163, 184),
                edge_active: Color32::from_rgb(234, 88, 12),
                text: Color32::from_gray(40),
                text_active: Color32::from_rgb(194, 65, 12),
                search_match: Color32::from_rgb(14, 116, 144),
                trash: Color32::from_rgb(254, 226, 226),
                trash_armed: Color32::from_rgb(220, 38, 38),
            },
        }
    }
}
