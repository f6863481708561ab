use ratatui::style::Color;

use crate::store::StateDir;
use crate::types::Theme;

const THEME_KEY: &str = "selected_theme";

/// Saved theme, light when nothing (or something unreadable) is stored
pub fn load(dir: Option<&StateDir>) -> Theme {
    dir.and_then(|d| d.read::<Theme>(THEME_KEY))
        .unwrap_or_default()
}

pub fn save(dir: Option<&StateDir>, theme: Theme) {
    let Some(dir) = dir else {
        return;
    };
    if let Err(e) = dir.write(THEME_KEY, &theme) {
        tracing::warn!(error = %e, "failed to save theme");
    }
}

/// Colors the UI draws with
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub muted: Color,
    pub accent: Color,
    pub highlight: Color,
    pub bar_bg: Color,
    pub favorite: Color,
    pub error: Color,
    pub busy: Color,
}

impl Theme {
    pub fn palette(&self) -> Palette {
        match self {
            Theme::Light => Palette {
                bg: Color::White,
                fg: Color::Black,
                muted: Color::DarkGray,
                accent: Color::Blue,
                highlight: Color::Gray,
                bar_bg: Color::Gray,
                favorite: Color::Magenta,
                error: Color::Red,
                busy: Color::Blue,
            },
            Theme::Dark => Palette {
                bg: Color::Black,
                fg: Color::White,
                muted: Color::Gray,
                accent: Color::Cyan,
                highlight: Color::DarkGray,
                bar_bg: Color::DarkGray,
                favorite: Color::Yellow,
                error: Color::Red,
                busy: Color::Yellow,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_light() {
        assert_eq!(load(None), Theme::Light);
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load(Some(&StateDir::new(dir.path()))), Theme::Light);
    }

    #[test]
    fn saved_theme_is_restored() {
        let dir = tempfile::tempdir().unwrap();
        let state = StateDir::new(dir.path());
        save(Some(&state), Theme::Dark);
        assert_eq!(load(Some(&state)), Theme::Dark);

        let raw = std::fs::read_to_string(dir.path().join("selected_theme.json")).unwrap();
        assert_eq!(raw, "\"dark\"");
    }
}
