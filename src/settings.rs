//! Per-image branding settings and the two-tier settings resolver.
//!
//! Every image owns a [`Settings`] record. A separate record, the global
//! *template*, seeds new images and receives edits while nothing is selected.
//! [`resolve`] is the single place that decides which of the two is in effect.
//!
//! ## Logo variants
//!
//! | id | label | class | text color under gear |
//! |----|-------|-------|-----------------------|
//! | `blue` | Logo Blau | wordmark | – |
//! | `white` | Logo Weiß | wordmark | – |
//! | `black` | Logo Schwarz | wordmark | – |
//! | `gear-blue` | Zahnrad Blau | gear | organization blue |
//! | `gear-white` | Zahnrad Weiß | gear | white |
//! | `gear-black` | Zahnrad Schwarz | gear | organization blue |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which logo raster is composited onto the photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogoVariant {
    Blue,
    White,
    Black,
    GearBlue,
    GearWhite,
    GearBlack,
}

impl LogoVariant {
    pub const ALL: [LogoVariant; 6] = [
        LogoVariant::Blue,
        LogoVariant::White,
        LogoVariant::Black,
        LogoVariant::GearBlue,
        LogoVariant::GearWhite,
        LogoVariant::GearBlack,
    ];

    /// Stable identifier, also used in config files and on the command line.
    pub fn id(self) -> &'static str {
        match self {
            LogoVariant::Blue => "blue",
            LogoVariant::White => "white",
            LogoVariant::Black => "black",
            LogoVariant::GearBlue => "gear-blue",
            LogoVariant::GearWhite => "gear-white",
            LogoVariant::GearBlack => "gear-black",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LogoVariant::Blue => "Logo Blau",
            LogoVariant::White => "Logo Weiß",
            LogoVariant::Black => "Logo Schwarz",
            LogoVariant::GearBlue => "Zahnrad Blau",
            LogoVariant::GearWhite => "Zahnrad Weiß",
            LogoVariant::GearBlack => "Zahnrad Schwarz",
        }
    }

    /// Compact emblem variants: drawn smaller and may carry a sub-label.
    pub fn is_gear(self) -> bool {
        matches!(
            self,
            LogoVariant::GearBlue | LogoVariant::GearWhite | LogoVariant::GearBlack
        )
    }

    /// White artwork, meant for dark photos.
    pub fn is_white(self) -> bool {
        matches!(self, LogoVariant::White | LogoVariant::GearWhite)
    }
}

impl fmt::Display for LogoVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for LogoVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogoVariant::ALL
            .into_iter()
            .find(|v| v.id() == s)
            .ok_or_else(|| format!("unknown logo variant '{s}'"))
    }
}

/// Corner the logo is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::TopLeft,
        Position::TopRight,
        Position::BottomLeft,
        Position::BottomRight,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Position::TopLeft => "top-left",
            Position::TopRight => "top-right",
            Position::BottomLeft => "bottom-left",
            Position::BottomRight => "bottom-right",
        }
    }

    pub fn is_left(self) -> bool {
        matches!(self, Position::TopLeft | Position::BottomLeft)
    }

    pub fn is_top(self) -> bool {
        matches!(self, Position::TopLeft | Position::TopRight)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::ALL
            .into_iter()
            .find(|p| p.id() == s)
            .ok_or_else(|| format!("unknown position '{s}'"))
    }
}

/// Branding settings for one image (or for the template).
///
/// Text fields are stored as typed; blank checks and trimming happen at
/// render time so the user's input is never rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub logo: LogoVariant,
    pub position: Position,
    /// Free text; empty means no credit layer.
    pub photographer: String,
    pub show_caption_bar: bool,
    /// May contain explicit line breaks.
    pub caption_bar_text: String,
    /// Only drawn beneath gear-class logos.
    pub sub_logo_label: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            logo: LogoVariant::GearBlue,
            position: Position::TopRight,
            photographer: String::new(),
            show_caption_bar: false,
            caption_bar_text: String::new(),
            sub_logo_label: String::new(),
        }
    }
}

impl Settings {
    /// Trimmed credit name, `None` when blank.
    pub fn credit_name(&self) -> Option<&str> {
        non_blank(&self.photographer)
    }

    /// Caption text to lay out, `None` when the bar is hidden or the text blank.
    ///
    /// Returned untrimmed: leading/trailing line breaks are part of the layout.
    pub fn caption_text(&self) -> Option<&str> {
        if !self.show_caption_bar {
            return None;
        }
        non_blank(&self.caption_bar_text).map(|_| self.caption_bar_text.as_str())
    }

    /// Trimmed sub-label, `None` unless the logo is gear-class and the text non-blank.
    pub fn sub_label(&self) -> Option<&str> {
        if !self.logo.is_gear() {
            return None;
        }
        non_blank(&self.sub_logo_label)
    }

    /// Apply a single field edit.
    pub fn apply(&mut self, edit: SettingsEdit) {
        match edit {
            SettingsEdit::Logo(v) => self.logo = v,
            SettingsEdit::Position(p) => self.position = p,
            SettingsEdit::Photographer(s) => self.photographer = s,
            SettingsEdit::ShowCaptionBar(b) => self.show_caption_bar = b,
            SettingsEdit::CaptionBarText(s) => self.caption_bar_text = s,
            SettingsEdit::SubLogoLabel(s) => self.sub_logo_label = s,
        }
    }
}

fn non_blank(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// A single-field change, routed by the session to the selected image or the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsEdit {
    Logo(LogoVariant),
    Position(Position),
    Photographer(String),
    ShowCaptionBar(bool),
    CaptionBarText(String),
    SubLogoLabel(String),
}

/// Effective settings: the selected image's own record, else the template.
pub fn resolve<'a>(selection: Option<&'a Settings>, template: &'a Settings) -> &'a Settings {
    selection.unwrap_or(template)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_values() {
        let s = Settings::default();
        assert_eq!(s.logo, LogoVariant::GearBlue);
        assert_eq!(s.position, Position::TopRight);
        assert!(s.photographer.is_empty());
        assert!(!s.show_caption_bar);
        assert!(s.caption_bar_text.is_empty());
        assert!(s.sub_logo_label.is_empty());
    }

    #[test]
    fn gear_and_white_classification() {
        let gears: Vec<_> = LogoVariant::ALL.iter().filter(|v| v.is_gear()).collect();
        assert_eq!(
            gears,
            vec![
                &LogoVariant::GearBlue,
                &LogoVariant::GearWhite,
                &LogoVariant::GearBlack
            ]
        );
        assert!(LogoVariant::White.is_white());
        assert!(LogoVariant::GearWhite.is_white());
        assert!(!LogoVariant::GearBlack.is_white());
    }

    #[test]
    fn ids_roundtrip_through_from_str() {
        for v in LogoVariant::ALL {
            assert_eq!(v.id().parse::<LogoVariant>().unwrap(), v);
        }
        for p in Position::ALL {
            assert_eq!(p.id().parse::<Position>().unwrap(), p);
        }
        assert!("gear-green".parse::<LogoVariant>().is_err());
        assert!("center".parse::<Position>().is_err());
    }

    #[test]
    fn serde_uses_kebab_case_ids() {
        let s = Settings {
            logo: LogoVariant::GearWhite,
            position: Position::BottomLeft,
            ..Settings::default()
        };
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"gear-white\""));
        assert!(json.contains("\"bottom-left\""));
    }

    #[test]
    fn credit_name_is_trimmed_and_blank_is_none() {
        let mut s = Settings::default();
        assert_eq!(s.credit_name(), None);
        s.photographer = "   ".into();
        assert_eq!(s.credit_name(), None);
        s.photographer = "  Max Mustermann ".into();
        assert_eq!(s.credit_name(), Some("Max Mustermann"));
    }

    #[test]
    fn caption_requires_bar_and_text() {
        let mut s = Settings {
            caption_bar_text: "Einsatz".into(),
            ..Settings::default()
        };
        assert_eq!(s.caption_text(), None);
        s.show_caption_bar = true;
        assert_eq!(s.caption_text(), Some("Einsatz"));
        s.caption_bar_text = " \n ".into();
        assert_eq!(s.caption_text(), None);
    }

    #[test]
    fn sub_label_only_for_gear_logos() {
        let mut s = Settings {
            sub_logo_label: " OV Wesel ".into(),
            ..Settings::default()
        };
        assert_eq!(s.sub_label(), Some("OV Wesel"));
        s.logo = LogoVariant::Blue;
        assert_eq!(s.sub_label(), None);
    }

    #[test]
    fn resolve_prefers_selection() {
        let template = Settings::default();
        let selected = Settings {
            photographer: "A".into(),
            ..Settings::default()
        };
        assert_eq!(resolve(Some(&selected), &template).photographer, "A");
        assert_eq!(resolve(None, &template).photographer, "");
    }

    #[test]
    fn apply_edit_changes_one_field() {
        let mut s = Settings::default();
        s.apply(SettingsEdit::Position(Position::BottomRight));
        s.apply(SettingsEdit::ShowCaptionBar(true));
        assert_eq!(s.position, Position::BottomRight);
        assert!(s.show_caption_bar);
        assert_eq!(s.logo, LogoVariant::GearBlue);
    }
}
