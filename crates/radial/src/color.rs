use crate::error::RadialError;
use palette::Srgb;
use serde::Serialize;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString, IntoEnumIterator};

/// Light or dark surroundings the control is drawn against.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[strum(to_string = "light", serialize = "l")]
    Light,
    #[default]
    #[strum(to_string = "dark", serialize = "d")]
    Dark,
}

impl Theme {
    /// Neutral ring behind the indicator.
    pub fn track(&self) -> Srgb<u8> {
        match self {
            Self::Light => Srgb::new(0xe5, 0xe7, 0xeb),
            Self::Dark => Srgb::new(0x1a, 0x21, 0x2e),
        }
    }

    /// Indicator color for a disabled control.
    pub fn muted(&self) -> Srgb<u8> {
        match self {
            Self::Light => Srgb::new(0xd1, 0xd5, 0xdb),
            Self::Dark => Srgb::new(0x3a, 0x42, 0x54),
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Indicator color. Named accents cover the panel's device palettes, `Custom`
/// takes any hex color.
#[derive(Debug, Clone, Copy, PartialEq, Default, SerializeDisplay, DeserializeFromStr, EnumIter)]
pub enum Accent {
    #[default]
    Cool,
    Heat,
    Media,
    Amber,
    Custom(Srgb<u8>),
}

impl Accent {
    pub fn rgb(&self) -> Srgb<u8> {
        match self {
            Self::Cool => Srgb::new(0x3b, 0x82, 0xf6),
            Self::Heat => Srgb::new(0xef, 0x44, 0x44),
            Self::Media => Srgb::new(0x93, 0x33, 0xea),
            Self::Amber => Srgb::new(0xf5, 0x9e, 0x0b),
            Self::Custom(rgb) => *rgb,
        }
    }

    pub fn name(&self) -> Option<&'static str> {
        match self {
            Self::Cool => Some("cool"),
            Self::Heat => Some("heat"),
            Self::Media => Some("media"),
            Self::Amber => Some("amber"),
            Self::Custom(_) => None,
        }
    }
}

impl fmt::Display for Accent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => f.write_str(&hex(self.rgb())),
        }
    }
}

impl FromStr for Accent {
    type Err = RadialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::iter()
            .find(|accent| accent.name().is_some_and(|n| n.eq_ignore_ascii_case(s)))
            .map_or_else(
                || {
                    Srgb::<u8>::from_str(s)
                        .map(Self::Custom)
                        .map_err(|_| RadialError::InvalidColor(s.to_string()))
                },
                Ok,
            )
    }
}

/// `#rrggbb`
pub fn hex(rgb: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
}

/// `#rrggbbaa`
pub fn hex_with_alpha(rgb: Srgb<u8>, alpha: u8) -> String {
    format!("{}{:02x}", hex(rgb), alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_deserialization() {
        let cases = vec![
            ("\"dark\"", Theme::Dark),
            ("\"Dark\"", Theme::Dark),
            ("\"D\"", Theme::Dark),
            ("\"LIGHT\"", Theme::Light),
            ("\"l\"", Theme::Light),
        ];

        for (json, expected) in cases {
            let deserialized: Theme = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
        assert_eq!(Theme::Light.to_string(), "light");
    }

    #[test]
    fn test_accent_parsing() {
        assert_eq!("heat".parse::<Accent>(), Ok(Accent::Heat));
        assert_eq!(" Amber ".parse::<Accent>(), Ok(Accent::Amber));
        assert_eq!(
            "#10b981".parse::<Accent>(),
            Ok(Accent::Custom(Srgb::new(0x10, 0xb9, 0x81)))
        );
        assert_eq!(
            "chartreuse".parse::<Accent>(),
            Err(RadialError::InvalidColor("chartreuse".to_string()))
        );
    }

    #[test]
    fn test_accent_serializes_by_name_or_hex() {
        let custom = Accent::Custom(Srgb::new(0x01, 0xab, 0xff));
        assert_eq!(serde_json::to_string(&Accent::Media).unwrap(), "\"media\"");
        assert_eq!(serde_json::to_string(&custom).unwrap(), "\"#01abff\"");
        let back: Accent = serde_json::from_str("\"#01abff\"").unwrap();
        assert_eq!(back, custom);
    }

    #[test]
    fn test_theme_palette() {
        assert_eq!(hex(Theme::Dark.track()), "#1a212e");
        assert_eq!(hex(Theme::Light.muted()), "#d1d5db");
        assert_eq!(hex_with_alpha(Accent::Cool.rgb(), 0x99), "#3b82f699");
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }
}
