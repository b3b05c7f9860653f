//! Built-in font profiles.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Monospace family whose italic cuts are named "Oblique".
pub const MONO_FALLBACK_FAMILY: &str = "DejaVu Sans Mono";

/// Monospace families shipping no true italic cut; consumers slant the
/// upright instead.
pub const NO_ITALIC_MONO: &[&str] = &["Noto Sans Mono"];

/// A built-in profile preset fixing the family for every role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolePreset {
    pub main: &'static str,
    pub sans: &'static str,
    pub mono: &'static str,
    pub math: &'static str,
    pub small_caps: Option<&'static str>,
}

/// Named font profile selectable per document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontProfile {
    #[default]
    Default,
    Sans,
    Adventor,
    Heros,
    Noto,
}

impl FontProfile {
    /// The preset families this profile fixes.
    pub fn preset(self) -> RolePreset {
        match self {
            Self::Default => RolePreset {
                main: "TeX Gyre Pagella",
                sans: "TeX Gyre Heros",
                mono: "DejaVu Sans Mono",
                math: "TeX Gyre Pagella Math",
                small_caps: None,
            },
            Self::Sans => RolePreset {
                main: "TeX Gyre Heros",
                sans: "TeX Gyre Heros",
                mono: "DejaVu Sans Mono",
                math: "TeX Gyre Pagella Math",
                small_caps: None,
            },
            Self::Adventor => RolePreset {
                main: "TeX Gyre Adventor",
                sans: "TeX Gyre Adventor",
                mono: "TeX Gyre Cursor",
                math: "TeX Gyre Pagella Math",
                small_caps: None,
            },
            Self::Heros => RolePreset {
                main: "TeX Gyre Heros",
                sans: "TeX Gyre Heros",
                mono: "TeX Gyre Cursor",
                math: "TeX Gyre Pagella Math",
                small_caps: None,
            },
            Self::Noto => RolePreset {
                main: "Noto Serif",
                sans: "Noto Sans",
                mono: "Noto Sans Mono",
                math: "Noto Sans Math",
                small_caps: None,
            },
        }
    }
}

/// An unrecognized profile name.
#[derive(Debug, thiserror::Error)]
#[error("Unknown font profile '{0}'")]
pub struct UnknownProfile(String);

impl FromStr for FontProfile {
    type Err = UnknownProfile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "sans" => Ok(Self::Sans),
            "adventor" => Ok(Self::Adventor),
            "heros" => Ok(Self::Heros),
            "noto" => Ok(Self::Noto),
            other => Err(UnknownProfile(other.to_string())),
        }
    }
}

impl fmt::Display for FontProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Default => "default",
            Self::Sans => "sans",
            Self::Adventor => "adventor",
            Self::Heros => "heros",
            Self::Noto => "noto",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heros_preset() {
        let preset = FontProfile::Heros.preset();
        assert_eq!(preset.sans, "TeX Gyre Heros");
        assert_eq!(preset.small_caps, None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("heros".parse::<FontProfile>().unwrap(), FontProfile::Heros);
        assert_eq!("noto".parse::<FontProfile>().unwrap(), FontProfile::Noto);
        assert!("garamond".parse::<FontProfile>().is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        for profile in [
            FontProfile::Default,
            FontProfile::Sans,
            FontProfile::Adventor,
            FontProfile::Heros,
            FontProfile::Noto,
        ] {
            assert_eq!(profile.to_string().parse::<FontProfile>().unwrap(), profile);
        }
    }
}
