//! Severity levels and their display colors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EventError;

/// Event severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Verbose,
    Debug,
    Information,
    Warning,
    Error,
    Fatal,
}

/// Sidebar colors, indexed by `Level as usize`.
const LEVEL_COLORS: [&str; 6] = [
    "#D3D3D3", // Verbose
    "#D3D3D3", // Debug
    "#00A000", // Information
    "#f9c019", // Warning
    "#e03836", // Error
    "#e03836", // Fatal
];

impl Level {
    /// All levels, least severe first.
    pub const ALL: [Level; 6] = [
        Level::Verbose,
        Level::Debug,
        Level::Information,
        Level::Warning,
        Level::Error,
        Level::Fatal,
    ];

    /// Full display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verbose => "Verbose",
            Self::Debug => "Debug",
            Self::Information => "Information",
            Self::Warning => "Warning",
            Self::Error => "Error",
            Self::Fatal => "Fatal",
        }
    }

    /// Attachment sidebar color for this level.
    pub fn color(&self) -> &'static str {
        LEVEL_COLORS[*self as usize]
    }
}

/// Look up the sidebar color for a level.
pub fn color_for(level: Level) -> &'static str {
    level.color()
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = EventError;

    /// Accepts full names and the common Serilog short forms, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "verbose" | "vrb" | "trace" => Ok(Self::Verbose),
            "debug" | "dbg" => Ok(Self::Debug),
            "information" | "info" | "inf" => Ok(Self::Information),
            "warning" | "warn" | "wrn" => Ok(Self::Warning),
            "error" | "err" | "eror" => Ok(Self::Error),
            "fatal" | "ftl" | "critical" => Ok(Self::Fatal),
            _ => Err(EventError::UnknownLevel(s.to_string())),
        }
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_table() {
        assert_eq!(Level::Verbose.color(), "#D3D3D3");
        assert_eq!(Level::Debug.color(), "#D3D3D3");
        assert_eq!(Level::Information.color(), "#00A000");
        assert_eq!(Level::Warning.color(), "#f9c019");
        assert_eq!(Level::Error.color(), "#e03836");
        assert_eq!(Level::Fatal.color(), "#e03836");
    }

    #[test]
    fn test_every_level_has_a_color() {
        for level in Level::ALL {
            assert!(color_for(level).starts_with('#'), "{} has no color", level);
        }
    }

    #[test]
    fn test_levels_are_ordered() {
        assert!(Level::Verbose < Level::Debug);
        assert!(Level::Debug < Level::Information);
        assert!(Level::Information < Level::Warning);
        assert!(Level::Warning < Level::Error);
        assert!(Level::Error < Level::Fatal);
    }

    #[test]
    fn test_parse_names_and_aliases() {
        assert_eq!("Information".parse::<Level>().unwrap(), Level::Information);
        assert_eq!("warning".parse::<Level>().unwrap(), Level::Warning);
        assert_eq!("WRN".parse::<Level>().unwrap(), Level::Warning);
        assert_eq!("Trace".parse::<Level>().unwrap(), Level::Verbose);
        assert_eq!("critical".parse::<Level>().unwrap(), Level::Fatal);
    }

    #[test]
    fn test_unknown_level_is_rejected() {
        match "Loud".parse::<Level>() {
            Err(EventError::UnknownLevel(raw)) => assert_eq!(raw, "Loud"),
            other => panic!("Expected UnknownLevel, got {:?}", other),
        }
    }

    #[test]
    fn test_serde_uses_full_names() {
        assert_eq!(serde_json::to_string(&Level::Error).unwrap(), "\"Error\"");
        let level: Level = serde_json::from_str("\"dbg\"").unwrap();
        assert_eq!(level, Level::Debug);
        assert!(serde_json::from_str::<Level>("\"Nope\"").is_err());
    }
}
