use std::fmt;

use serde::{Deserialize, Serialize};

/// What a two-stage submit does with the staged text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Note,
    Search,
    Qa,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Note => "note",
            Mode::Search => "search",
            Mode::Qa => "qa",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "note" => Some(Mode::Note),
            "search" => Some(Mode::Search),
            "qa" => Some(Mode::Qa),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sidebar tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Current,
    Archived,
    Tags,
}

impl Tab {
    pub fn as_str(self) -> &'static str {
        match self {
            Tab::Current => "current",
            Tab::Archived => "archived",
            Tab::Tags => "tags",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "current" => Some(Tab::Current),
            "archived" => Some(Tab::Archived),
            "tags" => Some(Tab::Tags),
            _ => None,
        }
    }
}
