//! Container size classes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Size class of a bag, ordered smallest to largest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContainerSize {
    Small,
    Medium,
    Large,
    Giant,
    Massive,
}

impl ContainerSize {
    /// All sizes, smallest first
    pub const ALL: [ContainerSize; 5] = [
        Self::Small,
        Self::Medium,
        Self::Large,
        Self::Giant,
        Self::Massive,
    ];

    /// Next size down, if any
    pub fn smaller(self) -> Option<Self> {
        match self {
            Self::Small => None,
            Self::Medium => Some(Self::Small),
            Self::Large => Some(Self::Medium),
            Self::Giant => Some(Self::Large),
            Self::Massive => Some(Self::Giant),
        }
    }

    /// Next size up, if any
    pub fn larger(self) -> Option<Self> {
        match self {
            Self::Small => Some(Self::Medium),
            Self::Medium => Some(Self::Large),
            Self::Large => Some(Self::Giant),
            Self::Giant => Some(Self::Massive),
            Self::Massive => None,
        }
    }
}

impl fmt::Display for ContainerSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Small => write!(f, "Small"),
            Self::Medium => write!(f, "Medium"),
            Self::Large => write!(f, "Large"),
            Self::Giant => write!(f, "Giant"),
            Self::Massive => write!(f, "Massive"),
        }
    }
}

/// Unrecognized size name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSizeError(pub String);

impl fmt::Display for ParseSizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown container size: {}", self.0)
    }
}

impl std::error::Error for ParseSizeError {}

impl FromStr for ContainerSize {
    type Err = ParseSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            "giant" => Ok(Self::Giant),
            "massive" => Ok(Self::Massive),
            _ => Err(ParseSizeError(s.to_string())),
        }
    }
}
