use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The kind of cooking a recipe teaches.
///
/// Serialized as the Hebrew label shown in the app, which is also the
/// enumeration value handed to the generation schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "אפייה")]
    Baking,
    #[serde(rename = "בישול")]
    Cooking,
    #[serde(rename = "טיגון")]
    Frying,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Baking, Category::Cooking, Category::Frying];

    /// Hebrew display label.
    pub fn label(self) -> &'static str {
        match self {
            Category::Baking => "אפייה",
            Category::Cooking => "בישול",
            Category::Frying => "טיגון",
        }
    }

    fn english(self) -> &'static str {
        match self {
            Category::Baking => "baking",
            Category::Cooking => "cooking",
            Category::Frying => "frying",
        }
    }
}

/// How hard a recipe is, ordered `Easy < Medium < Challenging`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Difficulty {
    #[serde(rename = "קל")]
    Easy,
    #[serde(rename = "בינוני")]
    Medium,
    #[serde(rename = "מאתגר")]
    Challenging,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Challenging,
    ];

    /// Sort rank: Easy = 1, Medium = 2, Challenging = 3.
    pub fn rank(self) -> u8 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Challenging => 3,
        }
    }

    /// Hebrew display label.
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "קל",
            Difficulty::Medium => "בינוני",
            Difficulty::Challenging => "מאתגר",
        }
    }

    fn english(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Challenging => "challenging",
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LabelError {
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown difficulty: {0}")]
    UnknownDifficulty(String),
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts either the Hebrew label or the English name (any case).
impl FromStr for Category {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.label() == s || c.english().eq_ignore_ascii_case(s))
            .ok_or_else(|| LabelError::UnknownCategory(s.to_string()))
    }
}

/// Accepts either the Hebrew label or the English name (any case).
impl FromStr for Difficulty {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Difficulty::ALL
            .into_iter()
            .find(|d| d.label() == s || d.english().eq_ignore_ascii_case(s))
            .ok_or_else(|| LabelError::UnknownDifficulty(s.to_string()))
    }
}
