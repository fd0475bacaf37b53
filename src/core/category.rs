//! The fixed set of study subjects.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RevisaError;

/// A study subject. The set is fixed; there are no user-defined categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Portugues,
    Matematica,
    Ingles,
    Direito,
    Literatura,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 5] = [
        Category::Portugues,
        Category::Matematica,
        Category::Ingles,
        Category::Direito,
        Category::Literatura,
    ];

    /// The key used in persisted data.
    pub fn key(self) -> &'static str {
        match self {
            Category::Portugues => "portugues",
            Category::Matematica => "matematica",
            Category::Ingles => "ingles",
            Category::Direito => "direito",
            Category::Literatura => "literatura",
        }
    }

    /// Human-readable subject name.
    pub fn label(self) -> &'static str {
        match self {
            Category::Portugues => "Português",
            Category::Matematica => "Matemática",
            Category::Ingles => "Inglês",
            Category::Direito => "Direito",
            Category::Literatura => "Literatura",
        }
    }

    /// Look up a category by its persisted key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = RevisaError;

    /// Accepts the persisted key in any case, or the accented label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(RevisaError::missing_field("category"));
        }

        let lowered = trimmed.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.key() == lowered || c.label().to_lowercase() == lowered)
            .ok_or_else(|| RevisaError::unknown_category(trimmed))
    }
}
