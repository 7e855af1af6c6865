//! The six RIASEC categories and the fixed slot assignment for a twelve-question quiz.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of questions in every quiz.
pub const QUESTION_COUNT: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "R")]
    Realistic,
    #[serde(rename = "I")]
    Investigative,
    #[serde(rename = "A")]
    Artistic,
    #[serde(rename = "S")]
    Social,
    #[serde(rename = "E")]
    Enterprising,
    #[serde(rename = "C")]
    Conventional,
}

use Category::*;

/// Slot i of every quiz asks about `ASSIGNMENT[i]`. Each category appears exactly twice.
pub const ASSIGNMENT: [Category; QUESTION_COUNT] = [
    Realistic,
    Investigative,
    Artistic,
    Social,
    Enterprising,
    Conventional,
    Realistic,
    Investigative,
    Artistic,
    Social,
    Enterprising,
    Conventional,
];

impl Category {
    pub const ALL: [Category; 6] = [
        Realistic,
        Investigative,
        Artistic,
        Social,
        Enterprising,
        Conventional,
    ];

    pub fn symbol(self) -> char {
        match self {
            Realistic => 'R',
            Investigative => 'I',
            Artistic => 'A',
            Social => 'S',
            Enterprising => 'E',
            Conventional => 'C',
        }
    }

    /// What a question for this category should probe. Only used to build prompts.
    pub fn intent(self) -> &'static str {
        match self {
            Realistic => "hands-on work, tools, machines, physical tasks",
            Investigative => "problem solving, logic, analysis, critical thinking",
            Artistic => "creativity, imagination, design, expression",
            Social => "helping, teaching, guiding, supporting people",
            Enterprising => "leading, persuading, decision making, business thinking",
            Conventional => "organizing, planning, working with data and rules",
        }
    }

    /// Dense index into per-category tables.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Slot of the first question tagged with this category. Ranking ties break on it.
    pub fn first_slot(self) -> usize {
        ASSIGNMENT
            .iter()
            .position(|c| *c == self)
            .unwrap_or(QUESTION_COUNT)
    }

    pub fn from_symbol(symbol: &str) -> Option<Category> {
        match symbol {
            "R" => Some(Realistic),
            "I" => Some(Investigative),
            "A" => Some(Artistic),
            "S" => Some(Social),
            "E" => Some(Enterprising),
            "C" => Some(Conventional),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown RIASEC category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::from_symbol(s).ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Category assigned to a zero-based slot, or `None` past the last question.
pub fn category_for_slot(slot: usize) -> Option<Category> {
    ASSIGNMENT.get(slot).copied()
}
