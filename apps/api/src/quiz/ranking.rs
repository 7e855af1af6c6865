//! Reduces accumulated scores to the three-letter RIASEC code.
//!
//! Order: score descending, then the category's first slot in the assignment
//! sequence (R, I, A, S, E, C). Equal scores therefore always rank the same way.

use std::cmp::Reverse;

use serde::Serialize;

use crate::quiz::category::Category;
use crate::quiz::scores::Scores;

const CODE_LENGTH: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedResult {
    pub code: String,
    pub scores: Scores,
}

/// Categories from strongest to weakest.
pub fn ranked_categories(scores: &Scores) -> Vec<(Category, u32)> {
    let mut pairs: Vec<(Category, u32)> = scores.iter().collect();
    pairs.sort_by_key(|(category, points)| (Reverse(*points), category.first_slot()));
    pairs
}

pub fn rank(scores: &Scores) -> RankedResult {
    let code = ranked_categories(scores)
        .into_iter()
        .take(CODE_LENGTH)
        .map(|(category, _)| category.symbol())
        .collect();

    RankedResult {
        code,
        scores: *scores,
    }
}
