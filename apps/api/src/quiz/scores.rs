use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::quiz::category::Category;

/// Points per answer option. The first option is the strongest match.
pub const OPTION_SCORES: [u32; 4] = [3, 2, 1, 0];

/// Points for a zero-based option index, or `None` if there is no such option.
pub fn points_for_option(option: i64) -> Option<u32> {
    usize::try_from(option)
        .ok()
        .and_then(|i| OPTION_SCORES.get(i).copied())
}

/// Running per-category totals. Always holds all six categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scores([u32; 6]);

impl Scores {
    pub fn get(&self, category: Category) -> u32 {
        self.0[category.index()]
    }

    pub fn add(&mut self, category: Category, points: u32) {
        self.0[category.index()] += points;
    }

    /// Pairs in R, I, A, S, E, C order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, u32)> + '_ {
        Category::ALL.iter().map(|c| (*c, self.get(*c)))
    }
}

impl FromIterator<(Category, u32)> for Scores {
    fn from_iter<T: IntoIterator<Item = (Category, u32)>>(iter: T) -> Self {
        let mut scores = Scores::default();
        for (category, points) in iter {
            scores.add(category, points);
        }
        scores
    }
}

impl Serialize for Scores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Category::ALL.len()))?;
        for (category, points) in self.iter() {
            map.serialize_entry(&category, &points)?;
        }
        map.end()
    }
}
