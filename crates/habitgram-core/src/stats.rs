//! Category-to-stat-axis mapping and heatmap bucketing.
//!
//! The radar chart scores habits along six fixed RPG-style axes. Category
//! strings are user-entered free text, so matching is a fixed
//! case-insensitive table of known keys followed by a deterministic ordered
//! substring fallback. Nothing here is open-ended.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The six fixed radar axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatAxis {
    Str,
    Int,
    Wis,
    Cha,
    Dex,
    Vit,
}

impl StatAxis {
    /// All axes in their canonical display order.
    pub const ALL: [StatAxis; 6] = [
        StatAxis::Str,
        StatAxis::Int,
        StatAxis::Wis,
        StatAxis::Cha,
        StatAxis::Dex,
        StatAxis::Vit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatAxis::Str => "STR",
            StatAxis::Int => "INT",
            StatAxis::Wis => "WIS",
            StatAxis::Cha => "CHA",
            StatAxis::Dex => "DEX",
            StatAxis::Vit => "VIT",
        }
    }
}

impl fmt::Display for StatAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact category keys, matched case-insensitively before any fallback.
const CATEGORY_TABLE: &[(&str, StatAxis)] = &[
    ("fitness", StatAxis::Str),
    ("sport", StatAxis::Str),
    ("workout", StatAxis::Str),
    ("study", StatAxis::Int),
    ("learning", StatAxis::Int),
    ("reading", StatAxis::Int),
    ("meditation", StatAxis::Wis),
    ("journaling", StatAxis::Wis),
    ("social", StatAxis::Cha),
    ("communication", StatAxis::Cha),
    ("creativity", StatAxis::Dex),
    ("art", StatAxis::Dex),
    ("music", StatAxis::Dex),
    ("health", StatAxis::Vit),
    ("sleep", StatAxis::Vit),
    ("nutrition", StatAxis::Vit),
];

/// Substring keywords per axis, checked in this fixed order. First hit wins,
/// so the order is part of the contract.
const KEYWORD_FALLBACK: &[(StatAxis, &[&str])] = &[
    (StatAxis::Str, &["gym", "run", "strength", "exercise", "train"]),
    (StatAxis::Int, &["read", "learn", "code", "mind", "brain", "language"]),
    (StatAxis::Wis, &["meditat", "journal", "reflect", "breath", "gratitude"]),
    (StatAxis::Cha, &["social", "friend", "talk", "network", "family"]),
    (StatAxis::Dex, &["draw", "paint", "craft", "write", "practice"]),
    (StatAxis::Vit, &["water", "sleep", "eat", "walk", "stretch", "vitamin"]),
];

/// Maps a free-text habit category to its stat axis.
///
/// Unmatched categories are left unscored rather than guessed.
pub fn axis_for_category(category: &str) -> Option<StatAxis> {
    let normalized = category.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }

    for (key, axis) in CATEGORY_TABLE {
        if normalized == *key {
            return Some(*axis);
        }
    }

    for (axis, keywords) in KEYWORD_FALLBACK {
        for keyword in *keywords {
            if normalized.contains(keyword) {
                return Some(*axis);
            }
        }
    }

    None
}

/// Buckets a per-day completion count into a heatmap intensity level 0-4.
pub fn heatmap_level(count: u32) -> u8 {
    match count {
        0 => 0,
        1 => 1,
        2 => 2,
        3..=4 => 3,
        _ => 4,
    }
}
