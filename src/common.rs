use std::collections::HashSet;

use crate::model::FighterHistory;

/// Opponent names that show up in both histories.
///
/// Walks `a`'s wins then losses and keeps every name that also appears anywhere in
/// `b`, so the result follows `a`'s order and repeats a name as often as `a` does.
/// Matching is by display name; two fighters sharing a name are treated as one.
pub fn common_opponents(a: &FighterHistory, b: &FighterHistory) -> Vec<String> {
    let other: HashSet<&str> = b.opponent_names().collect();
    if other.is_empty() {
        return Vec::new();
    }
    a.opponent_names()
        .filter(|name| other.contains(name))
        .map(str::to_string)
        .collect()
}
