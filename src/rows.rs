use std::cmp::Ordering;
use std::collections::HashSet;

use crate::model::FightRecord;

/// A win or loss ready for the tables.
#[derive(Debug, Clone, PartialEq)]
pub struct FightRow {
    pub elo: f64,
    pub opponent_name: String,
    pub is_common: bool,
}

/// Sorts records by descending Elo and flags opponents that are in `common`.
///
/// The sort is stable, so records with equal Elo keep the order the server sent them in.
pub fn project(records: &[FightRecord], common: &[String]) -> Vec<FightRow> {
    let common: HashSet<&str> = common.iter().map(String::as_str).collect();
    let mut sorted: Vec<&FightRecord> = records.iter().collect();
    sorted.sort_by(|a, b| elo_order(a.elo, b.elo));
    sorted
        .into_iter()
        .map(|record| FightRow {
            elo: record.elo,
            opponent_name: record.opponent_name.clone(),
            is_common: common.contains(record.opponent_name.as_str()),
        })
        .collect()
}

/// Higher Elo first; equal or incomparable values tie.
pub fn elo_order(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

pub fn wins_caption(count: usize) -> String {
    format!("{count} Wins")
}

pub fn losses_caption(count: usize) -> String {
    format!("{count} Losses")
}

pub fn format_elo(elo: f64) -> String {
    format!("{elo}")
}
