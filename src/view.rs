use crate::model::{Fighter, FighterHistory};
use crate::rows::{self, FightRow};

pub const UNKNOWN_FIGHTER: &str = "New Challenger!";

/// Everything one side of the screen shows for a fighter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FighterPanel {
    pub fighter: Fighter,
    pub wins: Vec<FightRow>,
    pub losses: Vec<FightRow>,
}

impl FighterPanel {
    /// Projects a history into table rows; pass an empty `common` to skip highlighting.
    pub fn from_history(history: &FighterHistory, common: &[String]) -> Self {
        Self {
            fighter: history.fighter.clone(),
            wins: rows::project(&history.wins, common),
            losses: rows::project(&history.losses, common),
        }
    }

    pub fn is_known(&self) -> bool {
        self.fighter.is_known()
    }

    pub fn display_name(&self) -> &str {
        if self.fighter.name.trim().is_empty() {
            UNKNOWN_FIGHTER
        } else {
            &self.fighter.name
        }
    }

    pub fn wins_caption(&self) -> String {
        rows::wins_caption(self.wins.len())
    }

    pub fn losses_caption(&self) -> String {
        rows::losses_caption(self.losses.len())
    }

    /// `Name [elo tier]`, the form used in headlines.
    pub fn summary(&self) -> String {
        if !self.is_known() {
            return UNKNOWN_FIGHTER.to_string();
        }
        format!(
            "{} [{} {}]",
            self.display_name(),
            rows::format_elo(self.fighter.elo),
            self.fighter.tier.label()
        )
    }

    pub fn has_beaten(&self, name: &str) -> bool {
        !name.is_empty() && self.wins.iter().any(|row| row.opponent_name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FightRecord, Tier};

    fn history() -> FighterHistory {
        FighterHistory {
            fighter: Fighter {
                id: 4,
                name: "Akuma".to_string(),
                elo: 1710.0,
                tier: Tier::S,
            },
            wins: vec![
                FightRecord {
                    elo: 1300.0,
                    opponent_name: "Dan".to_string(),
                    opponent_id: None,
                },
                FightRecord {
                    elo: 1650.0,
                    opponent_name: "Gouken".to_string(),
                    opponent_id: Some(12),
                },
            ],
            losses: Vec::new(),
        }
    }

    #[test]
    fn panel_sorts_rows_and_counts_captions() {
        let panel = FighterPanel::from_history(&history(), &[]);
        assert_eq!(panel.wins[0].opponent_name, "Gouken");
        assert_eq!(panel.wins_caption(), "2 Wins");
        assert_eq!(panel.losses_caption(), "0 Losses");
        assert_eq!(panel.summary(), "Akuma [1710 S]");
        assert!(panel.has_beaten("Dan"));
        assert!(!panel.has_beaten(""));
    }

    #[test]
    fn empty_panel_reads_as_new_challenger() {
        let panel = FighterPanel::default();
        assert!(!panel.is_known());
        assert_eq!(panel.display_name(), UNKNOWN_FIGHTER);
        assert_eq!(panel.summary(), UNKNOWN_FIGHTER);
    }
}
