use anyhow::{Result, anyhow};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::model::{
    FightCardPayload, FightRecord, Fighter, FighterHistory, MatchStats, RosterEntry, Tier,
};
use crate::provider::FightSource;

const DEMO_NAMES: [&str; 16] = [
    "Ryu", "Ken", "Chun-Li", "Guile", "Zangief", "Dhalsim", "Blanka", "E. Honda", "Balrog",
    "Vega", "Sagat", "M. Bison", "Akuma", "Cammy", "Dee Jay", "Fei Long",
];

const DEMO_ALERTS: [&str; 3] = [
    "Tournament mode will be activated after the next match!",
    "Exhibition matches are now live!",
    "Bets are locked. Good luck!",
];

/// Synthesized fight data for running the terminal without the API.
///
/// Histories are seeded by fighter id, so the same id always yields the same record.
pub struct DemoSource {
    roster: Vec<RosterEntry>,
}

impl Default for DemoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoSource {
    pub fn new() -> Self {
        let roster = DEMO_NAMES
            .iter()
            .enumerate()
            .map(|(idx, name)| RosterEntry {
                name: (*name).to_string(),
                id: idx as u32 + 1,
            })
            .collect();
        Self { roster }
    }

    fn history_for(&self, id: u32) -> Option<FighterHistory> {
        let entry = self.roster.iter().find(|entry| entry.id == id)?;
        let mut rng = StdRng::seed_from_u64(u64::from(id));
        let fighter = Fighter {
            id,
            name: entry.name.clone(),
            elo: f64::from(rng.gen_range(1100..1800_u32)),
            tier: Tier::from_code(rng.gen_range(1..=4)),
        };
        let mut wins = Vec::new();
        let mut losses = Vec::new();
        for _ in 0..rng.gen_range(2..10) {
            let opponent = &self.roster[rng.gen_range(0..self.roster.len())];
            if opponent.id == id {
                continue;
            }
            let record = FightRecord {
                elo: f64::from(rng.gen_range(1000..1900_u32)),
                opponent_name: opponent.name.clone(),
                opponent_id: Some(opponent.id),
            };
            if rng.gen_bool(0.55) {
                wins.push(record);
            } else {
                losses.push(record);
            }
        }
        Some(FighterHistory {
            fighter,
            wins,
            losses,
        })
    }
}

impl FightSource for DemoSource {
    fn fetch_fight_card(&self) -> Result<FightCardPayload> {
        let mut rng = rand::thread_rng();
        let total = self.roster.len() as u32;
        let red_id = rng.gen_range(1..=total);
        let mut blue_id = rng.gen_range(1..=total);
        if blue_id == red_id {
            blue_id = red_id % total + 1;
        }
        let red = self.fetch_history(red_id)?;
        let blue = self.fetch_history(blue_id)?;

        let stats = MatchStats {
            p1_tier: red.fighter.tier.label(),
            p1_life: rng.gen_range(0..=1000).to_string(),
            p1_meter: rng.gen_range(0..=3).to_string(),
            p2_tier: blue.fighter.tier.label(),
            p2_life: rng.gen_range(0..=1000).to_string(),
            p2_meter: rng.gen_range(0..=3).to_string(),
        };
        let alert = if rng.gen_bool(0.2) {
            DEMO_ALERTS[rng.gen_range(0..DEMO_ALERTS.len())].to_string()
        } else {
            String::new()
        };

        Ok(FightCardPayload {
            history: [red, blue],
            stats,
            alert,
        })
    }

    fn fetch_roster(&self) -> Result<Vec<RosterEntry>> {
        Ok(self.roster.clone())
    }

    fn fetch_history(&self, id: u32) -> Result<FighterHistory> {
        self.history_for(id)
            .ok_or_else(|| anyhow!("no demo fighter with id {id}"))
    }
}
