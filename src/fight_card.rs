use crate::common::common_opponents;
use crate::model::{FightCardPayload, MatchStats, Side};
use crate::state::ProviderCommand;
use crate::view::FighterPanel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardPhase {
    Idle,
    Fetching,
    Rendered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rematch {
    RedBeatBlue,
    BlueBeatRed,
    TradedWins,
}

/// The rendered state of the live fight card.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FightCardView {
    pub red: FighterPanel,
    pub blue: FighterPanel,
    pub common: Vec<String>,
    pub stats: MatchStats,
    pub alert: String,
    pub alert_hidden: bool,
}

impl FightCardView {
    pub fn panel(&self, side: Side) -> &FighterPanel {
        match side {
            Side::Red => &self.red,
            Side::Blue => &self.blue,
        }
    }

    /// `Red [elo tier] vs Blue [elo tier]`, or the one known side on its own.
    pub fn headline(&self) -> String {
        match (self.red.is_known(), self.blue.is_known()) {
            (true, true) | (false, false) => {
                format!("{} vs {}", self.red.summary(), self.blue.summary())
            }
            (true, false) => self.red.summary(),
            (false, true) => self.blue.summary(),
        }
    }

    pub fn rematch(&self) -> Option<Rematch> {
        let red_won = self.red.has_beaten(&self.blue.fighter.name);
        let blue_won = self.blue.has_beaten(&self.red.fighter.name);
        match (red_won, blue_won) {
            (true, true) => Some(Rematch::TradedWins),
            (true, false) => Some(Rematch::RedBeatBlue),
            (false, true) => Some(Rematch::BlueBeatRed),
            (false, false) => None,
        }
    }

    pub fn rematch_text(&self) -> Option<String> {
        let red = self.red.display_name();
        let blue = self.blue.display_name();
        self.rematch().map(|rematch| match rematch {
            Rematch::RedBeatBlue => format!("Rematch! {red} has beaten {blue}!"),
            Rematch::BlueBeatRed => format!("Rematch! {blue} has beaten {red}!"),
            Rematch::TradedWins => format!("Rematch! {red} and {blue} have beaten each other!"),
        })
    }
}

/// Builds the whole view from one payload. The previous view plays no part, so
/// applying the same payload twice gives the same result.
pub fn render_fight_card(payload: &FightCardPayload) -> FightCardView {
    let [red, blue] = &payload.history;
    let common = common_opponents(red, blue);
    FightCardView {
        red: FighterPanel::from_history(red, &common),
        blue: FighterPanel::from_history(blue, &common),
        stats: payload.stats.clone(),
        alert: payload.alert.clone(),
        alert_hidden: payload.alert.trim().is_empty(),
        common,
    }
}

/// Tracks fetches of the live card and holds the last good view.
///
/// Triggers are never coalesced; every response that arrives replaces the view.
#[derive(Debug, Clone)]
pub struct FightCardController {
    pub phase: CardPhase,
    pub in_flight: usize,
    pub view: Option<FightCardView>,
    pub renders: u64,
}

impl Default for FightCardController {
    fn default() -> Self {
        Self::new()
    }
}

impl FightCardController {
    pub fn new() -> Self {
        Self {
            phase: CardPhase::Idle,
            in_flight: 0,
            view: None,
            renders: 0,
        }
    }

    pub fn trigger(&mut self) -> ProviderCommand {
        self.in_flight += 1;
        self.phase = CardPhase::Fetching;
        ProviderCommand::FetchFightCard
    }

    pub fn apply_payload(&mut self, payload: &FightCardPayload) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.view = Some(render_fight_card(payload));
        self.renders += 1;
        self.phase = if self.in_flight == 0 {
            CardPhase::Rendered
        } else {
            CardPhase::Fetching
        };
    }

    /// A failed fetch keeps whatever was rendered before.
    pub fn apply_failure(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if self.in_flight > 0 {
            return;
        }
        self.phase = if self.view.is_some() {
            CardPhase::Rendered
        } else {
            CardPhase::Idle
        };
    }
}
