use std::collections::VecDeque;

use chrono::Local;

use crate::fight_card::FightCardController;
use crate::model::{FightCardPayload, FighterHistory, RosterEntry, Side};
use crate::search::SearchController;
use crate::selection::SelectionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    FightCard,
    Search,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub card: FightCardController,
    pub search: SearchController,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    pub base_url: String,
    pub notifications: u64,
    pub card_updated_at: Option<String>,
    pending: Vec<ProviderCommand>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::FightCard,
            card: FightCardController::new(),
            search: SearchController::new(),
            logs: VecDeque::with_capacity(200),
            help_overlay: false,
            base_url: String::new(),
            notifications: 0,
            card_updated_at: None,
            pending: Vec::new(),
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::new()
        }
    }

    /// Queues the first card fetch, the roster fetch and any restored search ids.
    pub fn startup(&mut self, restored: &SelectionState) {
        self.request_fight_card();
        let cmds = self.search.startup(restored);
        self.pending.extend(cmds);
        if !restored.is_empty() {
            self.push_log(format!(
                "[INFO] Restoring selection #{}",
                restored.to_fragment()
            ));
        }
    }

    pub fn request_fight_card(&mut self) {
        let cmd = self.card.trigger();
        self.pending.push(cmd);
    }

    /// Selects the highlighted suggestion of the active search slot.
    pub fn select_suggestion(&mut self) {
        if let Some(cmd) = self.search.select_highlighted() {
            self.pending.push(cmd);
        }
    }

    pub fn select_name(&mut self, side: Side, name: &str) {
        if let Some(cmd) = self.search.select_name(side, name) {
            self.pending.push(cmd);
        }
    }

    pub fn take_pending_commands(&mut self) -> Vec<ProviderCommand> {
        std::mem::take(&mut self.pending)
    }

    pub fn share_url(&self) -> Option<String> {
        self.search.fragment.as_ref()?;
        Some(self.search.selection().share_url(&self.base_url))
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        let stamp = Local::now().format("%H:%M:%S");
        self.logs.push_back(format!("{stamp} {}", msg.into()));
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    /// Something arrived on the notification channel; the content is irrelevant.
    Notified,
    SetFightCard(FightCardPayload),
    FightCardFailed(String),
    SetRoster(Vec<RosterEntry>),
    RosterFailed(String),
    SetHistory {
        side: Side,
        id: u32,
        history: FighterHistory,
    },
    HistoryFailed {
        side: Side,
        id: u32,
        error: String,
    },
    Log(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCommand {
    FetchFightCard,
    FetchRoster,
    FetchHistory { side: Side, id: u32 },
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::Notified => {
            state.notifications += 1;
            state.request_fight_card();
        }
        Delta::SetFightCard(payload) => {
            let previous_alert = state
                .card
                .view
                .as_ref()
                .map(|view| view.alert.clone())
                .unwrap_or_default();
            state.card.apply_payload(&payload);
            state.card_updated_at = Some(Local::now().format("%H:%M:%S").to_string());
            let alert = payload.alert.trim();
            if !alert.is_empty() && alert != previous_alert.trim() {
                state.push_log(format!("[ALERT] {alert}"));
            }
        }
        Delta::FightCardFailed(err) => {
            state.card.apply_failure();
            state.push_log(format!("[WARN] Fight card fetch error: {err}"));
        }
        Delta::SetRoster(roster) => {
            let count = roster.len();
            state.search.bind_roster(roster);
            state.push_log(format!("[INFO] Roster loaded ({count} fighters)"));
        }
        Delta::RosterFailed(err) => {
            state.push_log(format!("[WARN] Roster fetch error: {err}"));
        }
        Delta::SetHistory { side, id, history } => {
            state.search.bind_history(side, id, &history);
            let fragment = state.search.fragment.clone().unwrap_or_default();
            state.push_log(format!(
                "[INFO] {} bound to {} (#{fragment})",
                side.label(),
                history.fighter.name
            ));
        }
        Delta::HistoryFailed { side, id, error } => {
            state.push_log(format!(
                "[WARN] History fetch for {} #{id} failed: {error}",
                side.label()
            ));
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
