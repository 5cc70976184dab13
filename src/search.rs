use crate::model::{FighterHistory, RosterEntry, Side};
use crate::selection::SelectionState;
use crate::state::ProviderCommand;
use crate::view::FighterPanel;

const MAX_SUGGESTIONS: usize = 8;

/// One name input of the search view.
#[derive(Debug, Clone, Default)]
pub struct NameSlot {
    pub input: String,
    /// Id of the fighter whose history is currently shown in this slot.
    pub bound_id: Option<u32>,
    pub panel: Option<FighterPanel>,
    pub highlighted: usize,
}

/// Name lookup for the red and blue inputs, plus the `id1/id2` fragment they produce.
#[derive(Debug, Clone)]
pub struct SearchController {
    pub roster: Vec<RosterEntry>,
    pub roster_loaded: bool,
    pub slots: [NameSlot; 2],
    pub active: Side,
    pub editing: bool,
    /// Last serialized selection; `None` until a history has been bound.
    pub fragment: Option<String>,
}

impl Default for SearchController {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchController {
    pub fn new() -> Self {
        Self {
            roster: Vec::new(),
            roster_loaded: false,
            slots: [NameSlot::default(), NameSlot::default()],
            active: Side::Red,
            editing: false,
            fragment: None,
        }
    }

    /// Startup requests: the roster once, then a history fetch per restored id.
    pub fn startup(&self, restored: &SelectionState) -> Vec<ProviderCommand> {
        let mut cmds = vec![ProviderCommand::FetchRoster];
        cmds.extend(
            restored
                .restore_targets()
                .into_iter()
                .map(|(side, id)| ProviderCommand::FetchHistory { side, id }),
        );
        cmds
    }

    pub fn bind_roster(&mut self, roster: Vec<RosterEntry>) {
        self.roster = roster;
        self.roster_loaded = true;
        for slot in &mut self.slots {
            slot.highlighted = 0;
        }
    }

    pub fn slot(&self, side: Side) -> &NameSlot {
        &self.slots[side.index()]
    }

    pub fn slot_mut(&mut self, side: Side) -> &mut NameSlot {
        &mut self.slots[side.index()]
    }

    /// Roster entries whose name contains the slot's input, in roster order.
    pub fn suggestions(&self, side: Side) -> Vec<&RosterEntry> {
        let query = self.slot(side).input.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        self.roster
            .iter()
            .filter(|entry| entry.name.to_lowercase().contains(&query))
            .take(MAX_SUGGESTIONS)
            .collect()
    }

    /// Exact name match; with duplicate names the first roster entry wins.
    pub fn resolve_name(&self, name: &str) -> Option<u32> {
        self.roster
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.id)
    }

    /// A name picked from a slot's suggestions. Unknown names are ignored.
    pub fn select_name(&mut self, side: Side, name: &str) -> Option<ProviderCommand> {
        let id = self.resolve_name(name)?;
        let slot = self.slot_mut(side);
        slot.input = name.to_string();
        slot.highlighted = 0;
        Some(ProviderCommand::FetchHistory { side, id })
    }

    pub fn select_highlighted(&mut self) -> Option<ProviderCommand> {
        let side = self.active;
        let name = {
            let suggestions = self.suggestions(side);
            let idx = self.slot(side).highlighted.min(suggestions.len().checked_sub(1)?);
            suggestions[idx].name.clone()
        };
        self.select_name(side, &name)
    }

    /// Applies a fetched history to its slot and rewrites the fragment.
    pub fn bind_history(&mut self, side: Side, id: u32, history: &FighterHistory) {
        let slot = self.slot_mut(side);
        slot.bound_id = Some(id);
        if !history.fighter.name.is_empty() {
            slot.input = history.fighter.name.clone();
        }
        slot.panel = Some(FighterPanel::from_history(history, &[]));
        slot.highlighted = 0;
        self.fragment = Some(self.selection().to_fragment());
    }

    pub fn selection(&self) -> SelectionState {
        SelectionState::new(self.slots[0].bound_id, self.slots[1].bound_id)
    }

    pub fn switch_slot(&mut self) {
        self.active = self.active.other();
    }

    pub fn push_char(&mut self, c: char) {
        let slot = self.slot_mut(self.active);
        slot.input.push(c);
        slot.highlighted = 0;
    }

    pub fn backspace(&mut self) {
        let slot = self.slot_mut(self.active);
        slot.input.pop();
        slot.highlighted = 0;
    }

    pub fn highlight_next(&mut self) {
        let total = self.suggestions(self.active).len();
        let slot = self.slot_mut(self.active);
        if total == 0 {
            slot.highlighted = 0;
            return;
        }
        slot.highlighted = (slot.highlighted + 1) % total;
    }

    pub fn highlight_prev(&mut self) {
        let total = self.suggestions(self.active).len();
        let slot = self.slot_mut(self.active);
        if total == 0 {
            slot.highlighted = 0;
            return;
        }
        slot.highlighted = if slot.highlighted == 0 {
            total - 1
        } else {
            slot.highlighted - 1
        };
    }
}
