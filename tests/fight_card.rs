use std::fs;
use std::path::PathBuf;

use fightcard_terminal::api::parse_fight_card_json;
use fightcard_terminal::fight_card::{CardPhase, Rematch, render_fight_card};
use fightcard_terminal::state::{AppState, Delta, ProviderCommand, apply_delta};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

const NO_COMMON_CARD: &str = r#"{
    "history": [
        {"Fighter": {"Name": "Ryu", "Elo": 1500}, "Wins": [{"Elo": 1400, "Opponent": "Ken"}], "Losses": []},
        {"Fighter": {"Name": "Ken", "Elo": 1490}, "Wins": [], "Losses": [{"Elo": 1400, "Opponent": "Ryu"}]}
    ],
    "stats": {"p1tier": 1},
    "alert": ""
}"#;

#[test]
fn card_without_shared_opponents_has_no_highlights() {
    let payload = parse_fight_card_json(NO_COMMON_CARD).unwrap();
    let view = render_fight_card(&payload);

    assert_eq!(view.red.fighter.name, "Ryu");
    assert_eq!(view.red.fighter.elo, 1500.0);
    assert_eq!(view.red.wins.len(), 1);
    assert_eq!(view.red.wins[0].opponent_name, "Ken");
    assert_eq!(view.red.wins[0].elo, 1400.0);
    assert!(view.common.is_empty());
    assert!(
        view.red
            .wins
            .iter()
            .chain(view.blue.losses.iter())
            .all(|row| !row.is_common)
    );
    assert!(view.alert_hidden);
    assert_eq!(view.stats.p1_tier, "S");
}

#[test]
fn shared_opponent_is_highlighted_on_both_sides() {
    let payload = parse_fight_card_json(&read_fixture("fight_card.json")).unwrap();
    let view = render_fight_card(&payload);

    assert_eq!(view.common, vec!["Zangief"]);
    assert_eq!(view.red.wins[0].opponent_name, "Zangief");
    assert!(view.red.wins[0].is_common);
    assert!(!view.red.wins[1].is_common);
    assert_eq!(view.blue.losses[0].opponent_name, "Zangief");
    assert!(view.blue.losses[0].is_common);
    assert!(!view.blue.losses[1].is_common);
    assert!(!view.blue.wins[0].is_common);
}

#[test]
fn captions_alert_and_headline() {
    let payload = parse_fight_card_json(&read_fixture("fight_card.json")).unwrap();
    let view = render_fight_card(&payload);

    assert_eq!(view.red.wins_caption(), "2 Wins");
    assert_eq!(view.red.losses_caption(), "0 Losses");
    assert_eq!(view.blue.losses_caption(), "2 Losses");
    assert!(!view.alert_hidden);
    assert_eq!(view.headline(), "Ryu [1500 S] vs Ken [1490 A]");
    assert_eq!(view.rematch(), Some(Rematch::RedBeatBlue));
    assert_eq!(
        view.rematch_text().as_deref(),
        Some("Rematch! Ryu has beaten Ken!")
    );
}

#[test]
fn whitespace_alert_is_hidden() {
    let raw = r#"{"History": [], "Alert": "   "}"#;
    let view = render_fight_card(&parse_fight_card_json(raw).unwrap());
    assert!(view.alert_hidden);
    assert_eq!(view.headline(), "New Challenger! vs New Challenger!");
}

#[test]
fn same_payload_twice_gives_same_view() {
    let payload = parse_fight_card_json(&read_fixture("fight_card.json")).unwrap();
    let mut state = AppState::new();
    state.request_fight_card();
    apply_delta(&mut state, Delta::SetFightCard(payload.clone()));
    let first = state.card.view.clone();
    state.request_fight_card();
    apply_delta(&mut state, Delta::SetFightCard(payload));
    assert_eq!(state.card.view, first);
    assert_eq!(state.card.renders, 2);
}

#[test]
fn notification_queues_a_fetch_per_message() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::Notified);
    apply_delta(&mut state, Delta::Notified);
    assert_eq!(state.card.phase, CardPhase::Fetching);
    assert_eq!(state.card.in_flight, 2);
    assert_eq!(
        state.take_pending_commands(),
        vec![ProviderCommand::FetchFightCard, ProviderCommand::FetchFightCard]
    );
    assert!(state.take_pending_commands().is_empty());
    assert_eq!(state.notifications, 2);
}

#[test]
fn last_response_wins() {
    let first = parse_fight_card_json(&read_fixture("fight_card.json")).unwrap();
    let second = parse_fight_card_json(NO_COMMON_CARD).unwrap();
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::Notified);
    apply_delta(&mut state, Delta::Notified);

    apply_delta(&mut state, Delta::SetFightCard(first));
    assert_eq!(state.card.phase, CardPhase::Fetching);
    apply_delta(&mut state, Delta::SetFightCard(second));
    assert_eq!(state.card.phase, CardPhase::Rendered);

    let view = state.card.view.as_ref().unwrap();
    assert!(view.common.is_empty());
    assert_eq!(view.blue.losses.len(), 1);
}

#[test]
fn failed_fetch_keeps_previous_view() {
    let payload = parse_fight_card_json(&read_fixture("fight_card.json")).unwrap();
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::Notified);
    apply_delta(&mut state, Delta::SetFightCard(payload));
    let before = state.card.view.clone();

    apply_delta(&mut state, Delta::Notified);
    apply_delta(
        &mut state,
        Delta::FightCardFailed("connection refused".to_string()),
    );
    assert_eq!(state.card.view, before);
    assert_eq!(state.card.phase, CardPhase::Rendered);
    assert!(
        state
            .logs
            .back()
            .is_some_and(|line| line.contains("[WARN]") && line.contains("connection refused"))
    );
}

#[test]
fn failure_before_any_render_returns_to_idle() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::Notified);
    apply_delta(&mut state, Delta::FightCardFailed("timeout".to_string()));
    assert_eq!(state.card.phase, CardPhase::Idle);
    assert!(state.card.view.is_none());
}

#[test]
fn new_alert_is_logged_once() {
    let payload = parse_fight_card_json(&read_fixture("fight_card.json")).unwrap();
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::SetFightCard(payload.clone()));
    apply_delta(&mut state, Delta::SetFightCard(payload));
    let alerts = state
        .logs
        .iter()
        .filter(|line| line.contains("[ALERT]"))
        .count();
    assert_eq!(alerts, 1);
}
