use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::http_client::http_client_with_timeout;
use crate::model::{
    FightCardPayload, FightRecord, Fighter, FighterHistory, MatchStats, RosterEntry, Tier,
};
use crate::provider::FightSource;

const FIGHT_CARD_PATH: &str = "/api/f";
const ROSTER_PATH: &str = "/api/a";
const HISTORY_PATH: &str = "/api/h";

/// Reads the fight card API over HTTP.
pub struct HttpSource {
    base_url: String,
    client: &'static Client,
}

impl HttpSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: http_client_with_timeout(timeout)?,
        })
    }

    fn get_text(&self, path: &str) -> Result<String> {
        let url = format!("{}{path}", self.base_url);
        let resp = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("request to {url} failed"))?;
        let status = resp.status();
        let body = resp.text().context("failed reading body")?;
        if !status.is_success() {
            return Err(anyhow!("http {}: {}", status, body.trim()));
        }
        Ok(body)
    }
}

impl FightSource for HttpSource {
    fn fetch_fight_card(&self) -> Result<FightCardPayload> {
        let body = self.get_text(FIGHT_CARD_PATH)?;
        parse_fight_card_json(&body)
    }

    fn fetch_roster(&self) -> Result<Vec<RosterEntry>> {
        let body = self.get_text(ROSTER_PATH)?;
        parse_roster_json(&body)
    }

    fn fetch_history(&self, id: u32) -> Result<FighterHistory> {
        let body = self.get_text(&format!("{HISTORY_PATH}/{id}"))?;
        parse_history_json(&body)
    }
}

#[derive(Debug, Default, Deserialize)]
struct WireFighter {
    #[serde(rename = "Id", alias = "id", default)]
    id: Option<i64>,
    #[serde(rename = "Name", alias = "name", default)]
    name: Option<String>,
    #[serde(rename = "Elo", alias = "elo", default)]
    elo: Option<f64>,
    #[serde(rename = "Tier", alias = "tier", default)]
    tier: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct WireRecord {
    #[serde(rename = "Elo", alias = "elo", default)]
    elo: Option<f64>,
    #[serde(
        rename = "Opponent",
        alias = "opponent",
        alias = "OpponentName",
        alias = "opponentName",
        default
    )]
    opponent: Option<String>,
    #[serde(rename = "OpponentId", alias = "opponentId", default)]
    opponent_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct WireHistory {
    #[serde(rename = "Fighter", alias = "fighter", default)]
    fighter: Option<WireFighter>,
    #[serde(rename = "Wins", alias = "wins", default)]
    wins: Option<Vec<WireRecord>>,
    #[serde(rename = "Losses", alias = "losses", default)]
    losses: Option<Vec<WireRecord>>,
}

#[derive(Debug, Default, Deserialize)]
struct WireStats {
    #[serde(rename = "p1tier", alias = "P1Tier", alias = "p1Tier", default)]
    p1_tier: Option<Value>,
    #[serde(rename = "p1life", alias = "P1Life", alias = "p1Life", default)]
    p1_life: Option<Value>,
    #[serde(rename = "p1meter", alias = "P1Meter", alias = "p1Meter", default)]
    p1_meter: Option<Value>,
    #[serde(rename = "p2tier", alias = "P2Tier", alias = "p2Tier", default)]
    p2_tier: Option<Value>,
    #[serde(rename = "p2life", alias = "P2Life", alias = "p2Life", default)]
    p2_life: Option<Value>,
    #[serde(rename = "p2meter", alias = "P2Meter", alias = "p2Meter", default)]
    p2_meter: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct WireCard {
    #[serde(rename = "History", alias = "history", default)]
    history: Option<Vec<WireHistory>>,
    #[serde(rename = "Stats", alias = "stats", default)]
    stats: Option<WireStats>,
    #[serde(rename = "Alert", alias = "alert", default)]
    alert: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireRosterEntry {
    #[serde(rename = "Name", alias = "name", default)]
    name: Option<String>,
    #[serde(rename = "Cid", alias = "cid", alias = "Id", alias = "id", default)]
    cid: Option<i64>,
}

/// Parses `/api/f`. Accepts the `{History, Stats, Alert}` object as well as a bare
/// array of histories; a missing side becomes an empty history.
pub fn parse_fight_card_json(raw: &str) -> Result<FightCardPayload> {
    let Some(root) = parse_root(raw, "invalid fight card json")? else {
        return Ok(FightCardPayload::default());
    };

    let card: WireCard = if root.is_array() {
        WireCard {
            history: Some(serde_json::from_value(root).context("invalid fight card histories")?),
            ..WireCard::default()
        }
    } else {
        serde_json::from_value(root).context("invalid fight card payload")?
    };

    let mut histories = card.history.unwrap_or_default().into_iter();
    let red = histories.next().map(normalize_history).unwrap_or_default();
    let blue = histories.next().map(normalize_history).unwrap_or_default();

    Ok(FightCardPayload {
        history: [red, blue],
        stats: card.stats.map(normalize_stats).unwrap_or_default(),
        alert: card.alert.unwrap_or_default(),
    })
}

/// Parses `/api/h/{id}`.
pub fn parse_history_json(raw: &str) -> Result<FighterHistory> {
    let Some(root) = parse_root(raw, "invalid history json")? else {
        return Ok(FighterHistory::default());
    };
    let wire: WireHistory = serde_json::from_value(root).context("invalid history payload")?;
    Ok(normalize_history(wire))
}

/// Parses `/api/a`, keeping server order. Entries without a usable id are dropped.
pub fn parse_roster_json(raw: &str) -> Result<Vec<RosterEntry>> {
    let Some(root) = parse_root(raw, "invalid roster json")? else {
        return Ok(Vec::new());
    };
    let wire: Vec<WireRosterEntry> =
        serde_json::from_value(root).context("invalid roster payload")?;
    Ok(wire
        .into_iter()
        .filter_map(|entry| {
            let id = entry.cid.and_then(positive_id)?;
            Some(RosterEntry {
                name: entry.name.unwrap_or_default(),
                id,
            })
        })
        .collect())
}

fn parse_root(raw: &str, what: &'static str) -> Result<Option<Value>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }
    let root: Value = serde_json::from_str(trimmed).context(what)?;
    if root.is_null() {
        return Ok(None);
    }
    Ok(Some(root))
}

fn normalize_history(wire: WireHistory) -> FighterHistory {
    let fighter = wire.fighter.unwrap_or_default();
    FighterHistory {
        fighter: Fighter {
            id: fighter.id.and_then(positive_id).unwrap_or(0),
            name: fighter.name.unwrap_or_default(),
            elo: fighter.elo.unwrap_or_default(),
            tier: fighter.tier.as_ref().map(tier_from_value).unwrap_or_default(),
        },
        wins: normalize_records(wire.wins),
        losses: normalize_records(wire.losses),
    }
}

fn normalize_records(records: Option<Vec<WireRecord>>) -> Vec<FightRecord> {
    records
        .unwrap_or_default()
        .into_iter()
        .map(|record| FightRecord {
            elo: record.elo.unwrap_or_default(),
            opponent_name: record.opponent.unwrap_or_default(),
            opponent_id: record.opponent_id.and_then(positive_id),
        })
        .collect()
}

fn normalize_stats(wire: WireStats) -> MatchStats {
    MatchStats {
        p1_tier: stat_tier_text(wire.p1_tier.as_ref()),
        p1_life: value_text(wire.p1_life.as_ref()),
        p1_meter: value_text(wire.p1_meter.as_ref()),
        p2_tier: stat_tier_text(wire.p2_tier.as_ref()),
        p2_life: value_text(wire.p2_life.as_ref()),
        p2_meter: value_text(wire.p2_meter.as_ref()),
    }
}

fn stat_tier_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(value) => tier_from_value(value).label(),
    }
}

fn value_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Numeric codes map through the tier table; a letter is taken as the label itself.
pub fn tier_from_value(value: &Value) -> Tier {
    match value {
        Value::Number(n) => integral_code(n).map(Tier::from_code).unwrap_or_default(),
        Value::String(s) => {
            let s = s.trim();
            match s.to_ascii_uppercase().as_str() {
                "S" => Tier::S,
                "A" => Tier::A,
                "B" => Tier::B,
                "P" => Tier::P,
                _ => s.parse::<i64>().map(Tier::from_code).unwrap_or_default(),
            }
        }
        _ => Tier::Unknown,
    }
}

/// `2` and `2.0` are codes; `1.9` is not.
fn integral_code(n: &serde_json::Number) -> Option<i64> {
    if let Some(code) = n.as_i64() {
        return Some(code);
    }
    let value = n.as_f64()?;
    if value.fract() != 0.0 || value < i64::MIN as f64 || value > i64::MAX as f64 {
        return None;
    }
    Some(value as i64)
}

fn positive_id(raw: i64) -> Option<u32> {
    if raw <= 0 {
        return None;
    }
    u32::try_from(raw).ok()
}
