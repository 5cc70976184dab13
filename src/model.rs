/// Skill bracket decoded from the numeric code the server sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tier {
    S,
    A,
    B,
    P,
    /// A code outside 1-4; displayed as the raw number.
    Unmapped(i64),
    #[default]
    Unknown,
}

impl Tier {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Tier::S,
            2 => Tier::A,
            3 => Tier::B,
            4 => Tier::P,
            other => Tier::Unmapped(other),
        }
    }

    pub fn label(self) -> String {
        match self {
            Tier::S => "S".to_string(),
            Tier::A => "A".to_string(),
            Tier::B => "B".to_string(),
            Tier::P => "P".to_string(),
            Tier::Unmapped(code) => code.to_string(),
            Tier::Unknown => "-".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fighter {
    /// Zero when the server could not resolve the fighter.
    pub id: u32,
    pub name: String,
    pub elo: f64,
    pub tier: Tier,
}

impl Fighter {
    pub fn is_known(&self) -> bool {
        self.id != 0 || !self.name.trim().is_empty()
    }
}

/// One historical win or loss.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FightRecord {
    pub elo: f64,
    pub opponent_name: String,
    pub opponent_id: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FighterHistory {
    pub fighter: Fighter,
    pub wins: Vec<FightRecord>,
    pub losses: Vec<FightRecord>,
}

impl FighterHistory {
    /// Opponent names over wins then losses, in server order.
    pub fn opponent_names(&self) -> impl Iterator<Item = &str> {
        self.wins
            .iter()
            .chain(self.losses.iter())
            .map(|record| record.opponent_name.as_str())
    }
}

/// Live round state for the two fighters on the card, kept as display text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchStats {
    pub p1_tier: String,
    pub p1_life: String,
    pub p1_meter: String,
    pub p2_tier: String,
    pub p2_life: String,
    pub p2_meter: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FightCardPayload {
    pub history: [FighterHistory; 2],
    pub stats: MatchStats,
    pub alert: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub name: String,
    pub id: u32,
}

/// Which of the two fighter panels a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Red,
    Blue,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Red, Side::Blue];

    pub fn index(self) -> usize {
        match self {
            Side::Red => 0,
            Side::Blue => 1,
        }
    }

    pub fn other(self) -> Side {
        match self {
            Side::Red => Side::Blue,
            Side::Blue => Side::Red,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::Red => "RED",
            Side::Blue => "BLUE",
        }
    }
}
