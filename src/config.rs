use std::env;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:9000";
const DEFAULT_NOTIFY_ADDR: &str = "www-cdn-twitch.saltybet.com:8000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Http,
    Demo,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub source: SourceKind,
    pub base_url: String,
    pub notify_addr: String,
    pub http_timeout: Duration,
    pub notify_reconnect: Duration,
    pub demo_trigger: Duration,
    pub fetch_parallelism: usize,
    /// Selection to restore, as `#id1/id2`.
    pub hash: Option<String>,
}

impl Config {
    /// Reads the environment; `args` may carry `--hash` to override `FIGHTCARD_HASH`.
    pub fn from_env(args: &[String]) -> Self {
        let source = match env::var("FIGHTCARD_SOURCE")
            .unwrap_or_default()
            .trim()
            .to_lowercase()
            .as_str()
        {
            "demo" | "fake" => SourceKind::Demo,
            _ => SourceKind::Http,
        };

        Self {
            source,
            base_url: opt_env("FIGHTCARD_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            notify_addr: opt_env("FIGHTCARD_NOTIFY_ADDR")
                .unwrap_or_else(|| DEFAULT_NOTIFY_ADDR.to_string()),
            http_timeout: Duration::from_secs(env_u64("FIGHTCARD_HTTP_TIMEOUT_SECS", 10).max(1)),
            notify_reconnect: Duration::from_secs(env_u64("NOTIFY_RECONNECT_SECS", 5).max(1)),
            demo_trigger: Duration::from_secs(env_u64("DEMO_TRIGGER_SECS", 12).max(2)),
            fetch_parallelism: env_u64("FETCH_PARALLELISM", 4).clamp(1, 32) as usize,
            hash: parse_hash_arg(args).or_else(|| opt_env("FIGHTCARD_HASH")),
        }
    }
}

/// Finds `--hash=#3/7` or `--hash #3/7`.
pub fn parse_hash_arg(args: &[String]) -> Option<String> {
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix("--hash=") {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == "--hash" {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}

fn opt_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .and_then(|val| if val.trim().is_empty() { None } else { Some(val.trim().to_string()) })
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|val| val.trim().parse::<u64>().ok())
        .unwrap_or(default)
}
