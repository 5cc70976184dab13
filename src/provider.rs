use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use anyhow::Result;

use crate::model::{FightCardPayload, FighterHistory, RosterEntry};
use crate::state::{Delta, ProviderCommand};

/// Where fight data comes from. Implementations must be callable from worker threads.
pub trait FightSource: Send + Sync {
    fn fetch_fight_card(&self) -> Result<FightCardPayload>;
    fn fetch_roster(&self) -> Result<Vec<RosterEntry>>;
    fn fetch_history(&self, id: u32) -> Result<FighterHistory>;
}

/// Runs every command as its own job. Nothing is coalesced or cancelled, so
/// responses reach the UI in whatever order the fetches finish.
pub fn spawn_provider(
    source: Arc<dyn FightSource>,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
    parallelism: usize,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let pool = build_fetch_pool(parallelism);
        if pool.is_none() {
            let _ = tx.send(Delta::Log(
                "[WARN] Fetch pool unavailable, using plain threads".to_string(),
            ));
        }

        while let Ok(cmd) = cmd_rx.recv() {
            let source = source.clone();
            let tx = tx.clone();
            let job = move || run_command(source.as_ref(), cmd, &tx);
            if let Some(pool) = pool.as_ref() {
                pool.spawn(job);
            } else {
                thread::spawn(job);
            }
        }
    })
}

/// Performs one fetch and reports the outcome as a delta.
pub fn run_command(source: &dyn FightSource, cmd: ProviderCommand, tx: &Sender<Delta>) {
    let delta = match cmd {
        ProviderCommand::FetchFightCard => match source.fetch_fight_card() {
            Ok(payload) => Delta::SetFightCard(payload),
            Err(err) => Delta::FightCardFailed(format!("{err:#}")),
        },
        ProviderCommand::FetchRoster => match source.fetch_roster() {
            Ok(roster) => Delta::SetRoster(roster),
            Err(err) => Delta::RosterFailed(format!("{err:#}")),
        },
        ProviderCommand::FetchHistory { side, id } => match source.fetch_history(id) {
            Ok(history) => Delta::SetHistory { side, id, history },
            Err(err) => Delta::HistoryFailed {
                side,
                id,
                error: format!("{err:#}"),
            },
        },
    };
    let _ = tx.send(delta);
}

fn build_fetch_pool(threads: usize) -> Option<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads.clamp(1, 32))
        .thread_name(|idx| format!("fightcard-fetch-{idx}"))
        .build()
        .ok()
}
