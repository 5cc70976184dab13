use anyhow::{Context, Result};

use fightcard_terminal::build_source;
use fightcard_terminal::config::Config;
use fightcard_terminal::fight_card::render_fight_card;
use fightcard_terminal::rows::{FightRow, format_elo};
use fightcard_terminal::selection::SelectionState;
use fightcard_terminal::view::FighterPanel;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let config = Config::from_env(&args);
    let source = build_source(&config).context("unable to build fight source")?;

    let selection = SelectionState::parse_fragment(config.hash.as_deref().unwrap_or_default());
    if !selection.is_empty() {
        for (side, id) in selection.restore_targets() {
            match source.fetch_history(id) {
                Ok(history) => {
                    println!("{} #{id}", side.label());
                    print_panel(&FighterPanel::from_history(&history, &[]));
                }
                Err(err) => eprintln!("{} #{id}: {err:#}", side.label()),
            }
        }
        println!("#{}", selection.to_fragment());
        println!("{}", selection.share_url(&config.base_url));
        return Ok(());
    }

    let payload = source
        .fetch_fight_card()
        .context("fight card fetch failed")?;
    let view = render_fight_card(&payload);

    println!("{}", view.headline());
    if let Some(rematch) = view.rematch_text() {
        println!("{rematch}");
    }
    if !view.alert_hidden {
        println!("Alert: {}", view.alert.trim());
    }
    if !view.common.is_empty() {
        println!("Common opponents: {}", view.common.join(", "));
    }
    println!();
    println!("RED");
    print_panel(&view.red);
    println!("BLUE");
    print_panel(&view.blue);

    Ok(())
}

fn print_panel(panel: &FighterPanel) {
    println!(
        "  {} | Elo {} | Tier {}",
        panel.display_name(),
        format_elo(panel.fighter.elo),
        panel.fighter.tier.label()
    );
    println!("  {}", panel.wins_caption());
    print_rows(&panel.wins);
    println!("  {}", panel.losses_caption());
    print_rows(&panel.losses);
}

fn print_rows(rows: &[FightRow]) {
    for row in rows {
        let marker = if row.is_common { "*" } else { " " };
        println!("   {marker} {:>7}  {}", format_elo(row.elo), row.opponent_name);
    }
}
