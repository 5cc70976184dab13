use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};

use fightcard_terminal::config::{Config, SourceKind};
use fightcard_terminal::fight_card::{CardPhase, FightCardView};
use fightcard_terminal::model::{MatchStats, Side};
use fightcard_terminal::rows::{FightRow, format_elo};
use fightcard_terminal::selection::SelectionState;
use fightcard_terminal::state::{self, AppState, ProviderCommand, Screen, apply_delta};
use fightcard_terminal::view::FighterPanel;
use fightcard_terminal::{build_source, notify, provider};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
}

impl App {
    fn new(state: AppState, cmd_tx: Option<mpsc::Sender<ProviderCommand>>) -> Self {
        Self {
            state,
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.screen == Screen::Search && self.state.search.editing {
            self.on_edit_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.state.screen = Screen::FightCard,
            KeyCode::Char('2') => self.state.screen = Screen::Search,
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.state.request_fight_card();
                self.state.push_log("[INFO] Manual refresh");
            }
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Tab | KeyCode::Left | KeyCode::Right
                if self.state.screen == Screen::Search =>
            {
                self.state.search.switch_slot();
            }
            KeyCode::Char('/') | KeyCode::Char('e') | KeyCode::Enter
                if self.state.screen == Screen::Search =>
            {
                self.state.search.editing = true;
            }
            KeyCode::Esc => self.state.help_overlay = false,
            _ => {}
        }
    }

    fn on_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.state.search.editing = false,
            KeyCode::Enter => {
                self.state.select_suggestion();
                self.state.search.editing = false;
            }
            KeyCode::Tab => self.state.search.switch_slot(),
            KeyCode::Down => self.state.search.highlight_next(),
            KeyCode::Up => self.state.search.highlight_prev(),
            KeyCode::Backspace => self.state.search.backspace(),
            KeyCode::Char(c) => self.state.search.push_char(c),
            _ => {}
        }
    }

    fn flush_commands(&mut self) {
        let cmds = self.state.take_pending_commands();
        if cmds.is_empty() {
            return;
        }
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[INFO] Fetching unavailable");
            return;
        };
        let mut failed = 0;
        for cmd in cmds {
            if tx.send(cmd).is_err() {
                failed += 1;
            }
        }
        if failed > 0 {
            self.state
                .push_log(format!("[WARN] {failed} fetch request(s) could not be sent"));
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let config = Config::from_env(&args);
    let source = build_source(&config).map_err(|err| io::Error::other(format!("{err:#}")))?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    provider::spawn_provider(source, tx.clone(), cmd_rx, config.fetch_parallelism);
    match config.source {
        SourceKind::Demo => {
            notify::spawn_timer_notifier(config.demo_trigger, tx);
        }
        SourceKind::Http => {
            notify::spawn_notifier(config.notify_addr.clone(), config.notify_reconnect, tx);
        }
    }

    let mut state = AppState::with_base_url(config.base_url.clone());
    let restored = SelectionState::parse_fragment(config.hash.as_deref().unwrap_or_default());
    state.startup(&restored);
    if !restored.is_empty() {
        state.screen = Screen::Search;
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(state, Some(cmd_tx));
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    if let Some(url) = app.state.share_url() {
        println!("{url}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<state::Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }
        app.flush_commands();

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.on_key(key);
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::FightCard => render_fight_card(frame, chunks[1], &app.state),
        Screen::Search => render_search(frame, chunks[1], &app.state),
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    match state.screen {
        Screen::FightCard => {
            let updated = state.card_updated_at.as_deref().unwrap_or("never");
            let line1 = format!(
                "FIGHT CARD | {} | updated {updated} | signals {}",
                phase_label(state.card.phase),
                state.notifications
            );
            let (line2, line3) = match &state.card.view {
                Some(view) => (view.headline(), view.rematch_text().unwrap_or_default()),
                None => ("Waiting for the first fight card".to_string(), String::new()),
            };
            format!("{line1}\n{line2}\n{line3}")
        }
        Screen::Search => {
            let roster = if state.search.roster_loaded {
                format!("{} fighters", state.search.roster.len())
            } else {
                "roster loading".to_string()
            };
            let line1 = format!("SEARCH | {roster}");
            let (line2, line3) = match (&state.search.fragment, state.share_url()) {
                (Some(fragment), Some(url)) => (format!("#{fragment}"), url),
                _ => ("No selection yet".to_string(), String::new()),
            };
            format!("{line1}\n{line2}\n{line3}")
        }
    }
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::FightCard => "1 Card | 2 Search | r Refresh | ? Help | q Quit".to_string(),
        Screen::Search if state.search.editing => {
            "Type name | ↑/↓ Suggestion | Enter Select | Tab Slot | Esc Done".to_string()
        }
        Screen::Search => {
            "1 Card | 2 Search | Tab/←/→ Slot | / Edit | r Refresh | ? Help | q Quit".to_string()
        }
    }
}

fn render_fight_card(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(view) = &state.card.view else {
        let empty = Paragraph::new("No fight card yet").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    };

    let alert_height = if view.alert_hidden { 0 } else { 3 };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(alert_height), Constraint::Min(1)])
        .split(area);

    if !view.alert_hidden {
        let alert = Paragraph::new(view.alert.trim().to_string())
            .style(Style::default().fg(Color::Yellow))
            .wrap(Wrap { trim: true })
            .block(Block::default().title("Alert").borders(Borders::ALL));
        frame.render_widget(alert, rows[0]);
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    for side in Side::ALL {
        let stats = live_stats_line(view, side);
        render_fighter_panel(
            frame,
            columns[side.index()],
            view.panel(side),
            side,
            Some(stats.as_str()),
        );
    }
}

fn live_stats_line(view: &FightCardView, side: Side) -> String {
    let MatchStats {
        p1_tier,
        p1_life,
        p1_meter,
        p2_tier,
        p2_life,
        p2_meter,
    } = &view.stats;
    let (tier, life, meter) = match side {
        Side::Red => (p1_tier, p1_life, p1_meter),
        Side::Blue => (p2_tier, p2_life, p2_meter),
    };
    format!(
        "Live: tier {} | life {} | meter {}",
        or_dash(tier),
        or_dash(life),
        or_dash(meter)
    )
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() { "-" } else { value }
}

fn render_fighter_panel(
    frame: &mut Frame,
    area: Rect,
    panel: &FighterPanel,
    side: Side,
    live: Option<&str>,
) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Percentage(50),
            Constraint::Percentage(50),
        ])
        .split(area);

    let mut lines = vec![
        Line::from(Span::styled(
            panel.display_name().to_string(),
            Style::default()
                .fg(side_color(side))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "Elo {} | Tier {}",
            format_elo(panel.fighter.elo),
            panel.fighter.tier.label()
        )),
    ];
    if let Some(live) = live {
        lines.push(Line::from(live.to_string()));
    }
    let info = Paragraph::new(lines).block(
        Block::default()
            .title(side.label())
            .borders(Borders::TOP)
            .border_style(Style::default().fg(side_color(side))),
    );
    frame.render_widget(info, sections[0]);

    render_fight_table(frame, sections[1], &panel.wins_caption(), &panel.wins);
    render_fight_table(frame, sections[2], &panel.losses_caption(), &panel.losses);
}

fn render_fight_table(frame: &mut Frame, area: Rect, caption: &str, rows: &[FightRow]) {
    let body = rows.iter().map(|row| {
        let style = if row.is_common {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Row::new(vec![
            Cell::from(format_elo(row.elo)),
            Cell::from(row.opponent_name.clone()),
        ])
        .style(style)
    });
    let header = Row::new(vec!["Elo", "Opponent"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let table = Table::new(body, [Constraint::Length(8), Constraint::Min(10)])
        .header(header)
        .block(Block::default().title(caption.to_string()).borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn render_search(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    for side in Side::ALL {
        render_search_slot(frame, columns[side.index()], state, side);
    }
}

fn render_search_slot(frame: &mut Frame, area: Rect, state: &AppState, side: Side) {
    let search = &state.search;
    let slot = search.slot(side);
    let active = search.active == side;
    let editing = active && search.editing;
    let suggestions = if editing {
        search.suggestions(side)
    } else {
        Vec::new()
    };
    let suggestion_height = if suggestions.is_empty() {
        0
    } else {
        suggestions.len() as u16 + 2
    };

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(suggestion_height),
            Constraint::Min(1),
        ])
        .split(area);

    let border_style = if active {
        Style::default().fg(side_color(side))
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let cursor = if editing { "_" } else { "" };
    let bound = slot
        .bound_id
        .map(|id| format!(" #{id}"))
        .unwrap_or_default();
    let input = Paragraph::new(format!("{}{cursor}", slot.input)).block(
        Block::default()
            .title(format!("{} name{bound}", side.label()))
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(input, sections[0]);

    if !suggestions.is_empty() {
        let lines: Vec<Line> = suggestions
            .iter()
            .enumerate()
            .map(|(idx, entry)| {
                if idx == slot.highlighted {
                    Line::from(Span::styled(
                        format!("> {}", entry.name),
                        Style::default().fg(Color::White).bg(Color::DarkGray),
                    ))
                } else {
                    Line::from(format!("  {}", entry.name))
                }
            })
            .collect();
        let list = Paragraph::new(lines)
            .block(Block::default().title("Suggestions").borders(Borders::ALL));
        frame.render_widget(list, sections[1]);
    }

    match &slot.panel {
        Some(panel) => render_fighter_panel(frame, sections[2], panel, side, None),
        None => {
            let empty = Paragraph::new("No fighter selected")
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(empty, sections[2]);
        }
    }
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    let start = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn side_color(side: Side) -> Color {
    match side {
        Side::Red => Color::Red,
        Side::Blue => Color::LightBlue,
    }
}

fn phase_label(phase: CardPhase) -> &'static str {
    match phase {
        CardPhase::Idle => "IDLE",
        CardPhase::Fetching => "FETCHING",
        CardPhase::Rendered => "LIVE",
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Fight Card Terminal - Help",
        "",
        "Global:",
        "  1            Fight card",
        "  2            Search",
        "  r            Refresh fight card",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Search:",
        "  Tab / ← / →  Switch red/blue slot",
        "  / or Enter   Edit name",
        "  ↑/↓          Move suggestion",
        "  Enter        Select suggestion",
        "  Esc          Stop editing",
        "",
        "Highlighted rows are opponents both fighters have faced.",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
