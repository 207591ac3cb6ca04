use crate::client::AppSnapshot;
use color_eyre::eyre::{
    Result,
    eyre,
};
use crossterm::{
    event::{
        self,
        Event,
        KeyCode,
        KeyEvent,
        KeyEventKind,
        KeyModifiers,
    },
    terminal::{
        disable_raw_mode,
        enable_raw_mode,
    },
};
use kerzh_demo::{
    catalog::{
        Category,
        Game,
    },
    forms::{
        AmountForm,
        AuthForm,
    },
    money::format_amount,
    notification::Stamped,
    session::{
        AuthMode,
        Identity,
        Intent,
        WalletOp,
    },
};
use ratatui::{
    prelude::*,
    widgets::*,
};
use std::io::stdout;
use tokio::sync::mpsc;
use unicode_width::UnicodeWidthStr;

const MAX_FIELD_LEN: usize = 64;

pub enum UserEvent {
    Quit,
    Redraw,
    Dispatch(Intent),
    NextTab,
    PrevTab,
    NextGame,
    PrevGame,
    PlayGame,
}

pub type InputEventReceiver = mpsc::UnboundedReceiver<Event>;

#[derive(Default)]
pub struct UiState {
    mode: Mode,
    terminal: Option<Terminal<CrosstermBackend<std::io::Stdout>>>,
}

#[derive(Clone, Debug, Default)]
enum Mode {
    #[default]
    Normal,
    Auth(AuthState),
    Amount(AmountState),
    History,
    QuitModal,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
enum AuthField {
    #[default]
    Name,
    Email,
}

#[derive(Clone, Debug)]
struct AuthState {
    form: AuthForm,
    field: AuthField,
    error: Option<String>,
}

impl AuthState {
    fn new(mode: AuthMode) -> Self {
        AuthState {
            form: AuthForm::new(mode),
            field: AuthField::Name,
            error: None,
        }
    }

    fn active_field(&mut self) -> &mut String {
        match self.field {
            AuthField::Name => &mut self.form.name,
            AuthField::Email => &mut self.form.email,
        }
    }
}

#[derive(Clone, Debug)]
struct AmountState {
    form: AmountForm,
    preset_idx: Option<usize>,
    error: Option<String>,
}

impl AmountState {
    fn new(op: WalletOp) -> Self {
        AmountState {
            form: AmountForm::new(op),
            preset_idx: None,
            error: None,
        }
    }
}

pub fn terminal_enter(state: &mut UiState) -> Result<()> {
    enable_raw_mode()?;
    crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::EnterAlternateScreen
    )?;
    // Create a single persistent Terminal to preserve buffers across draws
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    state.terminal = Some(terminal);
    Ok(())
}

pub fn terminal_exit() -> Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::LeaveAlternateScreen
    )?;
    Ok(())
}

/// Terminal input is read on a dedicated thread so the event loop never blocks.
pub fn input_event_stream() -> InputEventReceiver {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        loop {
            match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    tracing::warn!(?err, "terminal input failed");
                    break;
                }
            }
        }
    });
    rx
}

pub async fn next_raw_event(input: &mut InputEventReceiver) -> Result<Event> {
    input
        .recv()
        .await
        .ok_or_else(|| eyre!("terminal input closed"))
}

pub fn draw(state: &mut UiState, snap: &AppSnapshot) -> Result<()> {
    if let Some(mut term) = state.terminal.take() {
        let res = term.draw(|f| ui(f, state, snap)).map(drop);
        state.terminal = Some(term);
        res?;
    }
    Ok(())
}

pub fn interpret_event(
    state: &mut UiState,
    snap: &AppSnapshot,
    event: Event,
) -> Option<UserEvent> {
    match event {
        Event::Key(k) if k.kind == KeyEventKind::Press => interpret_key(state, snap, k),
        Event::Resize(..) => Some(UserEvent::Redraw),
        _ => None,
    }
}

fn interpret_key(
    state: &mut UiState,
    snap: &AppSnapshot,
    k: KeyEvent,
) -> Option<UserEvent> {
    let ctrl = k.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && k.code == KeyCode::Char('c') {
        return Some(UserEvent::Quit);
    }
    match &mut state.mode {
        Mode::Auth(auth) => {
            match k.code {
                KeyCode::Esc => state.mode = Mode::Normal,
                KeyCode::Char('t') if ctrl => auth.form.mode = auth.form.mode.toggled(),
                KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                    auth.field = match auth.field {
                        AuthField::Name => AuthField::Email,
                        AuthField::Email => AuthField::Name,
                    };
                }
                KeyCode::Backspace => {
                    auth.active_field().pop();
                    auth.error = None;
                }
                KeyCode::Enter => match auth.form.to_intent() {
                    Ok(intent) => {
                        state.mode = Mode::Normal;
                        return Some(UserEvent::Dispatch(intent));
                    }
                    Err(err) => auth.error = Some(err.to_string()),
                },
                KeyCode::Char(c) if !ctrl => {
                    let field = auth.active_field();
                    if field.chars().count() < MAX_FIELD_LEN {
                        field.push(c);
                    }
                    auth.error = None;
                }
                _ => return None,
            }
            return Some(UserEvent::Redraw);
        }
        Mode::Amount(amount) => {
            match k.code {
                KeyCode::Esc => state.mode = Mode::Normal,
                KeyCode::Tab if amount.form.op == WalletOp::Deposit => {
                    if !snap.deposit_presets.is_empty() {
                        let next = amount
                            .preset_idx
                            .map_or(0, |i| (i + 1) % snap.deposit_presets.len());
                        amount.preset_idx = Some(next);
                        amount.form.set(snap.deposit_presets[next]);
                        amount.error = None;
                    }
                }
                KeyCode::Backspace => {
                    amount.form.pop_digit();
                    amount.error = None;
                }
                KeyCode::Char(c) if c.is_ascii_digit() => {
                    amount.form.push_digit(c);
                    amount.preset_idx = None;
                    amount.error = None;
                }
                KeyCode::Enter => match amount.form.to_intent(snap.min_amount, snap.balance) {
                    Ok(intent) => {
                        state.mode = Mode::Normal;
                        return Some(UserEvent::Dispatch(intent));
                    }
                    Err(err) => amount.error = Some(err.to_string()),
                },
                _ => return None,
            }
            return Some(UserEvent::Redraw);
        }
        Mode::History => {
            return match k.code {
                KeyCode::Esc | KeyCode::Char('h') => {
                    state.mode = Mode::Normal;
                    Some(UserEvent::Redraw)
                }
                _ => None,
            };
        }
        Mode::QuitModal => {
            return match k.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => Some(UserEvent::Quit),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    state.mode = Mode::Normal;
                    Some(UserEvent::Redraw)
                }
                _ => None,
            };
        }
        Mode::Normal => {}
    }
    let signed_in = snap.identity != Identity::Anonymous;
    Some(match k.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            state.mode = Mode::QuitModal;
            UserEvent::Redraw
        }
        KeyCode::Char('d') => UserEvent::Dispatch(Intent::StartDemo),
        KeyCode::Char('l') => {
            state.mode = Mode::Auth(AuthState::new(AuthMode::Login));
            UserEvent::Redraw
        }
        KeyCode::Char('g') => {
            state.mode = Mode::Auth(AuthState::new(AuthMode::Register));
            UserEvent::Redraw
        }
        KeyCode::Char('u') if snap.identity == Identity::Demo => {
            state.mode = Mode::Auth(AuthState::new(AuthMode::Register));
            UserEvent::Redraw
        }
        // wallet controls only exist once there is a session
        KeyCode::Char('+') | KeyCode::Char('p') if signed_in => {
            state.mode = Mode::Amount(AmountState::new(WalletOp::Deposit));
            UserEvent::Redraw
        }
        KeyCode::Char('w') if signed_in => {
            state.mode = Mode::Amount(AmountState::new(WalletOp::Withdraw));
            UserEvent::Redraw
        }
        KeyCode::Char('h') => {
            state.mode = Mode::History;
            UserEvent::Redraw
        }
        KeyCode::Tab | KeyCode::Right => UserEvent::NextTab,
        KeyCode::BackTab | KeyCode::Left => UserEvent::PrevTab,
        KeyCode::Down | KeyCode::Char('j') => UserEvent::NextGame,
        KeyCode::Up | KeyCode::Char('k') => UserEvent::PrevGame,
        KeyCode::Enter => UserEvent::PlayGame,
        _ => return None,
    })
}

fn ui(f: &mut Frame, state: &UiState, snap: &AppSnapshot) {
    f.render_widget(Clear, f.area());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Length(4), // hero
            Constraint::Min(10),   // catalog + promos
            Constraint::Length(6), // toasts
            Constraint::Length(3), // help
        ])
        .split(f.area());

    draw_header(f, chunks[0], snap);
    draw_hero(f, chunks[1], snap);
    draw_body(f, chunks[2], snap);
    draw_toasts(f, chunks[3], snap);
    draw_help(f, chunks[4], snap);
    draw_modals(f, state, snap);
}

fn draw_header(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let mut spans = vec![Span::styled(
        "🎰 KERZH  ",
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
    )];
    match (snap.identity, snap.balance) {
        (Identity::Anonymous, _) | (_, None) => {
            spans.push(Span::styled(
                "Not signed in",
                Style::default().fg(Color::DarkGray),
            ));
        }
        (identity, Some(balance)) => {
            let name = snap.display_name.as_deref().unwrap_or_default();
            spans.push(Span::raw(name.to_string()));
            // the demo placeholder address is not worth showing
            if let (Identity::Registered, Some(email)) = (identity, snap.email.as_deref()) {
                spans.push(Span::styled(
                    format!(" <{email}>"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            spans.push(Span::raw(" | Balance: "));
            spans.push(Span::styled(
                format_amount(balance, &snap.currency),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
            if identity == Identity::Demo {
                spans.push(Span::styled(
                    " [DEMO]",
                    Style::default().fg(Color::Cyan),
                ));
            }
        }
    }
    let header = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("Casino"));
    f.render_widget(header, area);
}

fn draw_hero(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let call_to_action = match snap.identity {
        Identity::Anonymous => format!(
            "g: start playing (bonus {})   d: try the demo",
            format_amount(snap.welcome_bonus, &snap.currency)
        ),
        Identity::Demo => String::from("u: register to play for real money"),
        Identity::Registered => String::from("+: deposit   w: withdraw"),
    };
    let lines = vec![
        Line::from("Welcome to KERZH! 100% on the first deposit + 50 free spins."),
        Line::styled(call_to_action, Style::default().fg(Color::Green)),
    ];
    let hero = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    f.render_widget(hero, area);
}

fn draw_body(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);
    draw_catalog(f, cols[0], snap);
    draw_promos(f, cols[1], snap);
}

fn draw_catalog(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let block = Block::default().borders(Borders::ALL).title("Games");
    let inner = block.inner(area);
    f.render_widget(block, area);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(inner);

    let titles: Vec<String> = Category::ALL.iter().map(|c| c.to_string()).collect();
    let tabs = Tabs::new(titles)
        .select(snap.tab.index())
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )
        .divider("|");
    f.render_widget(tabs, rows[0]);

    let name_w = column_width(snap.games.iter().map(|g| g.name));
    let provider_w = column_width(snap.games.iter().map(|g| g.provider));
    let lines: Vec<Line> = snap
        .games
        .iter()
        .enumerate()
        .map(|(i, g)| game_line(g, i == snap.selected_game, name_w, provider_w))
        .collect();
    f.render_widget(Paragraph::new(lines), rows[1]);
}

fn game_line(game: &Game, selected: bool, name_w: usize, provider_w: usize) -> Line<'static> {
    let cursor = if selected { ">" } else { " " };
    let hot = if game.trending { " 🔥" } else { "" };
    let text = format!(
        "{cursor} {} {} {}{hot}",
        pad(game.name, name_w),
        pad(game.provider, provider_w),
        game.metric
    );
    if selected {
        Line::styled(
            text,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Line::from(text)
    }
}

fn draw_promos(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let mut lines = Vec::new();
    for promo in snap.promos {
        lines.push(Line::styled(
            promo.title,
            Style::default().add_modifier(Modifier::BOLD),
        ));
        lines.push(Line::from(format!("  {}", promo.description)));
        lines.push(Line::styled(
            format!("  Code: {}", promo.code),
            Style::default().fg(Color::Magenta),
        ));
    }
    let promos = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Promos & bonuses"));
    f.render_widget(promos, area);
}

fn draw_toasts(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let lines: Vec<Line> = if snap.toasts.is_empty() {
        vec![Line::styled("No notifications", Style::default().fg(Color::DarkGray))]
    } else {
        snap.toasts.iter().map(toast_line).collect()
    };
    let toasts = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Notifications"));
    f.render_widget(toasts, area);
}

fn toast_line(stamped: &Stamped) -> Line<'static> {
    let n = &stamped.notification;
    let color = if n.is_destructive() {
        Color::Red
    } else {
        Color::Green
    };
    Line::styled(
        format!(
            "[{}] {}: {}",
            stamped.at.format("%H:%M:%S"),
            n.title,
            n.description
        ),
        Style::default().fg(color),
    )
}

fn draw_help(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let text = match snap.identity {
        Identity::Anonymous => {
            "d demo | l login | g register | ←/→ tab | ↑/↓ game | Enter play | h history | q quit"
        }
        Identity::Demo => {
            "u register | + deposit | w withdraw | ←/→ tab | ↑/↓ game | h history | q quit"
        }
        Identity::Registered => {
            "+ deposit | w withdraw | d demo | ←/→ tab | ↑/↓ game | h history | q quit"
        }
    };
    let help = Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(help, area);
}

fn draw_modals(f: &mut Frame, state: &UiState, snap: &AppSnapshot) {
    match &state.mode {
        Mode::Auth(auth) => {
            let area = centered_rect(50, 40, f.area());
            let (title, subtitle) = match auth.form.mode {
                AuthMode::Login => ("Sign in", String::from("Sign in to your account")),
                AuthMode::Register => (
                    "Register",
                    format!(
                        "Create an account and get a {} bonus",
                        format_amount(snap.welcome_bonus, &snap.currency)
                    ),
                ),
            };
            let field_style = |field: AuthField| {
                if auth.field == field {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                }
            };
            let mut lines = vec![
                Line::from(subtitle),
                Line::from(""),
                Line::styled(
                    format!("Name:  {}", auth.form.name),
                    field_style(AuthField::Name),
                ),
                Line::styled(
                    format!("Email: {}", auth.form.email),
                    field_style(AuthField::Email),
                ),
                Line::from(""),
            ];
            push_error(&mut lines, auth.error.as_deref());
            lines.push(Line::from(
                "Enter=submit Tab=next field Ctrl+T=login/register Esc=cancel",
            ));
            render_modal(f, area, title, lines);
        }
        Mode::Amount(amount) => {
            let area = centered_rect(50, 40, f.area());
            let min = format_amount(snap.min_amount, &snap.currency);
            let mut lines = Vec::new();
            let title = match amount.form.op {
                WalletOp::Deposit => {
                    lines.push(Line::from("Instant top-up"));
                    "Deposit"
                }
                WalletOp::Withdraw => {
                    lines.push(Line::from(format!(
                        "Paid out within {} minutes",
                        snap.settlement_delay_minutes
                    )));
                    if let Some(balance) = snap.balance {
                        lines.push(Line::from(format!(
                            "Available: {}",
                            format_amount(balance, &snap.currency)
                        )));
                    }
                    "Withdraw"
                }
            };
            lines.push(Line::from(""));
            lines.push(Line::styled(
                format!("Amount: {}", amount.form.raw),
                Style::default().fg(Color::Yellow),
            ));
            lines.push(Line::styled(
                format!("Minimum {min}"),
                Style::default().fg(Color::DarkGray),
            ));
            if amount.form.op == WalletOp::Deposit && !snap.deposit_presets.is_empty() {
                let presets: Vec<String> = snap
                    .deposit_presets
                    .iter()
                    .map(|p| format_amount(*p, &snap.currency))
                    .collect();
                lines.push(Line::from(format!("Tab presets: {}", presets.join(" / "))));
            }
            lines.push(Line::from(""));
            push_error(&mut lines, amount.error.as_deref());
            lines.push(Line::from("Enter=confirm Esc=cancel digits to edit"));
            render_modal(f, area, title, lines);
        }
        Mode::History => {
            let area = centered_rect(70, 70, f.area());
            let mut lines: Vec<Line> = snap.history.iter().map(toast_line).collect();
            if lines.is_empty() {
                lines.push(Line::from("Nothing yet"));
            }
            lines.push(Line::from(""));
            lines.push(Line::from("Esc/h=close"));
            render_modal(f, area, "History", lines);
        }
        Mode::QuitModal => {
            let area = centered_rect(40, 20, f.area());
            render_modal(
                f,
                area,
                "Confirm Quit",
                vec![Line::from("Leave the casino? (Y/N)")],
            );
        }
        Mode::Normal => {}
    }
}

fn push_error(lines: &mut Vec<Line<'static>>, error: Option<&str>) {
    if let Some(err) = error {
        lines.push(Line::styled(
            err.to_string(),
            Style::default().fg(Color::Red),
        ));
    }
}

fn render_modal(f: &mut Frame, area: Rect, title: &str, lines: Vec<Line>) {
    let block = Block::default().borders(Borders::ALL).title(title.to_string());
    f.render_widget(Clear, area);
    f.render_widget(block.clone(), area);
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), block.inner(area));
}

fn column_width<'a>(items: impl Iterator<Item = &'a str>) -> usize {
    items.map(|s| s.width()).max().unwrap_or(0)
}

fn pad(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.width());
    format!("{s}{}", " ".repeat(fill))
}

fn centered_rect(w_percent: u16, h_percent: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - h_percent) / 2),
            Constraint::Percentage(h_percent),
            Constraint::Percentage((100 - h_percent) / 2),
        ])
        .split(r);

    let vertical = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - w_percent) / 2),
            Constraint::Percentage(w_percent),
            Constraint::Percentage((100 - w_percent) / 2),
        ])
        .split(popup_layout[1]);

    vertical[1]
}
