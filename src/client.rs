use crate::ui;
use chrono::{
    DateTime,
    Local,
};
use color_eyre::eyre::{
    Result,
    WrapErr,
};
use kerzh_demo::{
    catalog::{
        self,
        Category,
        Game,
        Promo,
    },
    config::AppConfig,
    notification::{
        NotificationCenter,
        Stamped,
    },
    session::{
        Identity,
        Intent,
        Outcome,
        Rules,
        Session,
        Transition,
        reduce,
    },
};
use std::time::Duration;
use tokio::time;
use tracing::{
    debug,
    info,
    warn,
};

const TICK: Duration = Duration::from_millis(500);

#[derive(Clone, Debug)]
pub struct AppSnapshot {
    pub identity: Identity,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub balance: Option<u64>,
    pub currency: String,
    pub min_amount: u64,
    pub deposit_presets: Vec<u64>,
    pub settlement_delay_minutes: u32,
    pub welcome_bonus: u64,
    pub tab: Category,
    pub games: Vec<&'static Game>,
    pub selected_game: usize,
    pub promos: &'static [Promo],
    pub toasts: Vec<Stamped>,
    pub history: Vec<Stamped>,
}

pub struct AppController {
    session: Session,
    rules: Rules,
    config: AppConfig,
    notifications: NotificationCenter,
    pub tab: Category,
    pub selected_game: usize,
}

impl AppController {
    pub fn new(config: AppConfig) -> Self {
        Self {
            session: Session::Anonymous,
            rules: config.rules(),
            notifications: NotificationCenter::new(config.toast_seconds),
            config,
            tab: Category::Slots,
            selected_game: 0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn dispatch(&mut self, intent: Intent) -> Outcome {
        self.dispatch_at(intent, Local::now())
    }

    fn dispatch_at(&mut self, intent: Intent, now: DateTime<Local>) -> Outcome {
        let from = self.session.identity();
        let Transition {
            session,
            outcome,
            notification,
        } = reduce(&self.session, &intent, &self.rules);
        if let Some(rejection) = outcome.rejection() {
            warn!(%from, %rejection, "operation rejected");
        } else {
            info!(
                %from,
                to = %session.identity(),
                balance = ?session.balance(),
                outcome = ?outcome,
                "session updated"
            );
        }
        self.session = session;
        self.notifications.push(notification, now);
        outcome
    }

    pub fn next_tab(&mut self) {
        self.tab = self.tab.next();
        self.selected_game = 0;
    }

    pub fn prev_tab(&mut self) {
        self.tab = self.tab.prev();
        self.selected_game = 0;
    }

    pub fn select_next_game(&mut self) {
        let len = catalog::games_in(self.tab).len();
        if len > 0 {
            self.selected_game = (self.selected_game + 1) % len;
        }
    }

    pub fn select_prev_game(&mut self) {
        let len = catalog::games_in(self.tab).len();
        if len > 0 {
            self.selected_game = (self.selected_game + len - 1) % len;
        }
    }

    /// Opening a game while anonymous drops the visitor into the demo.
    pub fn play_selected_game(&mut self) {
        let games = catalog::games_in(self.tab);
        let Some(game) = games.get(self.selected_game) else {
            return;
        };
        if self.session.is_anonymous() {
            debug!(game = game.name, "game opened anonymously, starting demo");
            self.dispatch(Intent::StartDemo);
        } else {
            debug!(game = game.name, identity = %self.session.identity(), "game opened");
        }
    }

    pub fn snapshot(&self) -> AppSnapshot {
        self.snapshot_at(Local::now())
    }

    fn snapshot_at(&self, now: DateTime<Local>) -> AppSnapshot {
        AppSnapshot {
            identity: self.session.identity(),
            display_name: self.session.display_name().map(str::to_owned),
            email: self.session.email().map(str::to_owned),
            balance: self.session.balance(),
            currency: self.config.currency.clone(),
            min_amount: self.config.min_amount,
            deposit_presets: self.config.deposit_presets.clone(),
            settlement_delay_minutes: self.config.settlement_delay_minutes,
            welcome_bonus: self.config.welcome_bonus,
            tab: self.tab,
            games: catalog::games_in(self.tab),
            selected_game: self.selected_game,
            promos: &catalog::PROMOS,
            toasts: self.notifications.active(now),
            history: self.notifications.history(),
        }
    }
}

pub async fn run_app(config: AppConfig) -> Result<()> {
    let controller = AppController::new(config);
    let mut ui_state = ui::UiState::default();
    let mut input_events = ui::input_event_stream();

    info!("Starting UI");
    ui::terminal_enter(&mut ui_state)?;
    info!("UI ready");
    let res = run_loop(controller, &mut ui_state, &mut input_events).await;
    ui::terminal_exit()?;
    res
}

async fn run_loop(
    mut controller: AppController,
    ui_state: &mut ui::UiState,
    input_events: &mut ui::InputEventReceiver,
) -> Result<()> {
    let mut ticker = time::interval(TICK);
    let mut snapshot = controller.snapshot();
    ui::draw(ui_state, &snapshot).wrap_err("initial draw failed")?;
    let mut had_toasts = !snapshot.toasts.is_empty();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => { break; }
            _ = ticker.tick() => {
                // only redraw while toasts are on screen or just expired
                let now = Local::now();
                let has_toasts = controller.notifications().has_active(now);
                if has_toasts || had_toasts {
                    snapshot = controller.snapshot_at(now);
                    ui::draw(ui_state, &snapshot).wrap_err("draw on tick failed")?;
                }
                had_toasts = has_toasts;
            }
            raw_ev = ui::next_raw_event(input_events) => {
                let event = raw_ev?;
                let Some(ev) = ui::interpret_event(ui_state, &snapshot, event) else {
                    continue;
                };
                match ev {
                    ui::UserEvent::Quit => break,
                    ui::UserEvent::Redraw => {}
                    ui::UserEvent::Dispatch(intent) => {
                        controller.dispatch(intent);
                    }
                    ui::UserEvent::NextTab => controller.next_tab(),
                    ui::UserEvent::PrevTab => controller.prev_tab(),
                    ui::UserEvent::NextGame => controller.select_next_game(),
                    ui::UserEvent::PrevGame => controller.select_prev_game(),
                    ui::UserEvent::PlayGame => controller.play_selected_game(),
                }
                snapshot = controller.snapshot();
                had_toasts = !snapshot.toasts.is_empty();
                ui::draw(ui_state, &snapshot).wrap_err("draw after input failed")?;
            }
        }
    }
    info!(
        identity = %controller.session().identity(),
        notifications = controller.notifications().emitted(),
        "session ended"
    );
    Ok(())
}
