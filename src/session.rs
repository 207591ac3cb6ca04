//! Visitor session and the wallet state machine.
//!
//! Every transition goes through [`reduce`], which takes the current session
//! and a typed [`Intent`] and returns the next session together with exactly
//! one [`Notification`]. Rejections leave the session untouched and are
//! reported through the notification, never as an `Err`.

use crate::{
    money::format_amount,
    notification::Notification,
};
use std::fmt;
use thiserror::Error;

pub const DEMO_STARTING_BALANCE: u64 = 5_000;
pub const WELCOME_BONUS: u64 = 10_000;
pub const SETTLEMENT_DELAY_MINUTES: u32 = 5;
pub const DEMO_DISPLAY_NAME: &str = "Demo player";
pub const DEMO_EMAIL: &str = "demo@example.com";
pub const DEFAULT_DISPLAY_NAME: &str = "Player";
pub const DEFAULT_CURRENCY: &str = "₽";
pub const DEFAULT_PAYMENT_RAIL: &str = "SBP";

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Identity {
    Anonymous,
    Demo,
    Registered,
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Identity::Anonymous => "anonymous",
            Identity::Demo => "demo",
            Identity::Registered => "registered",
        };
        write!(f, "{name}")
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Account {
    pub display_name: String,
    pub email: String,
    pub balance: u64,
}

/// The single visitor session. The variant is the identity, so only one
/// identity can ever hold and an anonymous visitor has no balance at all.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Session {
    #[default]
    Anonymous,
    Demo(Account),
    Registered(Account),
}

impl Session {
    pub fn identity(&self) -> Identity {
        match self {
            Session::Anonymous => Identity::Anonymous,
            Session::Demo(_) => Identity::Demo,
            Session::Registered(_) => Identity::Registered,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Session::Anonymous)
    }

    pub fn is_demo(&self) -> bool {
        matches!(self, Session::Demo(_))
    }

    pub fn is_registered(&self) -> bool {
        matches!(self, Session::Registered(_))
    }

    pub fn account(&self) -> Option<&Account> {
        match self {
            Session::Anonymous => None,
            Session::Demo(account) | Session::Registered(account) => Some(account),
        }
    }

    pub fn display_name(&self) -> Option<&str> {
        self.account().map(|a| a.display_name.as_str())
    }

    /// Demo sessions report the placeholder address they were created with.
    pub fn email(&self) -> Option<&str> {
        self.account().map(|a| a.email.as_str())
    }

    pub fn balance(&self) -> Option<u64> {
        self.account().map(|a| a.balance)
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    pub fn toggled(self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum WalletOp {
    Deposit,
    Withdraw,
}

impl fmt::Display for WalletOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletOp::Deposit => write!(f, "deposit"),
            WalletOp::Withdraw => write!(f, "withdrawal"),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Intent {
    StartDemo,
    Authenticate {
        name: String,
        email: String,
        mode: AuthMode,
    },
    Deposit {
        amount: u64,
    },
    Withdraw {
        amount: u64,
    },
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum Rejection {
    #[error("{op} is not available in demo mode")]
    DemoMode { op: WalletOp },
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: u64, available: u64 },
    #[error("{op} requires an active session")]
    Unauthenticated { op: WalletOp },
    #[error("{op} amount must be greater than zero")]
    InvalidAmount { op: WalletOp },
    #[error("{op} of {amount} would overflow the balance")]
    Overflow { op: WalletOp, amount: u64 },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    DemoStarted { balance: u64 },
    Authenticated { mode: AuthMode, bonus: u64 },
    Deposited { amount: u64, balance: u64 },
    WithdrawalQueued { amount: u64, balance: u64 },
    Rejected(Rejection),
}

impl Outcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Outcome::Rejected(_))
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Outcome::Rejected(r) => Some(r),
            _ => None,
        }
    }
}

/// Constants the machine grants and quotes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Rules {
    pub demo_balance: u64,
    pub welcome_bonus: u64,
    pub settlement_delay_minutes: u32,
    pub currency: String,
    pub payment_rail: String,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            demo_balance: DEMO_STARTING_BALANCE,
            welcome_bonus: WELCOME_BONUS,
            settlement_delay_minutes: SETTLEMENT_DELAY_MINUTES,
            currency: DEFAULT_CURRENCY.to_string(),
            payment_rail: DEFAULT_PAYMENT_RAIL.to_string(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Transition {
    pub session: Session,
    pub outcome: Outcome,
    pub notification: Notification,
}

pub fn reduce(session: &Session, intent: &Intent, rules: &Rules) -> Transition {
    let (next, outcome) = match intent {
        Intent::StartDemo => start_demo(rules),
        Intent::Authenticate { name, email, mode } => {
            authenticate(name, email, *mode, rules)
        }
        Intent::Deposit { amount } => match deposit(session, *amount) {
            Ok(next) => {
                let balance = next.balance().unwrap_or_default();
                (
                    next,
                    Outcome::Deposited {
                        amount: *amount,
                        balance,
                    },
                )
            }
            Err(rejection) => (session.clone(), Outcome::Rejected(rejection)),
        },
        Intent::Withdraw { amount } => match withdraw(session, *amount) {
            Ok(next) => {
                let balance = next.balance().unwrap_or_default();
                (
                    next,
                    Outcome::WithdrawalQueued {
                        amount: *amount,
                        balance,
                    },
                )
            }
            Err(rejection) => (session.clone(), Outcome::Rejected(rejection)),
        },
    };
    let notification = notify(&outcome, rules);
    Transition {
        session: next,
        outcome,
        notification,
    }
}

fn start_demo(rules: &Rules) -> (Session, Outcome) {
    let account = Account {
        display_name: DEMO_DISPLAY_NAME.to_string(),
        email: DEMO_EMAIL.to_string(),
        balance: rules.demo_balance,
    };
    (
        Session::Demo(account),
        Outcome::DemoStarted {
            balance: rules.demo_balance,
        },
    )
}

// Prior sessions, demo included, are discarded and the bonus is granted fresh.
fn authenticate(
    name: &str,
    email: &str,
    mode: AuthMode,
    rules: &Rules,
) -> (Session, Outcome) {
    let name = name.trim();
    let display_name = if name.is_empty() {
        DEFAULT_DISPLAY_NAME
    } else {
        name
    };
    let account = Account {
        display_name: display_name.to_string(),
        email: email.trim().to_string(),
        balance: rules.welcome_bonus,
    };
    (
        Session::Registered(account),
        Outcome::Authenticated {
            mode,
            bonus: rules.welcome_bonus,
        },
    )
}

fn real_money_account(session: &Session, op: WalletOp) -> Result<&Account, Rejection> {
    match session {
        Session::Anonymous => Err(Rejection::Unauthenticated { op }),
        Session::Demo(_) => Err(Rejection::DemoMode { op }),
        Session::Registered(account) => Ok(account),
    }
}

fn deposit(session: &Session, amount: u64) -> Result<Session, Rejection> {
    let op = WalletOp::Deposit;
    let account = real_money_account(session, op)?;
    if amount == 0 {
        return Err(Rejection::InvalidAmount { op });
    }
    let balance = account
        .balance
        .checked_add(amount)
        .ok_or(Rejection::Overflow { op, amount })?;
    Ok(Session::Registered(Account {
        balance,
        ..account.clone()
    }))
}

fn withdraw(session: &Session, amount: u64) -> Result<Session, Rejection> {
    let op = WalletOp::Withdraw;
    let account = real_money_account(session, op)?;
    if amount == 0 {
        return Err(Rejection::InvalidAmount { op });
    }
    if amount > account.balance {
        return Err(Rejection::InsufficientFunds {
            requested: amount,
            available: account.balance,
        });
    }
    Ok(Session::Registered(Account {
        balance: account.balance - amount,
        ..account.clone()
    }))
}

pub fn notify(outcome: &Outcome, rules: &Rules) -> Notification {
    let money = |amount: u64| format_amount(amount, &rules.currency);
    match outcome {
        Outcome::DemoStarted { balance } => Notification::success(
            "Demo mode activated!",
            format!(
                "Demo balance {}. Register to play for real money",
                money(*balance)
            ),
        ),
        Outcome::Authenticated { mode, bonus } => {
            let title = match mode {
                AuthMode::Login => "Welcome back!",
                AuthMode::Register => "Registration complete!",
            };
            Notification::success(
                title,
                format!("Bonus {} credited to your balance", money(*bonus)),
            )
        }
        Outcome::Deposited { amount, .. } => Notification::success(
            "Deposit successful!",
            format!("{} credited via {}", money(*amount), rules.payment_rail),
        ),
        Outcome::WithdrawalQueued { amount, .. } => Notification::success(
            "Withdrawal requested!",
            format!(
                "{} will arrive within {} minutes",
                money(*amount),
                rules.settlement_delay_minutes
            ),
        ),
        Outcome::Rejected(rejection) => match rejection {
            Rejection::DemoMode {
                op: WalletOp::Deposit,
            } => Notification::destructive(
                "Demo mode",
                "Register to deposit real money",
            ),
            Rejection::DemoMode {
                op: WalletOp::Withdraw,
            } => Notification::destructive(
                "Demo mode",
                "Register to withdraw real funds",
            ),
            Rejection::InsufficientFunds { .. } => {
                Notification::destructive("Error", "Insufficient funds")
            }
            Rejection::Unauthenticated { .. } => Notification::destructive(
                "Not signed in",
                "Sign in or start the demo to use the wallet",
            ),
            Rejection::InvalidAmount { .. } => {
                Notification::destructive("Error", "Amount must be greater than zero")
            }
            Rejection::Overflow { .. } => {
                Notification::destructive("Error", "Amount is too large")
            }
        },
    }
}
