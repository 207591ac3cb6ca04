pub mod catalog;
pub mod config;
pub mod forms;
pub mod money;
pub mod notification;
pub mod session;

pub use notification::{
    Notification,
    NotificationCenter,
    Severity,
};
pub use session::{
    AuthMode,
    Identity,
    Intent,
    Outcome,
    Rejection,
    Rules,
    Session,
    Transition,
    WalletOp,
    reduce,
};
