//! Raw form input to typed [`Intent`]s.
//!
//! The checks here are the ones a browser form would apply (required fields,
//! email shape, minimum amount, withdrawal capped by the shown balance). The
//! state machine re-checks what matters for correctness on its own.

use crate::session::{
    AuthMode,
    Intent,
    WalletOp,
};
use thiserror::Error;

pub const MAX_AMOUNT_DIGITS: usize = 12;

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum FormError {
    #[error("email is required")]
    MissingEmail,
    #[error("'{0}' is not an email address")]
    MalformedEmail(String),
    #[error("amount is required")]
    MissingAmount,
    #[error("'{0}' is not a whole number")]
    NotANumber(String),
    #[error("minimum amount is {min}")]
    BelowMinimum { min: u64 },
    #[error("only {available} available")]
    AboveBalance { available: u64 },
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AuthForm {
    pub name: String,
    pub email: String,
    pub mode: AuthMode,
}

impl AuthForm {
    pub fn new(mode: AuthMode) -> Self {
        AuthForm {
            mode,
            ..AuthForm::default()
        }
    }

    /// A blank name is passed through; the session falls back to its default.
    pub fn to_intent(&self) -> Result<Intent, FormError> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(FormError::MissingEmail);
        }
        if !looks_like_email(email) {
            return Err(FormError::MalformedEmail(email.to_string()));
        }
        Ok(Intent::Authenticate {
            name: self.name.trim().to_string(),
            email: email.to_string(),
            mode: self.mode,
        })
    }
}

fn looks_like_email(raw: &str) -> bool {
    if raw.chars().any(char::is_whitespace) {
        return false;
    }
    match raw.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        }
        None => false,
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AmountForm {
    pub op: WalletOp,
    pub raw: String,
}

impl AmountForm {
    pub fn new(op: WalletOp) -> Self {
        AmountForm {
            op,
            raw: String::new(),
        }
    }

    pub fn push_digit(&mut self, c: char) {
        if c.is_ascii_digit() && self.raw.len() < MAX_AMOUNT_DIGITS {
            self.raw.push(c);
        }
    }

    pub fn pop_digit(&mut self) {
        self.raw.pop();
    }

    pub fn set(&mut self, amount: u64) {
        self.raw = amount.to_string();
    }

    /// `available` is the balance shown next to the form; it caps withdrawals
    /// only.
    pub fn to_intent(
        &self,
        min: u64,
        available: Option<u64>,
    ) -> Result<Intent, FormError> {
        let raw = self.raw.trim();
        if raw.is_empty() {
            return Err(FormError::MissingAmount);
        }
        let amount: u64 = raw
            .parse()
            .map_err(|_| FormError::NotANumber(raw.to_string()))?;
        if amount < min.max(1) {
            return Err(FormError::BelowMinimum { min: min.max(1) });
        }
        match self.op {
            WalletOp::Deposit => Ok(Intent::Deposit { amount }),
            WalletOp::Withdraw => {
                if let Some(available) = available {
                    if amount > available {
                        return Err(FormError::AboveBalance { available });
                    }
                }
                Ok(Intent::Withdraw { amount })
            }
        }
    }
}
