use crate::domain::AccountKind;
use rust_decimal::Decimal;
use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by ledger operations and report generation. All of
/// these are recoverable: the session reports them and continues.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{kind} '{name}' not found")]
    AccountNotFound { kind: AccountKind, name: String },

    #[error(
        "insufficient balance in {kind} '{name}': balance is ${balance}, requested ${requested}"
    )]
    InsufficientBalance {
        kind: AccountKind,
        name: String,
        balance: Decimal,
        requested: Decimal,
    },

    #[error("unknown expense category '{0}'")]
    UnknownCategory(String),

    #[error("failed to write report to {}", path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
