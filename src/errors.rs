//! Unified application error type.
//! The store, the report builder and the CLI dispatcher all return AppError,
//! so domain failures and infrastructure failures travel the same way up to
//! `main`, which renders them as a single user-facing line.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // Session transitions
    // ---------------------------
    #[error("You are already clocked in today")]
    AlreadyClockedIn,

    #[error("You need to clock in first!")]
    NotClockedIn,

    #[error("You have already clocked out today.")]
    AlreadyClockedOut,

    #[error("You're currently on a break. Please end your break before clocking out.")]
    BreakInProgress,

    #[error("You've already started a break!")]
    BreakAlreadyActive,

    #[error("You're not currently on a break!")]
    NoActiveBreak,

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    // ---------------------------
    // Report
    // ---------------------------
    #[error("No time tracking data available.")]
    NoDataAvailable,

    // ---------------------------
    // Dispatcher
    // ---------------------------
    #[error("You don't have permission to use this command.")]
    PermissionDenied,

    #[error("Reset cancelled.")]
    ConfirmationTimedOut,

    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Storage
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("Failed to persist session data: {0}")]
    Persistence(String),

    #[error("Stored session data is inconsistent: {0}")]
    CorruptSnapshot(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export format not supported: {0}")]
    InvalidExportFormat(String),

    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// True for failures a user can fix by issuing a different command.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            AppError::AlreadyClockedIn
                | AppError::NotClockedIn
                | AppError::AlreadyClockedOut
                | AppError::BreakInProgress
                | AppError::BreakAlreadyActive
                | AppError::NoActiveBreak
                | AppError::UnknownUser(_)
                | AppError::NoDataAvailable
                | AppError::PermissionDenied
                | AppError::ConfirmationTimedOut
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;
