pub mod backup;
pub mod breaks;
pub mod clock;
pub mod config;
pub mod init;
pub mod log;
pub mod report;
pub mod reset;
pub mod status;

use crate::cli::parser::Cli;
use crate::errors::{AppError, AppResult};
use std::env;

/// Resolve `(user_id, display_name)` for the invoking user.
pub(crate) fn identity(cli: &Cli) -> AppResult<(String, String)> {
    let user_id = cli
        .user
        .clone()
        .or_else(|| env::var("USER").ok())
        .or_else(|| env::var("USERNAME").ok())
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::Config("no user identity: pass --user".into()))?;

    let name = cli
        .name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| user_id.clone());

    Ok((user_id, name))
}
