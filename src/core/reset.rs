//! Guarded reset of the whole store.
//!
//! The requester must be on the configured allow-list and must answer with the
//! confirmation keyword before a deadline. Replies are pulled from a
//! `ConfirmationSource`, so the wait works the same over stdin or a scripted
//! list in tests.

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::store::SessionStore;
use std::collections::VecDeque;
use std::io::{self, BufRead};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationReply {
    pub author: String,
    pub text: String,
}

impl ConfirmationReply {
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
        }
    }
}

pub trait ConfirmationSource {
    /// Next reply received before `deadline`; `None` once the deadline has
    /// passed or no more replies can arrive.
    fn next_reply(&mut self, deadline: Instant) -> Option<ConfirmationReply>;
}

/// Replies typed on stdin, all attributed to the local requester.
pub struct StdinConfirmation {
    requester: String,
    lines: Receiver<String>,
}

impl StdinConfirmation {
    pub fn spawn(requester: &str) -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        });

        Self {
            requester: requester.to_string(),
            lines: rx,
        }
    }
}

impl ConfirmationSource for StdinConfirmation {
    fn next_reply(&mut self, deadline: Instant) -> Option<ConfirmationReply> {
        let remaining = deadline.checked_duration_since(Instant::now())?;
        self.lines
            .recv_timeout(remaining)
            .ok()
            .map(|text| ConfirmationReply::new(self.requester.clone(), text))
    }
}

/// Fixed list of replies, each with the instant it arrives.
///
/// Nothing sleeps: a reply whose arrival is past the deadline is simply
/// never delivered. Running out of replies behaves like the deadline expiring.
#[derive(Debug, Default)]
pub struct ScriptedConfirmation {
    replies: VecDeque<(Instant, ConfirmationReply)>,
}

impl ScriptedConfirmation {
    /// Replies that have all arrived by the time the source is created.
    pub fn new(replies: impl IntoIterator<Item = ConfirmationReply>) -> Self {
        let now = Instant::now();
        Self::with_arrivals(replies.into_iter().map(|r| (now, r)))
    }

    pub fn with_arrivals(replies: impl IntoIterator<Item = (Instant, ConfirmationReply)>) -> Self {
        let mut replies: Vec<_> = replies.into_iter().collect();
        replies.sort_by_key(|(at, _)| *at);
        Self {
            replies: replies.into(),
        }
    }
}

impl ConfirmationSource for ScriptedConfirmation {
    fn next_reply(&mut self, deadline: Instant) -> Option<ConfirmationReply> {
        match self.replies.front() {
            Some((arrives, _)) if *arrives <= deadline => self.replies.pop_front().map(|(_, r)| r),
            _ => None,
        }
    }
}

pub struct ResetLogic;

impl ResetLogic {
    pub fn authorize(cfg: &Config, requester: &str) -> AppResult<()> {
        if cfg.is_reset_allowed(requester) {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }

    /// Wait for `requester` to send `keyword` (case-insensitive) before `deadline`.
    /// Replies from anyone else, or with other text, are skipped.
    pub fn await_confirmation(
        source: &mut dyn ConfirmationSource,
        requester: &str,
        keyword: &str,
        deadline: Instant,
    ) -> AppResult<()> {
        while let Some(reply) = source.next_reply(deadline) {
            if reply.author == requester && reply.text.trim().eq_ignore_ascii_case(keyword) {
                return Ok(());
            }
        }
        Err(AppError::ConfirmationTimedOut)
    }

    /// Permission check, prompt, bounded wait, then `reset_all`.
    /// Any failure before the confirmation leaves the store untouched.
    pub fn run(
        store: &SessionStore,
        cfg: &Config,
        requester: &str,
        source: &mut dyn ConfirmationSource,
        prompt: impl FnOnce(&str),
    ) -> AppResult<()> {
        Self::authorize(cfg, requester)?;

        prompt(&format!(
            "Are you sure you want to reset all time data? This cannot be undone. Type '{}' to proceed.",
            cfg.reset_keyword
        ));

        let deadline = Instant::now() + Duration::from_secs(cfg.reset_timeout_secs);
        Self::await_confirmation(source, requester, &cfg.reset_keyword, deadline)?;

        store.reset_all()
    }
}
