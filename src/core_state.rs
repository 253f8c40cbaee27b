//! Transport-agnostic application state.
//!
//! `CoreState` owns the reviewer's [`ReviewSession`] and the runtime
//! configuration. The HTTP layer shares it behind an `Arc`; the session sits
//! in a `RwLock` so case views can be read while a submission is not in
//! flight.

use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;

use crate::cases::list_case_files;
use crate::config::ReviewConfig;
use crate::session::{ReviewSession, SessionError};

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("No case file is open")]
    NoActiveSession,

    #[error("Lock poisoned")]
    LockPoisoned,

    #[error("Case file not offered: {0}")]
    UnknownCaseFile(String),

    #[error(transparent)]
    Session(#[from] SessionError),
}

pub struct CoreState {
    pub config: ReviewConfig,
    /// Open review session. `None` until a case file is chosen.
    session: RwLock<Option<ReviewSession>>,
}

impl CoreState {
    pub fn new(config: ReviewConfig) -> Self {
        Self {
            config,
            session: RwLock::new(None),
        }
    }

    /// Case files the reviewer may open.
    pub fn case_files(&self) -> Vec<PathBuf> {
        list_case_files(&self.config.simulations_dir, &self.config.case_files)
    }

    /// Resolve a file name from the picker to an offered case file.
    pub fn resolve_case_file(&self, name: &str) -> Result<PathBuf, CoreError> {
        self.case_files()
            .into_iter()
            .find(|path| path.file_name().is_some_and(|f| f == name) || path == Path::new(name))
            .ok_or_else(|| CoreError::UnknownCaseFile(name.to_string()))
    }

    // ── Session access ──────────────────────────────────────

    pub fn read_session(
        &self,
    ) -> Result<RwLockReadGuard<'_, Option<ReviewSession>>, CoreError> {
        self.session.read().map_err(|_| CoreError::LockPoisoned)
    }

    pub fn write_session(
        &self,
    ) -> Result<RwLockWriteGuard<'_, Option<ReviewSession>>, CoreError> {
        self.session.write().map_err(|_| CoreError::LockPoisoned)
    }

    pub fn has_session(&self) -> bool {
        self.session
            .read()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    /// Open `name` and replace any session in progress.
    pub fn open_case_file(&self, name: &str) -> Result<(), CoreError> {
        let path = self.resolve_case_file(name)?;
        let session = ReviewSession::open(&path, &self.config.reviews_dir, self.config.lookahead)?;
        let mut guard = self.write_session()?;
        *guard = Some(session);
        Ok(())
    }

    /// Run `f` against the open session.
    pub fn with_session<T>(
        &self,
        f: impl FnOnce(&ReviewSession) -> Result<T, SessionError>,
    ) -> Result<T, CoreError> {
        let guard = self.read_session()?;
        let session = guard.as_ref().ok_or(CoreError::NoActiveSession)?;
        Ok(f(session)?)
    }

    /// Run `f` against the open session with write access.
    pub fn with_session_mut<T>(
        &self,
        f: impl FnOnce(&mut ReviewSession) -> Result<T, SessionError>,
    ) -> Result<T, CoreError> {
        let mut guard = self.write_session()?;
        let session = guard.as_mut().ok_or(CoreError::NoActiveSession)?;
        Ok(f(session)?)
    }
}
