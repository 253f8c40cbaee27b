//! API endpoint handlers.
//!
//! Each module corresponds to one step of the review flow.
//! Handlers delegate to `CoreState` and the open `ReviewSession`.

pub mod cases;
pub mod files;
pub mod health;
pub mod ledger;
pub mod reviews;
pub mod session;
