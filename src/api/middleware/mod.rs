//! API middleware stack.
//!
//! The review API is local and single-user; the only middleware is the
//! access logger.

pub mod audit;
