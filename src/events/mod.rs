//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! broadcast lifecycle events from the polling session to subscribers:
//! - [`Event`] / [`EventKind`] - what happened (fetch attempts, retries,
//!   published quotes, session lifecycle)
//! - [`Bus`] - non-blocking broadcast channel the session publishes into

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
