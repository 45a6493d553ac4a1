//! The ordered-stop scheduling engine.
//!
//! Each trip day holds an ordered list of stops. This module keeps two
//! things consistent through every structural change:
//!
//! - positions within a `(trip, day)` partition stay contiguous from 1
//! - each stop's travel time to its successor reflects the current
//!   order, recomputed through the routing provider
//!
//! `ScheduleService` is the entry point; `ordering` and `recalc` are
//! its two halves.

pub mod ordering;
pub mod recalc;

mod service;

pub use service::{ScheduleError, ScheduleService};
