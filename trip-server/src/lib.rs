//! Itinerary scheduling server.
//!
//! A web application for shared trip planning. The core of it is the
//! scheduling engine: every trip day keeps an ordered list of stops,
//! and the travel duration between consecutive stops is recomputed
//! through an external routing provider whenever the order changes.

pub mod access;
pub mod domain;
pub mod routing;
pub mod schedule;
pub mod store;
pub mod web;
