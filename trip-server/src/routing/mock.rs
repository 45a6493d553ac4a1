//! Mock routing client for testing without provider access.
//!
//! Legs are programmed per coordinate pair; unknown pairs answer
//! "no route". A call counter lets tests assert how many lookups an
//! operation actually issued.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::LatLng;

use super::DurationSource;
use super::error::RoutingError;

#[derive(Debug, Clone, Copy)]
enum MockLeg {
    Minutes(u32),
    Fails,
}

/// Mock routing client with programmable legs.
#[derive(Debug, Default)]
pub struct MockRoutingClient {
    legs: Mutex<HashMap<(String, String), MockLeg>>,
    calls: AtomicUsize,
}

impl MockRoutingClient {
    /// Create a mock with no routes programmed.
    pub fn new() -> Self {
        Self::default()
    }

    fn key(origin: LatLng, destination: LatLng) -> (String, String) {
        (origin.to_string(), destination.to_string())
    }

    /// Program a successful lookup for the given leg.
    pub async fn set_duration(&self, origin: LatLng, destination: LatLng, minutes: u32) {
        self.legs
            .lock()
            .await
            .insert(Self::key(origin, destination), MockLeg::Minutes(minutes));
    }

    /// Program a failing lookup for the given leg.
    pub async fn set_failure(&self, origin: LatLng, destination: LatLng) {
        self.legs
            .lock()
            .await
            .insert(Self::key(origin, destination), MockLeg::Fails);
    }

    /// Number of lookups issued against this mock.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DurationSource for MockRoutingClient {
    async fn travel_minutes(
        &self,
        origin: LatLng,
        destination: LatLng,
    ) -> Result<u32, RoutingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let legs = self.legs.lock().await;
        match legs.get(&Self::key(origin, destination)) {
            Some(MockLeg::Minutes(minutes)) => Ok(*minutes),
            Some(MockLeg::Fails) => Err(RoutingError::Provider {
                status: "UNKNOWN_ERROR".to_string(),
                message: Some("injected failure".to_string()),
            }),
            None => Err(RoutingError::NoRoute),
        }
    }
}
