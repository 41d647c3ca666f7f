//! Persisted event shapes: booking/decline training events and the
//! aggregate counter snapshot.
//!
//! Events are append-only — once written they are never mutated or
//! deleted. Identity is a generated UUID.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome kind for a logged quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Booking,
    Decline,
}

/// A single logged booking confirmation or quote decline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub request_id: String,
    pub customer_id: String,
    pub forwarder_id: String,
    /// Present for bookings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
    /// Present for bookings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_price: Option<f64>,
    /// Present for declines when the client supplied one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub logged_at: DateTime<Utc>,
}

impl TrainingEvent {
    pub fn booking(
        request_id: String,
        booking_id: String,
        customer_id: String,
        forwarder_id: String,
        final_price: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: EventKind::Booking,
            request_id,
            customer_id,
            forwarder_id,
            booking_id: Some(booking_id),
            final_price: Some(final_price),
            reason: None,
            logged_at: Utc::now(),
        }
    }

    pub fn decline(
        request_id: String,
        reason: Option<String>,
        customer_id: String,
        forwarder_id: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: EventKind::Decline,
            request_id,
            customer_id,
            forwarder_id,
            booking_id: None,
            final_price: None,
            reason,
            logged_at: Utc::now(),
        }
    }
}

/// Aggregate counters, rewritten wholesale on every logged event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsSnapshot {
    pub total_requests: u64,
    pub total_bookings: u64,
    pub total_declines: u64,
    /// Bookings over requests as a percentage, one decimal.
    pub win_rate: f64,
}
