use std::fmt::{Display, Formatter};

use serde::Serialize;

/// Categorical key identifying one quotable room rate.
///
/// Membership of each field in the enumerated allow-lists is enforced by
/// the request surface before a key reaches the core; the core treats the
/// fields as opaque labels. The serialized form is exactly one element of
/// the outbound `attributes` array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RateKey {
    pub period: String,
    pub hotel: String,
    pub room: String,
}

impl RateKey {
    pub fn new(
        period: impl Into<String>,
        hotel: impl Into<String>,
        room: impl Into<String>,
    ) -> Self {
        Self {
            period: period.into(),
            hotel: hotel.into(),
            room: room.into(),
        }
    }

    /// Deterministic store key for this rate.
    pub fn cache_key(&self) -> String {
        format!("pricing:{}:{}:{}", self.period, self.hotel, self.room)
    }
}

impl Display for RateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.period, self.hotel, self.room)
    }
}
