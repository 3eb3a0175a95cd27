use serde::Serialize;

/// One validated rate record from the pricing model.
///
/// Produced only by the validate module; `rate` is a decimal-digit string
/// after normalization. Construct via validation, not deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateRecord {
    pub period: String,
    pub hotel: String,
    pub room: String,
    pub rate: String,
}
