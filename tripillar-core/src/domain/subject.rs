//! The subject whose timeline is synthesized.

use serde::{Deserialize, Serialize};

use super::body::Sign;

/// Birth location and reference frame of a subject.
///
/// Oracles receive the whole chart; the engine itself only reads the
/// reference sign (house 1 for transit classification) and the location
/// fields it forwards to the position oracle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectChart {
    pub id: String,
    /// Sign counted as house 1 when classifying transits.
    pub reference_sign: Sign,
    /// IANA timezone name forwarded to the position oracle.
    pub timezone: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl SubjectChart {
    pub fn new(
        id: impl Into<String>,
        reference_sign: Sign,
        timezone: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            id: id.into(),
            reference_sign,
            timezone: timezone.into(),
            latitude,
            longitude,
        }
    }

    /// Build a chart from natal placements: the Moon sign is the reference
    /// when known, otherwise the ascendant sign.
    pub fn from_natal(
        id: impl Into<String>,
        moon_sign: Option<Sign>,
        ascendant_sign: Sign,
        timezone: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self::new(
            id,
            moon_sign.unwrap_or(ascendant_sign),
            timezone,
            latitude,
            longitude,
        )
    }
}
