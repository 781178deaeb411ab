//! pH threshold predicates.
//!
//! Ingest asks "is the latest reading inside the healthy band"
//! (inclusive bounds), the alert query asks "is this reading outside it" (strict bounds). A pH of
//! exactly 5.5 or 7.0 is healthy and never alerted.

use crate::model::{Classification, HealthLabel, Reading, PH_MAX, PH_MIN, STATUS_OK};

/// `5.5 <= ph <= 7.0`.
pub fn ph_in_range(ph: f64) -> bool {
    (PH_MIN..=PH_MAX).contains(&ph)
}

/// `ph < 5.5 || ph > 7.0`.
pub fn ph_out_of_range(ph: f64) -> bool {
    ph < PH_MIN || ph > PH_MAX
}

pub fn classify(reading: &Reading) -> Classification {
    let label = if ph_in_range(reading.ph) {
        HealthLabel::Healthy
    } else {
        HealthLabel::NeedsAttention
    };
    Classification {
        status: STATUS_OK.to_string(),
        classification: label,
    }
}
