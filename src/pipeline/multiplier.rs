//! Per-run multiplier taken from the multiplier-source item.

use serde::Serialize;
use tracing::{debug, info};

use super::TemplateOutcome;
use crate::vision::TemplateRole;

/// Scale factor of one run. Always finite and positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Multiplier(f64);

impl Multiplier {
    pub const BASELINE: Multiplier = Multiplier(1.0);

    /// `raw / base`, or `None` for a non-positive amount or baseline.
    pub fn from_amount(raw: u32, base: f64) -> Option<Self> {
        let value = raw as f64 / base;
        (raw > 0 && value.is_finite() && value > 0.0).then_some(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Multiplier {
    fn default() -> Self {
        Self::BASELINE
    }
}

/// Resolves the multiplier from the multiplier-source outcome, if any.
///
/// Falls back to 1.0 when the source was not matched, its quantity was
/// unreadable, or the amount is zero.
pub fn resolve_multiplier(outcomes: &[TemplateOutcome<'_>], base_amount: f64) -> Multiplier {
    let source = outcomes
        .iter()
        .find(|outcome| outcome.template.role == TemplateRole::MultiplierSource);

    let Some(outcome) = source else {
        debug!("No multiplier-source template in library");
        return Multiplier::BASELINE;
    };

    match &outcome.result {
        Ok(reading) => match Multiplier::from_amount(reading.amount, base_amount) {
            Some(multiplier) => {
                info!(
                    "Multiplier {} from '{}' amount {} (base {})",
                    multiplier.value(),
                    outcome.template.name,
                    reading.amount,
                    base_amount
                );
                multiplier
            }
            None => {
                info!("Multiplier source amount {} is not positive, using 1.0", reading.amount);
                Multiplier::BASELINE
            }
        },
        Err(reason) => {
            debug!("Multiplier source not used ({}), using 1.0", reason);
            Multiplier::BASELINE
        }
    }
}
