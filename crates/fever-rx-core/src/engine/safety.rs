//! Post-selection safety checks.

use crate::config::EngineConfig;
use crate::models::{Contraindication, ContraindicationReason, PatientProfile, Recommendation};

/// Flag a recommendation whose medication is unsafe for this patient.
///
/// Runs after every branch; outcomes without a medication pass through.
pub fn apply_contraindications(
    mut recommendation: Recommendation,
    profile: &PatientProfile,
    config: &EngineConfig,
) -> Recommendation {
    if !config.pregnancy_override || !profile.pregnant {
        return recommendation;
    }

    let flagged = recommendation
        .outcome
        .medication()
        .filter(|medication| config.is_contraindicated(medication))
        .map(str::to_string);
    let Some(flagged) = flagged else {
        return recommendation;
    };

    tracing::warn!(medication = %flagged, "medication contraindicated during pregnancy");
    recommendation.contraindication = Some(Contraindication {
        medication: flagged,
        reason: ContraindicationReason::Pregnancy,
    });
    recommendation
}
