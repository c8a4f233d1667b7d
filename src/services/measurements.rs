//! Manual measurement logging.
//!
//! Measurements are append-only: there is no update path, and the
//! dashboard always reads the most recent snapshot by date. Range checks
//! happen here; the strength ratio is intentionally allowed above 100
//! (it is clamped for display only).

use crate::error::CoreError;
use crate::store::RehabStore;
use crate::types::{Identity, Measurement, MeasurementInput};

pub fn validate_measurement(input: &MeasurementInput) -> Result<Measurement, CoreError> {
    if input.rom_flexion < 0.0 || input.rom_extension < 0.0 {
        return Err(CoreError::Validation(
            "Range-of-motion degrees cannot be negative.".to_string(),
        ));
    }
    if input.quad_strength_ratio < 0.0 {
        return Err(CoreError::Validation(
            "Strength ratio cannot be negative.".to_string(),
        ));
    }
    if input.pain_level > 10 {
        return Err(CoreError::Validation(
            "Pain level is reported on a 0-10 scale.".to_string(),
        ));
    }
    if let Some(circumference) = input.swelling_circumference_cm {
        if circumference < 0.0 {
            return Err(CoreError::Validation(
                "Swelling circumference cannot be negative.".to_string(),
            ));
        }
    }
    if let Some(seconds) = input.single_leg_balance_seconds {
        if seconds < 0.0 {
            return Err(CoreError::Validation(
                "Balance time cannot be negative.".to_string(),
            ));
        }
    }

    Ok(Measurement {
        date: input.date,
        rom_flexion: input.rom_flexion,
        rom_extension: input.rom_extension,
        quad_strength_ratio: input.quad_strength_ratio,
        pain_level: input.pain_level,
        swelling_circumference_cm: input.swelling_circumference_cm,
        single_leg_balance_seconds: input.single_leg_balance_seconds,
    })
}

/// Validate and append one measurement snapshot.
pub async fn log_measurement(
    store: &dyn RehabStore,
    who: &Identity,
    input: &MeasurementInput,
) -> Result<(), CoreError> {
    let measurement = validate_measurement(input)?;
    store.insert_measurement(who, &measurement).await?;
    log::info!("measurement logged for {} ({})", who.user_id, measurement.date);
    Ok(())
}
