//! Derived display metrics.
//!
//! Pure functions over stored values. Stored ranges are not trusted:
//! everything rendered as a percentage or bar fill is clamped here.

/// Full knee flexion target used as the ROM progress denominator.
pub const ROM_FLEXION_TARGET_DEGREES: f64 = 120.0;

/// Pain is reported on a 0–10 scale.
pub const PAIN_SCALE_MAX: f64 = 10.0;

/// Range-of-motion bar fill: flexion / 120°, clamped to [0, 1].
pub fn rom_bar_fraction(rom_flexion: f64) -> f64 {
    clamp_fraction(rom_flexion / ROM_FLEXION_TARGET_DEGREES)
}

/// Strength bar value and displayed percentage: min(ratio, 100), floored
/// at 0. The stored ratio is unclamped at source and may exceed 100.
pub fn strength_bar_value(quad_strength_ratio: f64) -> f64 {
    quad_strength_ratio.clamp(0.0, 100.0)
}

/// Pain bar fill: level / 10, clamped to [0, 1].
pub fn pain_bar_fraction(pain_level: u8) -> f64 {
    clamp_fraction(f64::from(pain_level) / PAIN_SCALE_MAX)
}

/// Exercise adherence as a whole percentage, rounded to nearest. An empty
/// plan reads as 0%, not a division error.
pub fn adherence_pct(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total);
    ((completed as f64 / total as f64) * 100.0).round() as u32
}

fn clamp_fraction(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}
