//! Control-rate helpers for slow modulators.

/*
Slow Modulation
===============

Ambient textures never sit still: ocean cutoff drifts, rain density breathes,
stream sound wanders across the stereo field. Each of those is an oscillator
running far below hearing (0.03-0.3 Hz, periods of 3-30 s) whose bipolar
output is mapped onto a parameter range.

    bipolar   -1 ────── 0 ────── +1
    unipolar   0 ────── 0.5 ──── 1
    range     min ──── mid ───── max

Tremolo depth follows the same idea: a gain that swings between
1 - depth and 1 instead of between 0 and 1, so the bed never drops out.
*/

#[inline]
pub fn bipolar_to_unipolar(bipolar: f32) -> f32 {
    (bipolar + 1.0) * 0.5
}

/// Map a bipolar modulator value onto `[min, max]`.
#[inline]
pub fn map_to_range(bipolar: f32, min: f32, max: f32) -> f32 {
    min + (max - min) * bipolar_to_unipolar(bipolar.clamp(-1.0, 1.0))
}

/// Gain for a tremolo of the given depth: `1 - depth` at the trough, `1` at the crest.
#[inline]
pub fn tremolo_gain(bipolar: f32, depth: f32) -> f32 {
    let depth = depth.clamp(0.0, 1.0);
    1.0 - depth * (1.0 - bipolar_to_unipolar(bipolar.clamp(-1.0, 1.0)))
}

/// Seconds for one full cycle.
#[inline]
pub fn period_from_frequency(frequency_hz: f32) -> f32 {
    if frequency_hz <= 0.0 {
        return f32::INFINITY;
    }
    1.0 / frequency_hz
}
