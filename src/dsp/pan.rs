use std::f32::consts::FRAC_PI_4;

/// Equal-power pan law. `pan` in `[-1, 1]`, returns `(left, right)` gains.
///
/// At centre both channels sit at -3 dB so perceived loudness stays flat
/// as a source moves across the field.
#[inline]
pub fn equal_power(pan: f32) -> (f32, f32) {
    let angle = (pan.clamp(-1.0, 1.0) + 1.0) * FRAC_PI_4;
    (angle.cos(), angle.sin())
}

/// Write a mono block into both channels at `pan`.
pub fn pan_into(mono: &[f32], pan: f32, left: &mut [f32], right: &mut [f32]) {
    let (gain_l, gain_r) = equal_power(pan);
    for ((m, l), r) in mono.iter().zip(left.iter_mut()).zip(right.iter_mut()) {
        *l = m * gain_l;
        *r = m * gain_r;
    }
}
