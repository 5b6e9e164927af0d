//! Block-rate modulation helpers.
//!
//! Parameters such as filter cutoff or pan position are updated once per
//! render block from the average of the modulator's output over that block.
//! The bus renders in chunks of at most `MAX_BLOCK_SIZE` frames, so even at
//! the largest chunk a 0.3 Hz LFO moves less than 1% of its cycle per update.

#[inline]
pub fn apply_modulation(base_value: f32, modulator: f32, depth: f32) -> f32 {
    base_value + modulator * depth
}

#[inline]
pub fn block_average(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f32>() / samples.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modulation_is_centred_on_base() {
        assert_eq!(apply_modulation(800.0, 0.0, 400.0), 800.0);
        assert_eq!(apply_modulation(800.0, -1.0, 400.0), 400.0);
        assert_eq!(apply_modulation(800.0, 0.5, 400.0), 1000.0);
    }

    #[test]
    fn average_of_empty_block_is_zero() {
        assert_eq!(block_average(&[]), 0.0);
        assert_eq!(block_average(&[0.25, 0.75]), 0.5);
    }
}
