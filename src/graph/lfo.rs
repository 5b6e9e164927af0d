use crate::{
    dsp::{lfo::map_to_range, oscillator::OscillatorBlock},
    graph::node::{GraphNode, RenderCtx},
};

/*
LFO (Low Frequency Oscillator)
==============================

Runs at its own fixed rate and ignores `ctx.frequency`. Output is bipolar
[-1, 1] unless a range is set, in which case it is mapped to [min, max]:

  // filter drift, consumed by .modulate() as a bipolar value
  LfoNode::sine(0.08)

  // tremolo, consumed by .amplify() as a gain between 0.7 and 1.0
  LfoNode::sine(0.2).with_range(0.7, 1.0)

Ambient rates sit between 0.03 and 0.3 Hz: slow enough to be felt as
breathing rather than heard as wobble.
*/

pub struct LfoNode {
    osc: OscillatorBlock,
    frequency: f32, // Fixed rate in Hz (ignores note context)
    /// Output mapped to `[min, max]` instead of `[-1, 1]` when set.
    range: Option<(f32, f32)>,
}

impl LfoNode {
    pub fn sine(frequency: f32) -> Self {
        Self {
            osc: OscillatorBlock::sine(),
            frequency,
            range: None,
        }
    }

    pub fn triangle(frequency: f32) -> Self {
        Self {
            osc: OscillatorBlock::triangle(),
            frequency,
            range: None,
        }
    }

    /// Map the output into `[min, max]`.
    ///
    /// Use this when the LFO feeds `.amplify()` directly: a gain range such
    /// as `0.7..1.0` is a gentle tremolo that never drops to silence.
    pub fn with_range(mut self, min: f32, max: f32) -> Self {
        self.range = Some((min, max));
        self
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }
}

impl GraphNode for LfoNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let lfo_ctx = RenderCtx::from_freq(ctx.sample_rate, self.frequency, 1.0);
        self.osc.render(out, &lfo_ctx);

        if let Some((min, max)) = self.range {
            for sample in out.iter_mut() {
                *sample = map_to_range(*sample, min, max);
            }
        }
    }
}
