use crate::{
    dsp::envelope::{Envelope, PercEnvelope},
    graph::node::{GraphNode, RenderCtx},
};

enum Shape {
    Adsr(Envelope),
    Perc(PercEnvelope),
}

/// Envelope as a graph node, usually the modulator of an `.amplify()`.
///
/// ```ignore
/// // bed swells in over 1.5 s
/// noise.amplify(EnvNode::fade_in(1.5))
///
/// // chime strike: 20 ms attack, 2 s ring
/// OscNode::sine().with_frequency(784.0).amplify(EnvNode::perc(0.02, 2.0))
/// ```
///
/// Percussive envelopes arm themselves on construction; the first block
/// already plays the attack.
pub struct EnvNode {
    shape: Shape,
    pending_trigger: bool,
}

impl EnvNode {
    pub fn adsr(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            shape: Shape::Adsr(Envelope::adsr(attack, decay, sustain, release)),
            pending_trigger: true,
        }
    }

    pub fn fade_in(attack: f32) -> Self {
        Self {
            shape: Shape::Adsr(Envelope::fade_in(attack, 0.5)),
            pending_trigger: true,
        }
    }

    pub fn perc(attack: f32, decay: f32) -> Self {
        Self::perc_with_peak(attack, decay, 1.0)
    }

    pub fn perc_with_peak(attack: f32, decay: f32, peak: f32) -> Self {
        let mut env = PercEnvelope::new(attack, decay).with_peak(peak);
        env.trigger();
        Self {
            shape: Shape::Perc(env),
            pending_trigger: false,
        }
    }

    pub fn level(&self) -> f32 {
        match &self.shape {
            Shape::Adsr(env) => env.level(),
            Shape::Perc(env) => env.level(),
        }
    }
}

impl GraphNode for EnvNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        if self.pending_trigger {
            self.pending_trigger = false;
            self.note_on(ctx);
        }
        match &mut self.shape {
            Shape::Adsr(env) => env.render(out, ctx),
            Shape::Perc(env) => env.render(out, ctx),
        }
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.pending_trigger = false;
        match &mut self.shape {
            Shape::Adsr(env) => env.note_on(ctx),
            Shape::Perc(env) => env.trigger(),
        }
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        if let Shape::Adsr(env) = &mut self.shape {
            env.note_off(ctx);
        }
    }

    fn get_envelope_level(&self) -> Option<f32> {
        Some(self.level())
    }

    fn is_active(&self) -> bool {
        match &self.shape {
            Shape::Adsr(env) => self.pending_trigger || env.is_active(),
            Shape::Perc(env) => env.is_active(),
        }
    }
}
