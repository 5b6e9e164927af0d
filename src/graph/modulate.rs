use crate::{
    dsp::modulate::{apply_modulation, block_average},
    graph::node::{GraphNode, Modulatable, RenderCtx},
    MAX_BLOCK_SIZE,
};

/*
Modulate Node
=============

Drives one parameter of a node from a modulator's output:

    value = base + average(modulator over block) × depth

With an ocean lowpass at 800 Hz and depth 400, a sine LFO sweeps the cutoff
between 400 and 1200 Hz. Chirps use a percussive envelope as the modulator
on oscillator frequency, so pitch jumps up with the attack and falls back as
it decays.
*/

pub struct Modulate<S, L>
where
    S: GraphNode + Modulatable,
    L: GraphNode,
{
    source: S,
    modulator: L,
    param: S::Param,
    depth: f32,
    mod_buffer: Vec<f32>,
}

impl<S, L> Modulate<S, L>
where
    S: GraphNode + Modulatable,
    L: GraphNode,
{
    pub fn new(source: S, modulator: L, param: S::Param, depth: f32) -> Self {
        Self {
            source,
            modulator,
            param,
            depth,
            mod_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S, L> GraphNode for Modulate<S, L>
where
    S: GraphNode + Modulatable,
    L: GraphNode,
{
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let len = out.len();
        self.modulator.render_block(&mut self.mod_buffer[..len], ctx);

        let amount = block_average(&self.mod_buffer[..len]);
        let base = self.source.get_param(self.param);
        let target = apply_modulation(base, amount, self.depth);
        self.source
            .apply_modulation(self.param, base, target - base);

        self.source.render_block(out, ctx);
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.source.note_on(ctx);
        self.modulator.note_on(ctx);
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        self.source.note_off(ctx);
        self.modulator.note_off(ctx);
    }

    fn is_active(&self) -> bool {
        self.source.is_active()
    }

    fn get_envelope_level(&self) -> Option<f32> {
        self.source.get_envelope_level()
    }
}
