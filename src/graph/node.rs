/// Context passed to graph nodes during rendering.
///
/// - `sample_rate`: output rate of the device (e.g. 48000.0)
/// - `frequency`: pitch for nodes that track it; ambience nodes mostly fix their own
/// - `velocity`: burst intensity in `[0, 1]`
/// - `time`: seconds of audio rendered by the bus so far
#[derive(Debug, Clone, Copy)]
pub struct RenderCtx {
    pub sample_rate: f32,
    pub frequency: f32,
    pub velocity: f32,
    pub time: f64,
}

impl RenderCtx {
    /// Create context from a direct frequency (tests, benches and LFOs)
    pub fn from_freq(sample_rate: f32, frequency: f32, velocity: f32) -> Self {
        Self {
            sample_rate,
            frequency,
            velocity,
            time: 0.0,
        }
    }

    /// Context the master bus hands to its sources for one block.
    pub fn at(sample_rate: f32, time: f64) -> Self {
        Self {
            sample_rate,
            frequency: 0.0,
            velocity: 1.0,
            time,
        }
    }
}

/// Nodes with parameters a slow modulator can move.
pub trait Modulatable: Send {
    type Param: Copy + Send;

    fn get_param(&self, param: Self::Param) -> f32;

    fn apply_modulation(&mut self, param: Self::Param, base: f32, modulation: f32);
}

/// A mono audio-processing node.
///
/// Generators overwrite `out`; processors (filters, dynamics) transform it in
/// place.
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);

    /// Gate opens. Envelopes start their attack.
    fn note_on(&mut self, _ctx: &RenderCtx) {}

    /// Gate closes. Envelopes start their release.
    fn note_off(&mut self, _ctx: &RenderCtx) {}

    fn get_envelope_level(&self) -> Option<f32> {
        None
    }

    /// Whether this node can still make sound.
    ///
    /// The master bus frees a source once this returns false.
    fn is_active(&self) -> bool {
        true
    }
}

impl GraphNode for Box<dyn GraphNode> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        (**self).render_block(out, ctx)
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        (**self).note_on(ctx)
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        (**self).note_off(ctx)
    }

    fn get_envelope_level(&self) -> Option<f32> {
        (**self).get_envelope_level()
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }
}
