use crate::{
    dsp::{
        convolver::{Convolver, DEFAULT_PARTITION},
        impulse::NoiseImpulse,
        modulate::block_average,
        pan::{equal_power, pan_into},
    },
    graph::{
        lfo::LfoNode,
        node::{GraphNode, RenderCtx},
    },
    MAX_BLOCK_SIZE,
};

/*
Stereo Nodes
============

Mono chains are built with the `GraphNode` combinators and only become
stereo at the end, right before they reach the master bus:

  mono chain ──→ Panned ──────────────────────────→ bus   (bursts, cues)
  mono chain ──→ Panned ──→ Space ─┬─ dry ────────→ bus   (beds)
                                   └─ convolver ──→
  Panned, Panned, ... ──→ Layered ──→ Space ──────→ bus   (oscillator banks)

The master bus only knows `StereoNode`; everything it plays is one.
*/

pub trait StereoNode: Send {
    /// Overwrite `left` and `right` with the next block.
    fn render_stereo(&mut self, left: &mut [f32], right: &mut [f32], ctx: &RenderCtx);

    /// The bus frees the node once this returns false.
    fn is_active(&self) -> bool {
        true
    }
}

impl StereoNode for Box<dyn StereoNode> {
    fn render_stereo(&mut self, left: &mut [f32], right: &mut [f32], ctx: &RenderCtx) {
        (**self).render_stereo(left, right, ctx)
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }
}

/// A mono node placed in the stereo field, optionally drifting.
pub struct Panned<N> {
    source: N,
    pan: f32,
    gain: f32,
    auto_pan: Option<(LfoNode, f32)>,
    mono: Vec<f32>,
    lfo_buffer: Vec<f32>,
}

impl<N: GraphNode> Panned<N> {
    pub fn new(source: N, pan: f32) -> Self {
        Self {
            source,
            pan: pan.clamp(-1.0, 1.0),
            gain: 1.0,
            auto_pan: None,
            mono: vec![0.0; MAX_BLOCK_SIZE],
            lfo_buffer: Vec::new(),
        }
    }

    pub fn with_gain(mut self, gain: f32) -> Self {
        self.gain = gain.max(0.0);
        self
    }

    /// Sweep the position `width` either side of the base pan.
    pub fn with_auto_pan(mut self, lfo: LfoNode, width: f32) -> Self {
        self.auto_pan = Some((lfo, width.clamp(0.0, 1.0)));
        self.lfo_buffer = vec![0.0; MAX_BLOCK_SIZE];
        self
    }

    pub fn pan(&self) -> f32 {
        self.pan
    }

    fn current_pan(&mut self, len: usize, ctx: &RenderCtx) -> f32 {
        match &mut self.auto_pan {
            Some((lfo, width)) => {
                let block = &mut self.lfo_buffer[..len];
                lfo.render_block(block, ctx);
                (self.pan + block_average(block) * *width).clamp(-1.0, 1.0)
            }
            None => self.pan,
        }
    }
}

impl<N: GraphNode> StereoNode for Panned<N> {
    fn render_stereo(&mut self, left: &mut [f32], right: &mut [f32], ctx: &RenderCtx) {
        let len = left.len().min(right.len());
        let pan = self.current_pan(len, ctx);

        let mono = &mut self.mono[..len];
        self.source.render_block(mono, ctx);
        if self.gain != 1.0 {
            mono.iter_mut().for_each(|s| *s *= self.gain);
        }
        pan_into(mono, pan, left, right);
    }

    fn is_active(&self) -> bool {
        self.source.is_active()
    }
}

/// Several stereo nodes summed, with a shared gain.
pub struct Layered {
    layers: Vec<Box<dyn StereoNode>>,
    gain: f32,
    scratch_l: Vec<f32>,
    scratch_r: Vec<f32>,
}

impl Layered {
    pub fn new(layers: Vec<Box<dyn StereoNode>>) -> Self {
        Self {
            layers,
            gain: 1.0,
            scratch_l: vec![0.0; MAX_BLOCK_SIZE],
            scratch_r: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn with_gain(mut self, gain: f32) -> Self {
        self.gain = gain.max(0.0);
        self
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl StereoNode for Layered {
    fn render_stereo(&mut self, left: &mut [f32], right: &mut [f32], ctx: &RenderCtx) {
        let len = left.len().min(right.len());
        left.fill(0.0);
        right.fill(0.0);

        for layer in &mut self.layers {
            let (l, r) = (&mut self.scratch_l[..len], &mut self.scratch_r[..len]);
            layer.render_stereo(l, r, ctx);
            for i in 0..len {
                left[i] += l[i] * self.gain;
                right[i] += r[i] * self.gain;
            }
        }
    }

    fn is_active(&self) -> bool {
        self.layers.iter().any(|layer| layer.is_active())
    }
}

/// Dry signal plus a convolution reverb return.
pub struct Space<S> {
    source: S,
    dry: f32,
    wet: f32,
    conv_l: Convolver,
    conv_r: Convolver,
    send: Vec<f32>,
    wet_r: Vec<f32>,
}

impl<S: StereoNode> Space<S> {
    pub fn new(source: S, impulse: &NoiseImpulse, dry: f32, wet: f32) -> Self {
        Self {
            source,
            dry,
            wet,
            conv_l: Convolver::new(&impulse.left, DEFAULT_PARTITION),
            conv_r: Convolver::new(&impulse.right, DEFAULT_PARTITION),
            send: vec![0.0; MAX_BLOCK_SIZE],
            wet_r: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn mix(&self) -> (f32, f32) {
        (self.dry, self.wet)
    }
}

impl<S: StereoNode> StereoNode for Space<S> {
    fn render_stereo(&mut self, left: &mut [f32], right: &mut [f32], ctx: &RenderCtx) {
        let len = left.len().min(right.len());
        self.source.render_stereo(left, right, ctx);

        // the reverb is fed a centred mono sum
        let (centre, _) = equal_power(0.0);
        let send = &mut self.send[..len];
        for i in 0..len {
            send[i] = (left[i] + right[i]) * centre;
        }
        let wet_r = &mut self.wet_r[..len];
        wet_r.copy_from_slice(send);

        self.conv_l.process(send);
        self.conv_r.process(wet_r);

        for i in 0..len {
            left[i] = left[i] * self.dry + send[i] * self.wet;
            right[i] = right[i] * self.dry + wet_r[i] * self.wet;
        }
    }

    fn is_active(&self) -> bool {
        self.source.is_active()
    }
}
