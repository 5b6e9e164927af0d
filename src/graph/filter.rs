use crate::{
    dsp::{
        filter::{FilterType, SVFilter},
        shelf::HighShelf,
    },
    graph::node::{GraphNode, Modulatable, RenderCtx},
};

/*
Filter Nodes
============

`FilterNode` wraps the state-variable filter and exposes cutoff and
resonance to `.modulate()`:

  // ocean: surf swells as the cutoff drifts 400-1200 Hz every ~12 s
  FilterNode::lowpass(800.0)
      .modulate(LfoNode::sine(0.08), FilterParam::Cutoff, 400.0)

  // stream: narrow band wandering around 1.4 kHz
  FilterNode::bandpass(1_400.0)
      .with_resonance(0.4)
      .modulate(LfoNode::triangle(0.15), FilterParam::Cutoff, 600.0)

`ShelfNode` is a fixed biquad high shelf, used to brighten rain.
*/

/// Parameters that can be modulated on a filter
#[derive(Clone, Copy, Debug)]
pub enum FilterParam {
    /// Cutoff frequency in Hz
    Cutoff,
    /// Resonance, 0.0 (flat) to 0.95
    Resonance,
}

pub struct FilterNode {
    filter: SVFilter,
    /// Cutoff before modulation; what `.modulate()` swings around.
    base_cutoff: f32,
    /// Resonance before modulation.
    base_resonance: f32,
}

impl FilterNode {
    pub fn new(filter_type: FilterType, cutoff_hz: f32) -> Self {
        Self {
            filter: SVFilter::new(filter_type, cutoff_hz),
            base_cutoff: cutoff_hz,
            base_resonance: 0.0,
        }
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::LowPass, cutoff_hz)
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::HighPass, cutoff_hz)
    }

    pub fn bandpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::BandPass, cutoff_hz)
    }

    /// Emphasis around the cutoff. Clamped below 0.95 so the filter never
    /// rings on its own; a narrow stream band uses about 0.4.
    pub fn with_resonance(mut self, resonance: f32) -> Self {
        self.base_resonance = resonance.clamp(0.0, 0.95);
        self.filter.set_resonance(self.base_resonance);
        self
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter.filter_type()
    }

    /// Cutoff currently in effect, after modulation.
    pub fn cutoff(&self) -> f32 {
        self.filter.cutoff_hz
    }
}

impl Modulatable for FilterNode {
    type Param = FilterParam;

    fn get_param(&self, param: Self::Param) -> f32 {
        match param {
            FilterParam::Cutoff => self.base_cutoff,
            FilterParam::Resonance => self.base_resonance,
        }
    }

    fn apply_modulation(&mut self, param: Self::Param, base: f32, modulation: f32) {
        let value = base + modulation;
        match param {
            FilterParam::Cutoff => {
                self.base_cutoff = base;
                self.filter.set_cutoff(value.clamp(20.0, 20_000.0));
            }
            FilterParam::Resonance => {
                self.base_resonance = base;
                self.filter.set_resonance(value.clamp(0.0, 0.95));
            }
        }
    }
}

impl GraphNode for FilterNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.filter.render(out, ctx);
    }
}

/// Fixed high shelf. Boosts (or cuts) everything above `freq_hz` by
/// `gain_db`.
pub struct ShelfNode {
    shelf: HighShelf,
}

impl ShelfNode {
    pub fn high(freq_hz: f32, gain_db: f32) -> Self {
        Self {
            shelf: HighShelf::new(freq_hz, gain_db),
        }
    }
}

impl GraphNode for ShelfNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.shelf.render(out, ctx.sample_rate);
    }
}
