//! Real-world scenario benchmarks.
//!
//! These render the soundscapes a session actually plays, alone and through
//! the master bus.

mod session;
mod soundscapes;

pub use session::bench_session;
pub use soundscapes::bench_soundscapes;
