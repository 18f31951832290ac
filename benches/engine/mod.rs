//! Benchmarks for the scheduling engine and synth bank.

mod render;
mod resolve;
mod tick;

pub use render::bench_render;
pub use resolve::bench_resolve;
pub use tick::bench_tick;
