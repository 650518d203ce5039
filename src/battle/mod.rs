pub mod achievements;
pub mod arena;
pub mod combat;
pub mod encounter;
pub mod phase;
pub mod phase_queue;
pub mod phases;
pub mod rng;
pub mod scene;
pub mod state;
pub mod stats;

#[cfg(test)]
pub(crate) mod tests;
