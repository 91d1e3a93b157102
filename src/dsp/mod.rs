//! DSP — pure Rust synthesis for the sound palette.
//!
//! Everything here is device-free and deterministic: voices are built
//! fully scheduled and rendered sample by sample, so the same builders
//! feed the live device path and the offline test path.

pub mod builders;
pub mod envelope;
pub mod filter;
pub mod mixer;
pub mod noise;
pub mod oscillator;
pub mod voice;
