//! xpdeck - X-Plane dataref presets for Stream Deck keypads.
//!
//! This library loads a tree of YAML-defined button presets ("keysets"),
//! extracts the buttons bound to X-Plane datarefs, and renders device-ready
//! key images. Talking to the hardware and to the simulator is left to the
//! device SDK and the embedding main loop.
//!
//! # Modules
//!
//! - `preset`: Keyset schema, button records, and the recursive tree loader
//! - `datarefs`: Extraction of dataref-bound buttons from loaded presets
//! - `deck`: Target key geometry and native image formats
//! - `render`: Key-image rendering and per-preset image sets
//! - `error`: Error types with user-recoverable hints
#![forbid(unsafe_code)]

pub mod cli;
pub mod datarefs;
pub mod deck;
pub mod error;
pub mod logging;
pub mod paths;
pub mod preset;
pub mod render;
