//! Ambient utilities shared by the rest of the NumLab workspace.
//!
//! This crate deliberately stays small: a [`diagnostics`] collaborator the
//! algebra engine reports warnings through, a [`config`] module carrying the
//! spec's documented tolerances and scheduler tunables, and, behind the
//! `parallel` feature, the [`scheduler`] singleton that backs the tiled
//! multiplication engine's divide-and-conquer parallelism.

pub mod config;
pub mod diagnostics;

#[cfg(feature = "parallel")]
pub mod scheduler;

pub use config::EngineConfig;
pub use diagnostics::{default_diagnostics, set_default_diagnostics, Diagnostics};
