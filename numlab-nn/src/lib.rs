//! Activation functions and L2 regularization primitives layered on top of
//! `numlab-linalg`'s `Matrix` (spec C10). Deliberately thin: this crate adds
//! no training loop, optimizer, or layer graph, only the pointwise building
//! blocks a caller assembling one would need.

pub mod activations;
pub mod regularization;

pub use activations::{Activation, Relu, Sigmoid, Softmax, Tanh};
pub use regularization::Regularization;
