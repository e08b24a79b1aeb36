//! Synthetic data for exercising the engine.

pub mod generator;
