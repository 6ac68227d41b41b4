// src/lib.rs
//! Readmission risk decision support.
//!
//! Loads a pre-trained scaler → principal components → classifier bundle once,
//! turns form input into the training-time feature vector, and renders a
//! 30-day readmission verdict with heuristic risk factors and recommendations.

pub mod bundle;
pub mod error;
pub mod features;
pub mod inference;
pub mod models;
pub mod utils;
pub mod web;

#[cfg(test)]
pub(crate) mod test_support;
