//! myxb-core: GPA computation engine, grading configuration, and data model.
//!
//! This crate holds everything that turns a student's evaluation trees into
//! per-subject scores and a semester GPA. It has no network surface of its
//! own; remote data arrives through the [`traits::ScoreSource`] seam.

pub mod calculator;
pub mod classifier;
pub mod engine;
pub mod error;
pub mod grading;
pub mod mapping;
pub mod model;
pub mod report;
pub mod statistics;
pub mod traits;
