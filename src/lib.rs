//! llc-cutter library
//!
//! Splits a source video into the labeled segments of a LosslessCut project.
//! Each segment is stream-copied between keyframes, re-encoded only at its
//! unaligned edges, and concatenated losslessly.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod domain;
pub mod engine;
pub mod error;
pub mod output;
pub mod planner;
pub mod ports;
pub mod project;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::PlanError;
pub use domain::model::{CutRequest, KeyframeSet, MediaProfile, PartFile, SegmentKind, SubRange, Timestamp};
pub use engine::{MediaCommand, TrimPlan, TrimSettings, Trimmer};
pub use error::{CutterError, CutterResult};
