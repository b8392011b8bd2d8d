//! Core cutting engine module

pub mod codec;
pub mod command;
pub mod trimmer;

pub use command::{InputSpec, MediaCommand, OutputSpec, StagedFile};
pub use trimmer::{TrimPlan, TrimSettings, Trimmer};
