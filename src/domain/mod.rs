// Domain layer - Core cut-planning types

pub mod errors;
pub mod model;
