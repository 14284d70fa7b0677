//! Data types shared between the form-filling core and its front ends.

pub mod columns;
pub mod report;
pub mod types;

pub use report::{BatchSummary, RowFailure, RowOutput};
pub use types::{Cell, Row};
