//! Fills supply contract (VV) and object-list (OL) PDF forms from rows of
//! tabular data.
//!
//! A row flows through `pipeline::prepare`, the overlay builders in
//! [`overlay`] turn it into positioned text, and [`assemble`] stamps that
//! text onto a template page. [`BatchRunner`] drives a whole batch and
//! merges each row's pages into one document.

pub mod address;
pub mod assemble;
pub mod batch;
pub mod calendar;
pub mod config;
pub mod error;
pub mod fit;
pub mod merge;
pub mod metrics;
pub mod naming;
pub mod overlay;
pub mod page;
pub mod pipeline;
pub mod render;
pub mod rotate;
pub mod split;
pub mod template;
pub mod units;

#[cfg(test)]
mod testing;

pub use assemble::{assemble, chunk, Chunk};
pub use batch::BatchRunner;
pub use config::FormFillConfig;
pub use error::{FormFillError, Result};
pub use fit::{fit, FitOutcome, FitParams, RenderPlan};
pub use merge::{merge_documents, merge_sequence};
pub use metrics::{StandardFont, TextMeasure};
pub use pipeline::{prepare, NormalizedRow};
pub use rotate::normalize_rotation;
pub use split::split_contract_template;
pub use template::{PageGeometry, Template, TemplateKind, TemplateSet};

