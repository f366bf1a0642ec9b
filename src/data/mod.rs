//! Loaders for the two input files: the yearly case table (CSV) and the
//! department boundaries (GeoJSON).

mod boundaries;
mod cases;

pub use boundaries::{Boundaries, Department, NAME_PROPERTY};
pub use cases::{CaseRecord, CaseTable, DEPARTMENT_COLUMN};

#[cfg(test)]
pub(crate) use boundaries::tests::sample as sample_boundaries;
