pub mod outlet;

pub use outlet::{FilterCriteria, Outlet, OutletField, ProjectionParams};
