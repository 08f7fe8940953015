//! Domain models for the timeline builder.
//!
//! - [`Phase`]: a named segment of work measured in whole weeks.
//! - [`PhaseStore`]: the ordered phases of a project; order is execution order.
//! - [`Project`]: name, start date, phases and notes. The unit of save/load.

mod phase;
mod project;

pub use phase::*;
pub use project::*;
