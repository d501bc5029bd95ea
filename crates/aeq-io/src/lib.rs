//! aeq-io: the "external collaborator" surface from spec.md §1, now
//! implemented — CSV read/write, GraphicEQ/ParametricEQ text emission, and
//! Markdown summary emission. The numeric core in `aeq-dsp` never depends
//! on this crate.

mod csv_io;
mod graphic_eq;
mod parametric_eq;
mod summary;

pub use csv_io::{read_response_csv, write_response_csv};
pub use graphic_eq::write_graphic_eq;
pub use parametric_eq::{compute_preamp_db, write_parametric_eq, FilterSpec};
pub use summary::write_summary_markdown;
