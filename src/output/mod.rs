// src/output/mod.rs
//! Output handling with clear separation of planning and execution.
//!
//! Planning builds an immutable [`OutputPlan`]; execution performs the
//! I/O and reports per-operation outcomes. The clipboard reader lives
//! here too since it is the host-side I/O boundary.

mod clipboard;
mod types;
mod writer;

pub use clipboard::read_clipboard;
pub use types::{DeliveryTarget, OutputPlan, OutputReport};
pub use writer::deliver;
