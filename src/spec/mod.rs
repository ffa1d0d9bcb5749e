//! Spec layer: YAML schema + validated in-memory structures.
//!
//! This module is intentionally separate from the visit codec and command
//! rendering. It owns:
//! - the document shape (dataTypes / bootstrap / calibBlocks)
//! - CalibBlock, the per-block model with expanded visit lists

pub mod block;
pub mod document;

pub use block::{CalibBlock, RawBlock, RawTypeEntry, TypeSelection};
pub use document::{BootstrapSpec, Document, SpecDoc, load_spec_file};
