//! Output layer: the generated shell text.

pub mod shell;

pub use shell::{Mode, RenderOpts, detector_map_paths, render_block, render_bootstrap};
