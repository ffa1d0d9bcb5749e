//! Shell-command emission.
//!
//! Every generated command ends with `|| return 1` so the whole output can be
//! sourced as the body of a shell function and abort on the first failure.

use crate::spec::{BootstrapSpec, CalibBlock};
use crate::visits::visits_to_string;
use anyhow::bail;
use clap::ValueEnum;
use std::fmt;
use std::path::Path;

/// How ingestCalibs.py places produced files into the calib directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    Move,
    Copy,
    Link,
    Skip,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Move => "move",
            Mode::Copy => "copy",
            Mode::Link => "link",
            Mode::Skip => "skip",
        })
    }
}

/// Context shared by every command generated for a run.
pub struct RenderOpts<'a> {
    pub data_dir: &'a str,
    pub tmp_calib: &'a str,
    pub rerun: &'a str,
    pub mode: Mode,
    pub processes: usize,
}

/// Downstream executable for a data type; types without a construct step are
/// skipped entirely.
fn construct_command(data_type: &str) -> Option<&'static str> {
    match data_type {
        "bias" => Some("constructBias.py"),
        "dark" => Some("constructDark.py"),
        "flat" => Some("constructFiberFlat.py"),
        "fiberTrace" => Some("constructFiberTrace.py"),
        _ => None,
    }
}

/// Per-arm detector map paths. The filename format must contain one `%s`
/// placeholder for the arm.
pub fn detector_map_paths(
    bootstrap: &BootstrapSpec,
    bootstrap_dir: &Path,
) -> anyhow::Result<Vec<String>> {
    if !bootstrap.detector_map_fmt.contains("%s") {
        bail!(
            "detectorMapFmt {:?} has no %s placeholder for the arm",
            bootstrap.detector_map_fmt
        );
    }
    Ok(bootstrap
        .arms
        .iter()
        .map(|arm| {
            bootstrap_dir
                .join(bootstrap.detector_map_fmt.replacen("%s", arm, 1))
                .display()
                .to_string()
        })
        .collect())
}

/// The bootstrap ingest command: seeds a fresh temporary calib directory with
/// the per-arm detector maps. Always linked, whatever the run's mode.
pub fn render_bootstrap(data_dir: &str, tmp_calib: &str, detector_maps: &[String]) -> String {
    format!(
        "ingestCalibs.py {data_dir} --output {data_dir}/{tmp_calib} --validity 1800 {maps} \
--create --mode link || return 1",
        maps = detector_maps.join(" "),
    )
}

/// Render the construct + ingest commands for one block, walking `data_types`
/// in order and skipping types the block does not select.
pub fn render_block(block: &CalibBlock, data_types: &[String], opts: &RenderOpts) -> Vec<String> {
    let mut out = Vec::new();

    for dt in data_types {
        let Some(sel) = block.data.get(dt) else {
            continue;
        };
        let Some(cmd) = construct_command(dt) else {
            continue;
        };

        let visits = visits_to_string(&sel.visits);
        let config = if sel.configs.is_empty() {
            String::new()
        } else {
            format!("--config {} ", sel.configs.join(" "))
        };

        out.push(format!(
            "{cmd} {data_dir} --calib {data_dir}/{tmp_calib} --rerun {rerun} {config}\
--id visit {visits} --batch-type none -j {processes} || return 1",
            data_dir = opts.data_dir,
            tmp_calib = opts.tmp_calib,
            rerun = opts.rerun,
            processes = opts.processes,
        ));

        out.push(render_ingest(dt, opts));
        if dt == "fiberTrace" {
            out.push(render_ingest("DETECTORMAP", opts));
        }
    }

    out
}

/// Ingest the FITS files a construct step left under the rerun directory.
fn render_ingest(data_type: &str, opts: &RenderOpts) -> String {
    format!(
        "ingestCalibs.py {data_dir} --output {data_dir}/{tmp_calib} --validity 1800 \
{data_dir}/rerun/{rerun}/{dt}/*.fits --mode {mode} || return 1",
        data_dir = opts.data_dir,
        tmp_calib = opts.tmp_calib,
        rerun = opts.rerun,
        dt = data_type.to_uppercase(),
        mode = opts.mode,
    )
}
