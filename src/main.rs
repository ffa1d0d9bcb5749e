use std::path::{Path, PathBuf};

use anyhow::bail;
use clap::{Parser, Subcommand};
use log::{info, warn};

mod render;
mod spec;
mod visits;

use render::Mode;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "calibgen")]
#[command(about = "Generate pipeline commands for detector calibrations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Emit the shell commands that build the calibrations a spec file asks for.
    Generate {
        /// File specifying the work.
        spec_file: PathBuf,

        /// Also emit the bootstrap ingest command.
        #[arg(long)]
        bootstrap: bool,

        /// Blocks to execute (default: all, in document order).
        #[arg(long, num_args = 1..)]
        blocks: Option<Vec<String>>,

        /// Source of data.
        #[arg(long)]
        data_dir: String,

        /// Types of data to process (default: the spec's dataTypes).
        #[arg(long, num_args = 1..)]
        data_types: Option<Vec<String>>,

        /// Continue in the face of problems.
        #[arg(long)]
        force: bool,

        /// Number of processes to use in generated commands.
        #[arg(short = 'j', long, default_value_t = 1)]
        processes: usize,

        /// How produced files move into the calibration directory.
        #[arg(long, value_enum, default_value_t = Mode::Link)]
        mode: Mode,

        /// Name of rerun to use for calib processing.
        #[arg(long)]
        rerun: String,

        /// Name of the calib directory used during processing.
        #[arg(long, default_value = "TMP_CALIB")]
        tmp_calib: String,

        /// How chatty should I be? (repeat for more detail)
        #[arg(short, long, action = clap::ArgAction::Count)]
        verbose: u8,
    },
}

/// Activate a logger on stderr so stdout carries only the generated script.
/// The default level keeps diagnostics (unknown dataTypes, missing paths)
/// visible without any progress chatter.
fn setup_logging(verbosity: u8) {
    let mut builder = env_logger::Builder::from_default_env();
    builder.format_target(false);
    builder.format_timestamp(None);
    match verbosity {
        0 => builder.filter_level(log::LevelFilter::Warn),
        1 => builder.filter_level(log::LevelFilter::Info),
        2 => builder.filter_level(log::LevelFilter::Debug),
        _ => builder.filter_level(log::LevelFilter::Trace),
    };
    builder.init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Generate {
            spec_file,
            bootstrap,
            blocks,
            data_dir,
            data_types,
            force,
            processes,
            mode,
            rerun,
            tmp_calib,
            verbose,
        } => {
            setup_logging(verbose);

            // 1) Parse + validate the spec document (expands all visit ranges).
            let doc = spec::load_spec_file(&spec_file)?;

            // 2) Sanity-check the data directory.
            if !Path::new(&data_dir).exists() {
                warn!("{} doesn't exist", data_dir);
                if !force {
                    bail!(
                        "data directory {} doesn't exist (use --force to continue)",
                        data_dir
                    );
                }
            }

            // 3) Bootstrap ingest.
            if bootstrap {
                let Some(bs) = &doc.bootstrap else {
                    bail!("{} has no bootstrap section", spec_file.display());
                };
                let bootstrap_dir = if Path::new(&bs.dir_name).is_absolute() {
                    PathBuf::from(&bs.dir_name)
                } else {
                    Path::new(&data_dir).join(&bs.dir_name)
                };
                info!("reading bootstrap files from {}", bootstrap_dir.display());

                let maps = render::detector_map_paths(bs, &bootstrap_dir)?;
                println!("{}", render::render_bootstrap(&data_dir, &tmp_calib, &maps));
            }

            // 4) Walk the selected blocks in order.
            let block_names: Vec<String> = match blocks {
                Some(names) => names,
                None => doc.blocks.keys().cloned().collect(),
            };
            let selected_types = data_types.unwrap_or_else(|| doc.data_types.clone());
            let opts = render::RenderOpts {
                data_dir: &data_dir,
                tmp_calib: &tmp_calib,
                rerun: &rerun,
                mode,
                processes,
            };

            for block_name in &block_names {
                let Some(block) = doc.blocks.get(block_name) else {
                    warn!(
                        "unrecognised block: '{}'{}",
                        block_name,
                        if force { ", ignoring" } else { "" }
                    );
                    info!(
                        "possible blocks are {:?}",
                        doc.blocks.keys().collect::<Vec<_>>()
                    );
                    if force {
                        continue;
                    }
                    bail!("unrecognised block: '{}'", block_name);
                };

                info!("processing block '{}'", block.name);
                for line in render::render_block(block, &selected_types, &opts) {
                    println!("{line}");
                }
            }
        }
    }

    Ok(())
}
