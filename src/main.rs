// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::{crate_version, Args, Parser, Subcommand, ValueEnum};
use tracing::warn;
use venuetracks::actions::{self, FileOp};
use venuetracks::config::Settings;
use venuetracks::mapping::Mapper;
use venuetracks::venue::Discoverer;
use venuetracks::wave;

#[derive(Parser)]
#[clap(
    version = crate_version!(),
    about = "Renames multitrack recordings after the channel names of an Avid VENUE console."
)]
struct Cli {
    /// The path to an optional YAML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Prints what would be done without changing any files.
    #[arg(short = 'n', long, global = true, overrides_with = "no_dry_run")]
    dry_run: bool,
    /// Changes files even if the configuration asks for a dry run.
    #[arg(long, global = true, overrides_with = "dry_run")]
    no_dry_run: bool,
    #[clap(subcommand)]
    command: Commands,
}

impl Cli {
    /// Whether to do a dry run. The last dry run flag given wins over the configured value.
    fn dry_run(&self, configured: bool) -> bool {
        if self.no_dry_run {
            false
        } else {
            self.dry_run || configured
        }
    }
}

#[derive(Args)]
struct Locations {
    /// The VENUE patch list or system info file.
    #[arg(short, long)]
    patch_file: Option<PathBuf>,
    /// The directory holding the recorded tracks. Defaults to the current directory.
    #[arg(short, long)]
    src_dir: Option<PathBuf>,
    /// The destination directory. Leave empty to rename in place.
    #[arg(short, long)]
    dest_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Copies tracks with new names.
    #[command(alias = "cp")]
    Copy(Locations),
    /// Makes links with new names, without removing the original files.
    #[command(alias = "ln")]
    Link(Locations),
    /// Moves tracks to their new names.
    #[command(alias = "mv")]
    Move(Locations),
    /// Renames tracks in place.
    Rename(Locations),
    /// Prints the devices and channels found in a VENUE patch list.
    Venue {
        /// The VENUE patch list or system info file.
        patch_file: PathBuf,
        /// The output format.
        #[arg(short, long, value_enum, default_value_t = Output::Text)]
        format: Output,
    },
    /// Prints information about a wave file.
    WaveInfo {
        /// The wave file to inspect.
        file: PathBuf,
    },
    /// Checks the wave files in a directory for runs of digital silence.
    WaveCheck {
        /// The directory containing wave files.
        dir: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Output {
    Text,
    Yaml,
    Json,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;
    let dry_run = cli.dry_run(settings.dry_run());

    match cli.command {
        Commands::Copy(locations) => rename(FileOp::Copy, locations, &settings, dry_run)?,
        Commands::Link(locations) => rename(FileOp::Link, locations, &settings, dry_run)?,
        Commands::Move(locations) => rename(FileOp::Move, locations, &settings, dry_run)?,
        Commands::Rename(locations) => rename(FileOp::Rename, locations, &settings, dry_run)?,
        Commands::Venue { patch_file, format } => {
            let data = fs::read(&patch_file)?;
            let venue = Discoverer::with_candidates(settings.device_candidates().to_vec())?
                .discover(&data)?;
            match format {
                Output::Text => println!("{}", venue),
                Output::Yaml => print!("{}", serde_yml::to_string(&venue)?),
                Output::Json => println!("{}", serde_json::to_string_pretty(&venue)?),
            }
        }
        Commands::WaveInfo { file } => {
            println!("{}", wave::info(&file)?);
        }
        Commands::WaveCheck { dir } => {
            for (file, result) in wave::check_dir(&dir)? {
                match result {
                    Ok(silences) if silences.is_empty() => println!("{} : OK", file),
                    Ok(silences) => {
                        println!("{} : silence", file);
                        for silence in silences {
                            println!("  {}", silence);
                        }
                    }
                    Err(e) => println!("{} : {}", file, e),
                }
            }
        }
    }

    Ok(())
}

/// Works out the new track names and applies the file operation to them.
fn rename(
    op: FileOp,
    locations: Locations,
    settings: &Settings,
    dry_run: bool,
) -> Result<(), Box<dyn Error>> {
    let patch_file = locations
        .patch_file
        .or_else(|| settings.patch_file().map(PathBuf::from))
        .ok_or("missing patch_file flag")?;
    let src_dir = locations
        .src_dir
        .or_else(|| settings.src_dir().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));
    let dest_dir = match op {
        FileOp::Rename => {
            if locations.dest_dir.is_some() {
                warn!("Ignoring the destination directory when renaming in place");
            }
            src_dir.clone()
        }
        _ => locations
            .dest_dir
            .or_else(|| settings.dest_dir().map(PathBuf::from))
            .unwrap_or_else(|| src_dir.clone()),
    };

    let discoverer = Discoverer::with_candidates(settings.device_candidates().to_vec())?;
    let mapper = Mapper::new(settings.mapping_order().to_vec());
    let names = actions::plan(&patch_file, &src_dir, &discoverer, &mapper)?;

    if dry_run {
        eprintln!("-- dry run mode --");
    }
    println!("{}", op.heading());
    actions::apply(op, &src_dir, &dest_dir, &names, dry_run)?;
    if dry_run {
        println!("This was a dry run. No permanent changes were made.");
    }

    Ok(())
}
