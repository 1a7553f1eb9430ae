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
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::mapping::{MapError, Mapper};
use crate::naming::render_session;
use crate::sessions::Sessions;
use crate::tracks::ParseError;
use crate::venue::{Discoverer, Venue, VenueError};

const WAVE_EXTENSION: &str = ".wav";

/// Errors raised while renaming a set of recordings.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("error discovering files in {dir:?}: {source}")]
    Discover {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no files found in {0:?}")]
    NoFiles(PathBuf),
    #[error("no tracks found")]
    NoTracks,
    #[error("error reading patch file {path:?}: {source}")]
    PatchFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("error extracting sessions: {0}")]
    Parse(#[from] ParseError),
    #[error("error parsing the venue data: {0}")]
    Venue(#[from] VenueError),
    #[error("error mapping tracks: {0}")]
    Map(#[from] MapError),
    #[error("error {verb} {orig:?} to {dest:?}: {source}")]
    FileOp {
        verb: &'static str,
        orig: PathBuf,
        dest: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A file name filter.
pub type Filter = fn(Vec<String>) -> Vec<String>;

/// Keeps only wave files. Waves Tracks records Wave (RF64) files with a `.wav` extension.
pub fn filter_waves(files: Vec<String>) -> Vec<String> {
    files
        .into_iter()
        .filter(|file| file.ends_with(WAVE_EXTENSION))
        .collect()
}

/// Lists the files in a directory, sorted by name, and applies the filters in order. It is an
/// error for no files to remain.
pub fn discover_files(dir: &Path, filters: &[Filter]) -> Result<Vec<String>, ActionError> {
    let discover_error = |source: io::Error| ActionError::Discover {
        dir: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(discover_error)? {
        let entry = entry.map_err(discover_error)?;
        if entry.file_type().map_err(discover_error)?.is_dir() {
            continue;
        }
        files.push(entry.file_name().to_string_lossy().to_string());
    }
    files.sort();

    for filter in filters {
        files = filter(files);
    }
    if files.is_empty() {
        return Err(ActionError::NoFiles(dir.to_path_buf()));
    }

    debug!(dir = ?dir, files = files.len(), "Discovered files");
    Ok(files)
}

/// What to do with each recording.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileOp {
    /// Copy tracks to their new names.
    Copy,
    /// Hard link new names, leaving the original files in place.
    Link,
    /// Move tracks to their new names.
    Move,
    /// Rename tracks in place.
    Rename,
}

impl FileOp {
    /// Applies the operation to a single file.
    pub fn apply(&self, orig: &Path, dest: &Path) -> io::Result<()> {
        match self {
            FileOp::Copy => fs::copy(orig, dest).map(|_| ()),
            FileOp::Link => fs::hard_link(orig, dest),
            FileOp::Move | FileOp::Rename => fs::rename(orig, dest),
        }
    }

    /// The heading printed before a batch.
    pub fn heading(&self) -> &'static str {
        match self {
            FileOp::Copy => "Copying:",
            FileOp::Link => "Linking:",
            FileOp::Move => "Moving:",
            FileOp::Rename => "Renaming (moving):",
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            FileOp::Copy => "copying",
            FileOp::Link => "linking",
            FileOp::Move | FileOp::Rename => "moving",
        }
    }
}

/// An original file name and the name it should get.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Names {
    pub orig: String,
    pub dest: String,
}

/// Maps track files to their new names using a parsed venue.
pub fn plan_names(
    venue: &Venue,
    files: &[String],
    mapper: &Mapper,
) -> Result<Vec<Names>, ActionError> {
    let mut sessions = Sessions::extract(files)?;

    let mut names = Vec::new();
    for session in sessions.iter_mut() {
        mapper.name_session(session, venue)?;
        render_session(session);
        names.extend(session.tracks().values().map(|track| Names {
            orig: track.file().to_string(),
            dest: track.dest().to_string(),
        }));
    }

    if names.is_empty() {
        return Err(ActionError::NoTracks);
    }
    Ok(names)
}

/// Reads the patch file and the source directory and works out the new name of every track.
pub fn plan(
    patch_file: &Path,
    src_dir: &Path,
    discoverer: &Discoverer,
    mapper: &Mapper,
) -> Result<Vec<Names>, ActionError> {
    let data = fs::read(patch_file).map_err(|source| ActionError::PatchFile {
        path: patch_file.to_path_buf(),
        source,
    })?;
    let venue = discoverer.discover(&data)?;
    let files = discover_files(src_dir, &[filter_waves])?;
    plan_names(&venue, &files, mapper)
}

/// Applies the operation to each planned name, printing what is done. A dry run only prints.
/// The first failure stops the batch.
pub fn apply(
    op: FileOp,
    src_dir: &Path,
    dest_dir: &Path,
    names: &[Names],
    dry_run: bool,
) -> Result<(), ActionError> {
    if !dry_run && !dest_dir.exists() {
        fs::create_dir_all(dest_dir).map_err(|source| ActionError::FileOp {
            verb: "creating",
            orig: src_dir.to_path_buf(),
            dest: dest_dir.to_path_buf(),
            source,
        })?;
    }

    for name in names {
        let orig = src_dir.join(&name.orig);
        let dest = dest_dir.join(&name.dest);
        println!("  {:?} --> {:?}", orig, dest);
        if dry_run {
            continue;
        }
        op.apply(&orig, &dest)
            .map_err(|source| ActionError::FileOp {
                verb: op.verb(),
                orig: orig.clone(),
                dest: dest.clone(),
                source,
            })?;
    }

    info!(op = ?op, files = names.len(), dry_run, "Applied file operations");
    Ok(())
}
