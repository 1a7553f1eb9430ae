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
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use hound::{SampleFormat, WavReader};
use rayon::prelude::*;
use tracing::debug;

use crate::actions::{discover_files, filter_waves, ActionError};
use crate::util::duration_minutes_seconds;

/// The number of consecutive zero samples that start a run of silence.
const SILENCE_THRESHOLD: usize = 10;

/// Errors raised while inspecting wave files.
#[derive(Debug, thiserror::Error)]
pub enum WaveError {
    #[error("wave error: {0}")]
    Hound(#[from] hound::Error),
    #[error("invalid sample rate of {0}")]
    InvalidSampleRate(u32),
}

/// Basic information about a wave file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WaveInfo {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub frames: u32,
    pub duration: Duration,
}

impl fmt::Display for WaveInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sample_rate: {} Hz, channels: {}, bits_per_sample: {}, frames: {}, duration: {}",
            self.sample_rate,
            self.channels,
            self.bits_per_sample,
            self.frames,
            duration_minutes_seconds(self.duration)
        )
    }
}

/// A run of digital silence within a wave file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Silence {
    pub start: Duration,
    pub end: Duration,
}

impl fmt::Display for Silence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            duration_minutes_seconds(self.start),
            duration_minutes_seconds(self.end)
        )
    }
}

fn open(path: &Path) -> Result<WavReader<BufReader<File>>, WaveError> {
    let reader = WavReader::open(path)?;
    let sample_rate = reader.spec().sample_rate;
    if sample_rate == 0 {
        return Err(WaveError::InvalidSampleRate(sample_rate));
    }
    Ok(reader)
}

fn duration(frames: u32, sample_rate: u32) -> Duration {
    Duration::from_secs_f64(f64::from(frames) / f64::from(sample_rate))
}

/// Reads the header of a wave file.
pub fn info(path: &Path) -> Result<WaveInfo, WaveError> {
    let reader = open(path)?;
    let spec = reader.spec();
    let frames = reader.duration();
    Ok(WaveInfo {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        bits_per_sample: spec.bits_per_sample,
        frames,
        duration: duration(frames, spec.sample_rate),
    })
}

/// Scans a wave file for runs of digital silence. A run starts once enough consecutive zero
/// samples are seen and ends at the next non-zero sample, or at the end of the file.
pub fn check(path: &Path) -> Result<Vec<Silence>, WaveError> {
    let mut reader = open(path)?;
    let spec = reader.spec();
    let total = duration(reader.duration(), spec.sample_rate);

    let silences = match spec.sample_format {
        SampleFormat::Float => scan(
            reader.samples::<f32>().map(|s| s.map(|s| s == 0.0)),
            spec.channels,
            spec.sample_rate,
            total,
        )?,
        SampleFormat::Int => scan(
            reader.samples::<i32>().map(|s| s.map(|s| s == 0)),
            spec.channels,
            spec.sample_rate,
            total,
        )?,
    };

    debug!(file = ?path, silences = silences.len(), "Checked wave file");
    Ok(silences)
}

fn scan<I>(
    zeros: I,
    channels: u16,
    sample_rate: u32,
    total: Duration,
) -> Result<Vec<Silence>, WaveError>
where
    I: Iterator<Item = Result<bool, hound::Error>>,
{
    let channels = usize::from(channels.max(1));
    let at = |index: usize| Duration::from_secs_f64((index / channels) as f64 / f64::from(sample_rate));

    let mut silences = Vec::new();
    let mut run = 0;
    let mut start: Option<Duration> = None;
    for (index, zero) in zeros.enumerate() {
        if zero? {
            run += 1;
            if run == SILENCE_THRESHOLD && start.is_none() {
                start = Some(at(index + 1 - SILENCE_THRESHOLD));
            }
            continue;
        }

        run = 0;
        if let Some(start) = start.take() {
            silences.push(Silence {
                start,
                end: at(index),
            });
        }
    }
    if let Some(start) = start {
        silences.push(Silence { start, end: total });
    }

    Ok(silences)
}

/// The silence check result of a single file.
pub type CheckResult = (String, Result<Vec<Silence>, WaveError>);

/// Checks every wave file in a directory. Files are checked in parallel; results are returned in
/// file name order.
pub fn check_dir(dir: &Path) -> Result<Vec<CheckResult>, ActionError> {
    let files = discover_files(dir, &[filter_waves])?;
    Ok(files
        .into_par_iter()
        .map(|file| {
            let result = check(&dir.join(&file));
            (file, result)
        })
        .collect())
}
