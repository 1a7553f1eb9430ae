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
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::venue::{Channel, Channels, Device, Devices, Hardware, Venue};

/// A VENUE patch list export with an engine, Pro Tools, a stage box with inputs and outputs,
/// and an input-only stage box.
pub const PATCH_LIST: &str = include_str!("../testdata/patch_list.html");

/// Returns an owned copy of the patch list, for tests that need to alter it.
pub fn patch_list() -> String {
    PATCH_LIST.to_string()
}

fn channels(names: &[(&str, &str)]) -> Channels {
    names
        .iter()
        .map(|(moniker, name)| (moniker.to_string(), Channel::new(moniker, name)))
        .collect()
}

/// A venue with two four channel stage boxes.
pub fn mock_venue() -> Venue {
    Venue::new(
        "Avid VENUE",
        "VENUE 4.5.3",
        "mock show",
        Devices::from([
            (
                "Stage 1".to_string(),
                Device::new(
                    Hardware::StageBox,
                    "Stage 1",
                    channels(&[("1", "iOne"), ("2", "iTwo"), ("3", "iThree"), ("4", "iFour")]),
                    channels(&[("1", "oOne"), ("2", "oTwo")]),
                ),
            ),
            (
                "Stage 2".to_string(),
                Device::new(
                    Hardware::StageBox,
                    "Stage 2",
                    channels(&[("1", "iFive"), ("2", "iSix"), ("3", "iSeven"), ("4", "iEight")]),
                    channels(&[("1", "oThree"), ("2", "oFour")]),
                ),
            ),
        ]),
    )
}

/// Writes interleaved 32 bit integer samples to a wave file.
pub fn write_wav(
    path: &Path,
    channels: u16,
    samples: &[i32],
    sample_rate: u32,
) -> Result<(), Box<dyn Error>> {
    let mut writer = WavWriter::create(
        path,
        WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Int,
        },
    )?;
    for sample in samples {
        writer.write_sample(*sample)?;
    }
    writer.finalize()?;
    Ok(())
}
