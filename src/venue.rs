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
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

pub use self::discover::{Discoverer, DEVICE_CANDIDATES};
pub use self::error::VenueError;
pub use self::hardware::Hardware;

mod discover;
mod error;
mod hardware;

pub const CONSOLE: &str = "Console";
pub const ENGINE: &str = "Engine";
pub const LOCAL: &str = "Local";
pub const PRO_TOOLS: &str = "Pro Tools";
pub const STAGE_1: &str = "Stage 1";
pub const STAGE_2: &str = "Stage 2";
pub const STAGE_3: &str = "Stage 3";
pub const STAGE_4: &str = "Stage 4";

/// An Avid VENUE console as described by an exported patch list or system info page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Venue {
    console: String,
    version: String,
    show: String,
    devices: Devices,
}

impl Venue {
    pub fn new(console: &str, version: &str, show: &str, devices: Devices) -> Venue {
        Venue {
            console: console.to_string(),
            version: version.to_string(),
            show: show.to_string(),
            devices,
        }
    }

    /// Parses a VENUE HTML export using the default device candidates.
    pub fn parse(data: &[u8]) -> Result<Venue, VenueError> {
        Discoverer::new()?.discover(data)
    }

    /// Gets the console name, e.g. "Avid VENUE".
    pub fn console(&self) -> &str {
        &self.console
    }

    /// Gets the console software version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Gets the name of the show file the export was made from.
    pub fn show(&self) -> &str {
        &self.show
    }

    /// Gets the discovered devices.
    pub fn devices(&self) -> &Devices {
        &self.devices
    }

    pub fn device(&self, name: &str) -> Option<&Device> {
        self.devices.get(name)
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Console: {}", self.console)?;
        writeln!(f, "Version: {}", self.version)?;
        write!(f, "Show: {}", self.show)?;
        for device in self.devices.values() {
            write!(f, "\n{}", device)?;
        }
        Ok(())
    }
}

/// Devices keyed by device name.
pub type Devices = BTreeMap<String, Device>;

/// A VENUE IO device.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Device {
    name: String,
    kind: Hardware,
    inputs: Channels,
    outputs: Channels,
}

impl Device {
    pub fn new(kind: Hardware, name: &str, inputs: Channels, outputs: Channels) -> Device {
        Device {
            name: name.to_string(),
            kind,
            inputs,
            outputs,
        }
    }

    /// Gets the device name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the hardware kind of the device.
    pub fn kind(&self) -> Hardware {
        self.kind
    }

    /// Looks up input channel `number`, honoring the hardware's moniker convention.
    pub fn input(&self, number: u32) -> Option<&Channel> {
        self.kind.lookup(&self.inputs, number)
    }

    /// Looks up output channel `number`, honoring the hardware's moniker convention.
    pub fn output(&self, number: u32) -> Option<&Channel> {
        self.kind.lookup(&self.outputs, number)
    }

    pub fn inputs(&self) -> &Channels {
        &self.inputs
    }

    pub fn outputs(&self) -> &Channels {
        &self.outputs
    }

    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "- {} ({}, inputs: {}, outputs: {})",
            self.name,
            self.kind,
            self.inputs.len(),
            self.outputs.len()
        )?;
        for (title, channels) in [("Inputs", &self.inputs), ("Outputs", &self.outputs)] {
            if channels.is_empty() {
                continue;
            }
            write!(f, "\n  {}:", title)?;
            for channel in sorted(channels) {
                write!(f, "\n    {}", channel)?;
            }
        }
        Ok(())
    }
}

/// Which side of a device a channel table describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Inputs,
    Outputs,
}

impl Direction {
    /// The word VENUE uses in a device's table header.
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Inputs => "Inputs",
            Direction::Outputs => "Outputs",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Channels keyed by moniker.
pub type Channels = BTreeMap<String, Channel>;

/// Returns the channels ordered by the number in their moniker, so "2" sorts before "10".
pub fn sorted(channels: &Channels) -> Vec<&Channel> {
    let mut sorted: Vec<&Channel> = channels.values().collect();
    sorted.sort_by(|a, b| compare_monikers(a.moniker(), b.moniker()));
    sorted
}

fn compare_monikers(a: &str, b: &str) -> Ordering {
    match (moniker_number(a), moniker_number(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        _ => a.cmp(b),
    }
}

fn moniker_number(moniker: &str) -> Option<u32> {
    moniker.rsplit(' ').next().and_then(|n| n.parse().ok())
}

/// A device channel.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Channel {
    /// The channel number (e.g. "1") or IO name (e.g. "FWx 1").
    moniker: String,
    /// The name given to the channel on the console. Empty if unnamed.
    name: String,
}

impl Channel {
    pub fn new(moniker: &str, name: &str) -> Channel {
        Channel {
            moniker: moniker.to_string(),
            name: name.to_string(),
        }
    }

    pub fn moniker(&self) -> &str {
        &self.moniker
    }

    /// Gets the channel name as configured on the console.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the channel name with a redundant stereo pair label collapsed.
    pub fn clean_name(&self) -> String {
        clean_name(&self.name)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.moniker)
        } else {
            write!(f, "{}: {}", self.moniker, self.name)
        }
    }
}

/// Collapses a stereo pair label such as "eGit-L, eGit-R" into its shared stem "eGit". The two
/// halves must be separated by a single ", ", be longer than two characters, and match once
/// their two character suffixes are removed. Any other name is returned unchanged.
pub fn clean_name(name: &str) -> String {
    if name.matches(',').count() != 1 {
        return name.to_string();
    }
    let Some((left, right)) = name.split_once(", ") else {
        return name.to_string();
    };
    match (strip_suffix(left), strip_suffix(right)) {
        (Some(left_stem), Some(right_stem)) if left_stem == right_stem => left_stem.to_string(),
        _ => name.to_string(),
    }
}

// Drops the last two characters, as long as something remains.
fn strip_suffix(half: &str) -> Option<&str> {
    if half.chars().count() <= 2 {
        return None;
    }
    half.char_indices()
        .rev()
        .nth(1)
        .map(|(index, _)| &half[..index])
}

#[cfg(test)]
mod test {
    use super::{clean_name, sorted, Channel, Channels};

    #[test]
    fn clean_names() {
        for (name, expected) in [
            ("eGit-L, eGit-R", "eGit"),
            ("Keys L, Keys R", "Keys"),
            ("v1, v2", "v1, v2"),
            ("eGit", "eGit"),
            ("", ""),
            ("Piano-L, Organ-R", "Piano-L, Organ-R"),
            ("eGit-L,eGit-R", "eGit-L,eGit-R"),
            ("a-L, a-R, a-C", "a-L, a-R, a-C"),
            ("Gtr-L, Gtr-R ", "Gtr-L, Gtr-R "),
            ("Flügel-L, Flügel-R", "Flügel"),
        ] {
            assert_eq!(clean_name(name), expected, "clean_name({:?})", name);
        }
    }

    #[test]
    fn channel_clean_name() {
        let channel = Channel::new("3", "OH-L, OH-R");
        assert_eq!(channel.clean_name(), "OH");
        assert_eq!(channel.name(), "OH-L, OH-R");
    }

    #[test]
    fn sorted_numerically() {
        let channels = Channels::from([
            ("10".to_string(), Channel::new("10", "ten")),
            ("2".to_string(), Channel::new("2", "two")),
            ("1".to_string(), Channel::new("1", "one")),
        ]);
        let monikers: Vec<&str> = sorted(&channels).iter().map(|c| c.moniker()).collect();
        assert_eq!(monikers, vec!["1", "2", "10"]);

        let channels = Channels::from([
            ("FWx 10".to_string(), Channel::new("FWx 10", "")),
            ("FWx 9".to_string(), Channel::new("FWx 9", "")),
        ]);
        let monikers: Vec<&str> = sorted(&channels).iter().map(|c| c.moniker()).collect();
        assert_eq!(monikers, vec!["FWx 9", "FWx 10"]);
    }
}
