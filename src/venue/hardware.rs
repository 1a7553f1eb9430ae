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

use serde::Serialize;

use super::{Channel, Channels};

/// The prefix VENUE puts in front of Pro Tools channel monikers, e.g. "FWx 3".
pub const DAW_MONIKER_PREFIX: &str = "FWx ";

/// The kind of IO hardware a device represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Hardware {
    Unknown,
    /// A remote stage rack, e.g. "Stage 1".
    StageBox,
    /// IO built into the console or engine.
    Local,
    /// The Pro Tools recording interface.
    Daw,
}

impl Hardware {
    /// Determines the hardware kind from a VENUE device name.
    pub fn from_device_name(name: &str) -> Hardware {
        match name {
            "Console" | "Engine" | "Local" => Hardware::Local,
            "Pro Tools" => Hardware::Daw,
            _ if is_stage_box(name) => Hardware::StageBox,
            _ => Hardware::Unknown,
        }
    }

    /// The monikers to try, in order, when looking up channel `number` on this kind of hardware.
    pub fn monikers(&self, number: u32) -> Vec<String> {
        match self {
            Hardware::Daw => vec![
                format!("{}{}", DAW_MONIKER_PREFIX, number),
                number.to_string(),
            ],
            Hardware::StageBox | Hardware::Local | Hardware::Unknown => vec![number.to_string()],
        }
    }

    /// Looks up channel `number` in the given channels using this hardware's moniker convention.
    pub fn lookup<'a>(&self, channels: &'a Channels, number: u32) -> Option<&'a Channel> {
        self.monikers(number)
            .iter()
            .find_map(|moniker| channels.get(moniker))
    }

    /// Whether a device of this kind must expose outputs alongside its inputs. Stage racks
    /// are frequently input only.
    pub fn requires_outputs(&self) -> bool {
        !matches!(self, Hardware::StageBox)
    }
}

impl fmt::Display for Hardware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Hardware::Unknown => "unknown",
            Hardware::StageBox => "stage box",
            Hardware::Local => "local",
            Hardware::Daw => "daw",
        };
        f.write_str(name)
    }
}

fn is_stage_box(name: &str) -> bool {
    name.strip_prefix("Stage ")
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}
