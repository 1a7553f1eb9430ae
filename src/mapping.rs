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
use tracing::debug;

use crate::sessions::Session;
use crate::tracks::Track;
use crate::venue::{
    Channel, Device, Hardware, Venue, PRO_TOOLS, STAGE_1, STAGE_2, STAGE_3, STAGE_4,
};

/// The devices walked when mapping, in priority order. Stage boxes must be listed in cabling
/// order so that console channel numbers run contiguously across them.
pub const MAPPING_ORDER: [&str; 5] = [PRO_TOOLS, STAGE_1, STAGE_2, STAGE_3, STAGE_4];

/// Errors raised while mapping tracks to console channels.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("no channel found for track {file:?} (channel {number})")]
    ChannelNotFound { file: String, number: u32 },
}

/// The outcome of mapping a track to the console.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// A named channel was found.
    Named {
        device: &'a Device,
        channel: &'a Channel,
    },
    /// Only unnamed channels were found for the track.
    Unnamed,
}

impl Resolution<'_> {
    /// The clean name of the resolved channel. Empty if unnamed.
    pub fn name(&self) -> String {
        match self {
            Resolution::Named { channel, .. } => channel.clean_name(),
            Resolution::Unnamed => String::new(),
        }
    }
}

/// Maps recorded tracks to the channel names configured on a venue.
///
/// VENUE only records stage box inputs directly. Other inputs, such as "Engine AES 1", show up
/// on the recording only when patched to a Pro Tools output or direct out, which is why the
/// Pro Tools device is consulted as well.
#[derive(Clone, Debug)]
pub struct Mapper {
    order: Vec<String>,
}

impl Default for Mapper {
    fn default() -> Self {
        Mapper::new(MAPPING_ORDER.iter().map(|name| name.to_string()).collect())
    }
}

impl Mapper {
    /// Creates a mapper walking the given devices in order.
    pub fn new(order: Vec<String>) -> Mapper {
        Mapper { order }
    }

    /// Resolves the console channel a track was recorded from.
    pub fn resolve<'a>(&self, track: &Track, venue: &'a Venue) -> Result<Resolution<'a>, MapError> {
        let number = track.number();
        // Walk the stage boxes in order, counting channels as we go.
        let mut offset: usize = 0;
        let mut empty = false;

        for name in self.order.iter() {
            let Some(device) = venue.device(name) else {
                continue;
            };

            let channel = match device.kind() {
                Hardware::StageBox => {
                    if number as usize > offset + device.num_inputs() {
                        offset += device.num_inputs();
                        continue;
                    }
                    // number > offset holds here, so the local channel is at least 1.
                    device.input(number - offset as u32)
                }
                Hardware::Daw | Hardware::Local => {
                    if number as usize > device.num_outputs() {
                        continue;
                    }
                    device.output(number)
                }
                Hardware::Unknown => {
                    debug!(device = %name, "Skipping device of unknown hardware");
                    continue;
                }
            };

            let Some(channel) = channel else {
                continue;
            };
            if channel.name().is_empty() {
                // A later device may carry a name for this channel.
                empty = true;
                continue;
            }
            debug!(
                file = track.file(),
                device = %name,
                channel = %channel,
                "Mapped track to channel"
            );
            return Ok(Resolution::Named { device, channel });
        }

        if empty {
            debug!(file = track.file(), "Track maps to an unnamed channel");
            return Ok(Resolution::Unnamed);
        }
        Err(MapError::ChannelNotFound {
            file: track.file().to_string(),
            number,
        })
    }

    /// Names every track of a session after its console channel. The first track that can't be
    /// mapped aborts the session.
    pub fn name_session(&self, session: &mut Session, venue: &Venue) -> Result<(), MapError> {
        for track in session.tracks_mut().values_mut() {
            let name = self.resolve(track, venue)?.name();
            track.set_name(name);
        }
        Ok(())
    }
}
