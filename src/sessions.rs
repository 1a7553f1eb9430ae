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
use std::collections::BTreeMap;

use tracing::debug;

use crate::tracks::{ParseError, Track};

/// The tracks of one recording session, keyed by channel number.
pub type Tracks = BTreeMap<u32, Track>;

/// A single recording pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    number: u32,
    tracks: Tracks,
}

impl Session {
    pub fn new(number: u32) -> Session {
        Session {
            number,
            tracks: Tracks::new(),
        }
    }

    /// Gets the session number.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Gets the tracks of the session, ordered by channel number.
    pub fn tracks(&self) -> &Tracks {
        &self.tracks
    }

    pub fn tracks_mut(&mut self) -> &mut Tracks {
        &mut self.tracks
    }

    /// Adds a track to the session. A track with the same channel number is replaced.
    pub fn insert(&mut self, track: Track) {
        if let Some(previous) = self.tracks.insert(track.number(), track) {
            debug!(
                file = previous.file(),
                session = self.number,
                "Replaced track with duplicate channel number"
            );
        }
    }
}

/// All sessions found in a set of recordings, keyed by session number.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sessions {
    sessions: BTreeMap<u32, Session>,
}

impl Sessions {
    pub fn new() -> Sessions {
        Sessions::default()
    }

    /// Extracts sessions from a list of track file names. Any file name that isn't a track
    /// aborts the extraction.
    pub fn extract<S: AsRef<str>>(files: &[S]) -> Result<Sessions, ParseError> {
        let mut sessions = Sessions::new();
        for file in files {
            let track = Track::parse(file.as_ref())?;
            sessions.session(track.session()).insert(track);
        }
        Ok(sessions)
    }

    /// Returns session `number`, creating it if it doesn't exist yet.
    pub fn session(&mut self, number: u32) -> &mut Session {
        self.sessions
            .entry(number)
            .or_insert_with(|| Session::new(number))
    }

    pub fn get(&self, number: u32) -> Option<&Session> {
        self.sessions.get(&number)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Iterates over the sessions in session number order.
    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Session> {
        self.sessions.values_mut()
    }
}
