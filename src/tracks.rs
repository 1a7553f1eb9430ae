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

use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "src/tracks/grammar.pest"]
struct TrackNameParser;

/// Errors raised while extracting track identities from file names.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("file {0:?} does not match a known track naming pattern")]
    PatternMismatch(String),
}

/// The recorder convention a track file name was written in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// Waves Tracks, e.g. "Track 07-2.wav".
    Tracks,
    /// Avid Pro Tools, e.g. "Audio 1_02.wav".
    ProTools,
}

impl Format {
    fn rule(&self) -> Rule {
        match self {
            Format::Tracks => Rule::tracks_file,
            Format::ProTools => Rule::pro_tools_file,
        }
    }
}

/// A recorded track. The channel and session numbers are extracted once from the source file
/// name and never change; the channel name and destination are filled in by mapping and rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    /// The source file name.
    file: String,
    /// The textual prefix of the file name, e.g. "Track".
    base_name: String,
    /// The channel number within the session.
    number: u32,
    /// The recording session number.
    session: u32,
    /// The naming convention of the source file.
    format: Format,
    /// The resolved channel name. Empty until mapped.
    name: String,
    /// The destination file name. Empty until rendered.
    dest: String,
}

impl Track {
    /// Creates a Waves Tracks style track, deriving the source file name from its parts.
    pub fn new(base_name: &str, number: u32, session: u32) -> Track {
        Track {
            file: format!("{} {:02}-{}.wav", base_name, number, session),
            base_name: base_name.to_string(),
            number,
            session,
            format: Format::Tracks,
            name: String::new(),
            dest: String::new(),
        }
    }

    /// Parses a track from a file name. Pro Tools names are tried before Waves Tracks names.
    pub fn parse(file: &str) -> Result<Track, ParseError> {
        for format in [Format::ProTools, Format::Tracks] {
            let Ok(mut pairs) = TrackNameParser::parse(format.rule(), file) else {
                continue;
            };
            let Some(pair) = pairs.next() else {
                continue;
            };

            let mut base_name = "";
            let mut numbers: Vec<u32> = Vec::with_capacity(2);
            for inner in pair.into_inner() {
                match inner.as_rule() {
                    Rule::base_name => base_name = inner.as_str(),
                    Rule::number => match inner.as_str().parse::<u32>() {
                        Ok(number) if number > 0 => numbers.push(number),
                        _ => return Err(ParseError::PatternMismatch(file.to_string())),
                    },
                    _ => {}
                }
            }

            let &[number, session] = numbers.as_slice() else {
                return Err(ParseError::PatternMismatch(file.to_string()));
            };
            return Ok(Track {
                file: file.to_string(),
                base_name: base_name.to_string(),
                number,
                session,
                format,
                name: String::new(),
                dest: String::new(),
            });
        }

        Err(ParseError::PatternMismatch(file.to_string()))
    }

    /// Gets the source file name.
    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Gets the channel number of the track.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Gets the session number of the track.
    pub fn session(&self) -> u32 {
        self.session
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// Gets the resolved channel name. Empty if no name has been assigned.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Gets the destination file name.
    pub fn dest(&self) -> &str {
        &self.dest
    }

    pub fn set_dest(&mut self, dest: impl Into<String>) {
        self.dest = dest.into();
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{file: {:?} dest: {:?} name: {:?} number: {} session: {}}}",
            self.file, self.dest, self.name, self.number, self.session
        )
    }
}
