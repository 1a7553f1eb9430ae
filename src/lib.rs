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
//! Renames multitrack recordings after the channel names configured on an Avid VENUE console.
//!
//! The console's patch list export is discovered into a [`venue::Venue`], recorded file names
//! are grouped into [`sessions::Sessions`], and every track is mapped to the stage box or Pro
//! Tools channel it was recorded from.
pub mod actions;
pub mod config;
pub mod mapping;
pub mod naming;
pub mod sessions;
pub mod tracks;
pub mod util;
pub mod venue;
pub mod wave;

#[cfg(test)]
mod testutil;
