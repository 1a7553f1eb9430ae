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
use crate::sessions::Session;
use crate::tracks::Track;

/// Returns the destination file name of a mapped track, e.g. "02-07 Kick.wav". Tracks without
/// a channel name are called "Track NN".
pub fn destination_file_name(track: &Track) -> String {
    let name = if track.name().is_empty() {
        format!("Track {:02}", track.number())
    } else {
        track.name().to_string()
    };
    format!(
        "{:02}-{:02} {}.wav",
        track.session(),
        track.number(),
        filename_safe(&name)
    )
}

/// Replaces path separators so the name can be used as a single file name component.
pub fn filename_safe(name: &str) -> String {
    name.replace(['/', '\\'], "_")
}

/// Sets the destination file name of every track in the session.
pub fn render_session(session: &mut Session) {
    for track in session.tracks_mut().values_mut() {
        let dest = destination_file_name(track);
        track.set_dest(dest);
    }
}
