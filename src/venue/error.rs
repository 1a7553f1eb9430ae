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
use super::Direction;

/// Errors raised while discovering a venue from an exported patch list.
#[derive(Debug, thiserror::Error)]
pub enum VenueError {
    #[error("{0} metadata not found in patch list")]
    Metadata(&'static str),
    #[error("device {device:?} is missing its {missing} table")]
    IncompleteDevice { device: String, missing: Direction },
    #[error("invalid selector {selector:?}: {message}")]
    Selector { selector: String, message: String },
}
