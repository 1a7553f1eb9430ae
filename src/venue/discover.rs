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
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

use crate::util::sanitize;

use super::{
    Channel, Channels, Device, Devices, Direction, Hardware, Venue, VenueError, CONSOLE, ENGINE,
    LOCAL, PRO_TOOLS, STAGE_1, STAGE_2, STAGE_3, STAGE_4,
};

/// The devices looked for in an export, in discovery order.
pub const DEVICE_CANDIDATES: [&str; 8] = [
    CONSOLE, ENGINE, LOCAL, PRO_TOOLS, STAGE_1, STAGE_2, STAGE_3, STAGE_4,
];

const SHOW_LABEL: &str = "Show:";

/// Compiled selectors for the parts of the export that are located by structure.
struct Queries {
    console: Selector,
    version: Selector,
    rows: Selector,
}

impl Queries {
    fn new() -> Result<Queries, VenueError> {
        Ok(Queries {
            console: selector(r#"meta[name="description"]"#)?,
            version: selector(r#"meta[name="author"]"#)?,
            rows: selector("table tr")?,
        })
    }
}

fn selector(selector: &str) -> Result<Selector, VenueError> {
    Selector::parse(selector).map_err(|e| VenueError::Selector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

/// Discovers venues from VENUE "Patch List" and "System Info" HTML exports. Build one and reuse
/// it for any number of exports.
pub struct Discoverer {
    queries: Queries,
    candidates: Vec<String>,
}

impl Discoverer {
    /// Creates a discoverer looking for the standard VENUE devices.
    pub fn new() -> Result<Discoverer, VenueError> {
        Discoverer::with_candidates(DEVICE_CANDIDATES.iter().map(|c| c.to_string()).collect())
    }

    /// Creates a discoverer looking for the given device names.
    pub fn with_candidates(candidates: Vec<String>) -> Result<Discoverer, VenueError> {
        Ok(Discoverer {
            queries: Queries::new()?,
            candidates,
        })
    }

    /// Parses an exported patch list.
    pub fn discover(&self, data: &[u8]) -> Result<Venue, VenueError> {
        let html = String::from_utf8_lossy(data);
        let document = Html::parse_document(&html);

        let console = self.meta_content(&document, &self.queries.console, "console")?;
        let version = self.meta_content(&document, &self.queries.version, "version")?;
        let show = self.show(&document)?;
        let devices = self.discover_devices(&document)?;

        info!(
            console = %console,
            version = %version,
            show = %show,
            devices = ?devices.keys().collect::<Vec<&String>>(),
            "Discovered venue"
        );
        Ok(Venue::new(&console, &version, &show, devices))
    }

    fn meta_content(
        &self,
        document: &Html,
        selector: &Selector,
        field: &'static str,
    ) -> Result<String, VenueError> {
        document
            .select(selector)
            .find_map(|meta| meta.value().attr("content"))
            .map(|content| content.trim().to_string())
            .ok_or(VenueError::Metadata(field))
    }

    // The show name lives in the cell next to the one labelled "Show:".
    fn show(&self, document: &Html) -> Result<String, VenueError> {
        document
            .select(&self.queries.rows)
            .find_map(|row| {
                let cells: Vec<ElementRef> = cells(row).collect();
                let labelled = cells
                    .iter()
                    .any(|cell| first_span(*cell).is_some_and(|span| text(span).contains(SHOW_LABEL)));
                if !labelled {
                    return None;
                }
                cells.get(1).map(|cell| text(*cell).trim().to_string())
            })
            .ok_or(VenueError::Metadata("show"))
    }

    fn discover_devices(&self, document: &Html) -> Result<Devices, VenueError> {
        let mut devices = Devices::new();
        for name in self.candidates.iter() {
            if let Some(device) = self.discover_device(document, name)? {
                devices.insert(name.clone(), device);
            }
        }
        Ok(devices)
    }

    /// Discovers a single device. Devices without an inputs table are not configured on the
    /// console and yield `None`.
    fn discover_device(&self, document: &Html, name: &str) -> Result<Option<Device>, VenueError> {
        let kind = Hardware::from_device_name(name);

        let Some(header) = self.find_header(document, name, Direction::Inputs) else {
            debug!(device = name, "Device not found in patch list");
            return Ok(None);
        };
        let inputs = probe_channels(header);

        let outputs = match self.find_header(document, name, Direction::Outputs) {
            Some(header) => probe_channels(header),
            None if kind.requires_outputs() => {
                return Err(VenueError::IncompleteDevice {
                    device: name.to_string(),
                    missing: Direction::Outputs,
                })
            }
            None => {
                debug!(device = name, "Stage box has no outputs");
                Channels::new()
            }
        };

        debug!(
            device = name,
            %kind,
            inputs = inputs.len(),
            outputs = outputs.len(),
            "Discovered device"
        );
        Ok(Some(Device::new(kind, name, inputs, outputs)))
    }

    fn find_header<'a>(
        &self,
        document: &'a Html,
        name: &str,
        direction: Direction,
    ) -> Option<ElementRef<'a>> {
        document.select(&self.queries.rows).find(|row| {
            row_label(*row)
                .is_some_and(|label| label.contains(name) && label.contains(direction.label()))
        })
    }
}

/// Reads the channel rows following a device header row. Each row holds the moniker in its
/// first cell and the channel name in its second. Reading stops at the next device header.
fn probe_channels(header: ElementRef) -> Channels {
    let mut channels = Channels::new();

    let rows = header
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .filter(|element| element.value().name() == "tr");
    for row in rows {
        if row_label(row).is_some_and(|label| is_header_label(&label)) {
            break;
        }

        let cells: Vec<ElementRef> = cells(row).collect();
        let Some(first) = cells.first() else {
            continue;
        };
        let moniker = text(*first).trim().to_string();
        if moniker.is_empty() {
            continue;
        }
        let name = cells
            .get(1)
            .map(|cell| sanitize(text(*cell).trim()))
            .unwrap_or_default();

        channels.insert(moniker.clone(), Channel::new(&moniker, &name));
    }

    channels
}

fn is_header_label(label: &str) -> bool {
    label.contains(Direction::Inputs.label()) || label.contains(Direction::Outputs.label())
}

/// The text of the first span found in the row's cells. VENUE puts section titles in spans.
fn row_label(row: ElementRef) -> Option<String> {
    cells(row).find_map(first_span).map(text)
}

fn cells<'a>(row: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|element| element.value().name() == "td")
}

fn first_span(cell: ElementRef) -> Option<ElementRef> {
    cell.children()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == "span")
}

fn text(element: ElementRef) -> String {
    element.text().collect()
}

#[cfg(test)]
mod test {
    use crate::testutil::{patch_list, PATCH_LIST};
    use crate::venue::{Direction, Hardware, Venue, VenueError};

    use super::Discoverer;

    #[test]
    fn parse_metadata() {
        let venue = Venue::parse(PATCH_LIST.as_bytes()).expect("patch list should parse");
        assert_eq!(venue.console(), "Avid VENUE");
        assert_eq!(venue.version(), "VENUE 4.5.3");
        assert_eq!(venue.show(), r"ICF Zurich\20170910 Rec PM");
    }

    #[test]
    fn discover_devices() {
        let venue = Venue::parse(PATCH_LIST.as_bytes()).expect("patch list should parse");
        let names: Vec<&str> = venue.devices().keys().map(|k| k.as_str()).collect();
        assert_eq!(names, vec!["Engine", "Pro Tools", "Stage 1", "Stage 2"]);

        let engine = venue.device("Engine").expect("engine");
        assert_eq!(engine.kind(), Hardware::Local);
        assert_eq!((engine.num_inputs(), engine.num_outputs()), (2, 2));

        let pro_tools = venue.device("Pro Tools").expect("pro tools");
        assert_eq!(pro_tools.kind(), Hardware::Daw);
        assert_eq!((pro_tools.num_inputs(), pro_tools.num_outputs()), (8, 8));
        assert_eq!(
            pro_tools.output(7).map(|c| c.name()),
            Some("Left -23 LUFS (direct out)")
        );
        assert_eq!(pro_tools.output(1).map(|c| c.moniker()), Some("FWx 1"));

        let stage_1 = venue.device("Stage 1").expect("stage 1");
        assert_eq!(stage_1.kind(), Hardware::StageBox);
        assert_eq!((stage_1.num_inputs(), stage_1.num_outputs()), (4, 2));
        assert_eq!(stage_1.input(1).map(|c| c.name()), Some("Kick"));
        assert_eq!(stage_1.input(2).map(|c| c.name()), Some("SnareTop"));
        assert_eq!(stage_1.input(3).map(|c| c.name()), Some("eGit-L, eGit-R"));
        assert_eq!(stage_1.input(4).map(|c| c.name()), Some(""));
        assert_eq!(stage_1.output(2).map(|c| c.name()), Some("Mon 2"));
    }

    #[test]
    fn input_only_stage_box_is_tolerated() {
        let venue = Venue::parse(PATCH_LIST.as_bytes()).expect("patch list should parse");
        let stage_2 = venue.device("Stage 2").expect("stage 2");
        assert_eq!((stage_2.num_inputs(), stage_2.num_outputs()), (2, 0));
        assert_eq!(stage_2.input(2).map(|c| c.name()), Some("Vox/Talk"));
    }

    #[test]
    fn missing_devices_are_skipped() {
        let venue = Venue::parse(PATCH_LIST.as_bytes()).expect("patch list should parse");
        for name in ["Console", "Local", "Stage 3", "Stage 4"] {
            assert!(venue.device(name).is_none(), "{} should be absent", name);
        }
        assert_eq!(venue.devices().len(), 4);
    }

    #[test]
    fn missing_metadata() {
        for (field, html) in [
            ("console", patch_list().replace(r#"name="description""#, r#"name="x""#)),
            ("version", patch_list().replace(r#"name="author""#, r#"name="x""#)),
            ("show", patch_list().replace("Show:", "Venue:")),
        ] {
            match Venue::parse(html.as_bytes()) {
                Err(VenueError::Metadata(missing)) => assert_eq!(missing, field),
                other => panic!("expected {} metadata error, got {:?}", field, other),
            }
        }
    }

    #[test]
    fn daw_without_outputs_is_incomplete() {
        let html = patch_list().replace("Pro Tools Outputs", "Pro Tools Spares");
        match Venue::parse(html.as_bytes()) {
            Err(VenueError::IncompleteDevice { device, missing }) => {
                assert_eq!(device, "Pro Tools");
                assert_eq!(missing, Direction::Outputs);
            }
            other => panic!("expected incomplete device error, got {:?}", other),
        }
    }

    #[test]
    fn local_without_outputs_is_incomplete() {
        for (device, html) in [
            ("Engine", patch_list().replace("Engine Outputs", "Engine Spares")),
            (
                "Local",
                patch_list()
                    .replace("Engine Inputs", "Local Inputs")
                    .replace("Engine Outputs", "Local Spares"),
            ),
        ] {
            match Venue::parse(html.as_bytes()) {
                Err(VenueError::IncompleteDevice {
                    device: name,
                    missing,
                }) => {
                    assert_eq!(name, device);
                    assert_eq!(missing, Direction::Outputs);
                    assert_eq!(Hardware::from_device_name(device), Hardware::Local);
                }
                other => panic!("expected incomplete {}, got {:?}", device, other),
            }
        }
    }

    #[test]
    fn custom_candidates() {
        let discoverer = Discoverer::with_candidates(vec!["Stage 2".to_string()])
            .expect("selectors should compile");
        let venue = discoverer
            .discover(PATCH_LIST.as_bytes())
            .expect("patch list should parse");
        assert_eq!(venue.devices().len(), 1);
        assert!(venue.device("Stage 2").is_some());
    }

    #[test]
    fn garbage_input_is_missing_metadata() {
        let result = Venue::parse(b"\xff\xfe not html at all");
        assert!(matches!(result, Err(VenueError::Metadata("console"))));
    }
}
