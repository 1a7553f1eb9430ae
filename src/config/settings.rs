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
use std::path::Path;

use config::{Config, Environment, File};
use serde::Deserialize;

use super::error::ConfigError;
use crate::mapping::MAPPING_ORDER;
use crate::venue::DEVICE_CANDIDATES;

/// The prefix of environment variables that override settings, e.g. `VENUETRACKS_DRY_RUN`.
const ENV_PREFIX: &str = "VENUETRACKS";

/// Separates list entries in environment overrides, e.g.
/// `VENUETRACKS_MAPPING_ORDER="Stage 1,Stage 2"`.
const ENV_LIST_SEPARATOR: &str = ",";

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .try_parsing(true)
        .list_separator(ENV_LIST_SEPARATOR)
        .with_list_parse_key("device_candidates")
        .with_list_parse_key("mapping_order")
}

/// Settings for discovery, mapping and the file operations. Every field has a default, so an
/// empty or missing configuration file is valid.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// The devices looked for in a patch list, in discovery order.
    device_candidates: Vec<String>,
    /// The devices walked when mapping tracks to channels, in priority order.
    mapping_order: Vec<String>,
    /// Print what would be done without touching any files.
    dry_run: bool,
    /// The default VENUE patch list or system info file.
    patch_file: Option<String>,
    /// The default directory holding the recorded tracks.
    src_dir: Option<String>,
    /// The default destination directory. Defaults to the source directory.
    dest_dir: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            device_candidates: DEVICE_CANDIDATES.iter().map(|d| d.to_string()).collect(),
            mapping_order: MAPPING_ORDER.iter().map(|d| d.to_string()).collect(),
            dry_run: false,
            patch_file: None,
            src_dir: None,
            dest_dir: None,
        }
    }
}

impl Settings {
    /// Loads settings from an optional YAML file, overlaid with environment variables.
    pub fn load(path: Option<&Path>) -> Result<Settings, ConfigError> {
        Settings::load_with(path, environment())
    }

    fn load_with(path: Option<&Path>, environment: Environment) -> Result<Settings, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let settings = builder
            .add_source(environment)
            .build()?
            .try_deserialize::<Settings>()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Every mapped device must be discoverable, otherwise it could never resolve a track.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.device_candidates.is_empty() {
            return Err(ConfigError::Empty {
                field: "device_candidates",
            });
        }
        if self.mapping_order.is_empty() {
            return Err(ConfigError::Empty {
                field: "mapping_order",
            });
        }
        if let Some(device) = self
            .mapping_order
            .iter()
            .find(|device| !self.device_candidates.contains(device))
        {
            return Err(ConfigError::UnknownDevice {
                device: device.clone(),
            });
        }
        Ok(())
    }

    pub fn device_candidates(&self) -> &[String] {
        &self.device_candidates
    }

    pub fn mapping_order(&self) -> &[String] {
        &self.mapping_order
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn patch_file(&self) -> Option<&str> {
        self.patch_file.as_deref()
    }

    pub fn src_dir(&self) -> Option<&str> {
        self.src_dir.as_deref()
    }

    pub fn dest_dir(&self) -> Option<&str> {
        self.dest_dir.as_deref()
    }
}

#[cfg(test)]
mod test {
    use std::error::Error;
    use std::fs;

    use config::{Config, Environment, File, FileFormat, Map};

    use super::{environment, Settings};
    use crate::config::ConfigError;

    #[test]
    fn test_settings_defaults() -> Result<(), Box<dyn Error>> {
        let settings = Settings::load_with(None, env(&[]))?;
        assert_eq!(settings.device_candidates().len(), 8);
        assert_eq!(settings.device_candidates()[3], "Pro Tools");
        assert_eq!(
            settings.mapping_order(),
            ["Pro Tools", "Stage 1", "Stage 2", "Stage 3", "Stage 4"]
        );
        assert!(settings.patch_file().is_none());
        Ok(())
    }

    #[test]
    fn test_settings_deserialize() {
        let yaml = r#"
            mapping_order:
              - Stage 1
              - Stage 2
            dry_run: true
            src_dir: /recordings
        "#;

        let settings: Settings = Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.mapping_order(), ["Stage 1", "Stage 2"]);
        assert!(settings.dry_run());
        assert_eq!(settings.src_dir(), Some("/recordings"));
        assert_eq!(settings.dest_dir(), None);
        assert_eq!(settings.device_candidates().len(), 8);
    }

    #[test]
    fn test_settings_from_file() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("venuetracks.yaml");
        fs::write(
            &path,
            "patch_file: show.html\ndevice_candidates:\n  - Stage 1\nmapping_order:\n  - Stage 1\n",
        )?;

        let settings = Settings::load(Some(&path))?;
        assert_eq!(settings.patch_file(), Some("show.html"));
        assert_eq!(settings.device_candidates(), ["Stage 1"]);
        assert_eq!(settings.mapping_order(), ["Stage 1"]);
        Ok(())
    }

    #[test]
    fn test_settings_unknown_mapped_device() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("venuetracks.yaml");
        fs::write(&path, "device_candidates:\n  - Stage 1\n")?;

        match Settings::load(Some(&path)) {
            Err(ConfigError::UnknownDevice { device }) => assert_eq!(device, "Pro Tools"),
            other => panic!("unexpected result: {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_settings_empty_mapping_order() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("venuetracks.yaml");
        fs::write(&path, "mapping_order: []\n")?;

        match Settings::load(Some(&path)) {
            Err(ConfigError::Empty { field }) => assert_eq!(field, "mapping_order"),
            other => panic!("unexpected result: {:?}", other),
        }
        Ok(())
    }

    fn env(vars: &[(&str, &str)]) -> Environment {
        let vars: Map<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        environment().source(Some(vars))
    }

    #[test]
    fn test_settings_environment_lists() -> Result<(), Box<dyn Error>> {
        let settings = Settings::load_with(
            None,
            env(&[
                ("VENUETRACKS_MAPPING_ORDER", "Stage 1"),
                ("VENUETRACKS_DRY_RUN", "true"),
            ]),
        )?;
        assert_eq!(settings.mapping_order(), ["Stage 1"]);
        assert!(settings.dry_run());
        assert_eq!(settings.device_candidates().len(), 8);

        let settings = Settings::load_with(
            None,
            env(&[
                ("VENUETRACKS_DEVICE_CANDIDATES", "Pro Tools,Stage 2"),
                ("VENUETRACKS_MAPPING_ORDER", "Stage 2,Pro Tools"),
            ]),
        )?;
        assert_eq!(settings.device_candidates(), ["Pro Tools", "Stage 2"]);
        assert_eq!(settings.mapping_order(), ["Stage 2", "Pro Tools"]);
        Ok(())
    }

    #[test]
    fn test_settings_environment_overrides_file() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("venuetracks.yaml");
        fs::write(&path, "dry_run: true\nsrc_dir: /recordings\n")?;

        let settings = Settings::load_with(
            Some(&path),
            env(&[
                ("VENUETRACKS_DRY_RUN", "false"),
                ("VENUETRACKS_MAPPING_ORDER", "Stage 3"),
            ]),
        )?;
        assert!(!settings.dry_run());
        assert_eq!(settings.src_dir(), Some("/recordings"));
        assert_eq!(settings.mapping_order(), ["Stage 3"]);
        Ok(())
    }

    #[test]
    fn test_settings_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Settings::load(Some(&dir.path().join("missing.yaml")));
        assert!(result.is_err());
    }
}
