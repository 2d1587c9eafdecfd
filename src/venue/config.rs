//! Loading venue tables from YAML.
//!
//! The file format is a single `venues` list; order in the file is the
//! match order:
//!
//! ```yaml
//! venues:
//!   - name: International Conference on Software Engineering
//!     abbreviation: ICSE
//!     aliases: [icse]
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::{Venue, VenueTable};
use crate::error::BibError;

const DEFAULT_VENUES_YAML: &str = include_str!("default_venues.yaml");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct VenueFile {
    venues: Vec<Venue>,
}

/// Reads a venue table from a YAML file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed, or if the table
/// fails [`VenueTable::new`] checks.
pub fn read_venue_table(path: &Path) -> Result<VenueTable, BibError> {
    let data = fs::read_to_string(path).map_err(BibError::Io)?;
    parse_venue_yaml(&data, path)
}

/// Parses a venue table from a YAML string.
pub fn venue_table_from_yaml_str(yaml: &str) -> Result<VenueTable, BibError> {
    parse_venue_yaml(yaml, Path::new("<string>"))
}

/// The venue table compiled into the binary.
pub fn default_venue_table() -> Result<VenueTable, BibError> {
    parse_venue_yaml(DEFAULT_VENUES_YAML, Path::new("<built-in>"))
}

fn parse_venue_yaml(yaml: &str, path: &Path) -> Result<VenueTable, BibError> {
    let file: VenueFile =
        serde_yaml::from_str(yaml).map_err(|source| BibError::VenueConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
    let table = VenueTable::new(file.venues)?;
    tracing::debug!(venues = table.len(), path = %path.display(), "loaded venue table");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::venue::ContainmentMatcher;

    #[test]
    fn default_table_is_valid() {
        let table = default_venue_table().expect("built-in table must load");
        assert!(table.len() > 10);
        let venue = table
            .resolve("International Conference on Software Engineering", &ContainmentMatcher)
            .unwrap();
        assert_eq!(venue.abbreviation, "ICSE");
    }

    #[test]
    fn parses_yaml_in_order() {
        let yaml = r#"
venues:
  - name: Alpha Conference
    abbreviation: ALPHA
    aliases: [alpha]
  - name: Beta Conference
    abbreviation: BETA
"#;
        let table = venue_table_from_yaml_str(yaml).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.venues()[0].abbreviation, "ALPHA");
        assert!(table.venues()[1].aliases.is_empty());
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = venue_table_from_yaml_str("venues: [ {name: Alpha").unwrap_err();
        assert!(matches!(err, BibError::VenueConfigParse { .. }));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = venue_table_from_yaml_str("conferences: []").unwrap_err();
        assert!(matches!(err, BibError::VenueConfigParse { .. }));
    }

    #[test]
    fn read_from_file() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("venues.yaml");
        fs::write(
            &path,
            "venues:\n  - name: Alpha Conference\n    abbreviation: ALPHA\n",
        )
        .unwrap();
        let table = read_venue_table(&path).unwrap();
        assert_eq!(table.venues()[0].name, "Alpha Conference");
    }
}
