//! Event catalog loading from catalog.toml
//!
//! The catalog is the one static, immutable input of the system: a list of
//! bookable events read once at startup. The file is plain data; this module
//! only defines its schema and the loader. Event dates are RFC 3339 strings
//! so they deserialize straight into `chrono` instants.

use crate::entities::Event;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Schema of the catalog TOML file: a flat list of `[[events]]` tables
#[derive(Debug, Deserialize)]
pub struct CatalogConfig {
    /// Events offered for booking, in file order
    pub events: Vec<Event>,
}

/// Loads the event catalog from a TOML file.
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing or a date is not RFC 3339
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<CatalogConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read catalog file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse catalog: {e}"),
    })
}

/// Loads the event catalog from the default location (./catalog.toml)
pub fn load_default_catalog() -> Result<CatalogConfig> {
    load_catalog("catalog.toml")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_catalog_entries() {
        let toml_str = r#"
            [[events]]
            id = "1"
            title = "Tech Summit"
            description = "A day of talks."
            image = "https://example.com/summit.jpg"
            location = "Landmark Centre, Victoria Island"
            date = "2026-11-20T09:00:00Z"
            price = 25000
            seats = 800
            category = "Technology"
            organizer = "TechHub Africa"

            [[events]]
            id = "2"
            title = "Free Coding Workshop"
            description = "No experience required."
            image = "https://example.com/workshop.jpg"
            location = "Yaba, Lagos"
            date = "2026-11-05T10:00:00Z"
            price = 0
            seats = 100
            category = "Education"
            organizer = "Code Lagos"
        "#;

        let catalog: CatalogConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(catalog.events.len(), 2);

        let summit = &catalog.events[0];
        assert_eq!(summit.id, "1");
        assert_eq!(summit.price, 25000);
        assert_eq!(summit.seats, 800);
        assert_eq!(summit.date.year(), 2026);
        assert_eq!(summit.date.hour(), 9);
        assert!(!summit.is_free());

        assert!(catalog.events[1].is_free());
    }

    #[test]
    fn test_invalid_date_is_a_config_error() {
        let toml_str = r#"
            [[events]]
            id = "1"
            title = "Broken"
            description = "Bad date."
            image = ""
            location = "Nowhere"
            date = "not-a-date"
            price = 0
            seats = 1
            category = "Other"
            organizer = "Nobody"
        "#;

        let parsed: std::result::Result<CatalogConfig, _> = toml::from_str(toml_str);
        assert!(parsed.is_err());
    }
}
