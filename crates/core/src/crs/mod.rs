//! Coordinate Reference System handling

use serde::{Deserialize, Serialize};
use std::fmt;

/// GeoKey holding the EPSG code of a projected CRS
pub const PROJECTED_CS_TYPE_GEOKEY: u16 = 3072;
/// GeoKey holding the EPSG code of a geographic CRS
pub const GEOGRAPHIC_TYPE_GEOKEY: u16 = 2048;

/// Coordinate Reference System representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CRS {
    /// WKT representation
    wkt: Option<String>,
    /// EPSG code if known
    epsg: Option<u32>,
}

impl CRS {
    /// Create a CRS from an EPSG code
    pub fn from_epsg(code: u32) -> Self {
        Self {
            wkt: None,
            epsg: Some(code),
        }
    }

    /// Create a CRS from a WKT string
    pub fn from_wkt(wkt: impl Into<String>) -> Self {
        Self {
            wkt: Some(wkt.into()),
            epsg: None,
        }
    }

    /// Extract the CRS from a GeoTIFF GeoKeyDirectory (tag 34735).
    ///
    /// The directory is `[version, revision, minor, count]` followed by
    /// `count` entries of `[key_id, tiff_tag_location, count, value]`.
    /// Only keys stored inline (location 0) are considered.
    pub fn from_geokeys(directory: &[u16]) -> Option<Self> {
        if directory.len() < 4 {
            return None;
        }
        let num_keys = directory[3] as usize;

        for entry in directory[4..].chunks_exact(4).take(num_keys) {
            let (key_id, location, value) = (entry[0], entry[1], entry[3]);
            if location != 0 || value == 0 {
                continue;
            }
            match key_id {
                PROJECTED_CS_TYPE_GEOKEY | GEOGRAPHIC_TYPE_GEOKEY => {
                    return Some(CRS::from_epsg(value as u32));
                }
                _ => {}
            }
        }

        None
    }

    /// Get EPSG code if known
    pub fn epsg(&self) -> Option<u32> {
        self.epsg
    }

    /// Get WKT representation
    pub fn wkt(&self) -> Option<&str> {
        self.wkt.as_deref()
    }

    /// Check if two CRS are equivalent
    pub fn is_equivalent(&self, other: &CRS) -> bool {
        if let (Some(a), Some(b)) = (self.epsg, other.epsg) {
            return a == b;
        }

        // Textual WKT comparison; spelling differences count as different
        if let (Some(a), Some(b)) = (&self.wkt, &other.wkt) {
            return a == b;
        }

        false
    }

    /// Get a string identifier for this CRS
    pub fn identifier(&self) -> String {
        if let Some(code) = self.epsg {
            return format!("EPSG:{}", code);
        }
        if let Some(wkt) = &self.wkt {
            // First 50 chars of WKT
            let head: String = wkt.chars().take(50).collect();
            return format!("WKT:{}", head);
        }
        "Unknown".to_string()
    }
}

impl fmt::Display for CRS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}
