use crate::error::{Result, TaxonomyError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Globally unique taxonomy node id
pub type RegionId = u64;

/// Parent id recorded for roots. Never a valid region id.
pub const ROOT_PARENT: RegionId = 0;

/// RGB display color of a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parse a six digit hex triplet. A leading `#` is tolerated.
    pub fn from_hex(raw: &str) -> Result<Self> {
        let hex = raw.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TaxonomyError::Malformed(format!(
                "color '{}' is not a six digit hex triplet",
                raw
            )));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|e| TaxonomyError::Malformed(format!("color '{}': {}", raw, e)))
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Indexed taxonomy node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyNode {
    pub id: RegionId,

    pub acronym: String,

    pub name: String,

    pub color: Rgb,

    /// [`ROOT_PARENT`] for roots
    pub parent_id: RegionId,

    /// Distance from the nearest root (roots: 0)
    pub level: usize,

    pub child_count: usize,

    /// Display label, `"<acronym> : <name>"`
    pub label: String,
}

impl TaxonomyNode {
    pub fn parent(&self) -> Option<RegionId> {
        (self.parent_id != ROOT_PARENT).then_some(self.parent_id)
    }

    pub fn is_root(&self) -> bool {
        self.parent_id == ROOT_PARENT
    }

    pub fn is_leaf(&self) -> bool {
        self.child_count == 0
    }

    /// Color as `#rrggbb`
    pub fn color_hex(&self) -> String {
        self.color.to_hex()
    }
}
