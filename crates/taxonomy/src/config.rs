use crate::error::{Result, TaxonomyError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Configuration for building a [`crate::TaxonomyIndex`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxonomyConfig {
    /// Upper bound on tree depth. Ancestor walks longer than this are treated
    /// as a parent cycle.
    pub max_depth: usize,

    /// Ordered group vocabulary
    pub groups: GroupConfig,
}

impl Default for TaxonomyConfig {
    fn default() -> Self {
        Self {
            max_depth: 64,
            groups: GroupConfig::developing_human(),
        }
    }
}

impl TaxonomyConfig {
    pub fn with_groups(groups: GroupConfig) -> Self {
        Self {
            groups,
            ..Default::default()
        }
    }

    /// Parse from TOML. Missing keys fall back to defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(TaxonomyError::InvalidConfig(
                "max_depth must be > 0".to_string(),
            ));
        }
        self.groups.validate()
    }
}

/// Named group, identified by the acronyms of its subtree roots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub name: String,
    pub root_acronyms: Vec<String>,
}

impl GroupSpec {
    pub fn new(name: &str, root_acronyms: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            root_acronyms: root_acronyms.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Ordered list of groups. When group roots are nested, the group declared
/// first wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupConfig(pub Vec<GroupSpec>);

impl GroupConfig {
    pub fn new(groups: Vec<GroupSpec>) -> Self {
        Self(groups)
    }

    /// Developing human brain vocabulary
    pub fn developing_human() -> Self {
        Self(vec![
            GroupSpec::new("HPF", &["HPF"]),           // hippocampal formation
            GroupSpec::new("AMY_BN", &["AMY", "BN"]),  // amygdala + basal nucleus
            GroupSpec::new("Mig", &["Lms", "Rms", "GE"]), // migratory areas
            GroupSpec::new("HY", &["HY"]),             // hypothalamus
            GroupSpec::new("TH", &["TH"]),             // thalamus
            GroupSpec::new("MB", &["MB"]),             // midbrain
            GroupSpec::new("HB", &["HB"]),             // hindbrain
            GroupSpec::new("CB", &["CB"]),             // cerebellum
            GroupSpec::new("dev", &["dev"]),           // developmental
            GroupSpec::new("ft", &["ft"]),             // fiber tracts
            GroupSpec::new("Vs", &["Vs"]),             // ventricles
            GroupSpec::new("Ctx", &["Ctx"]),           // fallback cortex
        ])
    }

    /// Adult mouse major divisions
    pub fn adult_mouse() -> Self {
        Self(vec![
            GroupSpec::new("Isocortex", &["Isocortex"]),
            GroupSpec::new("OLF", &["OLF"]),
            GroupSpec::new("HPF", &["HPF"]),
            GroupSpec::new("CTXsp", &["CTXsp"]),
            GroupSpec::new("CNU", &["STR", "PAL"]),
            GroupSpec::new("TH", &["TH"]),
            GroupSpec::new("HY", &["HY"]),
            GroupSpec::new("MB", &["MB"]),
            GroupSpec::new("HB", &["P", "MY"]),
            GroupSpec::new("CB", &["CB"]),
            GroupSpec::new("ft", &["fiber tracts"]),
            GroupSpec::new("VS", &["VS"]),
        ])
    }

    pub fn specs(&self) -> &[GroupSpec] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for spec in &self.0 {
            if spec.name.trim().is_empty() {
                return Err(TaxonomyError::InvalidConfig(
                    "group name must not be empty".to_string(),
                ));
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(TaxonomyError::InvalidConfig(format!(
                    "group '{}' is declared twice",
                    spec.name
                )));
            }
        }
        Ok(())
    }
}

/// Acronym prefix/suffix patterns for linear scans over the index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcronymPatterns {
    pub prefixes: Vec<String>,
    pub suffixes: Vec<String>,
    /// Exact acronyms never reported even when a pattern matches
    pub excluded: Vec<String>,
}

impl AcronymPatterns {
    /// Cortical lobe/area suffixes (`X-FCTx`, `X-ORB`, ...)
    pub fn cortical_areas() -> Self {
        Self {
            suffixes: ["-FCTx", "-ORB", "-PAR", "-OCC", "-TEMP", "-INS", "-CING", "-ENT"]
                .into_iter()
                .map(String::from)
                .collect(),
            ..Default::default()
        }
    }

    /// Transient developmental zones (`SGL-`, `MZ-`, ...), minus the whole-cortex
    /// `<zone>-CTX` entries
    pub fn layered_zones() -> Self {
        let prefixes: Vec<String> = LAYERED_ZONES.iter().map(|z| format!("{}-", z)).collect();
        let excluded = prefixes.iter().map(|p| format!("{}CTX", p)).collect();
        Self {
            prefixes,
            excluded,
            ..Default::default()
        }
    }

    /// First pattern matching `acronym`, prefixes before suffixes
    pub fn first_match(&self, acronym: &str) -> Option<&str> {
        if self.excluded.iter().any(|e| e == acronym) {
            return None;
        }
        self.prefixes
            .iter()
            .find(|p| acronym.starts_with(p.as_str()))
            .or_else(|| self.suffixes.iter().find(|s| acronym.ends_with(s.as_str())))
            .map(String::as_str)
    }
}

/// Transient zones of the developing cortical wall
pub const LAYERED_ZONES: [&str; 7] = ["SGL", "MZ", "CP", "SP", "IZ", "SVZ", "VZ"];
