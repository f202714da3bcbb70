use atlas_annotation::Predicate;
use atlas_taxonomy::{AcronymPatterns, GroupConfig, PathLabel};
use clap::ValueEnum;

#[derive(Copy, Clone, ValueEnum)]
pub(crate) enum GroupsPreset {
    DevelopingHuman,
    AdultMouse,
}

impl GroupsPreset {
    pub(crate) fn as_domain(self) -> GroupConfig {
        match self {
            GroupsPreset::DevelopingHuman => GroupConfig::developing_human(),
            GroupsPreset::AdultMouse => GroupConfig::adult_mouse(),
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
pub(crate) enum PatternPreset {
    Cortical,
    Layered,
}

impl PatternPreset {
    pub(crate) fn as_domain(self) -> AcronymPatterns {
        match self {
            PatternPreset::Cortical => AcronymPatterns::cortical_areas(),
            PatternPreset::Layered => AcronymPatterns::layered_zones(),
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
pub(crate) enum PredicateFlag {
    Touches,
    Crosses,
    Intersects,
    Overlaps,
}

impl PredicateFlag {
    pub(crate) const fn as_domain(self) -> Predicate {
        match self {
            PredicateFlag::Touches => Predicate::Touches,
            PredicateFlag::Crosses => Predicate::Crosses,
            PredicateFlag::Intersects => Predicate::Intersects,
            PredicateFlag::Overlaps => Predicate::Overlaps,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
pub(crate) enum PathLabelFlag {
    Name,
    Acronym,
}

impl PathLabelFlag {
    pub(crate) const fn as_domain(self) -> PathLabel {
        match self {
            PathLabelFlag::Name => PathLabel::Name,
            PathLabelFlag::Acronym => PathLabel::Acronym,
        }
    }
}
