//! Request shaping: excluded response sections and unit systems

use std::collections::BTreeSet;
use std::fmt;

/// A top-level section of the forecast response
///
/// Declaration order is the order sections appear in the `exclude` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    /// Current conditions
    Currently,
    /// Minute-level forecast for the next hour
    Minutely,
    /// Hour-level forecast
    Hourly,
    /// Day-level forecast
    Daily,
    /// Severe weather alerts
    Alerts,
    /// Response metadata
    Flags,
}

impl Section {
    /// Every section, in request order
    pub const ALL: [Self; 6] = [
        Self::Currently,
        Self::Minutely,
        Self::Hourly,
        Self::Daily,
        Self::Alerts,
        Self::Flags,
    ];

    /// Name used by the API
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Currently => "currently",
            Self::Minutely => "minutely",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Alerts => "alerts",
            Self::Flags => "flags",
        }
    }
}

/// Set of sections to leave out of the response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExcludeSet(BTreeSet<Section>);

impl ExcludeSet {
    /// Exclude nothing
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Exclude every section except the given ones
    #[must_use]
    pub fn all_except(keep: &[Section]) -> Self {
        Self(
            Section::ALL
                .into_iter()
                .filter(|section| !keep.contains(section))
                .collect(),
        )
    }

    /// Add a section to the set
    #[must_use]
    pub fn with(mut self, section: Section) -> Self {
        self.0.insert(section);
        self
    }

    /// Whether the section is excluded
    #[must_use]
    pub fn contains(&self, section: Section) -> bool {
        self.0.contains(&section)
    }

    /// Whether nothing is excluded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Comma-separated value for the `exclude` query parameter
    #[must_use]
    pub fn to_query_value(&self) -> String {
        self.0
            .iter()
            .map(|section| section.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for ExcludeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_value())
    }
}

/// Unit system requested from the API
///
/// Readings are always fetched in SI and converted for display locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Units {
    /// °C, m/s, mm/h
    #[default]
    Si,
}

impl Units {
    /// Name used by the API
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Si => "si",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
