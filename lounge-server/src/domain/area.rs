//! Static floor layout: named areas of numbered stations.
//!
//! The layout is configuration, not data. It only feeds the station picker;
//! the occupancy engine treats station identifiers as opaque strings.

use std::collections::HashSet;

use super::station::{InvalidStationCode, StationCode, validate_area_code};

/// Error returned when building an invalid layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("area {name:?}: {source}")]
    InvalidCode {
        name: String,
        #[source]
        source: InvalidStationCode,
    },

    #[error("area {0:?} has no stations")]
    Empty(String),

    #[error("area {name:?} has {count} stations, at most 99 are supported")]
    TooManyStations { name: String, count: u8 },

    #[error("area code {0} is used more than once")]
    DuplicateCode(String),

    #[error("area name must not be blank")]
    BlankName,
}

/// A named group of stations sharing an area code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Area {
    name: String,
    code: String,
    count: u8,
}

impl Area {
    /// Create an area, validating its code and station count.
    pub fn new(name: &str, code: &str, count: u8) -> Result<Self, LayoutError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LayoutError::BlankName);
        }
        validate_area_code(code).map_err(|source| LayoutError::InvalidCode {
            name: name.to_string(),
            source,
        })?;
        if count == 0 {
            return Err(LayoutError::Empty(name.to_string()));
        }
        if count > 99 {
            return Err(LayoutError::TooManyStations {
                name: name.to_string(),
                count,
            });
        }
        Ok(Self {
            name: name.to_string(),
            code: code.to_string(),
            count,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Number of stations in the area.
    pub fn count(&self) -> u8 {
        self.count
    }

    /// Station codes in index order, `<code>-01` through `<code>-<count>`.
    pub fn stations(&self) -> impl Iterator<Item = StationCode> + '_ {
        (1..=self.count).map(|i| StationCode::from_validated(&self.code, i))
    }
}

/// The ordered set of areas on the floor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaLayout {
    areas: Vec<Area>,
}

impl AreaLayout {
    /// Areas in display order.
    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    /// Every station code on the floor, area by area.
    pub fn stations(&self) -> impl Iterator<Item = StationCode> + '_ {
        self.areas.iter().flat_map(Area::stations)
    }

    /// Total number of stations.
    pub fn len(&self) -> usize {
        self.areas.iter().map(|a| a.count as usize).sum()
    }

    /// Returns true if the layout has no areas.
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Whether a station identifier belongs to this layout.
    pub fn contains(&self, station: &str) -> bool {
        let Ok(code) = StationCode::parse(station) else {
            return false;
        };
        self.area_for(&code)
            .is_some_and(|a| code.index() <= a.count)
    }

    /// The area a station code belongs to, if any.
    pub fn area_for(&self, code: &StationCode) -> Option<&Area> {
        self.areas.iter().find(|a| a.code == code.area())
    }
}

/// Builder for creating area layouts.
///
/// Provides a fluent API; validation errors surface from [`build`](Self::build).
#[derive(Debug, Default)]
pub struct AreaLayoutBuilder {
    areas: Vec<Result<Area, LayoutError>>,
}

impl AreaLayoutBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an area.
    pub fn area(mut self, name: &str, code: &str, count: u8) -> Self {
        self.areas.push(Area::new(name, code, count));
        self
    }

    /// Build the layout, reporting the first invalid or duplicate area.
    pub fn build(self) -> Result<AreaLayout, LayoutError> {
        let mut seen = HashSet::new();
        let mut areas = Vec::with_capacity(self.areas.len());
        for area in self.areas {
            let area = area?;
            if !seen.insert(area.code.clone()) {
                return Err(LayoutError::DuplicateCode(area.code));
            }
            areas.push(area);
        }
        Ok(AreaLayout { areas })
    }
}

/// The lounge floor.
///
/// ```
/// use lounge_server::domain::default_layout;
///
/// let layout = default_layout();
/// assert!(layout.contains("Y-32"));
/// assert!(!layout.contains("Y-33"));
/// ```
pub fn default_layout() -> AreaLayout {
    AreaLayout {
        areas: vec![
            Area {
                name: "Yellow Area".to_string(),
                code: "Y".to_string(),
                count: 32,
            },
            Area {
                name: "Red Area".to_string(),
                code: "R".to_string(),
                count: 20,
            },
            Area {
                name: "VIP Room".to_string(),
                code: "V".to_string(),
                count: 8,
            },
        ],
    }
}
