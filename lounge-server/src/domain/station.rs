//! Station codes and station list normalization.

use std::fmt;

/// Separator used when a station list is persisted as a single string.
const LIST_SEPARATOR: &str = ", ";

/// Error returned when parsing an invalid station code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station code: {reason}")]
pub struct InvalidStationCode {
    reason: &'static str,
}

/// A station code of the form `<AREA>-<NN>`, e.g. `Y-07`.
///
/// The area code is 1-3 uppercase ASCII letters and the index is exactly
/// two digits in `01..=99`.
///
/// # Examples
///
/// ```
/// use lounge_server::domain::StationCode;
///
/// let code = StationCode::parse("Y-07").unwrap();
/// assert_eq!(code.area(), "Y");
/// assert_eq!(code.index(), 7);
/// assert_eq!(code.to_string(), "Y-07");
///
/// assert!(StationCode::parse("Y-7").is_err());
/// assert!(StationCode::parse("y-07").is_err());
/// assert!(StationCode::parse("Masa 3").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationCode {
    area: String,
    index: u8,
}

impl StationCode {
    /// Parse a station code from a string.
    pub fn parse(s: &str) -> Result<Self, InvalidStationCode> {
        let (area, index) = s.split_once('-').ok_or(InvalidStationCode {
            reason: "expected AREA-NN",
        })?;

        validate_area_code(area)?;

        let bytes = index.as_bytes();
        if bytes.len() != 2 || !bytes.iter().all(u8::is_ascii_digit) {
            return Err(InvalidStationCode {
                reason: "index must be exactly two digits",
            });
        }
        let index = (bytes[0] - b'0') * 10 + (bytes[1] - b'0');
        if index == 0 {
            return Err(InvalidStationCode {
                reason: "index must be 01-99",
            });
        }

        Ok(Self {
            area: area.to_string(),
            index,
        })
    }

    /// Build a code from an area code and a 1-based index.
    pub fn new(area: &str, index: u8) -> Result<Self, InvalidStationCode> {
        validate_area_code(area)?;
        if !(1..=99).contains(&index) {
            return Err(InvalidStationCode {
                reason: "index must be 01-99",
            });
        }
        Ok(Self {
            area: area.to_string(),
            index,
        })
    }

    /// Build from parts already checked by an [`Area`](super::Area).
    pub(crate) fn from_validated(area: &str, index: u8) -> Self {
        Self {
            area: area.to_string(),
            index,
        }
    }

    /// The area code, e.g. `Y`.
    pub fn area(&self) -> &str {
        &self.area
    }

    /// The 1-based station index within the area.
    pub fn index(&self) -> u8 {
        self.index
    }
}

/// Check that an area code is 1-3 uppercase ASCII letters.
pub(crate) fn validate_area_code(area: &str) -> Result<(), InvalidStationCode> {
    if area.is_empty() || area.len() > 3 {
        return Err(InvalidStationCode {
            reason: "area code must be 1-3 letters",
        });
    }
    if !area.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(InvalidStationCode {
            reason: "area code must be uppercase ASCII letters A-Z",
        });
    }
    Ok(())
}

impl fmt::Debug for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationCode({})", self)
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.area, self.index)
    }
}

/// Parse a persisted station list into its canonical in-memory form.
///
/// Fragments are split on commas, trimmed, and empty fragments dropped.
/// A single fragment without a hyphen is a legacy free-text label from
/// before station codes existed and is returned untouched. Everything else
/// comes back sorted.
///
/// ```
/// use lounge_server::domain::parse_station_list;
///
/// assert_eq!(parse_station_list("Y-02, Y-01"), vec!["Y-01", "Y-02"]);
/// assert_eq!(parse_station_list("Masa 3"), vec!["Masa 3"]);
/// assert!(parse_station_list(" , ").is_empty());
/// ```
pub fn parse_station_list(raw: &str) -> Vec<String> {
    let mut fragments: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if fragments.len() == 1 && !fragments[0].contains('-') {
        return fragments;
    }

    fragments.sort();
    fragments
}

/// Join station identifiers for persistence or display.
///
/// Callers pass lists already in canonical order.
pub fn format_station_list<S: AsRef<str>>(stations: &[S]) -> String {
    stations
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

/// Canonicalize a user-supplied selection: trim, drop empties, sort and
/// deduplicate.
pub fn normalize_selection<I, S>(stations: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = stations
        .into_iter()
        .map(|s| s.as_ref().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    out.sort();
    out.dedup();
    out
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn code() -> impl Strategy<Value = String> {
        ("[A-Z]{1,3}", 1u8..=99).prop_map(|(area, idx)| format!("{}-{:02}", area, idx))
    }

    proptest! {
        /// Any well-formed code parses and displays back unchanged
        #[test]
        fn code_roundtrip(s in code()) {
            let parsed = StationCode::parse(&s).unwrap();
            prop_assert_eq!(parsed.to_string(), s);
        }

        /// Format then parse gives back the sorted codes
        #[test]
        fn list_roundtrip(codes in proptest::collection::vec(code(), 1..10)) {
            let mut sorted = codes.clone();
            sorted.sort();
            let raw = format_station_list(&sorted);
            prop_assert_eq!(parse_station_list(&raw), sorted);
        }

        /// Parsing is insensitive to input order
        #[test]
        fn parse_order_independent(codes in proptest::collection::vec(code(), 2..10)) {
            let forward = parse_station_list(&codes.join(","));
            let mut reversed = codes.clone();
            reversed.reverse();
            let backward = parse_station_list(&reversed.join(","));
            prop_assert_eq!(forward, backward);
        }

        /// Parsed fragments are never empty and never carry outer whitespace
        #[test]
        fn fragments_trimmed(raw in "[A-Z0-9 ,-]{0,40}") {
            for f in parse_station_list(&raw) {
                prop_assert!(!f.is_empty());
                prop_assert_eq!(f.trim(), f.as_str());
            }
        }
    }
}
