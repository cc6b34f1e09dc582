//! Station picker state.
//!
//! Combines the static floor layout with an occupied set and the stations
//! the reservation being edited already holds. A station is locked only when
//! someone else holds it: stations in `preselected` stay selectable even if
//! the occupancy query reports them, so an edit never locks a reservation
//! out of its own stations.
//!
//! The current form selection only decides which boxes are ticked. Ticking an
//! occupied station does not unlock it.

use std::collections::{BTreeSet, HashSet};

use crate::domain::AreaLayout;

/// One station on the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationSlot {
    pub code: String,

    /// Reported by the occupancy query
    pub occupied: bool,

    /// Ticked in the current selection and not locked
    pub selected: bool,

    /// Cannot be picked
    pub locked: bool,
}

/// Picker slots for one area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaPicker {
    pub name: String,
    pub code: String,
    pub slots: Vec<StationSlot>,
}

impl AreaPicker {
    /// Number of stations that can still be picked.
    pub fn available(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| !s.locked && !s.selected)
            .count()
    }
}

/// The full picker, area by area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picker {
    pub areas: Vec<AreaPicker>,

    /// Selected values that are not on the floor layout, such as legacy
    /// free-text labels. Kept so that saving an edit does not drop them.
    pub extra_selected: Vec<String>,
}

impl Picker {
    /// Build the picker for a candidate window.
    ///
    /// `preselected` is what the reservation being edited already holds
    /// (empty when creating). `selection` is what the form currently ticks.
    pub fn build(
        layout: &AreaLayout,
        occupied: &BTreeSet<String>,
        preselected: &[String],
        selection: &[String],
    ) -> Self {
        let held: HashSet<&str> = preselected.iter().map(String::as_str).collect();
        let ticked: HashSet<&str> = selection.iter().map(String::as_str).collect();

        let areas = layout
            .areas()
            .iter()
            .map(|area| AreaPicker {
                name: area.name().to_string(),
                code: area.code().to_string(),
                slots: area
                    .stations()
                    .map(|code| {
                        let code = code.to_string();
                        let occupied = occupied.contains(&code);
                        let locked = is_locked(occupied, held.contains(code.as_str()));
                        StationSlot {
                            selected: !locked && ticked.contains(code.as_str()),
                            code,
                            occupied,
                            locked,
                        }
                    })
                    .collect(),
            })
            .collect();

        let extra_selected = selection
            .iter()
            .filter(|s| !layout.contains(s))
            .cloned()
            .collect();

        Self {
            areas,
            extra_selected,
        }
    }

    /// Codes of every locked station.
    pub fn locked(&self) -> Vec<&str> {
        self.slots()
            .filter(|s| s.locked)
            .map(|s| s.code.as_str())
            .collect()
    }

    /// Codes of every selected station, including extras.
    pub fn selected(&self) -> Vec<&str> {
        self.slots()
            .filter(|s| s.selected)
            .map(|s| s.code.as_str())
            .chain(self.extra_selected.iter().map(String::as_str))
            .collect()
    }

    fn slots(&self) -> impl Iterator<Item = &StationSlot> {
        self.areas.iter().flat_map(|a| a.slots.iter())
    }
}

/// A station is locked iff it is occupied and not already held by the
/// reservation being edited.
pub fn is_locked(occupied: bool, preselected: bool) -> bool {
    occupied && !preselected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AreaLayoutBuilder;

    fn layout() -> AreaLayout {
        AreaLayoutBuilder::new()
            .area("Yellow Area", "Y", 4)
            .area("VIP Room", "V", 2)
            .build()
            .unwrap()
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn lock_rule() {
        assert!(is_locked(true, false));
        assert!(!is_locked(true, true));
        assert!(!is_locked(false, false));
        assert!(!is_locked(false, true));
    }

    #[test]
    fn new_reservation_locks_occupied() {
        let picker = Picker::build(&layout(), &set(&["Y-02", "V-01"]), &[], &[]);
        assert_eq!(picker.locked(), vec!["Y-02", "V-01"]);
        assert!(picker.selected().is_empty());
        assert_eq!(picker.areas[0].available(), 3);
        assert_eq!(picker.areas[1].available(), 1);
    }

    #[test]
    fn edit_keeps_own_stations_selectable() {
        // The occupancy query excluded nothing, so Y-01 shows as held
        let own = strings(&["Y-01"]);
        let picker = Picker::build(&layout(), &set(&["Y-01", "Y-03"]), &own, &own);

        let y01 = &picker.areas[0].slots[0];
        assert_eq!(y01.code, "Y-01");
        assert!(y01.occupied);
        assert!(y01.selected);
        assert!(!y01.locked);

        assert_eq!(picker.locked(), vec!["Y-03"]);
        assert_eq!(picker.selected(), vec!["Y-01"]);
    }

    #[test]
    fn ticking_a_held_station_does_not_unlock_it() {
        let occupied = set(&["Y-01", "Y-03"]);

        // Creating: nothing is preselected
        let picker = Picker::build(&layout(), &occupied, &[], &strings(&["Y-01", "Y-02"]));
        assert_eq!(picker.locked(), vec!["Y-01", "Y-03"]);
        assert_eq!(picker.selected(), vec!["Y-02"]);

        // Editing a reservation that holds Y-01 and now also ticks Y-03
        let picker = Picker::build(
            &layout(),
            &occupied,
            &strings(&["Y-01"]),
            &strings(&["Y-01", "Y-03"]),
        );
        assert_eq!(picker.locked(), vec!["Y-03"]);
        assert_eq!(picker.selected(), vec!["Y-01"]);
    }

    #[test]
    fn unticked_own_station_stays_unlocked() {
        let picker = Picker::build(&layout(), &set(&["Y-01"]), &strings(&["Y-01"]), &[]);
        let y01 = &picker.areas[0].slots[0];
        assert!(!y01.locked);
        assert!(!y01.selected);
    }

    #[test]
    fn slots_follow_layout_order() {
        let picker = Picker::build(&layout(), &BTreeSet::new(), &[], &[]);
        let codes: Vec<&str> = picker.areas[0]
            .slots
            .iter()
            .map(|s| s.code.as_str())
            .collect();
        assert_eq!(codes, vec!["Y-01", "Y-02", "Y-03", "Y-04"]);
        assert_eq!(picker.areas[1].name, "VIP Room");
        assert_eq!(picker.areas[1].code, "V");
    }

    #[test]
    fn legacy_label_kept_as_extra() {
        let legacy = strings(&["Masa 3"]);
        let picker = Picker::build(&layout(), &BTreeSet::new(), &legacy, &legacy);
        assert_eq!(picker.extra_selected, vec!["Masa 3"]);
        assert_eq!(picker.selected(), vec!["Masa 3"]);
    }

    #[test]
    fn occupied_off_layout_station_is_ignored() {
        let picker = Picker::build(&layout(), &set(&["Z-01", "Masa 3"]), &[], &[]);
        assert!(picker.locked().is_empty());
    }
}
