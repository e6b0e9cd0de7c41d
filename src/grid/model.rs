use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// First plannable hour of the evening (17:00).
pub const START_HOUR: u8 = 17;
/// Last plannable hour, inclusive (24:00 is rendered as the final row).
pub const END_HOUR: u8 = 24;
/// Weekdays are 1 = Monday .. 5 = Friday.
pub const FIRST_DAY: u8 = 1;
pub const LAST_DAY: u8 = 5;

/// One scheduled activity as it travels over the wire.
///
/// The server attaches extra columns (row id, planner id, created_at) when it
/// returns these; serde ignores anything we don't model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub time_hour: u8,
    pub day_of_week: u8,
    pub activity_text: String,
}

/// Coordinate of a single grid cell. Ordering is `(hour, day)` ascending,
/// which is also the wire payload order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellKey {
    hour: u8,
    day: u8,
}

impl CellKey {
    pub fn new(hour: u8, day: u8) -> Option<Self> {
        if (START_HOUR..=END_HOUR).contains(&hour) && (FIRST_DAY..=LAST_DAY).contains(&day) {
            Some(Self { hour, day })
        } else {
            None
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    /// The full rectangular span between two corner cells, inclusive.
    pub fn span(a: CellKey, b: CellKey) -> impl Iterator<Item = CellKey> {
        let (min_hour, max_hour) = (a.hour.min(b.hour), a.hour.max(b.hour));
        let (min_day, max_day) = (a.day.min(b.day), a.day.max(b.day));
        (min_hour..=max_hour)
            .flat_map(move |hour| (min_day..=max_day).map(move |day| CellKey { hour, day }))
    }
}

/// In-memory activity grid for the active planner. The single source of
/// truth for rendering and for save payloads; only non-empty cells are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    cells: BTreeMap<CellKey, String>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a grid wholesale from a server activity list (initial load or a
    /// history restore). Out-of-range rows are dropped; on a duplicate key
    /// the later entry wins, matching the server's update-on-conflict upsert.
    pub fn from_activities(activities: &[Activity]) -> Self {
        let mut grid = Self::new();
        grid.upsert_many(activities);
        grid
    }

    pub fn get(&self, key: CellKey) -> Option<&str> {
        self.cells.get(&key).map(String::as_str)
    }

    /// Apply a batch of edits. Each entry fully determines its cell: trimmed
    /// non-empty text is stored, empty text removes the cell. Cells not named
    /// in the batch are untouched.
    pub fn upsert_many(&mut self, batch: &[Activity]) {
        for activity in batch {
            let Some(key) = CellKey::new(activity.time_hour, activity.day_of_week) else {
                continue;
            };
            let text = activity.activity_text.trim();
            if text.is_empty() {
                self.cells.remove(&key);
            } else {
                self.cells.insert(key, text.to_string());
            }
        }
    }

    /// Serialize to the wire payload: non-empty cells in ascending
    /// `(hour, day)` order.
    pub fn to_activities(&self) -> Vec<Activity> {
        self.cells
            .iter()
            .map(|(key, text)| Activity {
                time_hour: key.hour,
                day_of_week: key.day,
                activity_text: text.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn act(hour: u8, day: u8, text: &str) -> Activity {
        Activity {
            time_hour: hour,
            day_of_week: day,
            activity_text: text.to_string(),
        }
    }

    #[test]
    fn cell_key_validates_range() {
        assert!(CellKey::new(17, 1).is_some());
        assert!(CellKey::new(24, 5).is_some());
        assert!(CellKey::new(16, 1).is_none());
        assert!(CellKey::new(25, 1).is_none());
        assert!(CellKey::new(17, 0).is_none());
        assert!(CellKey::new(17, 6).is_none());
    }

    #[test]
    fn span_is_cartesian_product() {
        let a = CellKey::new(19, 4).unwrap();
        let b = CellKey::new(18, 2).unwrap();
        let cells: Vec<CellKey> = CellKey::span(a, b).collect();
        assert_eq!(cells.len(), 6);
        for hour in 18..=19 {
            for day in 2..=4 {
                assert!(cells.contains(&CellKey::new(hour, day).unwrap()));
            }
        }
    }

    #[test]
    fn upsert_stores_trimmed_and_removes_empty() {
        let mut grid = Grid::new();
        grid.upsert_many(&[act(17, 1, "  Read  ")]);
        assert_eq!(grid.get(CellKey::new(17, 1).unwrap()), Some("Read"));

        grid.upsert_many(&[act(17, 1, "   ")]);
        assert_eq!(grid.get(CellKey::new(17, 1).unwrap()), None);
        assert!(grid.is_empty());
    }

    #[test]
    fn upsert_skips_out_of_range_entries() {
        let mut grid = Grid::new();
        grid.upsert_many(&[act(9, 1, "Breakfast"), act(17, 7, "???"), act(20, 2, "Gym")]);
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.get(CellKey::new(20, 2).unwrap()), Some("Gym"));
    }

    #[test]
    fn upsert_many_is_idempotent() {
        let batch = vec![act(18, 2, "Gym"), act(19, 3, ""), act(20, 1, "Dinner")];
        let mut once = Grid::from_activities(&[act(19, 3, "Old"), act(21, 5, "Walk")]);
        once.upsert_many(&batch);
        let mut twice = once.clone();
        twice.upsert_many(&batch);
        assert_eq!(once, twice);
    }

    #[test]
    fn to_activities_orders_by_hour_then_day() {
        let mut grid = Grid::new();
        grid.upsert_many(&[act(24, 5, "Sleep"), act(17, 2, "Read"), act(17, 1, "Cook")]);
        let list = grid.to_activities();
        assert_eq!(
            list,
            vec![act(17, 1, "Cook"), act(17, 2, "Read"), act(24, 5, "Sleep")]
        );
    }

    #[test]
    fn round_trip_merges_batch_over_prior_entries() {
        let grid = Grid::from_activities(&[act(17, 1, "Read"), act(18, 1, "Cook")]);
        let mut merged = grid.clone();
        merged.upsert_many(&[act(18, 1, "Gym"), act(19, 2, "Call"), act(17, 1, "")]);
        assert_eq!(
            merged.to_activities(),
            vec![act(18, 1, "Gym"), act(19, 2, "Call")]
        );
    }

    #[test]
    fn later_duplicate_wins_on_load() {
        let grid = Grid::from_activities(&[act(18, 2, "First"), act(18, 2, "Second")]);
        assert_eq!(grid.get(CellKey::new(18, 2).unwrap()), Some("Second"));
    }
}
