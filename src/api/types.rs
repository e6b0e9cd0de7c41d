use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::grid::Activity;

/// The currently active planner, as returned by `GET /evening`. The endpoint
/// returns JSON `null` when no planner has ever been saved; callers get that
/// as `Option<ActivePlanner>`.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivePlanner {
    pub id: i64,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

/// Body for `POST /evening`. The server does a full replace: it deactivates
/// the prior planner, creates a new active one with these activities, and
/// appends a history snapshot of the result.
#[derive(Debug, Clone, Serialize)]
pub struct SaveRequest<'a> {
    pub activities: &'a [Activity],
}

#[derive(Debug, Clone, Deserialize)]
pub struct SaveResponse {
    pub success: bool,
    pub id: i64,
}

/// One row of `GET /evening/history`: newest first, server-capped at 50.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub created_at: DateTime<Utc>,
}

/// A single snapshot from `GET /evening/history/:id`. `snapshot_data` is the
/// activity list the server serialized at save time, stored opaquely.
#[derive(Debug, Clone, Deserialize)]
pub struct HistorySnapshot {
    pub evening_planner_id: i64,
    pub snapshot_data: String,
}

impl HistorySnapshot {
    pub fn activities(&self) -> Result<Vec<Activity>, serde_json::Error> {
        serde_json::from_str(&self.snapshot_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_active_planner_with_extra_server_columns() {
        let json = r#"{
            "id": 12,
            "is_active": true,
            "active_key": 1,
            "created_at": "2025-03-01T09:30:00.000Z",
            "activities": [
                {"id": 7, "evening_planner_id": 12, "time_hour": 17, "day_of_week": 1, "activity_text": "Read"},
                {"id": 8, "evening_planner_id": 12, "time_hour": 20, "day_of_week": 3, "activity_text": "Gym"}
            ]
        }"#;
        let planner: ActivePlanner = serde_json::from_str(json).unwrap();
        assert_eq!(planner.id, 12);
        assert_eq!(planner.activities.len(), 2);
        assert_eq!(planner.activities[0].activity_text, "Read");
        assert_eq!(planner.activities[1].time_hour, 20);
    }

    #[test]
    fn null_active_planner_maps_to_none() {
        let planner: Option<ActivePlanner> = serde_json::from_str("null").unwrap();
        assert!(planner.is_none());
    }

    #[test]
    fn missing_activities_defaults_to_empty() {
        let planner: ActivePlanner = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert!(planner.activities.is_empty());
    }

    #[test]
    fn save_request_serializes_activity_list() {
        let activities = vec![Activity {
            time_hour: 18,
            day_of_week: 2,
            activity_text: "Gym".to_string(),
        }];
        let body = serde_json::to_value(SaveRequest { activities: &activities }).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "activities": [
                    {"time_hour": 18, "day_of_week": 2, "activity_text": "Gym"}
                ]
            })
        );
    }

    #[test]
    fn snapshot_data_round_trips_to_activities() {
        let saved = vec![
            Activity { time_hour: 18, day_of_week: 2, activity_text: "Gym".into() },
            Activity { time_hour: 19, day_of_week: 2, activity_text: "Gym".into() },
        ];
        let snapshot = HistorySnapshot {
            evening_planner_id: 12,
            snapshot_data: serde_json::to_string(&saved).unwrap(),
        };
        assert_eq!(snapshot.activities().unwrap(), saved);
    }

    #[test]
    fn history_entries_parse_timestamps() {
        let json = r#"[
            {"id": 31, "evening_planner_id": 12, "snapshot_data": "[]", "created_at": "2025-03-02T21:00:00.000Z"},
            {"id": 30, "evening_planner_id": 11, "snapshot_data": "[]", "created_at": "2025-03-01T21:00:00.000Z"}
        ]"#;
        let entries: Vec<HistoryEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].created_at > entries[1].created_at);
    }
}
