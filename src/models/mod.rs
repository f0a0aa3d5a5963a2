use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Query Parameters
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    Week,
    Month,
    #[default]
    Year,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Range returned by the `get-month` schedule endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScheduleKind {
    #[default]
    Week,
    Month,
}

impl ScheduleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleKind::Week => "week",
            ScheduleKind::Month => "month",
        }
    }
}

impl fmt::Display for ScheduleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeworkQuery {
    /// Portal status code; 3 is "to do".
    pub status: u8,
    pub limit: u32,
    pub sort: String,
}

impl Default for HomeworkQuery {
    fn default() -> Self {
        Self {
            status: 3,
            limit: 1000,
            sort: "-hw.time".to_string(),
        }
    }
}

// ============================================================================
// Statistic Models
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Mark {
    pub mark_date: String,
    pub mark: Option<u32>,
    /// Subject name as the portal labels it.
    pub spec: Option<String>,
    pub mark_type: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ProgressSummary {
    pub total_average_point: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AttendanceSummary {
    pub visit_percent: f64,
    pub absence_percent: f64,
    pub late_percent: f64,
}

// ============================================================================
// Schedule Models
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct Lesson {
    pub date: Option<String>,
    pub lesson: Option<u32>,
    pub started_at: Option<String>,
    pub finished_at: Option<String>,
    pub lesson_theme: Option<String>,
    pub subject_name: Option<String>,
    pub teacher_name: Option<String>,
    pub room_name: Option<String>,
}

impl Lesson {
    /// Theme when the teacher filled it in, otherwise the subject.
    pub fn title(&self) -> &str {
        self.lesson_theme
            .as_deref()
            .filter(|t| !t.is_empty())
            .or_else(|| self.subject_name.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or("Lesson")
    }
}

/// `get-existing-schedule` answers with lessons keyed by date.
pub type ExistingSchedule = BTreeMap<String, Vec<Lesson>>;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct WeekSchedule {
    pub data: Vec<Lesson>,
}

// ============================================================================
// Homework & Leaderboard Models
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Homework {
    pub id: u64,
    pub theme: Option<String>,
    pub name_spec: Option<String>,
    pub completion_time: Option<String>,
    pub overdue_time: Option<String>,
    #[serde(rename = "isOverdue", default)]
    pub is_overdue: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LeaderEntry {
    pub id: Option<u64>,
    pub full_name: String,
    pub position: Option<u32>,
    pub amount: Option<u32>,
    pub photo_path: Option<String>,
}

// ============================================================================
// Pagination Envelope
// ============================================================================

/// Decoded only through `parser`, so typed pages and raw envelopes read
/// `_meta` the same way.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_count: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Page<T> {
    #[serde(
        rename = "_meta",
        default,
        deserialize_with = "crate::parser::deserialize_pagination_meta"
    )]
    pub meta: PaginationMeta,
    pub data: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_homework_page_decodes_envelope() {
        let json = r#"{
            "_meta": {"currentPage": 1, "totalPages": 2, "totalCount": 3},
            "data": [
                {"id": 1, "theme": "Loops", "isOverdue": true},
                {"id": 2, "theme": null}
            ]
        }"#;

        let page: Page<Homework> = serde_json::from_str(json).unwrap();
        assert_eq!(page.meta.total_count, 3);
        assert_eq!(page.data.len(), 2);
        assert!(page.data[0].is_overdue);
        assert!(!page.data[1].is_overdue);
    }

    #[test]
    fn test_page_without_meta_defaults_to_zero() {
        let page: Page<Homework> = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert_eq!(page.meta, PaginationMeta::default());
    }

    #[test]
    fn test_page_with_null_meta_fields_reads_as_zero() {
        let json = r#"{
            "_meta": {"currentPage": null, "totalPages": 1, "totalCount": 12},
            "data": [{"id": 1, "isOverdue": true}]
        }"#;
        let page: Page<Homework> = serde_json::from_str(json).unwrap();
        assert_eq!(
            page.meta,
            PaginationMeta {
                current_page: 0,
                total_pages: 1,
                total_count: 12
            }
        );

        let page: Page<Homework> =
            serde_json::from_str(r#"{"_meta": null, "data": []}"#).unwrap();
        assert_eq!(page.meta, PaginationMeta::default());
    }

    #[test]
    fn test_missing_required_field_is_a_decode_error() {
        let err = serde_json::from_str::<AttendanceSummary>(r#"{"visit_percent": 90}"#)
            .unwrap_err();
        assert!(err.to_string().contains("absence_percent"));
    }

    #[test]
    fn test_lesson_title_fallbacks() {
        let themed = Lesson {
            lesson_theme: Some("Ownership".to_string()),
            subject_name: Some("Rust".to_string()),
            ..Default::default()
        };
        let subject_only = Lesson {
            lesson_theme: Some(String::new()),
            subject_name: Some("Rust".to_string()),
            ..Default::default()
        };
        assert_eq!(themed.title(), "Ownership");
        assert_eq!(subject_only.title(), "Rust");
        assert_eq!(Lesson::default().title(), "Lesson");
    }
}
