use crate::api::MyStatClient;
use crate::models::{
    AttendanceSummary, Homework, HomeworkQuery, LeaderEntry, Lesson, Mark, Page, Period,
    ProgressSummary, ScheduleKind,
};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::info;

/// Placeholder shown wherever a section could not be fetched or is empty.
pub const NO_DATA: &str = "No data";

/// Number of marks shown on the home page.
pub const HOME_MARKS: usize = 10;

const LEADERBOARD_SIZE: u32 = 20;

/// Everything the dashboard renders, fetched once.
///
/// `None` means the call failed (already logged by the client); an empty
/// collection means the call succeeded with nothing to show.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    pub date: Option<NaiveDate>,
    pub progress: Option<ProgressSummary>,
    pub marks: Option<Vec<Mark>>,
    pub homeworks: Option<Page<Homework>>,
    pub attendance: Option<AttendanceSummary>,
    pub week_schedule: Option<Vec<Lesson>>,
    pub leaders: Option<Vec<LeaderEntry>>,
}

impl Dashboard {
    /// Number of independently fetched sections.
    pub const SECTIONS: usize = 6;

    /// Issue every dashboard call in turn; each one is awaited before the next.
    pub async fn load(client: &MyStatClient, today: NaiveDate) -> Self {
        if !client.is_authenticated() {
            info!("Loading dashboard without a token; expect the portal to reject requests");
        }

        let progress = client.get_progress(Period::Year).await.ok();
        let marks = client.get_marks().await.ok();
        let homeworks = client.get_homeworks(&HomeworkQuery::default()).await.ok();
        let attendance = client.get_attendance(Period::Month).await.ok();
        let week_schedule = client
            .get_week_schedule(today, ScheduleKind::Week)
            .await
            .ok()
            .map(|week| week.data);
        let leaders = client
            .get_leader_table(Some(1), Some(LEADERBOARD_SIZE))
            .await
            .ok();

        let dashboard = Self {
            date: Some(today),
            progress,
            marks,
            homeworks,
            attendance,
            week_schedule,
            leaders,
        };
        info!(failed = dashboard.failed_sections(), "Dashboard loaded");
        dashboard
    }

    pub fn homework_summary(&self) -> HomeworkSummary {
        self.homeworks
            .as_ref()
            .map(HomeworkSummary::from_page)
            .unwrap_or_default()
    }

    /// How many sections came back empty-handed.
    pub fn failed_sections(&self) -> usize {
        [
            self.progress.is_none(),
            self.marks.is_none(),
            self.homeworks.is_none(),
            self.attendance.is_none(),
            self.week_schedule.is_none(),
            self.leaders.is_none(),
        ]
        .into_iter()
        .filter(|failed| *failed)
        .count()
    }

    /// Home page as plain text, one block per section.
    pub fn home_text(&self) -> String {
        let homework = self.homework_summary();
        let mut out = String::new();

        out.push_str(&format!("Homework to do: {}\n", homework.total));
        out.push_str(&format!("Overdue: {}\n", homework.overdue_label()));
        out.push_str(&format!(
            "Average mark: {}\n",
            average_mark_label(self.progress.as_ref())
        ));

        push_section(
            &mut out,
            "Marks",
            self.marks
                .as_deref()
                .map(|m| mark_lines(m, HOME_MARKS))
                .unwrap_or_default(),
        );
        push_section(
            &mut out,
            "Attendance",
            self.attendance
                .as_ref()
                .map(attendance_lines)
                .unwrap_or_default(),
        );
        push_section(
            &mut out,
            "Schedule",
            self.week_schedule
                .as_deref()
                .map(schedule_lines)
                .unwrap_or_default(),
        );

        out
    }
}

fn push_section(out: &mut String, title: &str, lines: Vec<String>) {
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    if lines.is_empty() {
        out.push_str(&format!("  {}\n", NO_DATA));
    }
    for line in lines {
        out.push_str(&format!("  {}\n", line));
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HomeworkSummary {
    pub total: u64,
    pub overdue: usize,
}

impl HomeworkSummary {
    /// Total comes from the envelope; overdue is counted on the page we got.
    pub fn from_page(page: &Page<Homework>) -> Self {
        Self {
            total: page.meta.total_count,
            overdue: page.data.iter().filter(|hw| hw.is_overdue).count(),
        }
    }

    pub fn overdue_label(&self) -> String {
        format!("{}/{}", self.overdue, self.total)
    }
}

pub fn average_mark_label(progress: Option<&ProgressSummary>) -> String {
    progress
        .map(|p| p.total_average_point.to_string())
        .unwrap_or_else(|| "—".to_string())
}

pub fn mark_lines(marks: &[Mark], limit: usize) -> Vec<String> {
    marks
        .iter()
        .take(limit)
        .filter_map(|m| {
            let value = m.mark?;
            if m.mark_date.is_empty() {
                return None;
            }
            Some(format!("{}: {}", m.mark_date, value))
        })
        .collect()
}

pub fn attendance_lines(attendance: &AttendanceSummary) -> Vec<String> {
    vec![
        format!("{}% visits", attendance.visit_percent),
        format!("{}% absences", attendance.absence_percent),
        format!("{}% late", attendance.late_percent),
    ]
}

/// Lesson titles grouped per date, dates ascending.
pub fn group_schedule(lessons: &[Lesson]) -> BTreeMap<String, Vec<String>> {
    let mut days: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for lesson in lessons {
        let date = lesson
            .date
            .clone()
            .unwrap_or_else(|| "Unknown date".to_string());
        days.entry(date).or_default().push(lesson.title().to_string());
    }
    days
}

pub fn schedule_lines(lessons: &[Lesson]) -> Vec<String> {
    group_schedule(lessons)
        .into_iter()
        .map(|(date, titles)| format!("{}: {}", date, titles.join(", ")))
        .collect()
}

pub fn leader_lines(leaders: &[LeaderEntry]) -> Vec<String> {
    leaders
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let position = entry.position.unwrap_or(i as u32 + 1);
            match entry.amount {
                Some(amount) => format!("{}. {} ({})", position, entry.full_name, amount),
                None => format!("{}. {}", position, entry.full_name),
            }
        })
        .collect()
}

pub fn homework_lines(homeworks: &[Homework]) -> Vec<String> {
    homeworks
        .iter()
        .map(|hw| {
            let subject = hw.name_spec.as_deref().unwrap_or("Homework");
            let theme = hw.theme.as_deref().unwrap_or("untitled");
            let due = hw.completion_time.as_deref().unwrap_or("no deadline");
            let flag = if hw.is_overdue { " [overdue]" } else { "" };
            format!("{}: {} (due {}){}", subject, theme, due, flag)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Credentials, Endpoints};
    use crate::models::PaginationMeta;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn homework(id: u64, overdue: bool) -> Homework {
        Homework {
            id,
            theme: Some(format!("Task {}", id)),
            name_spec: Some("Rust".to_string()),
            completion_time: None,
            overdue_time: None,
            is_overdue: overdue,
        }
    }

    fn lesson(date: Option<&str>, theme: Option<&str>, subject: Option<&str>) -> Lesson {
        Lesson {
            date: date.map(str::to_string),
            lesson_theme: theme.map(str::to_string),
            subject_name: subject.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_overdue_label() {
        let page = Page {
            meta: PaginationMeta {
                current_page: 1,
                total_pages: 1,
                total_count: 12,
            },
            data: vec![
                homework(1, true),
                homework(2, false),
                homework(3, true),
                homework(4, true),
            ],
        };

        let summary = HomeworkSummary::from_page(&page);
        assert_eq!(summary.total, 12);
        assert_eq!(summary.overdue, 3);
        assert_eq!(summary.overdue_label(), "3/12");
        assert_eq!(HomeworkSummary::default().overdue_label(), "0/0");
    }

    #[test]
    fn test_schedule_grouping() {
        let lessons = vec![
            lesson(Some("2024-05-07"), None, Some("Databases")),
            lesson(Some("2024-05-06"), Some("Traits"), Some("Rust")),
            lesson(Some("2024-05-06"), None, None),
            lesson(None, Some("Intro"), None),
        ];

        let lines = schedule_lines(&lessons);
        assert_eq!(
            lines,
            vec![
                "2024-05-06: Traits, Lesson".to_string(),
                "2024-05-07: Databases".to_string(),
                "Unknown date: Intro".to_string(),
            ]
        );
    }

    #[test]
    fn test_mark_lines_skip_missing_values_and_limit() {
        let marks: Vec<Mark> = (1..=12)
            .map(|day| Mark {
                mark_date: format!("2024-05-{:02}", day),
                mark: if day == 2 { None } else { Some(day) },
                spec: None,
                mark_type: None,
            })
            .collect();

        let lines = mark_lines(&marks, HOME_MARKS);
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "2024-05-01: 1");
        assert_eq!(lines[1], "2024-05-03: 3");
    }

    #[test]
    fn test_labels() {
        assert_eq!(average_mark_label(None), "—");
        assert_eq!(
            average_mark_label(Some(&ProgressSummary {
                total_average_point: 10.5
            })),
            "10.5"
        );
        let attendance = AttendanceSummary {
            visit_percent: 90.0,
            absence_percent: 7.5,
            late_percent: 2.5,
        };
        assert_eq!(
            attendance_lines(&attendance),
            vec!["90% visits", "7.5% absences", "2.5% late"]
        );
        let leaders = vec![LeaderEntry {
            id: None,
            full_name: "Ada".to_string(),
            position: None,
            amount: Some(420),
            photo_path: None,
        }];
        assert_eq!(leader_lines(&leaders), vec!["1. Ada (420)"]);
    }

    #[test]
    fn test_failed_dashboard_renders_placeholders() {
        let dashboard = Dashboard::default();
        let text = dashboard.home_text();
        assert_eq!(dashboard.failed_sections(), Dashboard::SECTIONS);
        assert!(text.contains("Overdue: 0/0"));
        assert!(text.contains("Average mark: —"));
        assert_eq!(text.matches(NO_DATA).count(), 3);
    }

    #[tokio::test]
    async fn test_null_meta_field_keeps_overdue_ratio() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/homework/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_meta": {"currentPage": null, "totalPages": 1, "totalCount": 12},
                "data": [
                    {"id": 1, "isOverdue": true},
                    {"id": 2, "isOverdue": true},
                    {"id": 3, "isOverdue": true},
                    {"id": 4}
                ]
            })))
            .mount(&server)
            .await;

        let endpoints = Endpoints::new(server.uri(), format!("{}/auth/login", server.uri()));
        let client =
            crate::api::MyStatClient::with_token(endpoints, crate::api::Token::new("tok"))
                .unwrap();

        let today = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        let dashboard = Dashboard::load(&client, today).await;

        assert!(dashboard.homeworks.is_some());
        assert_eq!(dashboard.homework_summary().overdue_label(), "3/12");
    }

    #[tokio::test]
    async fn test_login_then_homeworks_yields_overdue_ratio() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_string("tok"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/homework/list"))
            .and(query_param("status", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_meta": {"currentPage": 1, "totalPages": 1, "totalCount": 12},
                "data": [
                    {"id": 1, "isOverdue": true},
                    {"id": 2, "isOverdue": true},
                    {"id": 3, "isOverdue": false},
                    {"id": 4, "isOverdue": true},
                    {"id": 5}
                ]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/statistic/marks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let endpoints = Endpoints::new(server.uri(), format!("{}/auth/login", server.uri()));
        let client =
            crate::api::MyStatClient::with_credentials(endpoints, &Credentials::new("a", "b"))
                .await
                .unwrap();
        assert!(client.is_authenticated());

        let today = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        let dashboard = Dashboard::load(&client, today).await;

        assert_eq!(dashboard.homework_summary().overdue_label(), "3/12");
        assert_eq!(dashboard.marks, Some(Vec::new()));
        // Unmocked endpoints answer 404 and degrade to None.
        assert!(dashboard.progress.is_none());
        assert!(dashboard.attendance.is_none());
        assert_eq!(dashboard.failed_sections(), 4);
        assert!(dashboard.home_text().contains("Overdue: 3/12"));
    }
}
