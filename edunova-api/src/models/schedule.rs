use chrono::NaiveDateTime;
use diesel::{Associations, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::schema::course_schedule;

/// The kind of scheduled session. `office_hours` and `meeting` are kept
/// as distinct kinds; the dashboard groups both under "non-class".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SessionType {
    Lecture,
    Lab,
    Exam,
    OfficeHours,
    Meeting,
}

impl SessionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Lecture => "lecture",
            SessionType::Lab => "lab",
            SessionType::Exam => "exam",
            SessionType::OfficeHours => "office_hours",
            SessionType::Meeting => "meeting",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SessionStatus {
    Scheduled,
    Cancelled,
    Completed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Scheduled => "scheduled",
            SessionStatus::Cancelled => "cancelled",
            SessionStatus::Completed => "completed",
        }
    }
}

/// One scheduled teaching session tied to a course and its teacher.
/// `teacher_id` is denormalized from the owning course for fast filtering.
#[derive(
    Queryable, Selectable, Identifiable, Associations, Debug, Clone, Serialize, Deserialize, TS,
)]
#[diesel(belongs_to(crate::models::course::Course))]
#[diesel(table_name = course_schedule)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct ScheduleSession {
    pub id: i32,
    pub course_id: i32,
    pub teacher_id: i32,
    pub title: String,
    pub description: String,
    #[ts(type = "string")]
    pub scheduled_date: NaiveDateTime,
    pub duration_minutes: i32,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub session_type: String,
    pub status: String,
}

#[derive(Insertable)]
#[diesel(table_name = course_schedule)]
pub struct NewScheduleSession {
    pub course_id: i32,
    pub teacher_id: i32,
    pub title: String,
    pub description: String,
    pub scheduled_date: NaiveDateTime,
    pub duration_minutes: i32,
    pub location: Option<String>,
    pub session_type: String,
    pub status: String,
}

/// Validated store-level input for creating a session. The HTTP layer
/// resolves the raw request (including split date/time fields) into this
/// before it reaches the store.
#[derive(Debug, Clone)]
pub struct ScheduleSessionInput {
    pub course_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub scheduled_date: NaiveDateTime,
    pub duration_minutes: Option<i32>,
    pub location: Option<String>,
    pub session_type: SessionType,
}
