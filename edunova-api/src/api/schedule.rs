//! API endpoints for the teacher dashboard schedule.
//!
//! These endpoints are the boundary contract consumed by the dashboard
//! frontend. The acting teacher is always derived from the authenticated
//! credential; request bodies never carry a teacher id.
//!
//! # Authorization Rules
//! - Only accounts with the `teacher` role can manage the schedule
//! - Sessions can only be created against courses owned by the acting teacher
//! - Deleting a session that exists but belongs to someone else reports
//!   404, the same as a nonexistent id, so existence is not leaked

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::logged_json::LoggedJson;
use crate::models::{ScheduleSession, ScheduleSessionInput, SessionType};
use crate::orm::DbConn;
use crate::orm::schedule::{
    ScheduleError, create_session, delete_session, list_all_sessions, list_upcoming_sessions,
};
use crate::session_guards::AuthenticatedUser;

/// Error response structure for schedule API failures.
#[derive(Serialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}

/// Request payload for scheduling a session.
///
/// The timestamp can arrive either as a full `scheduled_date` or as split
/// `date` + `time` fields, which the planning form submits separately.
#[derive(Deserialize, Serialize, TS)]
#[ts(export)]
pub struct CreateScheduleSessionRequest {
    pub course_id: i32,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub scheduled_date: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(rename = "type", default)]
    pub session_type: Option<SessionType>,
}

/// Resolves the session timestamp from the request: a full
/// `scheduled_date` wins, otherwise `date` and `time` are combined.
fn resolve_scheduled_date(req: &CreateScheduleSessionRequest) -> Result<NaiveDateTime, String> {
    if let Some(raw) = req.scheduled_date.as_deref() {
        return parse_timestamp(raw);
    }

    match (req.date.as_deref(), req.time.as_deref()) {
        (Some(date), Some(time)) => {
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map_err(|_| format!("invalid date '{}', expected YYYY-MM-DD", date))?;
            let time = NaiveTime::parse_from_str(time, "%H:%M:%S")
                .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
                .map_err(|_| format!("invalid time '{}', expected HH:MM[:SS]", time))?;
            Ok(NaiveDateTime::new(date, time))
        }
        _ => Err("scheduled_date (or date and time) is required".to_string()),
    }
}

/// Parses a naive timestamp, accepting both `T` and space separators and
/// tolerating missing seconds.
fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, String> {
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(parsed);
        }
    }
    Err(format!("invalid scheduled_date '{}', expected YYYY-MM-DDTHH:MM:SS", raw))
}

fn schedule_error_response(e: ScheduleError) -> status::Custom<Json<ErrorResponse>> {
    match e {
        ScheduleError::Validation(msg) => {
            status::Custom(Status::UnprocessableEntity, Json(ErrorResponse { error: msg }))
        }
        ScheduleError::Authorization => status::Custom(
            Status::Forbidden,
            Json(ErrorResponse {
                error: "Forbidden: course is not owned by the acting teacher".to_string(),
            }),
        ),
        ScheduleError::NotFound => {
            status::Custom(Status::NotFound, Json(ErrorResponse { error: "Session not found".to_string() }))
        }
        ScheduleError::Storage(e) => {
            eprintln!("Storage error in schedule operation: {:?}", e);
            status::Custom(
                Status::InternalServerError,
                Json(ErrorResponse { error: "Internal server error".to_string() }),
            )
        }
    }
}

/// List Schedule endpoint.
///
/// - **URL:** `/courses/dashboard/schedule`
/// - **Method:** `GET`
/// - **Purpose:** Retrieves all of the acting teacher's sessions, any
///   status, most recent first
/// - **Authentication:** Required
/// - **Authorization:** `teacher` role
#[get("/courses/dashboard/schedule")]
pub async fn list_schedule(
    db: DbConn,
    auth_user: AuthenticatedUser,
) -> Result<Json<Vec<ScheduleSession>>, Status> {
    if !auth_user.is_teacher() {
        return Err(Status::Forbidden);
    }

    let teacher_id = auth_user.user.id;
    db.run(move |conn| list_all_sessions(conn, teacher_id))
        .await
        .map(Json)
        .map_err(|e| {
            eprintln!("Error listing schedule: {:?}", e);
            Status::InternalServerError
        })
}

/// List Upcoming Schedule endpoint.
///
/// - **URL:** `/courses/dashboard/schedule/upcoming`
/// - **Method:** `GET`
/// - **Purpose:** Retrieves the acting teacher's future sessions with
///   status `scheduled`, soonest first
/// - **Authentication:** Required
/// - **Authorization:** `teacher` role
///
/// Timestamps are naive local time throughout, so "now" is the server's
/// local clock.
#[get("/courses/dashboard/schedule/upcoming")]
pub async fn list_upcoming_schedule(
    db: DbConn,
    auth_user: AuthenticatedUser,
) -> Result<Json<Vec<ScheduleSession>>, Status> {
    if !auth_user.is_teacher() {
        return Err(Status::Forbidden);
    }

    let teacher_id = auth_user.user.id;
    let now = Local::now().naive_local();
    db.run(move |conn| list_upcoming_sessions(conn, teacher_id, now))
        .await
        .map(Json)
        .map_err(|e| {
            eprintln!("Error listing upcoming schedule: {:?}", e);
            Status::InternalServerError
        })
}

/// Schedule Session endpoint.
///
/// - **URL:** `/courses/dashboard/schedule`
/// - **Method:** `POST`
/// - **Purpose:** Schedules a new session for one of the teacher's courses
/// - **Authentication:** Required
/// - **Authorization:** `teacher` role; the course must be owned by the
///   acting teacher
///
/// # Request Format
///
/// ```json
/// {
///   "course_id": 7,
///   "title": "Intro",
///   "description": "First lecture",
///   "scheduled_date": "2025-03-01T09:00:00",
///   "duration_minutes": 90,
///   "location": "Room 204",
///   "type": "lecture"
/// }
/// ```
///
/// # Response
///
/// **Success (HTTP 201 Created):** the created session, including its
/// generated `id` and status `scheduled`.
#[post("/courses/dashboard/schedule", data = "<new_session>")]
pub async fn create_schedule_session(
    db: DbConn,
    new_session: LoggedJson<CreateScheduleSessionRequest>,
    auth_user: AuthenticatedUser,
) -> Result<status::Created<Json<ScheduleSession>>, status::Custom<Json<ErrorResponse>>> {
    if !auth_user.is_teacher() {
        let err = Json(ErrorResponse {
            error: "Forbidden: only teachers can schedule sessions".to_string(),
        });
        return Err(status::Custom(Status::Forbidden, err));
    }

    let scheduled_date = resolve_scheduled_date(&new_session)
        .map_err(|msg| status::Custom(Status::UnprocessableEntity, Json(ErrorResponse { error: msg })))?;

    let teacher_id = auth_user.user.id;
    let input = ScheduleSessionInput {
        course_id: new_session.course_id,
        title: new_session.title.clone(),
        description: new_session.description.clone(),
        scheduled_date,
        duration_minutes: new_session.duration_minutes,
        location: new_session.location.clone(),
        session_type: new_session.session_type.unwrap_or(SessionType::Lecture),
    };

    db.run(move |conn| {
        create_session(conn, teacher_id, input)
            .map(|session| status::Created::new("/").body(Json(session)))
            .map_err(schedule_error_response)
    })
    .await
}

/// Delete Session endpoint.
///
/// - **URL:** `/courses/dashboard/schedule/<session_id>`
/// - **Method:** `DELETE`
/// - **Purpose:** Deletes one of the acting teacher's sessions
/// - **Authentication:** Required
/// - **Authorization:** `teacher` role; only the owning teacher's rows are
///   ever touched
#[delete("/courses/dashboard/schedule/<session_id>")]
pub async fn delete_schedule_session(
    db: DbConn,
    session_id: i32,
    auth_user: AuthenticatedUser,
) -> Result<Status, Status> {
    if !auth_user.is_teacher() {
        return Err(Status::Forbidden);
    }

    let teacher_id = auth_user.user.id;
    db.run(move |conn| match delete_session(conn, session_id, teacher_id) {
        Ok(rows_affected) => {
            if rows_affected > 0 {
                Ok(Status::NoContent)
            } else {
                Err(Status::NotFound)
            }
        }
        Err(e) => {
            eprintln!("Error deleting session: {:?}", e);
            Err(Status::InternalServerError)
        }
    })
    .await
}

/// Returns a vector of all routes defined in this module.
pub fn routes() -> Vec<Route> {
    routes![
        list_schedule,
        list_upcoming_schedule,
        create_schedule_session,
        delete_schedule_session
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with(
        scheduled_date: Option<&str>,
        date: Option<&str>,
        time: Option<&str>,
    ) -> CreateScheduleSessionRequest {
        CreateScheduleSessionRequest {
            course_id: 1,
            title: "Lecture".to_string(),
            description: None,
            scheduled_date: scheduled_date.map(str::to_string),
            date: date.map(str::to_string),
            time: time.map(str::to_string),
            duration_minutes: None,
            location: None,
            session_type: None,
        }
    }

    #[test]
    fn test_resolve_full_timestamp() {
        let req = request_with(Some("2025-03-01T09:00:00"), None, None);
        let when = resolve_scheduled_date(&req).unwrap();
        assert_eq!(when.to_string(), "2025-03-01 09:00:00");

        // Space separator and missing seconds are tolerated
        let req = request_with(Some("2025-03-01 09:00"), None, None);
        assert_eq!(resolve_scheduled_date(&req).unwrap(), when);
    }

    #[test]
    fn test_resolve_split_date_and_time() {
        let req = request_with(None, Some("2025-03-01"), Some("09:00"));
        let when = resolve_scheduled_date(&req).unwrap();
        assert_eq!(when.to_string(), "2025-03-01 09:00:00");

        let req = request_with(None, Some("2025-03-01"), Some("09:00:30"));
        assert_eq!(resolve_scheduled_date(&req).unwrap().to_string(), "2025-03-01 09:00:30");
    }

    #[test]
    fn test_full_timestamp_wins_over_split_fields() {
        let req = request_with(Some("2025-03-01T09:00:00"), Some("2030-01-01"), Some("12:00"));
        assert_eq!(resolve_scheduled_date(&req).unwrap().to_string(), "2025-03-01 09:00:00");
    }

    #[test]
    fn test_resolve_missing_or_malformed() {
        assert!(resolve_scheduled_date(&request_with(None, None, None)).is_err());
        assert!(resolve_scheduled_date(&request_with(None, Some("2025-03-01"), None)).is_err());
        assert!(resolve_scheduled_date(&request_with(Some("yesterday"), None, None)).is_err());
        assert!(resolve_scheduled_date(&request_with(None, Some("03/01/2025"), Some("09:00"))).is_err());
    }
}
