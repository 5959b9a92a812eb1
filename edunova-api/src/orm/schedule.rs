//! Database operations for the course schedule store.
//!
//! Sessions are single rows in `course_schedule`; every operation here is
//! one atomic statement (plus read-only lookups), so there is no partial
//! failure state. Ownership is enforced before any write: a session may
//! only be created against a course owned by the acting teacher, and
//! deletion filters on the requesting teacher so that someone else's
//! session is indistinguishable from a missing one.

use std::fmt;

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::models::{NewScheduleSession, ScheduleSession, ScheduleSessionInput, SessionStatus};
use crate::orm::course::get_course_by_id;
use crate::orm::last_insert_rowid;

/// Failure taxonomy for schedule store operations.
#[derive(Debug)]
pub enum ScheduleError {
    /// A required field is missing, empty, or malformed. Detected before
    /// any write reaches the database.
    Validation(String),
    /// The referenced course exists but is not owned by the acting teacher.
    Authorization,
    /// No session with the given id belongs to the requesting teacher.
    NotFound,
    /// Underlying data-store failure. Reported to callers generically.
    Storage(diesel::result::Error),
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleError::Validation(msg) => write!(f, "validation failed: {}", msg),
            ScheduleError::Authorization => write!(f, "course is not owned by the acting teacher"),
            ScheduleError::NotFound => write!(f, "session not found"),
            ScheduleError::Storage(e) => write!(f, "storage error: {}", e),
        }
    }
}

impl std::error::Error for ScheduleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScheduleError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<diesel::result::Error> for ScheduleError {
    fn from(e: diesel::result::Error) -> Self {
        ScheduleError::Storage(e)
    }
}

/// Gets sessions for a teacher with `scheduled_date >= now` and status
/// `scheduled`, ascending by date. Unbounded; callers cap display.
pub fn list_upcoming_sessions(
    conn: &mut SqliteConnection,
    session_teacher_id: i32,
    now: NaiveDateTime,
) -> Result<Vec<ScheduleSession>, diesel::result::Error> {
    use crate::schema::course_schedule::dsl::*;
    course_schedule
        .filter(teacher_id.eq(session_teacher_id))
        .filter(scheduled_date.ge(now))
        .filter(status.eq(SessionStatus::Scheduled.as_str()))
        .order(scheduled_date.asc())
        .select(ScheduleSession::as_select())
        .load(conn)
}

/// Gets all sessions for a teacher regardless of time or status, most
/// recent first for display purposes.
pub fn list_all_sessions(
    conn: &mut SqliteConnection,
    session_teacher_id: i32,
) -> Result<Vec<ScheduleSession>, diesel::result::Error> {
    use crate::schema::course_schedule::dsl::*;
    course_schedule
        .filter(teacher_id.eq(session_teacher_id))
        .order(scheduled_date.desc())
        .select(ScheduleSession::as_select())
        .load(conn)
}

/// Gets a session by its ID, regardless of owner.
pub fn get_session_by_id(
    conn: &mut SqliteConnection,
    session_id: i32,
) -> Result<Option<ScheduleSession>, diesel::result::Error> {
    use crate::schema::course_schedule::dsl::*;
    course_schedule
        .filter(id.eq(session_id))
        .select(ScheduleSession::as_select())
        .first(conn)
        .optional()
}

/// Creates a new scheduled session for the acting teacher.
///
/// Validation and the course-ownership check both happen before the
/// insert; on any error no row has been written. The returned session
/// carries its generated id and status `scheduled`.
pub fn create_session(
    conn: &mut SqliteConnection,
    acting_teacher_id: i32,
    input: ScheduleSessionInput,
) -> Result<ScheduleSession, ScheduleError> {
    use crate::schema::course_schedule::dsl::*;

    if input.title.trim().is_empty() {
        return Err(ScheduleError::Validation("title must not be empty".to_string()));
    }
    let duration = input.duration_minutes.unwrap_or(60);
    if duration <= 0 {
        return Err(ScheduleError::Validation(
            "duration_minutes must be a positive integer".to_string(),
        ));
    }

    let course = get_course_by_id(conn, input.course_id)?.ok_or_else(|| {
        ScheduleError::Validation(format!("course {} does not exist", input.course_id))
    })?;
    if course.teacher_id != acting_teacher_id {
        return Err(ScheduleError::Authorization);
    }

    let new_session = NewScheduleSession {
        course_id: input.course_id,
        teacher_id: acting_teacher_id,
        title: input.title,
        description: input.description.unwrap_or_default(),
        scheduled_date: input.scheduled_date,
        duration_minutes: duration,
        location: input.location,
        session_type: input.session_type.as_str().to_string(),
        status: SessionStatus::Scheduled.as_str().to_string(),
    };

    diesel::insert_into(course_schedule).values(&new_session).execute(conn)?;

    // Return the inserted session
    let last_id = last_insert_rowid(conn)?;
    course_schedule
        .filter(id.eq(last_id as i32))
        .select(ScheduleSession::as_select())
        .first(conn)
        .map_err(Into::into)
}

/// Deletes a session, but only if it belongs to the requesting teacher.
///
/// The ownership filter is part of the DELETE statement itself, so a
/// session owned by someone else yields the same zero-row result as a
/// session that does not exist.
pub fn delete_session(
    conn: &mut SqliteConnection,
    session_id: i32,
    requesting_teacher_id: i32,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::course_schedule::dsl::*;
    diesel::delete(
        course_schedule.filter(id.eq(session_id)).filter(teacher_id.eq(requesting_teacher_id)),
    )
    .execute(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Local};

    use crate::models::{Course, ROLE_TEACHER, SessionType, User, UserInput};
    use crate::orm::course::insert_course;
    use crate::orm::testing::setup_test_db;
    use crate::orm::user::insert_user;

    fn insert_teacher_with_course(
        conn: &mut SqliteConnection,
        email: &str,
        course_title: &str,
    ) -> (User, Course) {
        let teacher = insert_user(
            conn,
            UserInput {
                name: "Schedule Teacher".to_string(),
                email: email.to_string(),
                password_hash: "hash".to_string(),
                role: ROLE_TEACHER.to_string(),
            },
        )
        .expect("insert teacher");
        let course =
            insert_course(conn, teacher.id, course_title.to_string(), String::new())
                .expect("insert course");
        (teacher, course)
    }

    fn session_input(course_id: i32, title: &str, scheduled_date: NaiveDateTime) -> ScheduleSessionInput {
        ScheduleSessionInput {
            course_id,
            title: title.to_string(),
            description: Some("Bring your laptop".to_string()),
            scheduled_date,
            duration_minutes: Some(90),
            location: Some("Room 204".to_string()),
            session_type: SessionType::Lecture,
        }
    }

    #[test]
    fn test_create_session_round_trip() {
        let mut conn = setup_test_db();
        let (teacher, course) =
            insert_teacher_with_course(&mut conn, "t@edunova.test", "Intro");

        let when = Local::now().naive_local() + Duration::days(3);
        let session = create_session(&mut conn, teacher.id, session_input(course.id, "Intro", when))
            .expect("create should succeed");

        assert!(session.id > 0);
        assert_eq!(session.course_id, course.id);
        assert_eq!(session.teacher_id, teacher.id);
        assert_eq!(session.title, "Intro");
        assert_eq!(session.description, "Bring your laptop");
        assert_eq!(session.scheduled_date, when);
        assert_eq!(session.duration_minutes, 90);
        assert_eq!(session.location.as_deref(), Some("Room 204"));
        assert_eq!(session.session_type, "lecture");
        assert_eq!(session.status, "scheduled");
    }

    #[test]
    fn test_create_session_defaults() {
        let mut conn = setup_test_db();
        let (teacher, course) =
            insert_teacher_with_course(&mut conn, "t@edunova.test", "Intro");

        let when = Local::now().naive_local() + Duration::days(1);
        let input = ScheduleSessionInput {
            course_id: course.id,
            title: "Review".to_string(),
            description: None,
            scheduled_date: when,
            duration_minutes: None,
            location: None,
            session_type: SessionType::OfficeHours,
        };
        let session = create_session(&mut conn, teacher.id, input).expect("create should succeed");

        assert_eq!(session.description, "");
        assert_eq!(session.duration_minutes, 60);
        assert!(session.location.is_none());
        assert_eq!(session.session_type, "office_hours");
    }

    #[test]
    fn test_create_session_empty_title_writes_nothing() {
        let mut conn = setup_test_db();
        let (teacher, course) =
            insert_teacher_with_course(&mut conn, "t@edunova.test", "Intro");

        let when = Local::now().naive_local();
        let result = create_session(&mut conn, teacher.id, session_input(course.id, "   ", when));
        assert!(matches!(result, Err(ScheduleError::Validation(_))));

        let all = list_all_sessions(&mut conn, teacher.id).unwrap();
        assert!(all.is_empty());
    }

    #[test]
    fn test_create_session_nonpositive_duration() {
        let mut conn = setup_test_db();
        let (teacher, course) =
            insert_teacher_with_course(&mut conn, "t@edunova.test", "Intro");

        let mut input =
            session_input(course.id, "Lecture", Local::now().naive_local());
        input.duration_minutes = Some(0);
        let result = create_session(&mut conn, teacher.id, input);
        assert!(matches!(result, Err(ScheduleError::Validation(_))));
    }

    #[test]
    fn test_create_session_unknown_course() {
        let mut conn = setup_test_db();
        let (teacher, _course) =
            insert_teacher_with_course(&mut conn, "t@edunova.test", "Intro");

        let result = create_session(
            &mut conn,
            teacher.id,
            session_input(99999, "Lecture", Local::now().naive_local()),
        );
        assert!(matches!(result, Err(ScheduleError::Validation(_))));
    }

    #[test]
    fn test_create_session_foreign_course_is_forbidden() {
        let mut conn = setup_test_db();
        let (owner, course) =
            insert_teacher_with_course(&mut conn, "owner@edunova.test", "Owned");
        let (intruder, _own_course) =
            insert_teacher_with_course(&mut conn, "intruder@edunova.test", "Other");

        let result = create_session(
            &mut conn,
            intruder.id,
            session_input(course.id, "Hijacked", Local::now().naive_local()),
        );
        assert!(matches!(result, Err(ScheduleError::Authorization)));

        // No write happened for either teacher
        assert!(list_all_sessions(&mut conn, intruder.id).unwrap().is_empty());
        assert!(list_all_sessions(&mut conn, owner.id).unwrap().is_empty());
    }

    #[test]
    fn test_list_upcoming_excludes_past_sessions() {
        let mut conn = setup_test_db();
        let (teacher, course) =
            insert_teacher_with_course(&mut conn, "t@edunova.test", "Intro");

        let now = Local::now().naive_local();
        create_session(
            &mut conn,
            teacher.id,
            session_input(course.id, "Past lecture", now - Duration::days(7)),
        )
        .unwrap();
        create_session(
            &mut conn,
            teacher.id,
            session_input(course.id, "Soon", now + Duration::days(1)),
        )
        .unwrap();
        create_session(
            &mut conn,
            teacher.id,
            session_input(course.id, "Later", now + Duration::days(14)),
        )
        .unwrap();

        let upcoming = list_upcoming_sessions(&mut conn, teacher.id, now).unwrap();
        assert_eq!(upcoming.len(), 2);
        // Ascending by date
        assert_eq!(upcoming[0].title, "Soon");
        assert_eq!(upcoming[1].title, "Later");
        assert!(upcoming.iter().all(|s| s.scheduled_date >= now));

        // list_all sees everything, most recent first
        let all = list_all_sessions(&mut conn, teacher.id).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].title, "Later");
        assert_eq!(all[2].title, "Past lecture");
    }

    #[test]
    fn test_delete_session_then_list_excludes_it() {
        let mut conn = setup_test_db();
        let (teacher, course) =
            insert_teacher_with_course(&mut conn, "t@edunova.test", "Intro");

        let when = Local::now().naive_local() + Duration::days(2);
        let keep = create_session(&mut conn, teacher.id, session_input(course.id, "Keep", when))
            .unwrap();
        let doomed = create_session(&mut conn, teacher.id, session_input(course.id, "Drop", when))
            .unwrap();

        let deleted = delete_session(&mut conn, doomed.id, teacher.id).unwrap();
        assert_eq!(deleted, 1);

        let all = list_all_sessions(&mut conn, teacher.id).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, keep.id);
        assert!(all.iter().all(|s| s.id != doomed.id));
    }

    #[test]
    fn test_delete_foreign_session_removes_nothing() {
        let mut conn = setup_test_db();
        let (owner, course) =
            insert_teacher_with_course(&mut conn, "owner@edunova.test", "Owned");
        let (other, _course) =
            insert_teacher_with_course(&mut conn, "other@edunova.test", "Other");

        let session = create_session(
            &mut conn,
            owner.id,
            session_input(course.id, "Lecture", Local::now().naive_local()),
        )
        .unwrap();

        // Same zero-row outcome as a nonexistent id
        assert_eq!(delete_session(&mut conn, session.id, other.id).unwrap(), 0);
        assert_eq!(delete_session(&mut conn, 99999, other.id).unwrap(), 0);

        let still_there = get_session_by_id(&mut conn, session.id).unwrap();
        assert!(still_there.is_some());
    }
}
