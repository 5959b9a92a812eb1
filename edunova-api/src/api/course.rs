//! API endpoints for course management.
//!
//! Courses are the authorization root for the schedule: a teacher may only
//! schedule sessions against courses they own.
//!
//! # Authorization Rules
//! - Only accounts with the `teacher` role can create or list courses
//! - A teacher only ever sees their own courses

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::logged_json::LoggedJson;
use crate::models::Course;
use crate::orm::DbConn;
use crate::orm::course::{get_courses_by_teacher, insert_course};
use crate::session_guards::AuthenticatedUser;

/// Error response structure for course API failures.
#[derive(Serialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}

/// Request payload for creating a new course
#[derive(Deserialize, Serialize, TS)]
#[ts(export)]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: Option<String>,
}

/// Create Course endpoint.
///
/// - **URL:** `/courses`
/// - **Method:** `POST`
/// - **Purpose:** Creates a new course owned by the acting teacher
/// - **Authentication:** Required
/// - **Authorization:** `teacher` role
///
/// # Request Format
///
/// ```json
/// {
///   "title": "Intro to Rust",
///   "description": "Ownership and borrowing from first principles"
/// }
/// ```
#[post("/courses", data = "<new_course>")]
pub async fn create_course(
    db: DbConn,
    new_course: LoggedJson<CreateCourseRequest>,
    auth_user: AuthenticatedUser,
) -> Result<status::Created<Json<Course>>, status::Custom<Json<ErrorResponse>>> {
    if !auth_user.is_teacher() {
        let err = Json(ErrorResponse {
            error: "Forbidden: only teachers can create courses".to_string(),
        });
        return Err(status::Custom(Status::Forbidden, err));
    }

    if new_course.title.trim().is_empty() {
        let err = Json(ErrorResponse { error: "title must not be empty".to_string() });
        return Err(status::Custom(Status::UnprocessableEntity, err));
    }

    let teacher_id = auth_user.user.id;
    let title = new_course.title.clone();
    let description = new_course.description.clone().unwrap_or_default();

    db.run(move |conn| {
        insert_course(conn, teacher_id, title, description)
            .map(|course| status::Created::new("/").body(Json(course)))
            .map_err(|e| {
                eprintln!("Error creating course: {:?}", e);
                let err = Json(ErrorResponse {
                    error: "Internal server error while creating course".to_string(),
                });
                status::Custom(Status::InternalServerError, err)
            })
    })
    .await
}

/// List Courses endpoint.
///
/// - **URL:** `/courses`
/// - **Method:** `GET`
/// - **Purpose:** Retrieves the acting teacher's courses
/// - **Authentication:** Required
/// - **Authorization:** `teacher` role
#[get("/courses")]
pub async fn list_courses(
    db: DbConn,
    auth_user: AuthenticatedUser,
) -> Result<Json<Vec<Course>>, Status> {
    if !auth_user.is_teacher() {
        return Err(Status::Forbidden);
    }

    let teacher_id = auth_user.user.id;
    db.run(move |conn| get_courses_by_teacher(conn, teacher_id))
        .await
        .map(Json)
        .map_err(|e| {
            eprintln!("Error listing courses: {:?}", e);
            Status::InternalServerError
        })
}

/// Returns a vector of all routes defined in this module.
pub fn routes() -> Vec<Route> {
    routes![create_course, list_courses]
}
