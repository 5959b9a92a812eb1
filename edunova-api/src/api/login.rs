//! API endpoints for logging in.

use rocket::Route;
use rocket::http::{CookieJar, Status};
use rocket::response::status;
use rocket::serde::json::Json;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::logged_json::LoggedJson;
use crate::orm::DbConn;
use crate::orm::login::process_login;

#[derive(Deserialize, Serialize, TS)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Profile returned on a successful login. The session token itself
/// travels in the `session` cookie.
#[derive(Serialize, TS)]
#[ts(export)]
pub struct LoginResponse {
    pub user_id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
}

#[derive(Serialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}

/// Login endpoint.
///
/// - **URL:** `/auth/login`
/// - **Method:** `POST`
/// - **Purpose:** Verifies credentials and opens a session
/// - **Authentication:** None required
///
/// # Request Format
///
/// ```json
/// {
///   "email": "alice@edunova.test",
///   "password": "admin"
/// }
/// ```
///
/// # Response
///
/// **Success (HTTP 200 OK)** with a `session` cookie set:
/// ```json
/// {
///   "user_id": 1,
///   "name": "Alice Nguyen",
///   "email": "alice@edunova.test",
///   "role": "teacher"
/// }
/// ```
#[post("/auth/login", data = "<login>")]
pub async fn login(
    db: DbConn,
    cookies: &CookieJar<'_>,
    login: LoggedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, status::Custom<Json<ErrorResponse>>> {
    match process_login(&db, cookies, &login).await {
        Ok((_, user)) => Ok(Json(LoginResponse {
            user_id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        })),
        Err(s) if s == Status::BadRequest => Err(status::Custom(
            Status::BadRequest,
            Json(ErrorResponse { error: "Email and password are required".to_string() }),
        )),
        Err(s) if s == Status::Unauthorized => Err(status::Custom(
            Status::Unauthorized,
            Json(ErrorResponse { error: "Invalid credentials".to_string() }),
        )),
        Err(_) => Err(status::Custom(
            Status::InternalServerError,
            Json(ErrorResponse { error: "Internal server error during login".to_string() }),
        )),
    }
}

/// Returns a vector of all routes defined in this module.
pub fn routes() -> Vec<Route> {
    routes![login]
}
