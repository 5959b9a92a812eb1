//! API endpoints for logging out.

use rocket::Route;
use rocket::http::{Cookie, CookieJar, Status};
use rocket::serde::json::{Json, Value, json};

use crate::orm::DbConn;
use crate::orm::logout::revoke_session;
use crate::session_guards::SessionToken;

/// Logout endpoint.
///
/// - **URL:** `/auth/logout`
/// - **Method:** `POST`
/// - **Purpose:** Revokes the current session and clears the cookie
/// - **Authentication:** A session cookie or bearer token
///
/// Revocation keeps the session row for auditing; the token simply stops
/// resolving. Returns 401 when no credential accompanies the request.
#[post("/auth/logout")]
pub async fn logout(
    db: DbConn,
    cookies: &CookieJar<'_>,
    token: SessionToken,
) -> Result<Json<Value>, Status> {
    match revoke_session(&db, token.value()).await {
        Ok(_) => {
            if cookies.get("session").is_some() {
                cookies.remove(Cookie::from("session"));
            }
            Ok(Json(json!({ "message": "Logged out" })))
        }
        Err(e) => {
            eprintln!("Error revoking session: {:?}", e);
            Err(Status::InternalServerError)
        }
    }
}

/// Returns a vector of all routes defined in this module.
pub fn routes() -> Vec<Route> {
    routes![logout]
}
