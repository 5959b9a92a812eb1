//! Request guards that resolve the acting user from a credential.
//!
//! The credential is either the `session` cookie set at login or an
//! `Authorization: Bearer <token>` header. The guard is the only source of
//! the acting teacher's identity; handlers never trust a client-supplied
//! teacher id.

use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};

use crate::models::{ROLE_TEACHER, User};
use crate::orm::DbConn;
use crate::orm::login::get_session_user;

/// An authenticated user, resolved from a valid, unrevoked, unexpired
/// session token.
pub struct AuthenticatedUser {
    pub user: User,
}

impl AuthenticatedUser {
    /// Returns true if the user has the given role.
    pub fn has_role(&self, role: &str) -> bool {
        self.user.role == role
    }

    /// Returns true if the user may manage courses and sessions.
    pub fn is_teacher(&self) -> bool {
        self.has_role(ROLE_TEACHER)
    }
}

/// The raw session token accompanying a request, before it is resolved
/// to a user. Logout wants the token itself so it can revoke it.
pub struct SessionToken(String);

impl SessionToken {
    pub fn value(&self) -> &str {
        &self.0
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for SessionToken {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match session_token(req) {
            Some(token) => Outcome::Success(SessionToken(token)),
            None => Outcome::Error((Status::Unauthorized, ())),
        }
    }
}

/// Extracts the session token from the request: the `session` cookie if
/// present, otherwise a bearer token from the `Authorization` header.
fn session_token(req: &Request<'_>) -> Option<String> {
    if let Some(cookie) = req.cookies().get("session") {
        return Some(cookie.value().to_string());
    }
    req.headers()
        .get_one("Authorization")
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let Some(token) = session_token(req) else {
            return Outcome::Error((Status::Unauthorized, ()));
        };

        let db = match req.guard::<DbConn>().await {
            Outcome::Success(db) => db,
            _ => return Outcome::Error((Status::InternalServerError, ())),
        };

        match db.run(move |conn| get_session_user(conn, &token)).await {
            Ok(Some(user)) => Outcome::Success(AuthenticatedUser { user }),
            Ok(None) => Outcome::Error((Status::Unauthorized, ())),
            Err(e) => {
                eprintln!("Error resolving session token: {:?}", e);
                Outcome::Error((Status::InternalServerError, ()))
            }
        }
    }
}
