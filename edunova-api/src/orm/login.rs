//! Database operations for user authentication and session management.
//!
//! This module provides database layer functions for user login, session
//! creation, password verification, and session storage. It abstracts
//! database operations to support both production and testing environments.

use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use diesel::prelude::*;
use rocket::http::{Cookie, CookieJar, SameSite, Status};
use uuid::Uuid;

use crate::DbConn;
use crate::models::{NewSession, Session, User};
use crate::orm::testing::FakeDbConn;
use crate::schema::{sessions, users};

/// Trait for abstracting database operations to support both production and testing.
///
/// This trait allows the same functions to work with both `DbConn` (production)
/// and `FakeDbConn` (testing) by providing a unified interface for database operations.
pub trait DbRunner {
    /// Executes a database operation with a connection.
    fn run<F, R>(&self, f: F) -> impl std::future::Future<Output = R>
    where
        F: FnOnce(&mut diesel::SqliteConnection) -> R + Send + 'static,
        R: Send + 'static;
}

impl DbRunner for DbConn {
    fn run<F, R>(&self, f: F) -> impl std::future::Future<Output = R>
    where
        F: FnOnce(&mut diesel::SqliteConnection) -> R + Send + 'static,
        R: Send + 'static,
    {
        DbConn::run(self, f)
    }
}

impl<'a> DbRunner for FakeDbConn<'a> {
    fn run<F, R>(&self, f: F) -> impl std::future::Future<Output = R>
    where
        F: FnOnce(&mut diesel::SqliteConnection) -> R + Send + 'static,
        R: Send + 'static,
    {
        FakeDbConn::run(self, f)
    }
}

/// Generates a new UUID-based session token.
fn generate_session_token() -> String {
    Uuid::new_v4().to_string()
}

/// Finds a user by their email address.
///
/// # Returns
/// * `Ok(Some(User))` - User found with matching email
/// * `Ok(None)` - No user found with that email
/// * `Err(Status::InternalServerError)` - Database query failed
pub async fn find_user_by_email<D: DbRunner>(db: &D, email: &str) -> Result<Option<User>, Status> {
    let email = email.to_owned();
    db.run(move |conn| {
        users::table
            .filter(users::email.eq(email))
            .first::<User>(conn)
            .optional()
    })
    .await
    .map_err(|_| Status::InternalServerError)
}

/// Verifies a password against a stored Argon2 hash.
///
/// Returns `false` when the password doesn't match or the stored hash is
/// not parseable.
fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Creates a new session and stores it in the database.
///
/// Generates a new session token, creates a session record in the
/// database, and returns the token for use in cookies or bearer headers.
pub async fn create_and_store_session<D: DbRunner>(db: &D, user_id: i32) -> Result<String, Status> {
    let session_token = generate_session_token();
    let now = Utc::now().naive_utc();

    let new_session = NewSession {
        id: session_token.clone(),
        user_id,
        created_at: now,
        expires_at: None,
        revoked: false,
    };

    db.run(move |conn| {
        diesel::insert_into(sessions::table)
            .values(&new_session)
            .execute(conn)
    })
    .await
    .map_err(|_| Status::InternalServerError)?;

    Ok(session_token)
}

/// Resolves a session token to its user, if the session is still valid.
///
/// A session is valid when it exists, has not been revoked, and has not
/// passed its expiry timestamp (sessions without an expiry never expire).
pub fn get_session_user(
    conn: &mut diesel::SqliteConnection,
    token: &str,
) -> Result<Option<User>, diesel::result::Error> {
    let session = sessions::table
        .filter(sessions::id.eq(token))
        .first::<Session>(conn)
        .optional()?;

    let Some(session) = session else {
        return Ok(None);
    };
    if session.revoked {
        return Ok(None);
    }
    if let Some(expires_at) = session.expires_at
        && expires_at <= Utc::now().naive_utc()
    {
        return Ok(None);
    }

    users::table
        .filter(users::id.eq(session.user_id))
        .first::<User>(conn)
        .optional()
}

/// Sets a secure session cookie in the response.
///
/// # Security Features
/// - `http_only(true)` - Prevents JavaScript access to the cookie
/// - `secure(true)` - Requires HTTPS for cookie transmission
/// - `same_site(SameSite::Lax)` - Provides CSRF protection
/// - `path("/")` - Makes cookie available for all paths
fn set_session_cookie(cookies: &CookieJar<'_>, session_token: &str) {
    let secure_flag = !cfg!(test);
    let cookie = Cookie::build(("session", session_token.to_string()))
        .http_only(true)
        .secure(secure_flag)
        .same_site(SameSite::Lax)
        .path("/")
        .build();
    cookies.add(cookie);
}

/// Processes a complete login workflow including validation and session creation.
///
/// Validates input, finds the user, verifies the password, creates a
/// session, and sets the session cookie.
///
/// # Returns
/// * `Ok((Status::Ok, User))` - Login successful, session created and cookie set
/// * `Err(Status::BadRequest)` - Empty email or password provided
/// * `Err(Status::Unauthorized)` - Invalid credentials or user not found
/// * `Err(Status::InternalServerError)` - Database operation failed
///
/// # Security Notes
/// - Returns generic "Unauthorized" for both invalid users and wrong passwords
pub async fn process_login<D: DbRunner>(
    db: &D,
    cookies: &CookieJar<'_>,
    login: &crate::api::login::LoginRequest,
) -> Result<(Status, User), Status> {
    // Check for empty fields
    if login.email.trim().is_empty() || login.password.trim().is_empty() {
        return Err(Status::BadRequest);
    }

    let user = match find_user_by_email(db, &login.email).await? {
        Some(user) => user,
        None => return Err(Status::Unauthorized),
    };

    if !verify_password(&login.password, &user.password_hash) {
        return Err(Status::Unauthorized);
    }

    let session_token = create_and_store_session(db, user.id).await?;
    set_session_cookie(cookies, &session_token);

    Ok((Status::Ok, user))
}

/// Hashes a password using Argon2 with a random salt.
pub fn hash_password(password: &str) -> String {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .expect("Hashing should succeed")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ROLE_TEACHER, UserInput};
    use crate::orm::testing::{setup_test_db, setup_test_dbconn};
    use crate::orm::user::insert_user;

    #[test]
    fn test_verify_password() {
        let password = "correct_password";
        let wrong_password = "wrong_password";
        let hash = hash_password(password);

        // Correct password should verify
        assert!(verify_password(password, &hash));

        // Wrong password should fail
        assert!(!verify_password(wrong_password, &hash));

        // Garbage stored hash should fail, not panic
        assert!(!verify_password(password, "not-an-argon2-hash"));
    }

    /// Inserts a dummy teacher account, returning the inserted user.
    fn insert_dummy_teacher(conn: &mut diesel::SqliteConnection) -> User {
        let hash = hash_password("dummy password");
        let dummy_user = UserInput {
            name: "Dana Dummy".to_string(),
            email: "dana@edunova.test".to_string(),
            password_hash: hash,
            role: ROLE_TEACHER.to_string(),
        };
        insert_user(conn, dummy_user).expect("insert dummy teacher")
    }

    #[tokio::test]
    async fn test_find_user_by_email() {
        // Set up in-memory test database and async-compatible wrapper
        let mut conn = setup_test_db();

        let inserted_user = insert_dummy_teacher(&mut conn);

        let fake_db = setup_test_dbconn(&mut conn);

        let found = find_user_by_email(&fake_db, "dana@edunova.test")
            .await
            .expect("db query should succeed");

        assert!(found.is_some());
        let found_user = found.unwrap();
        assert_eq!(found_user.email, inserted_user.email);
        assert_eq!(found_user.password_hash, inserted_user.password_hash);
        assert_eq!(found_user.role, inserted_user.role);
    }

    #[tokio::test]
    async fn test_create_and_store_session() {
        let mut conn = setup_test_db();

        let inserted_user = insert_dummy_teacher(&mut conn);

        let fake_db = setup_test_dbconn(&mut conn);

        let session_token = create_and_store_session(&fake_db, inserted_user.id)
            .await
            .expect("session creation should succeed");

        let session_token_clone = session_token.clone();

        // Verify the session was stored in the database
        let stored_session = fake_db
            .run(move |conn| {
                sessions::table
                    .filter(sessions::id.eq(&session_token))
                    .first::<Session>(conn)
                    .optional()
            })
            .await
            .expect("db query should succeed");

        assert!(stored_session.is_some());
        let session = stored_session.unwrap();

        assert_eq!(session.id, session_token_clone);
        assert_eq!(session.user_id, inserted_user.id);
        assert!(!session.revoked);
        assert!(session.expires_at.is_none());

        // Verify created_at is recent (within last minute)
        let now = Utc::now().naive_utc();
        assert!(session.created_at <= now);
        assert!(session.created_at > now - chrono::Duration::minutes(1));
    }

    #[tokio::test]
    async fn test_get_session_user() {
        let mut conn = setup_test_db();
        let inserted_user = insert_dummy_teacher(&mut conn);

        let token = {
            let fake_db = setup_test_dbconn(&mut conn);
            create_and_store_session(&fake_db, inserted_user.id)
                .await
                .expect("session creation should succeed")
        };

        let resolved = get_session_user(&mut conn, &token)
            .expect("query should succeed")
            .expect("session should resolve to a user");
        assert_eq!(resolved.id, inserted_user.id);

        // Unknown token resolves to no user
        let unknown = get_session_user(&mut conn, "no-such-token").expect("query should succeed");
        assert!(unknown.is_none());

        // Revoked token stops resolving
        diesel::update(sessions::table.filter(sessions::id.eq(&token)))
            .set(sessions::revoked.eq(true))
            .execute(&mut conn)
            .expect("revoke should succeed");
        let revoked = get_session_user(&mut conn, &token).expect("query should succeed");
        assert!(revoked.is_none());
    }

    #[tokio::test]
    async fn test_expired_session_does_not_resolve() {
        let mut conn = setup_test_db();
        let inserted_user = insert_dummy_teacher(&mut conn);

        let token = {
            let fake_db = setup_test_dbconn(&mut conn);
            create_and_store_session(&fake_db, inserted_user.id)
                .await
                .expect("session creation should succeed")
        };

        let past = Utc::now().naive_utc() - chrono::Duration::hours(1);
        diesel::update(sessions::table.filter(sessions::id.eq(&token)))
            .set(sessions::expires_at.eq(Some(past)))
            .execute(&mut conn)
            .expect("expiry update should succeed");

        let expired = get_session_user(&mut conn, &token).expect("query should succeed");
        assert!(expired.is_none());
    }
}
