//! Database operations for user logout and session revocation.

use diesel::prelude::*;

use crate::{DbConn, schema::sessions::dsl::*};

/// Revokes a session by marking it as revoked in the database.
///
/// The session token becomes invalid after this operation. The row is
/// kept rather than deleted so the session history survives for auditing.
///
/// # Returns
/// * `Ok(usize)` - Number of rows affected (should be 1 if successful)
/// * `Err(diesel::result::Error)` - Database operation failed
pub async fn revoke_session(db: &DbConn, session_id: &str) -> Result<usize, diesel::result::Error> {
    let session_id = session_id.to_string();
    db.run(move |conn| {
        diesel::update(sessions.filter(id.eq(&session_id)))
            .set(revoked.eq(true))
            .execute(conn)
    })
    .await
}
