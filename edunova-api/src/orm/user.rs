use diesel::prelude::*;

use crate::models::{NewUser, User, UserInput};
use crate::orm::last_insert_rowid;

/// Inserts a new user account.
pub fn insert_user(
    conn: &mut SqliteConnection,
    new_user: UserInput,
) -> Result<User, diesel::result::Error> {
    use crate::schema::users::dsl::*;

    let insertable_user = NewUser {
        name: new_user.name,
        email: new_user.email,
        password_hash: new_user.password_hash,
        role: new_user.role,
    };

    diesel::insert_into(users)
        .values(&insertable_user)
        .execute(conn)?;

    let last_id = last_insert_rowid(conn)?;
    users.filter(id.eq(last_id as i32)).first::<User>(conn)
}

/// Gets a single user by ID.
pub fn get_user(
    conn: &mut SqliteConnection,
    user_id: i32,
) -> Result<Option<User>, diesel::result::Error> {
    use crate::schema::users::dsl::*;
    users.filter(id.eq(user_id)).first::<User>(conn).optional()
}

/// Gets a single user by email (case-insensitive).
pub fn get_user_by_email(
    conn: &mut SqliteConnection,
    user_email: &str,
) -> Result<Option<User>, diesel::result::Error> {
    // Use raw SQL with parameter binding for case-insensitive search
    diesel::sql_query("SELECT * FROM users WHERE LOWER(email) = LOWER(?)")
        .bind::<diesel::sql_types::Text, _>(user_email)
        .get_result::<User>(conn)
        .optional()
}

/// Counts all user accounts. Used by the bootstrap fairing to decide
/// whether a default teacher account is needed.
pub fn count_users(conn: &mut SqliteConnection) -> Result<i64, diesel::result::Error> {
    use crate::schema::users::dsl::*;
    users.count().get_result(conn)
}
