use diesel::{Identifiable, Insertable, Queryable, QueryableByName, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::schema::users;

/// Account roles recognized by the authorization checks.
pub const ROLE_TEACHER: &str = "teacher";
pub const ROLE_STUDENT: &str = "student";

#[derive(
    Queryable, Selectable, Identifiable, QueryableByName, Debug, Clone, Serialize, Deserialize, TS,
)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String, // Will be unique
    pub password_hash: String,
    pub role: String, // "teacher" or "student"
}

#[derive(Insertable, Deserialize)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

// For API inputs and validation
#[derive(Deserialize, Serialize, TS)]
#[ts(export)]
pub struct UserInput {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}
