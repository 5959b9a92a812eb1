use diesel::{Associations, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::schema::courses;

#[derive(
    Queryable, Selectable, Identifiable, Associations, Debug, Clone, Serialize, Deserialize, TS,
)]
#[diesel(belongs_to(crate::models::user::User, foreign_key = teacher_id))]
#[diesel(table_name = courses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct Course {
    pub id: i32,
    pub teacher_id: i32, // Foreign key to User
    pub title: String,
    pub description: String,
}

#[derive(Insertable)]
#[diesel(table_name = courses)]
pub struct NewCourse {
    pub teacher_id: i32,
    pub title: String,
    pub description: String,
}
