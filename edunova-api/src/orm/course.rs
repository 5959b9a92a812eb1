use diesel::prelude::*;

use crate::models::{Course, NewCourse};
use crate::orm::last_insert_rowid;

/// Creates a new course owned by the given teacher.
pub fn insert_course(
    conn: &mut SqliteConnection,
    course_teacher_id: i32,
    course_title: String,
    course_description: String,
) -> Result<Course, diesel::result::Error> {
    use crate::schema::courses::dsl::*;

    let new_course = NewCourse {
        teacher_id: course_teacher_id,
        title: course_title,
        description: course_description,
    };

    diesel::insert_into(courses).values(&new_course).execute(conn)?;

    // Return the inserted course
    let last_id = last_insert_rowid(conn)?;
    courses.filter(id.eq(last_id as i32)).select(Course::as_select()).first(conn)
}

/// Gets a course by its ID.
pub fn get_course_by_id(
    conn: &mut SqliteConnection,
    course_id: i32,
) -> Result<Option<Course>, diesel::result::Error> {
    use crate::schema::courses::dsl::*;
    courses.filter(id.eq(course_id)).select(Course::as_select()).first(conn).optional()
}

/// Gets all courses owned by a specific teacher.
pub fn get_courses_by_teacher(
    conn: &mut SqliteConnection,
    course_teacher_id: i32,
) -> Result<Vec<Course>, diesel::result::Error> {
    use crate::schema::courses::dsl::*;
    courses
        .filter(teacher_id.eq(course_teacher_id))
        .order(id.asc())
        .select(Course::as_select())
        .load(conn)
}
