//! Test support: in-memory databases, fixture data, and a preconfigured
//! Rocket instance for integration tests.

use diesel::connection::SimpleConnection;
use diesel::sqlite::SqliteConnection;
use rocket::figment::{
    util::map,
    value::{Map, Value},
};
use rocket::{Build, Rocket, fairing::AdHoc};
use rocket_sync_db_pools::diesel;

use super::db::{DbConn, run_pending_migrations, set_foreign_keys};
use crate::account_init_fairing::account_init_fairing;
use crate::models::{ROLE_STUDENT, ROLE_TEACHER, User, UserInput};
use crate::orm::course::{get_courses_by_teacher, insert_course};
use crate::orm::login::hash_password;
use crate::orm::user::{get_user_by_email, insert_user};

/// Configures SQLite with performance-optimized settings for testing.
///
/// Sets the following PRAGMAs:
/// - `synchronous = OFF`: Disables synchronous writes for faster performance
/// - `journal_mode = OFF`: Disables rollback journal
///
/// These settings make SQLite faster but less durable - only use for testing.
fn set_sqlite_test_pragmas(conn: &mut diesel::SqliteConnection) {
    conn.batch_execute(
        r#"
        PRAGMA synchronous = OFF;
        PRAGMA journal_mode = OFF;
        "#,
    )
    .expect("Failed to set SQLite PRAGMAs");
}

/// Creates a Rocket fairing that sets SQLite testing pragmas.
fn set_sqlite_test_pragmas_fairing() -> AdHoc {
    AdHoc::on_ignite("Set SQLite Test Pragmas", |rocket| async {
        let conn = DbConn::get_one(&rocket)
            .await
            .expect("database connection for migration");
        conn.run(|c| {
            set_sqlite_test_pragmas(c);
        })
        .await;
        rocket
    })
}

/// Creates a Rocket fairing that initializes standard test data.
///
/// This fairing creates a consistent set of teachers, a student, and
/// courses that all tests can rely on.
fn test_data_init_fairing() -> AdHoc {
    AdHoc::on_ignite("Test Data Initialization", |rocket| async {
        let conn = DbConn::get_one(&rocket)
            .await
            .expect("database connection for test data initialization");

        conn.run(|c| {
            if let Err(e) = create_test_data(c) {
                eprintln!("[test-data-init] ERROR: Failed to create test data: {:?}", e);
            } else {
                eprintln!("[test-data-init] Test data initialization completed");
            }
        })
        .await;

        rocket
    })
}

/// Creates standard test data for all tests to use.
///
/// Teachers `alice@edunova.test` and `bob@edunova.test`, student
/// `carol@edunova.test` (all with password "admin"), plus two courses for
/// Alice and one for Bob.
fn create_test_data(conn: &mut SqliteConnection) -> Result<(), diesel::result::Error> {
    let alice = find_or_create_user(conn, "Alice Nguyen", "alice@edunova.test", ROLE_TEACHER)?;
    let bob = find_or_create_user(conn, "Bob Ortiz", "bob@edunova.test", ROLE_TEACHER)?;
    find_or_create_user(conn, "Carol Smith", "carol@edunova.test", ROLE_STUDENT)?;

    ensure_course_exists(conn, alice.id, "Intro to Rust")?;
    ensure_course_exists(conn, alice.id, "Databases")?;
    ensure_course_exists(conn, bob.id, "Linear Algebra")?;

    Ok(())
}

/// Finds or creates a user account with the given email and role.
/// All fixture accounts use the password "admin".
fn find_or_create_user(
    conn: &mut SqliteConnection,
    name: &str,
    email: &str,
    role: &str,
) -> Result<User, diesel::result::Error> {
    if let Some(existing) = get_user_by_email(conn, email)? {
        eprintln!("[test-data-init] Found existing user: '{}'", email);
        return Ok(existing);
    }

    eprintln!("[test-data-init] Creating user: '{}'", email);
    insert_user(
        conn,
        UserInput {
            name: name.to_string(),
            email: email.to_string(),
            password_hash: hash_password("admin"),
            role: role.to_string(),
        },
    )
}

/// Ensures the teacher owns a course with the given title.
fn ensure_course_exists(
    conn: &mut SqliteConnection,
    teacher_id: i32,
    title: &str,
) -> Result<(), diesel::result::Error> {
    let existing = get_courses_by_teacher(conn, teacher_id)?;
    if existing.iter().any(|c| c.title == title) {
        return Ok(());
    }
    eprintln!("[test-data-init] Creating course: '{}'", title);
    insert_course(conn, teacher_id, title.to_string(), String::new())?;
    Ok(())
}

/// Creates and configures a Rocket instance for testing with an in-memory
/// SQLite database.
///
/// The returned Rocket instance will have:
/// - An in-memory SQLite database configured
/// - Database connection pool attached
/// - Foreign keys enabled
/// - Testing pragmas set
/// - All migrations run
/// - Account bootstrap completed
/// - Fixture data installed
/// - All API routes mounted
pub fn test_rocket() -> Rocket<Build> {
    use uuid::Uuid;

    // Generate a unique database name for this test instance
    let unique_db_name = format!("file:test_db_{}?mode=memory&cache=shared", Uuid::new_v4());

    // Configure the in-memory SQLite database
    let db_config: Map<_, Value> = map! {
        "url" => unique_db_name.into(),  // Unique shared in-memory DB per test
        "pool_size" => 5.into(),
        "timeout" => 5.into(),
    };

    let databases = map!["edunova_db" => db_config];

    // Merge DB config into Rocket's figment
    let figment = rocket::Config::figment().merge(("databases", databases));

    // Build the Rocket instance with the DB fairing attached
    let rocket = rocket::custom(figment)
        .attach(DbConn::fairing())
        .attach(super::db::set_foreign_keys_fairing())
        .attach(set_sqlite_test_pragmas_fairing())
        .attach(super::db::run_migrations_fairing())
        .attach(account_init_fairing())
        .attach(test_data_init_fairing());

    crate::mount_api_routes(rocket)
}

/// Creates a synchronous in-memory SQLite database connection for unit tests.
///
/// This function returns a `diesel::SqliteConnection` connected to an
/// in-memory SQLite database, runs all embedded Diesel migrations, and
/// enables foreign key support. This is ideal for direct Diesel queries
/// in synchronous test code.
///
/// Each call to this function returns a new, independent in-memory database.
pub fn setup_test_db() -> SqliteConnection {
    use diesel::Connection;

    let mut conn = SqliteConnection::establish(":memory:")
        .expect("Failed to create in-memory SQLite database");
    set_foreign_keys(&mut conn);
    run_pending_migrations(&mut conn);
    conn
}

/// A minimal async-compatible wrapper for a synchronous SQLite connection
/// for unit testing.
///
/// This helper struct and function allow you to use your test database with
/// code that expects a Rocket-style async `.run()` interface (such as
/// functions that take a `DbConn` through the `DbRunner` trait).
pub struct FakeDbConn<'a>(pub &'a mut diesel::SqliteConnection);

impl<'a> FakeDbConn<'a> {
    /// Executes a closure with a mutable reference to the underlying SQLite
    /// connection.
    ///
    /// This method mimics the async `.run()` interface used by Rocket's
    /// database connections, but operates synchronously for testing purposes.
    ///
    /// # Safety
    /// This uses unsafe code to convert an immutable reference to mutable,
    /// which is safe in this controlled test environment where we know we
    /// have exclusive access.
    pub async fn run<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut diesel::SqliteConnection) -> R + Send + 'static,
        R: Send + 'static,
    {
        // Safety: We need to get a mutable reference from an immutable reference
        // This is safe because we're in a test environment and we control the lifetime
        unsafe {
            let conn_ptr =
                self.0 as *const diesel::SqliteConnection as *mut diesel::SqliteConnection;
            f(&mut *conn_ptr)
        }
    }
}

/// Creates a `FakeDbConn` for async-style testing with the given SQLite
/// connection.
pub fn setup_test_dbconn<'a>(conn: &'a mut diesel::SqliteConnection) -> FakeDbConn<'a> {
    FakeDbConn(conn)
}
