use diesel::QueryableByName;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use rocket::fairing::AdHoc;
use rocket_sync_db_pools::{database, diesel};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[database("edunova_db")]
pub struct DbConn(diesel::SqliteConnection);

#[derive(QueryableByName)]
struct LastInsertRowId {
    #[diesel(sql_type = BigInt)]
    last_insert_rowid: i64,
}

/// Returns the rowid of the most recent insert on *this* connection.
///
/// Unlike `order(id.desc()).first`, this cannot observe a concurrent
/// insert made through another pooled connection between the insert and
/// the read-back.
pub fn last_insert_rowid(
    conn: &mut diesel::SqliteConnection,
) -> Result<i64, diesel::result::Error> {
    diesel::sql_query("SELECT last_insert_rowid() as last_insert_rowid")
        .get_result::<LastInsertRowId>(conn)
        .map(|row| row.last_insert_rowid)
}

/// Enables foreign key support for SQLite connections.
///
/// This executes the `PRAGMA foreign_keys = ON` command on the provided
/// connection. Foreign keys are disabled by default in SQLite for backwards
/// compatibility.
///
/// # Arguments
/// * `conn` - A mutable reference to a SQLite database connection
///
/// # Panics
/// Panics if the PRAGMA command fails to execute
pub fn set_foreign_keys(conn: &mut diesel::SqliteConnection) {
    conn.batch_execute("PRAGMA foreign_keys = ON")
        .expect("Failed to enable foreign keys");
}

/// Creates a Rocket fairing that enables foreign key support for SQLite
/// connections.
///
/// This fairing will execute when the Rocket application ignites, ensuring
/// foreign keys are enabled for all database connections in the pool.
pub fn set_foreign_keys_fairing() -> AdHoc {
    AdHoc::on_ignite("Set Foreign Keys", |rocket| async {
        let conn = DbConn::get_one(&rocket).await.expect("database connection for migration");
        conn.run(|c| {
            set_foreign_keys(c);
        })
        .await;
        rocket
    })
}

/// Runs all pending database migrations on the provided connection.
///
/// # Arguments
/// * `conn` - A mutable reference to a SQLite database connection
///
/// # Panics
/// Panics if any migration fails to run
pub fn run_pending_migrations(conn: &mut diesel::SqliteConnection) {
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run pending migrations");
}

/// Creates a Rocket fairing that runs database migrations on ignition.
///
/// This fairing ensures all pending Diesel migrations are run when the
/// Rocket application starts up.
pub fn run_migrations_fairing() -> AdHoc {
    AdHoc::on_ignite("Diesel Migrations", |rocket| async {
        // Get a database connection from Rocket's pool
        let conn = DbConn::get_one(&rocket).await.expect("database connection for migration");
        conn.run(|c| {
            run_pending_migrations(c);
        })
        .await;
        rocket
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::Connection;
    use uuid::Uuid;

    use crate::models::{ROLE_TEACHER, UserInput};
    use crate::orm::user::insert_user;

    fn user_input(email: &str) -> UserInput {
        UserInput {
            name: "Pool Teacher".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: ROLE_TEACHER.to_string(),
        }
    }

    #[test]
    fn test_last_insert_rowid_is_connection_scoped() {
        // Two connections to one shared in-memory database, like two
        // members of the production pool
        let url = format!("file:test_db_{}?mode=memory&cache=shared", Uuid::new_v4());
        let mut conn_a =
            diesel::SqliteConnection::establish(&url).expect("first connection");
        let mut conn_b =
            diesel::SqliteConnection::establish(&url).expect("second connection");
        set_foreign_keys(&mut conn_a);
        run_pending_migrations(&mut conn_a);

        let a = insert_user(&mut conn_a, user_input("a@edunova.test")).expect("insert on a");
        let b = insert_user(&mut conn_b, user_input("b@edunova.test")).expect("insert on b");
        assert!(b.id > a.id);

        // b's newer row does not disturb a's value, so an insert read
        // back through this helper can never return someone else's row
        assert_eq!(last_insert_rowid(&mut conn_a).unwrap(), a.id as i64);
        assert_eq!(last_insert_rowid(&mut conn_b).unwrap(), b.id as i64);
        assert_eq!(a.email, "a@edunova.test");
        assert_eq!(b.email, "b@edunova.test");
    }
}
