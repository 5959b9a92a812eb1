//! Bootstrap fairing that guarantees at least one teacher account exists.
//!
//! On ignition, if the users table is empty, a default teacher is created
//! from `EDUNOVA_DEFAULT_EMAIL` / `EDUNOVA_DEFAULT_PASSWORD` (falling back
//! to dev defaults). Without this a fresh deployment has no way to log in
//! and create courses.

use rocket::fairing::AdHoc;

use crate::models::{ROLE_TEACHER, UserInput};
use crate::orm::DbConn;
use crate::orm::login::hash_password;
use crate::orm::user::{count_users, insert_user};

const DEFAULT_EMAIL: &str = "teacher@edunova.test";
const DEFAULT_PASSWORD: &str = "admin";

pub fn account_init_fairing() -> AdHoc {
    AdHoc::on_ignite("Account Init", |rocket| async {
        let conn = DbConn::get_one(&rocket)
            .await
            .expect("database connection for account initialization");

        conn.run(|c| {
            let existing = match count_users(c) {
                Ok(n) => n,
                Err(e) => {
                    eprintln!("[account-init] ERROR: failed to count users: {:?}", e);
                    return;
                }
            };
            if existing > 0 {
                return;
            }

            let email = std::env::var("EDUNOVA_DEFAULT_EMAIL")
                .unwrap_or_else(|_| DEFAULT_EMAIL.to_string());
            let password = std::env::var("EDUNOVA_DEFAULT_PASSWORD")
                .unwrap_or_else(|_| DEFAULT_PASSWORD.to_string());

            let bootstrap = UserInput {
                name: "Default Teacher".to_string(),
                email: email.clone(),
                password_hash: hash_password(&password),
                role: ROLE_TEACHER.to_string(),
            };
            match insert_user(c, bootstrap) {
                Ok(user) => eprintln!("[account-init] Created default teacher '{}'", user.email),
                Err(e) => eprintln!("[account-init] ERROR: failed to create default teacher: {:?}", e),
            }
        })
        .await;

        rocket
    })
}
