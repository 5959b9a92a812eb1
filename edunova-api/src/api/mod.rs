pub mod course;
pub mod login;
pub mod logout;
pub mod schedule;
pub mod status;

use rocket::Route;

/// Collects every API route for mounting.
pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(course::routes());
    routes.extend(login::routes());
    routes.extend(logout::routes());
    routes.extend(schedule::routes());
    routes.extend(status::routes());
    routes
}
