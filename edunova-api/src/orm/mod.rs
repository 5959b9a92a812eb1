pub mod course;
mod db;
pub mod login;
pub mod logout;
pub mod schedule;
pub mod testing;
pub mod user;

pub use db::*;
