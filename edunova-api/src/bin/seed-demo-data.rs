//! Demo-data generator for local development and manual testing.
//!
//! Installs a demo teacher with a handful of courses, then applies a fixed
//! list of session templates across every course, shifting each course's
//! sessions by one extra day per course index so the demo calendar is not
//! a single pile-up. This tool is deliberately separate from the
//! production API surface; nothing in the server depends on it.

use chrono::{Duration, Local, NaiveTime};
use clap::Parser;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use edunova_api::models::{ROLE_TEACHER, ScheduleSessionInput, SessionType, UserInput};
use edunova_api::orm::course::{get_courses_by_teacher, insert_course};
use edunova_api::orm::login::hash_password;
use edunova_api::orm::schedule::{create_session, list_upcoming_sessions};
use edunova_api::orm::user::{get_user_by_email, insert_user};
use edunova_api::orm::{run_pending_migrations, set_foreign_keys};

#[derive(Parser)]
#[command(name = "seed-demo-data")]
#[command(about = "Seeds a demo teacher, courses and scheduled sessions")]
struct Cli {
    /// SQLite database to seed; falls back to the DATABASE_URL env var
    #[arg(long)]
    database_url: Option<String>,

    /// Email of the demo teacher account to create or reuse
    #[arg(long, default_value = "demo.teacher@edunova.test")]
    teacher_email: String,
}

struct SessionTemplate {
    title: &'static str,
    description: &'static str,
    session_type: SessionType,
    duration_minutes: i32,
    days_offset: i64,
    hour: u32,
}

const SESSION_TEMPLATES: &[SessionTemplate] = &[
    SessionTemplate {
        title: "Course introduction",
        description: "Kick-off lecture covering the syllabus and grading",
        session_type: SessionType::Lecture,
        duration_minutes: 90,
        days_offset: 1,
        hour: 9,
    },
    SessionTemplate {
        title: "Hands-on lab",
        description: "Guided exercises in the lab room",
        session_type: SessionType::Lab,
        duration_minutes: 120,
        days_offset: 3,
        hour: 14,
    },
    SessionTemplate {
        title: "Office hours",
        description: "Drop in with questions about the coursework",
        session_type: SessionType::OfficeHours,
        duration_minutes: 60,
        days_offset: 5,
        hour: 16,
    },
    SessionTemplate {
        title: "Midterm exam",
        description: "Closed-book exam on the first half of the course",
        session_type: SessionType::Exam,
        duration_minutes: 120,
        days_offset: 14,
        hour: 10,
    },
    SessionTemplate {
        title: "Project planning meeting",
        description: "Group project kickoff and team assignments",
        session_type: SessionType::Meeting,
        duration_minutes: 45,
        days_offset: 7,
        hour: 11,
    },
];

const DEMO_COURSES: &[(&str, &str)] = &[
    ("Intro to Programming", "Variables, control flow and functions"),
    ("Web Development", "Building and deploying web applications"),
    ("Data Structures", "Lists, trees, hash tables and when to use them"),
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let database_url = match cli.database_url {
        Some(url) => url,
        None => std::env::var("DATABASE_URL")
            .map_err(|_| "pass --database-url or set DATABASE_URL")?,
    };

    let mut conn = SqliteConnection::establish(&database_url)?;
    set_foreign_keys(&mut conn);
    run_pending_migrations(&mut conn);

    let teacher = match get_user_by_email(&mut conn, &cli.teacher_email)? {
        Some(existing) => {
            println!("Reusing teacher '{}'", existing.email);
            existing
        }
        None => {
            let created = insert_user(
                &mut conn,
                UserInput {
                    name: "Demo Teacher".to_string(),
                    email: cli.teacher_email.clone(),
                    password_hash: hash_password("demo1234"),
                    role: ROLE_TEACHER.to_string(),
                },
            )?;
            println!("Created teacher '{}' (password: demo1234)", created.email);
            created
        }
    };

    let mut courses = get_courses_by_teacher(&mut conn, teacher.id)?;
    for (title, description) in DEMO_COURSES {
        if courses.iter().any(|c| c.title == *title) {
            continue;
        }
        let course =
            insert_course(&mut conn, teacher.id, title.to_string(), description.to_string())?;
        println!("Created course '{}'", course.title);
        courses.push(course);
    }

    let today = Local::now().date_naive();
    let mut created = 0usize;
    for (course_index, course) in courses.iter().enumerate() {
        for template in SESSION_TEMPLATES {
            // Stagger each course by one extra day per course index
            let date = today + Duration::days(template.days_offset + course_index as i64);
            let time = NaiveTime::from_hms_opt(template.hour, 0, 0)
                .expect("template hour is always valid");
            let input = ScheduleSessionInput {
                course_id: course.id,
                title: template.title.to_string(),
                description: Some(template.description.to_string()),
                scheduled_date: date.and_time(time),
                duration_minutes: Some(template.duration_minutes),
                location: None,
                session_type: template.session_type,
            };
            create_session(&mut conn, teacher.id, input)?;
            created += 1;
        }
    }
    println!("Created {} sessions across {} courses", created, courses.len());

    // Show the first few upcoming sessions, the way the dashboard would
    let now = Local::now().naive_local();
    let upcoming = list_upcoming_sessions(&mut conn, teacher.id, now)?;
    println!("Upcoming sessions ({} total, showing up to 10):", upcoming.len());
    for session in upcoming.iter().take(10) {
        println!(
            "  {} [{}] {} ({} min)",
            session.scheduled_date, session.session_type, session.title, session.duration_minutes
        );
    }

    Ok(())
}
