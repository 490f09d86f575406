//! SQL DDL for the recruitment database.

/// SQLite schema with:
/// - `users.username` UNIQUE; `password` holds the bcrypt hash
/// - `companies.user_id` referencing the owning user
/// - date columns as `%Y-%m-%d` text, time columns as `%H:%M` text
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS companies (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    company_name TEXT NOT NULL,
    pre_placement_talk DATE,
    pre_placement_time TEXT,
    assessment_date DATE,
    assessment_time TEXT,
    assessment_website TEXT,
    interview_date DATE,
    interview_time TEXT,
    status TEXT NOT NULL,
    user_id INTEGER,
    FOREIGN KEY(user_id) REFERENCES users(id)
);

CREATE INDEX IF NOT EXISTS idx_companies_user_id ON companies(user_id);
"#;
