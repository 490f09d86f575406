use chrono::{NaiveDate, NaiveTime};
use sqlx::FromRow;

use crate::error::TrackerError;
use crate::types::Slot;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[sqlx(rename = "password")]
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompanyRecord {
    pub id: i64,
    pub user_id: i64,
    pub company_name: String,
    pub pre_talk_date: Option<NaiveDate>,
    pub pre_talk_time: Option<NaiveTime>,
    pub assessment_date: Option<NaiveDate>,
    pub assessment_time: Option<NaiveTime>,
    pub assessment_website: Option<String>,
    pub interview_date: Option<NaiveDate>,
    pub interview_time: Option<NaiveTime>,
    pub status: String,
}

impl CompanyRecord {
    pub fn talk_input(&self) -> Option<String> {
        Slot::join(self.pre_talk_date, self.pre_talk_time)
    }

    pub fn assessment_input(&self) -> Option<String> {
        Slot::join(self.assessment_date, self.assessment_time)
    }

    pub fn interview_input(&self) -> Option<String> {
        Slot::join(self.interview_date, self.interview_time)
    }
}

/// Everything a user may write on a record; `id` and `user_id` are never replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyFields {
    pub company_name: String,
    pub talk: Option<Slot>,
    pub assessment: Option<Slot>,
    pub assessment_website: Option<String>,
    pub interview: Option<Slot>,
    pub status: String,
}

impl CompanyFields {
    pub fn new(
        company_name: &str,
        talk: Option<Slot>,
        assessment: Option<Slot>,
        assessment_website: Option<&str>,
        interview: Option<Slot>,
        status: &str,
    ) -> Result<Self, TrackerError> {
        let company_name = company_name.trim();
        let status = status.trim();
        if company_name.is_empty() || status.is_empty() {
            return Err(TrackerError::Validation(
                "Company name and status are required".to_string(),
            ));
        }
        Ok(Self {
            company_name: company_name.to_string(),
            talk,
            assessment,
            assessment_website: assessment_website
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            interview,
            status: status.to_string(),
        })
    }
}
