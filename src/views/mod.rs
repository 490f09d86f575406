//! Server-rendered pages. Templates live under `templates/`.

use askama::Template;
use axum::response::Html;

use crate::db::CompanyRecord;
use crate::error::TrackerError;
use crate::types::slot::{format_date, format_time};

pub fn render<T: Template>(page: &T) -> Result<Html<String>, TrackerError> {
    Ok(Html(page.render()?))
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage<'a> {
    pub error: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterPage<'a> {
    pub error: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardPage {
    pub companies: Vec<CompanyRow>,
}

#[derive(Template)]
#[template(path = "add.html")]
pub struct AddPage<'a> {
    pub error: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "edit.html")]
pub struct EditPage<'a> {
    pub id: i64,
    pub form: CompanyFormValues,
    pub error: Option<&'a str>,
}

/// One dashboard table row, pre-formatted.
pub struct CompanyRow {
    pub id: i64,
    pub company_name: String,
    pub talk_date: String,
    pub talk_time: String,
    pub assessment_date: String,
    pub assessment_time: String,
    pub assessment_website: String,
    pub interview_date: String,
    pub interview_time: String,
    pub status: String,
}

impl From<&CompanyRecord> for CompanyRow {
    fn from(r: &CompanyRecord) -> Self {
        Self {
            id: r.id,
            company_name: r.company_name.clone(),
            talk_date: r.pre_talk_date.map(format_date).unwrap_or_default(),
            talk_time: r.pre_talk_time.map(format_time).unwrap_or_default(),
            assessment_date: r.assessment_date.map(format_date).unwrap_or_default(),
            assessment_time: r.assessment_time.map(format_time).unwrap_or_default(),
            assessment_website: r.assessment_website.clone().unwrap_or_default(),
            interview_date: r.interview_date.map(format_date).unwrap_or_default(),
            interview_time: r.interview_time.map(format_time).unwrap_or_default(),
            status: r.status.clone(),
        }
    }
}

impl DashboardPage {
    pub fn new(records: &[CompanyRecord]) -> Self {
        Self {
            companies: records.iter().map(CompanyRow::from).collect(),
        }
    }
}

/// Raw values for the add/edit form inputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyFormValues {
    pub company_name: String,
    pub talk_date: String,
    pub assessment_date: String,
    pub assessment_website: String,
    pub interview_date: String,
    pub status: String,
}

impl From<&CompanyRecord> for CompanyFormValues {
    fn from(r: &CompanyRecord) -> Self {
        Self {
            company_name: r.company_name.clone(),
            talk_date: r.talk_input().unwrap_or_default(),
            assessment_date: r.assessment_input().unwrap_or_default(),
            assessment_website: r.assessment_website.clone().unwrap_or_default(),
            interview_date: r.interview_input().unwrap_or_default(),
            status: r.status.clone(),
        }
    }
}
