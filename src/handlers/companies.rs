use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::{error, info};

use crate::db::CompanyFields;
use crate::error::TrackerError;
use crate::handlers::{ErrorQuery, redirect_with_error, user_message};
use crate::middleware::CurrentUser;
use crate::router::TrackerState;
use crate::types::Slot;
use crate::views::{AddPage, CompanyFormValues, DashboardPage, EditPage, render};

/// Body of `POST /add` and `POST /edit/{id}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyForm {
    #[serde(default)]
    pub company_name: String,
    pub talk_date: Option<String>,
    pub assessment_date: Option<String>,
    pub assessment_website: Option<String>,
    pub interview_date: Option<String>,
    #[serde(default)]
    pub status: String,
}

impl CompanyForm {
    /// Parse every timestamp the same way; any of them may be blank.
    pub fn to_fields(&self) -> Result<CompanyFields, TrackerError> {
        CompanyFields::new(
            &self.company_name,
            Slot::parse_input(self.talk_date.as_deref(), "pre placement talk")?,
            Slot::parse_input(self.assessment_date.as_deref(), "assessment")?,
            self.assessment_website.as_deref(),
            Slot::parse_input(self.interview_date.as_deref(), "interview")?,
            &self.status,
        )
    }

    fn values(&self) -> CompanyFormValues {
        CompanyFormValues {
            company_name: self.company_name.clone(),
            talk_date: self.talk_date.clone().unwrap_or_default(),
            assessment_date: self.assessment_date.clone().unwrap_or_default(),
            assessment_website: self.assessment_website.clone().unwrap_or_default(),
            interview_date: self.interview_date.clone().unwrap_or_default(),
            status: self.status.clone(),
        }
    }
}

/// GET /dashboard
pub async fn dashboard(
    State(state): State<TrackerState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Response, TrackerError> {
    match state.companies.list_for_user(user_id).await {
        Ok(records) => Ok(render(&DashboardPage::new(&records))?.into_response()),
        Err(e) => {
            error!(error = %e, user_id, "listing companies failed");
            Ok(Redirect::to("/login").into_response())
        }
    }
}

/// GET /add
pub async fn add_form(
    CurrentUser(_): CurrentUser,
    Query(query): Query<ErrorQuery>,
) -> Result<Response, TrackerError> {
    Ok(render(&AddPage {
        error: query.error.as_deref(),
    })?
    .into_response())
}

/// POST /add
pub async fn add_company(
    State(state): State<TrackerState>,
    CurrentUser(user_id): CurrentUser,
    Form(form): Form<CompanyForm>,
) -> Redirect {
    let fields = match form.to_fields() {
        Ok(fields) => fields,
        Err(e) => return redirect_with_error("/add", &user_message(&e, "Error inserting data")),
    };

    match state.companies.create(user_id, fields).await {
        Ok(record) => {
            info!(user_id, company_id = record.id, "company added");
            Redirect::to("/dashboard")
        }
        Err(e) => {
            error!(error = %e, user_id, "error inserting data");
            redirect_with_error("/add", "Error inserting data")
        }
    }
}

/// GET /edit/{id}
pub async fn edit_form(
    State(state): State<TrackerState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Response, TrackerError> {
    match state.companies.get(id, user_id).await {
        Ok(Some(record)) => Ok(render(&EditPage {
            id,
            form: CompanyFormValues::from(&record),
            error: None,
        })?
        .into_response()),
        Ok(None) => Ok(Redirect::to("/dashboard").into_response()),
        Err(e) => {
            error!(error = %e, user_id, company_id = id, "loading company failed");
            Ok(Redirect::to("/dashboard").into_response())
        }
    }
}

/// POST /edit/{id}
pub async fn edit_company(
    State(state): State<TrackerState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<i64>,
    Form(form): Form<CompanyForm>,
) -> Result<Response, TrackerError> {
    let fields = match form.to_fields() {
        Ok(fields) => fields,
        Err(e) => return edit_with_error(id, &form, &user_message(&e, "Error updating data")),
    };

    match state.companies.update(id, user_id, fields).await {
        Ok(true) => {
            info!(user_id, company_id = id, "company updated");
            Ok(Redirect::to("/dashboard").into_response())
        }
        Ok(false) => Ok(Redirect::to("/dashboard").into_response()),
        Err(e) => {
            error!(error = %e, user_id, company_id = id, "error updating data");
            edit_with_error(id, &form, "Error updating data")
        }
    }
}

/// GET /delete/{id}
pub async fn delete_company(
    State(state): State<TrackerState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<i64>,
) -> Redirect {
    if let Err(e) = state.companies.delete(id, user_id).await {
        error!(error = %e, user_id, company_id = id, "error deleting data");
    }
    Redirect::to("/dashboard")
}

fn edit_with_error(id: i64, form: &CompanyForm, error: &str) -> Result<Response, TrackerError> {
    Ok(render(&EditPage {
        id,
        form: form.values(),
        error: Some(error),
    })?
    .into_response())
}
