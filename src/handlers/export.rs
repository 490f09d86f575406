use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Redirect, Response},
};
use tracing::{error, info};

use crate::export::render_pdf;
use crate::middleware::CurrentUser;
use crate::router::TrackerState;

/// GET /download
pub async fn download(
    State(state): State<TrackerState>,
    CurrentUser(user_id): CurrentUser,
) -> Response {
    let records = match state.companies.list_for_export(user_id).await {
        Ok(records) => records,
        Err(e) => {
            error!(error = %e, user_id, "loading companies for export failed");
            return Redirect::to("/dashboard").into_response();
        }
    };

    match render_pdf(&records) {
        Ok(bytes) => {
            info!(user_id, count = records.len(), "exported companies");
            (
                [
                    (header::CONTENT_TYPE, "application/pdf"),
                    (
                        header::CONTENT_DISPOSITION,
                        "attachment; filename=companies.pdf",
                    ),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, user_id, "rendering export failed");
            Redirect::to("/dashboard").into_response()
        }
    }
}
