//! Route handlers for the analysis form.

use crate::adapters::ui::web::form::collect_submission;
use crate::adapters::ui::web::state::WebState;
use crate::adapters::ui::web::views::{FormState, IndexPage, NoticeView, ReportView};
use crate::domain::{DomainError, ErrorKind};
use askama::Template;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tracing::{error, info, warn};

/// GET / - Empty form.
pub async fn index(State(state): State<WebState>) -> Response {
    let page = IndexPage::new(
        FormState::blank(state.env_key_loaded()),
        state.service.model(),
    );
    render(StatusCode::OK, page)
}

/// POST /analyze - Validate, dispatch once, render the report or an inline error.
///
/// The form is re-rendered with the submitted values either way so a failed
/// attempt can be resubmitted as-is (the file input has to be picked again).
pub async fn analyze(State(state): State<WebState>, multipart: Multipart) -> Response {
    let model = state.service.model().to_string();

    let submission = match collect_submission(multipart, state.max_image_bytes).await {
        Ok(s) => s,
        Err((partial, e)) => {
            warn!(error = %e, "could not read submission");
            let form = FormState::from_submission(&partial, state.env_key_loaded());
            let page = IndexPage::new(form, model).with_notice(NoticeView::from_error(&e));
            return render(StatusCode::UNPROCESSABLE_ENTITY, page);
        }
    };

    let form = FormState::from_submission(&submission, state.env_key_loaded());
    let page = IndexPage::new(form, model);

    match state
        .service
        .submit(submission, state.fallback_key.as_ref())
        .await
    {
        Ok(result) => {
            info!(location = %result.location, text_len = result.raw_text.len(), "analysis rendered");
            render(StatusCode::OK, page.with_report(ReportView::from_result(&result)))
        }
        Err(e) => {
            warn!(error = %e, "analysis not completed");
            render(status_for(&e), page.with_notice(NoticeView::from_error(&e)))
        }
    }
}

/// GET /health - Liveness probe.
pub async fn health() -> &'static str {
    "ok"
}

fn status_for(err: &DomainError) -> StatusCode {
    match err.kind() {
        ErrorKind::Input => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Transport => StatusCode::BAD_GATEWAY,
        // shown as raw text fallback, not a failure of this server
        ErrorKind::MalformedResponse => StatusCode::OK,
    }
}

fn render(status: StatusCode, page: IndexPage) -> Response {
    match page.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            error!(error = %e, "template render failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(format!("Template error: {}", e)),
            )
                .into_response()
        }
    }
}
