//! Request handlers.

use super::page::{self, Outcome};
use super::AppState;
use crate::error::{ConvertError, ErrorKind};
use crate::output::{Artifact, ConversionOutput};
use crate::pipeline::preview::build_preview;
use crate::request::ConversionRequest;
use axum::extract::{Form, Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Fields posted by the conversion form.
///
/// No `Debug`: it carries the raw access token.
#[derive(Deserialize)]
pub struct ConvertForm {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub figma_url: String,
}

/// HTTP status for a failed run. The page body is rendered either way.
pub fn status_for(err: &ConvertError) -> StatusCode {
    match err.kind() {
        ErrorKind::Input => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Provider => StatusCode::BAD_GATEWAY,
        ErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
        ErrorKind::Busy => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub async fn index() -> Html<String> {
    Html(page::render_page("", &Outcome::Idle))
}

pub async fn convert(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ConvertForm>,
) -> Response {
    let ConvertForm {
        access_token,
        figma_url,
    } = form;
    let request = ConversionRequest::new(access_token, figma_url);

    match state.converter.convert(&request).await {
        Ok(output) => {
            let output = Arc::new(output);
            state.runs.insert(Arc::clone(&output));
            Html(page::render_page(
                &request.figma_url,
                &Outcome::Succeeded(&output),
            ))
            .into_response()
        }
        Err(err) => {
            if err.is_input_error() {
                debug!("Rejected submission: {}", err);
            }
            (
                status_for(&err),
                Html(page::render_page(&request.figma_url, &Outcome::Failed(&err))),
            )
                .into_response()
        }
    }
}

pub async fn preview(
    State(state): State<Arc<AppState>>,
    Path(run_id): Path<String>,
) -> Response {
    let Some(run) = state.runs.get(&run_id) else {
        return not_found_response("run");
    };
    if run.markup.is_empty() {
        return not_found_response("preview");
    }
    let body = build_preview(&run.markup.content, &run.stylesheet.content);
    (
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (header::CONTENT_SECURITY_POLICY, "sandbox"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        body,
    )
        .into_response()
}

pub async fn download(
    State(state): State<Arc<AppState>>,
    Path((run_id, artifact)): Path<(String, String)>,
) -> Response {
    let Some(run) = state.runs.get(&run_id) else {
        return not_found_response("run");
    };
    let Some((item, content_type)) = select_artifact(&run, &artifact) else {
        return not_found_response("artifact");
    };
    if item.is_empty() {
        return not_found_response("artifact");
    }

    let disposition = format!(
        "attachment; filename=\"{}\"",
        item.file_name.replace(['"', '\\'], "_")
    );
    let disposition = match HeaderValue::try_from(disposition) {
        Ok(v) => v,
        Err(e) => {
            warn!("Cannot build Content-Disposition for {}: {}", item.file_name, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(content_type)),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CACHE_CONTROL, HeaderValue::from_static("no-store")),
        ],
        item.content.clone(),
    )
        .into_response()
}

fn select_artifact<'a>(
    run: &'a ConversionOutput,
    name: &str,
) -> Option<(&'a Artifact, &'static str)> {
    match name {
        "markup" => Some((&run.markup, "text/html; charset=utf-8")),
        "stylesheet" => Some((&run.stylesheet, "text/css; charset=utf-8")),
        _ => None,
    }
}

pub async fn not_found() -> Response {
    not_found_response("page")
}

fn not_found_response(what: &str) -> Response {
    (StatusCode::NOT_FOUND, format!("{what} not found")).into_response()
}
