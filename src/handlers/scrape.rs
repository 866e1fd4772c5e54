//! Mode selection form and JSON API.
//!
//! - `GET /` - the form: mode selector, clear-cache checkbox, submit
//! - `POST /` - runs the chosen mode; the archive comes back as an
//!   attachment, other modes as an HTML table, failures as an inline message
//! - `GET /api/:mode` - same runs, rows as JSON
//!
//! Requests are independent: nothing about a previous run is kept besides
//! the response cache.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Form, Path, Query, State};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use http::{header, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use super::status::AppState;
use crate::error::{Error, Result};
use crate::extraction::{DownloadedArchive, ResultSet};
use crate::mode::{run_mode, Mode, Outcome};

/// Submitted form fields
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeForm {
    /// Mode name; absent when nothing was selected
    #[serde(default)]
    pub mode: Option<String>,
    /// Present when the checkbox is ticked
    #[serde(default)]
    pub clear_cache: Option<String>,
}

/// Query parameters of the JSON API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiQuery {
    /// Clear the response cache before running
    #[serde(default)]
    pub clear_cache: bool,
}

/// JSON error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message
    pub error: String,
}

/// `GET /`
pub async fn index_handler() -> Html<String> {
    Html(render_index(None, None))
}

/// `POST /`
#[instrument(skip_all)]
pub async fn submit_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ScrapeForm>,
) -> Response {
    debug!(mode = ?form.mode, clear_cache = form.clear_cache.is_some(), "Form submitted");
    let error_page = |e: Error| Html(render_index(None, Some(&e.to_string()))).into_response();

    if form.clear_cache.is_some() {
        if let Err(e) = state.session().clear_cache().await {
            error!(error = %e, "Failed to clear HTTP cache");
            return error_page(e);
        }
        info!("HTTP cache cleared at user request");
    }

    let mode = match form.mode.as_deref().map(str::trim) {
        None | Some("") => return error_page(Error::generic("No mode selected")),
        Some(name) => match name.parse::<Mode>() {
            Ok(mode) => mode,
            Err(e) => return error_page(e),
        },
    };

    match run(&state, mode).await {
        Ok(Outcome::Table(results)) => Html(render_index(Some(&results), None)).into_response(),
        Ok(Outcome::Archive(archive)) => match attachment(&archive).await {
            Ok(response) => response,
            Err(e) => error_page(e),
        },
        Err(e) => error_page(e),
    }
}

/// `GET /api/:mode`
#[instrument(skip(state))]
pub async fn api_handler(
    State(state): State<Arc<AppState>>,
    Path(mode): Path<String>,
    Query(query): Query<ApiQuery>,
) -> Response {
    let mode = match mode.parse::<Mode>() {
        Ok(mode) => mode,
        Err(e) => return json_error(StatusCode::NOT_FOUND, &e),
    };

    if query.clear_cache {
        if let Err(e) = state.session().clear_cache().await {
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, &e);
        }
        info!("HTTP cache cleared at user request");
    }

    let outcome = match run(&state, mode).await {
        Ok(outcome) => outcome,
        Err(e) => return json_error(status_for(&e), &e),
    };
    match outcome {
        Outcome::Table(results) => Json(results).into_response(),
        Outcome::Archive(archive) => match attachment(&archive).await {
            Ok(response) => response,
            Err(e) => json_error(StatusCode::INTERNAL_SERVER_ERROR, &e),
        },
    }
}

async fn run(state: &AppState, mode: Mode) -> Result<Outcome> {
    let started = Instant::now();
    match run_mode(mode, state.session(), state.config()).await {
        Ok(outcome) => {
            state.record_success(started.elapsed());
            Ok(outcome)
        }
        Err(e) => {
            error!(%mode, error = %e, "Error while running mode");
            state.record_failure();
            Err(e)
        }
    }
}

async fn attachment(archive: &DownloadedArchive) -> Result<Response> {
    let bytes = tokio::fs::read(&archive.path).await?;
    let disposition = format!("attachment; filename=\"{}\"", archive.file_name());
    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::Fetch(_) | Error::Extraction(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn json_error(status: StatusCode, error: &Error) -> Response {
    (
        status,
        Json(ErrorBody {
            error: error.to_string(),
        }),
    )
        .into_response()
}

/// Render the form page, optionally with a result table or an error
pub fn render_index(results: Option<&ResultSet>, error: Option<&str>) -> String {
    let mut options = String::new();
    for mode in Mode::sorted() {
        let name = htmlescape::encode_minimal(mode.as_str());
        options.push_str(&format!("        <option value=\"{name}\">{name}</option>\n"));
    }

    let mut body = String::new();
    if let Some(message) = error {
        body.push_str(&format!(
            "    <p class=\"error\">Error: {}</p>\n",
            htmlescape::encode_minimal(message)
        ));
    }
    if let Some(results) = results {
        body.push_str(&render_table(results));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <title>Python docs scraper</title>
  </head>
  <body>
    <h1>Python docs scraper</h1>
    <form method="post" action="/">
      <label for="mode">Mode</label>
      <select name="mode" id="mode">
{options}      </select>
      <label><input type="checkbox" name="clear_cache" value="1"> Clear cache</label>
      <button type="submit">Run</button>
    </form>
{body}  </body>
</html>
"#
    )
}

fn render_table(results: &ResultSet) -> String {
    let cells = |row: &[String], tag: &str| -> String {
        row.iter()
            .map(|cell| format!("<{tag}>{}</{tag}>", htmlescape::encode_minimal(cell)))
            .collect()
    };

    let mut out = String::from("    <table>\n");
    out.push_str(&format!(
        "      <thead><tr>{}</tr></thead>\n      <tbody>\n",
        cells(results.header(), "th")
    ));
    for row in results.rows() {
        out.push_str(&format!("        <tr>{}</tr>\n", cells(row.as_slice(), "td")));
    }
    out.push_str("      </tbody>\n    </table>\n");
    out
}
