use axum::{
    Form, Router,
    extract::{Multipart, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;

use super::shell::{Page, render_page};
use super::{Tab, is_htmx};
use crate::AppState;
use crate::capture::LabelImage;

/// Multipart field carrying the label photo.
pub const IMAGE_FIELD: &str = "image";

pub fn build_router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/ui/search", post(search))
        .route("/ui/barcode", post(barcode))
        .route("/ui/upload", post(upload))
}

#[derive(Debug, Deserialize)]
struct IndexQuery {
    tab: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchForm {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Deserialize)]
struct BarcodeForm {
    #[serde(default)]
    code: String,
}

/// Full page for non-HTMX requests, result slot only otherwise.
fn respond(headers: &HeaderMap, page: &Page<'_>) -> Response {
    if is_htmx(headers) {
        Html(page.slot()).into_response()
    } else {
        Html(render_page(page)).into_response()
    }
}

/// GET / - Main page with the requested tab.
async fn index(Query(query): Query<IndexQuery>) -> Html<String> {
    Html(render_page(&Page {
        active: Tab::from_query(query.tab.as_deref()),
        ..Page::default()
    }))
}

/// POST /ui/search - Analyse free text through the analysis client.
async fn search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<SearchForm>,
) -> Response {
    let Some(result) = state.client.analyze(&form.q).await else {
        // Blank search: nothing happens.
        if is_htmx(&headers) {
            return StatusCode::NO_CONTENT.into_response();
        }
        return Html(render_page(&Page::default())).into_response();
    };

    respond(
        &headers,
        &Page {
            active: Tab::Search,
            result: Some(&result),
            notice: None,
            scanned: None,
            query: form.q.trim(),
        },
    )
}

/// POST /ui/barcode - Resolve a decoded barcode.
async fn barcode(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<BarcodeForm>,
) -> Response {
    match state.barcode.lookup(&form.code).await {
        Ok(result) => respond(
            &headers,
            &Page {
                active: Tab::Scan,
                result: Some(&result),
                scanned: Some(form.code.trim()),
                ..Page::default()
            },
        ),
        Err(e) => respond(
            &headers,
            &Page {
                active: Tab::Scan,
                notice: Some(&e.to_string()),
                ..Page::default()
            },
        ),
    }
}

/// POST /ui/upload - Read an uploaded label photo.
async fn upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let outcome = match read_image(multipart).await {
        Ok(image) => state
            .label_reader
            .read_label(&image)
            .await
            .map_err(|e| e.to_string()),
        Err(message) => Err(message),
    };

    match outcome {
        Ok(result) => respond(
            &headers,
            &Page {
                active: Tab::Upload,
                result: Some(&result),
                ..Page::default()
            },
        ),
        Err(message) => respond(
            &headers,
            &Page {
                active: Tab::Upload,
                notice: Some(&message),
                ..Page::default()
            },
        ),
    }
}

/// Pull the image field out of the form, as a validated [`LabelImage`].
async fn read_image(mut multipart: Multipart) -> Result<LabelImage, String> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::warn!(error = %e, "Malformed upload");
        "The upload could not be read".to_string()
    })? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(ToString::to_string);
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to read upload body");
            "The upload could not be read".to_string()
        })?;

        return LabelImage::new(file_name, content_type, bytes.to_vec()).map_err(|e| e.to_string());
    }

    Err("Please choose an image to upload".to_string())
}
