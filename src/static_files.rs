//! Static file serving for the embedded client page

use axum::{
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "static"]
struct Assets;

fn serve(path: &str) -> Response {
    match Assets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.as_ref().to_string())],
                content.data.into_owned(),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

/// `GET /`
pub async fn index_handler() -> Response {
    serve("index.html")
}

/// `GET /static/*path`
pub async fn asset_handler(Path(path): Path<String>) -> Response {
    serve(path.trim_start_matches('/'))
}
