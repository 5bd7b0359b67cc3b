use axum::{
    extract::Path,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use fileindex_core::LookupColumn;

use super::error::ApiError;

const INDEX_HTML: &str = include_str!("../../assets/index.html");
const TABLE_HTML: &str = include_str!("../../assets/table.html");
const DUPLICATES_HTML: &str = include_str!("../../assets/duplicates.html");
const APP_CSS: &str = include_str!("../../assets/app.css");
const APP_JS: &str = include_str!("../../assets/app.js");

/// Fill the `{{ApiUrl}}` and `{{Title}}` placeholders. Both values are
/// HTML-escaped.
fn render(template: &str, api_url: &str, title: &str) -> Html<String> {
    Html(
        template
            .replace("{{ApiUrl}}", &escape_html(api_url))
            .replace("{{Title}}", &escape_html(title)),
    )
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn all() -> Html<String> {
    render(TABLE_HTML, "/api/everything", "Everything")
}

pub async fn duplicates_sha256() -> Html<String> {
    render(DUPLICATES_HTML, "/api/duplicates/sha256", "Duplicates of SHA256")
}

pub async fn unique_sha256() -> Html<String> {
    render(TABLE_HTML, "/api/unique/sha256", "Unique of SHA256")
}

pub async fn lookup(Path((column, value)): Path<(String, String)>) -> Result<Html<String>, ApiError> {
    let column = LookupColumn::from_name(&column)
        .ok_or_else(|| ApiError::not_found(format!("unknown column {}", column)))?;
    Ok(lookup_page(column, &value))
}

pub async fn lookup_root_path() -> Html<String> {
    lookup_page(LookupColumn::Path, "")
}

fn lookup_page(column: LookupColumn, value: &str) -> Html<String> {
    let api_url = format!("/api/{}/{}", column, urlencoding::encode(value));
    let title = format!("{} = {}", lookup_title(column), value);
    render(TABLE_HTML, &api_url, &title)
}

fn lookup_title(column: LookupColumn) -> &'static str {
    match column {
        LookupColumn::Id => "ID",
        LookupColumn::Modified => "Modified",
        LookupColumn::Name => "Name",
        LookupColumn::Path => "Path",
        LookupColumn::Sha256 => "SHA256",
        LookupColumn::Size => "Size",
        LookupColumn::Volume => "Volume",
    }
}

pub async fn css(Path(file): Path<String>) -> Response {
    asset(&file, "app.css", APP_CSS, "text/css; charset=utf-8")
}

pub async fn js(Path(file): Path<String>) -> Response {
    asset(&file, "app.js", APP_JS, "text/javascript; charset=utf-8")
}

fn asset(requested: &str, name: &str, body: &'static str, content_type: &'static str) -> Response {
    if requested != name {
        return StatusCode::NOT_FOUND.into_response();
    }
    (
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        body,
    )
        .into_response()
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
