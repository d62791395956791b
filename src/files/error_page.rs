use crate::files::resolver::DocumentRoot;
use crate::http::response::{Response, StatusCode};

/// Name of the custom page for `status` inside the served root, if one may exist.
pub fn page_name(status: StatusCode) -> Option<&'static str> {
    match status {
        StatusCode::Forbidden => Some("403.html"),
        StatusCode::NotFound => Some("404.html"),
        _ => None,
    }
}

/// Builds the error response for `status`.
///
/// 403 and 404 use `<root>/403.html` or `<root>/404.html` when readable; any
/// other status, or a missing page, gets the generated body.
pub async fn error_response(root: &DocumentRoot, status: StatusCode) -> Response {
    if let Some(name) = page_name(status) {
        if let Some(body) = root.read_page(name).await {
            return Response::error(status, body);
        }
    }

    Response::fallback(status)
}
