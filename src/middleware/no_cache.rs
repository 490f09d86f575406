use axum::{
    extract::Request,
    http::{HeaderValue, header},
    middleware::Next,
    response::Response,
};
use headers::{CacheControl, HeaderMapExt, Pragma};

/// Forbid browsers and proxies from caching protected pages.
pub async fn no_cache(req: Request, next: Next) -> Response {
    let mut resp = next.run(req).await;
    let headers = resp.headers_mut();
    headers.typed_insert(
        CacheControl::new()
            .with_no_store()
            .with_no_cache()
            .with_must_revalidate()
            .with_private(),
    );
    headers.typed_insert(Pragma::no_cache());
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    resp
}
