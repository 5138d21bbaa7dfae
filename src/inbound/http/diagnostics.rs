use actix_web::dev::ServiceResponse;
use actix_web::http::header::{self, HeaderValue};
use actix_web::middleware::ErrorHandlerResponse;

/// Replaces the body of a failed response with a page describing the error.
///
/// Only mounted in development: it exposes the full error chain.
pub fn developer_exception_page<B>(
    res: ServiceResponse<B>,
) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let details = res
        .response()
        .error()
        .map(|e| format!("{:?}", e))
        .unwrap_or_else(|| "No error details were recorded.".to_string());
    let page = format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Unhandled exception</title></head>\n<body>\n\
         <h1>An unhandled exception occurred while processing the request.</h1>\n\
         <p>{} {}</p>\n<pre>{}</pre>\n</body>\n</html>\n",
        escape_html(res.request().method().as_str()),
        escape_html(res.request().path()),
        escape_html(&details),
    );

    let (req, mut response) = res.into_parts();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    let response = response.set_body(page);
    let res = ServiceResponse::new(req, response)
        .map_into_boxed_body()
        .map_into_right_body();

    Ok(ErrorHandlerResponse::Response(res))
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
