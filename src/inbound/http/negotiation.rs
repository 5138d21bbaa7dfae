//! Output formatters and the responder that picks one per request.

use crate::inbound::http::errors::AppError;
use actix_web::body::BoxBody;
use actix_web::http::header::{self, Accept, Header};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, Responder, ResponseError};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Xml,
}

impl OutputFormat {
    fn media_types(&self) -> &'static [&'static str] {
        match self {
            OutputFormat::Json => &["application/json", "text/json"],
            OutputFormat::Xml => &["application/xml", "text/xml"],
        }
    }

    fn content_type(&self) -> &'static str {
        self.media_types()[0]
    }

    fn supports(&self, essence: &str) -> bool {
        self.media_types()
            .iter()
            .any(|m| m.eq_ignore_ascii_case(essence))
    }
}

/// Ordered list of output formatters. The first one is the default.
#[derive(Debug, Clone)]
pub struct OutputFormatters(Vec<OutputFormat>);

impl Default for OutputFormatters {
    fn default() -> Self {
        Self(vec![OutputFormat::Json])
    }
}

impl OutputFormatters {
    pub fn with(mut self, format: OutputFormat) -> Self {
        if !self.0.contains(&format) {
            self.0.push(format);
        }
        self
    }

    pub fn formats(&self) -> &[OutputFormat] {
        &self.0
    }

    /// Picks the best formatter for the `Accept` header.
    ///
    /// Wildcards, a missing header and unsupported media types all fall back to
    /// the default formatter.
    pub fn negotiate(&self, req: &HttpRequest) -> OutputFormat {
        let default = self.0.first().copied().unwrap_or(OutputFormat::Json);
        let Ok(accept) = Accept::parse(req) else {
            return default;
        };
        accept
            .ranked()
            .iter()
            .find_map(|mime| {
                self.0
                    .iter()
                    .copied()
                    .find(|format| format.supports(mime.essence_str()))
            })
            .unwrap_or(default)
    }
}

enum Shape<T> {
    One(T),
    Many { item_tag: &'static str, items: Vec<T> },
}

/// A response body rendered in whichever format the client asked for.
pub struct Negotiated<T> {
    status: StatusCode,
    location: Option<String>,
    root: &'static str,
    shape: Shape<T>,
}

impl<T: Serialize> Negotiated<T> {
    pub fn ok(root: &'static str, value: T) -> Self {
        Self {
            status: StatusCode::OK,
            location: None,
            root,
            shape: Shape::One(value),
        }
    }

    /// A collection; XML renders every item under `item_tag` inside `root`.
    pub fn list(root: &'static str, item_tag: &'static str, items: Vec<T>) -> Self {
        Self {
            status: StatusCode::OK,
            location: None,
            root,
            shape: Shape::Many { item_tag, items },
        }
    }

    pub fn created(location: String, root: &'static str, value: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            location: Some(location),
            root,
            shape: Shape::One(value),
        }
    }

    fn render(&self, format: OutputFormat) -> Result<String, anyhow::Error> {
        let body = match (format, &self.shape) {
            (OutputFormat::Json, Shape::One(value)) => serde_json::to_string(value)?,
            (OutputFormat::Json, Shape::Many { items, .. }) => serde_json::to_string(items)?,
            (OutputFormat::Xml, Shape::One(value)) => {
                quick_xml::se::to_string_with_root(self.root, value)?
            }
            (OutputFormat::Xml, Shape::Many { item_tag, items }) => {
                let mut body = format!("<{}>", self.root);
                for item in items {
                    body.push_str(&quick_xml::se::to_string_with_root(item_tag, item)?);
                }
                body.push_str(&format!("</{}>", self.root));
                body
            }
        };
        Ok(body)
    }
}

impl<T: Serialize> Responder for Negotiated<T> {
    type Body = BoxBody;

    fn respond_to(self, req: &HttpRequest) -> HttpResponse<Self::Body> {
        let format = req
            .app_data::<web::Data<OutputFormatters>>()
            .map(|formatters| formatters.negotiate(req))
            .unwrap_or_else(|| OutputFormatters::default().negotiate(req));

        let body = match self.render(format) {
            Ok(body) => body,
            Err(e) => {
                let error = AppError::Unexpected(e.context("Failed to serialize the response"));
                tracing::error!(error = ?error, "Could not render a negotiated response");
                return error.error_response();
            }
        };

        let mut builder = HttpResponse::build(self.status);
        builder.content_type(format.content_type());
        if let Some(location) = self.location {
            builder.insert_header((header::LOCATION, location));
        }
        builder.body(body)
    }
}
