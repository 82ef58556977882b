//! API client for the bookshop service.
//!
//! # Overview
//! Each bookshop operation issues exactly one REST call and returns the
//! response body as raw JSON, or a fallback value when the call fails.
//!
//! # Design
//! - `BookshopClient` is stateless. It only builds `HttpRequest` values and
//!   parses `HttpResponse` values (host-does-IO pattern).
//! - `Transport` performs the round-trip; `UreqTransport` is the default.
//! - `Bookshop` is the async surface. Failures are logged and converted to
//!   an empty list or `None`, except in `search_by_isbn`, which returns them.
//! - Bodies are passed through untouched, so callers cannot tell an empty
//!   result from a failed request unless they use `Bookshop::send`.

pub mod bookshop;
pub mod client;
pub mod error;
pub mod fallback;
pub mod http;
pub mod transport;
pub mod types;

pub use bookshop::Bookshop;
pub use client::{BookField, BookshopClient, DEFAULT_BASE_URL};
pub use error::RequestError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{Books, Credentials, Review, ReviewDraft};
