//! Stateless HTTP request builder and response parser for the bookshop API.
//!
//! # Design
//! `BookshopClient` holds only a `base_url` and carries no mutable state
//! between calls. Each endpoint has a `build_*` method that produces an
//! `HttpRequest`; every response goes through the same `parse_body`, because
//! the bookshop's bodies are passed through to the caller untouched. The
//! network round-trip happens elsewhere (see `transport`).

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::{RequestError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Address of the public bookshop API.
pub const DEFAULT_BASE_URL: &str = "http://bookshop.com";

/// Book field the `/books` listing can be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookField {
    Isbn,
    Author,
    Title,
}

impl BookField {
    /// Name of the query parameter for this field.
    pub fn as_str(self) -> &'static str {
        match self {
            BookField::Isbn => "isbn",
            BookField::Author => "author",
            BookField::Title => "title",
        }
    }
}

impl fmt::Display for BookField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Synchronous, stateless client for the bookshop API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network.
#[derive(Debug, Clone)]
pub struct BookshopClient {
    base_url: String,
}

impl Default for BookshopClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl BookshopClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `GET /books`
    pub fn build_list_books(&self) -> HttpRequest {
        self.get(format!("{}/books", self.base_url))
    }

    /// `GET /books?{field}={value}`
    pub fn build_books_by(&self, field: BookField, value: &str) -> HttpRequest {
        self.get(format!(
            "{}/books?{field}={}",
            self.base_url,
            urlencoding::encode(value)
        ))
    }

    /// `GET /books/all`
    pub fn build_all_books(&self) -> HttpRequest {
        self.get(format!("{}/books/all", self.base_url))
    }

    /// `GET /books/{book_id}/review`
    pub fn build_get_review(&self, book_id: &str) -> HttpRequest {
        self.get(self.review_url(book_id))
    }

    /// `POST /users/register`
    pub fn build_register_user<B>(&self, registration: &B) -> Result<HttpRequest>
    where
        B: Serialize + ?Sized,
    {
        self.post_json(format!("{}/users/register", self.base_url), registration)
    }

    /// `POST /users/login`
    pub fn build_login_user<B>(&self, credentials: &B) -> Result<HttpRequest>
    where
        B: Serialize + ?Sized,
    {
        self.post_json(format!("{}/users/login", self.base_url), credentials)
    }

    /// `POST /books/{book_id}/review`
    pub fn build_add_modify_review<B>(&self, book_id: &str, review: &B) -> Result<HttpRequest>
    where
        B: Serialize + ?Sized,
    {
        self.post_json(self.review_url(book_id), review)
    }

    /// `DELETE /books/{book_id}/review/{review_id}`
    pub fn build_delete_review(&self, book_id: &str, review_id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            url: format!(
                "{}/{}",
                self.review_url(book_id),
                urlencoding::encode(review_id)
            ),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Decode a response body as JSON, failing on any non-2xx status.
    ///
    /// An empty 2xx body (e.g. `204 No Content`) decodes to `null`.
    pub fn parse_body(&self, response: HttpResponse) -> Result<Value> {
        check_status(&response)?;
        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&response.body)
            .map_err(|e| RequestError::Deserialization(e.to_string()))
    }

    fn review_url(&self, book_id: &str) -> String {
        format!(
            "{}/books/{}/review",
            self.base_url,
            urlencoding::encode(book_id)
        )
    }

    fn get(&self, url: String) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    fn post_json<B>(&self, url: String, body: &B) -> Result<HttpRequest>
    where
        B: Serialize + ?Sized,
    {
        let body =
            serde_json::to_string(body).map_err(|e| RequestError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

/// Map non-success status codes to the appropriate `RequestError` variant.
fn check_status(response: &HttpResponse) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(RequestError::NotFound);
    }
    Err(RequestError::Status {
        status: response.status,
        body: response.body.clone(),
    })
}
