//! Async bookshop operations.
//!
//! # Design
//! `Bookshop` pairs a `BookshopClient` with a `Transport`. Every operation is
//! one `build_* -> execute -> parse_body` round-trip. All operations except
//! `search_by_isbn` swallow failures through `fallback::recover`; that one
//! returns the error, matching the promise-style search it stands in for.
//! `send` is the error-propagating path for callers that need to tell an
//! empty result from a failed request.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::client::{BookField, BookshopClient};
use crate::error::Result;
use crate::fallback::{no_books, recover};
use crate::http::HttpRequest;
use crate::transport::{Transport, UreqTransport};
use crate::types::{Books, Review};

/// Async client for the bookshop API.
#[derive(Debug, Clone)]
pub struct Bookshop<T = UreqTransport> {
    client: BookshopClient,
    transport: T,
}

impl Bookshop<UreqTransport> {
    pub fn new(base_url: &str) -> Self {
        Self::with_transport(base_url, UreqTransport::new())
    }
}

impl Default for Bookshop<UreqTransport> {
    fn default() -> Self {
        Self {
            client: BookshopClient::default(),
            transport: UreqTransport::new(),
        }
    }
}

impl<T: Transport> Bookshop<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            client: BookshopClient::new(base_url),
            transport,
        }
    }

    pub fn client(&self) -> &BookshopClient {
        &self.client
    }

    /// Execute `request` and decode its body, propagating any failure.
    pub async fn send(&self, request: HttpRequest) -> Result<Value> {
        debug!(method = %request.method, url = %request.url, "sending request");
        let response = self.transport.execute(request).await?;
        self.client.parse_body(response)
    }

    async fn send_built(&self, request: Result<HttpRequest>) -> Result<Value> {
        self.send(request?).await
    }

    /// Every book in the shop, or an empty list on failure.
    #[tracing::instrument(skip(self))]
    pub async fn get_book_list(&self) -> Books {
        let result = self.send(self.client.build_list_books()).await;
        recover(result, no_books(), "get_book_list")
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_books_by_isbn(&self, isbn: &str) -> Books {
        let result = self.send(self.client.build_books_by(BookField::Isbn, isbn)).await;
        recover(result, no_books(), "get_books_by_isbn")
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_books_by_author(&self, author: &str) -> Books {
        let result = self.send(self.client.build_books_by(BookField::Author, author)).await;
        recover(result, no_books(), "get_books_by_author")
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_books_by_title(&self, title: &str) -> Books {
        let result = self.send(self.client.build_books_by(BookField::Title, title)).await;
        recover(result, no_books(), "get_books_by_title")
    }

    /// Reviews of one book, or `None` on failure.
    #[tracing::instrument(skip(self))]
    pub async fn get_book_review(&self, book_id: &str) -> Option<Review> {
        let result = self.send(self.client.build_get_review(book_id)).await;
        recover(result.map(Some), None, "get_book_review")
    }

    #[tracing::instrument(skip_all)]
    pub async fn register_new_user<B>(&self, registration: &B) -> Option<Value>
    where
        B: Serialize + Sync + ?Sized,
    {
        let result = self
            .send_built(self.client.build_register_user(registration))
            .await;
        recover(result.map(Some), None, "register_new_user")
    }

    #[tracing::instrument(skip_all)]
    pub async fn login_user<B>(&self, credentials: &B) -> Option<Value>
    where
        B: Serialize + Sync + ?Sized,
    {
        let result = self.send_built(self.client.build_login_user(credentials)).await;
        recover(result.map(Some), None, "login_user")
    }

    #[tracing::instrument(skip(self, review))]
    pub async fn add_modify_book_review<B>(&self, book_id: &str, review: &B) -> Option<Review>
    where
        B: Serialize + Sync + ?Sized,
    {
        let result = self
            .send_built(self.client.build_add_modify_review(book_id, review))
            .await;
        recover(result.map(Some), None, "add_modify_book_review")
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_book_review(&self, book_id: &str, review_id: &str) -> Option<Review> {
        let result = self
            .send(self.client.build_delete_review(book_id, review_id))
            .await;
        recover(result.map(Some), None, "delete_book_review")
    }

    /// The `/books/all` listing, or an empty list on failure.
    #[tracing::instrument(skip(self))]
    pub async fn get_all_books(&self) -> Books {
        let result = self.send(self.client.build_all_books()).await;
        recover(result, no_books(), "get_all_books")
    }

    /// Books with the given ISBN. Unlike the other lookups, a failed request
    /// is returned to the caller.
    #[tracing::instrument(skip(self))]
    pub async fn search_by_isbn(&self, isbn: &str) -> Result<Books> {
        self.send(self.client.build_books_by(BookField::Isbn, isbn))
            .await
            .inspect_err(|err| {
                tracing::error!(operation = "search_by_isbn", error = %err, "request failed");
            })
    }

    #[tracing::instrument(skip(self))]
    pub async fn search_by_author(&self, author: &str) -> Books {
        let result = self.send(self.client.build_books_by(BookField::Author, author)).await;
        recover(result, no_books(), "search_by_author")
    }

    #[tracing::instrument(skip(self))]
    pub async fn search_by_title(&self, title: &str) -> Books {
        let result = self.send(self.client.build_books_by(BookField::Title, title)).await;
        recover(result, no_books(), "search_by_title")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::error::RequestError;
    use crate::http::{HttpMethod, HttpResponse};

    /// Records every request and answers with a fixed reply.
    struct StubTransport {
        reply: Option<(u16, String)>,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl StubTransport {
        fn ok(body: &str) -> Self {
            Self::status(200, body)
        }

        fn status(status: u16, body: &str) -> Self {
            Self {
                reply: Some((status, body.to_string())),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn unreachable() -> Self {
            Self {
                reply: None,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
            self.seen.lock().unwrap().push(request);
            match &self.reply {
                Some((status, body)) => Ok(HttpResponse {
                    status: *status,
                    body: body.clone(),
                }),
                None => Err(RequestError::Transport("connection refused".to_string())),
            }
        }
    }

    fn shop(transport: StubTransport) -> Bookshop<StubTransport> {
        Bookshop::with_transport("http://bookshop.com", transport)
    }

    fn last_request(shop: &Bookshop<StubTransport>) -> HttpRequest {
        shop.transport.seen.lock().unwrap().last().cloned().unwrap()
    }

    const BOOK: &str = r#"{"id":1,"title":"X"}"#;

    #[tokio::test]
    async fn list_operations_fall_back_to_empty_list() {
        let shop = shop(StubTransport::unreachable());
        assert_eq!(shop.get_book_list().await, json!([]));
        assert_eq!(shop.get_books_by_isbn("1").await, json!([]));
        assert_eq!(shop.get_books_by_author("a").await, json!([]));
        assert_eq!(shop.get_books_by_title("t").await, json!([]));
        assert_eq!(shop.get_all_books().await, json!([]));
        assert_eq!(shop.search_by_author("a").await, json!([]));
        assert_eq!(shop.search_by_title("t").await, json!([]));
    }

    #[tokio::test]
    async fn record_operations_fall_back_to_none() {
        let shop = shop(StubTransport::unreachable());
        let body = json!({"username": "a", "password": "b"});
        assert!(shop.get_book_review("123456").await.is_none());
        assert!(shop.register_new_user(&body).await.is_none());
        assert!(shop.login_user(&body).await.is_none());
        assert!(shop
            .add_modify_book_review("123456", &json!({"rating": 4}))
            .await
            .is_none());
        assert!(shop.delete_book_review("123456", "7890").await.is_none());
    }

    #[tokio::test]
    async fn error_status_is_swallowed_like_transport_failure() {
        let shop = shop(StubTransport::status(500, "boom"));
        assert_eq!(shop.get_book_list().await, json!([]));
        assert!(shop.get_book_review("123456").await.is_none());
    }

    #[tokio::test]
    async fn search_by_isbn_surfaces_failure() {
        let shop = shop(StubTransport::unreachable());
        let err = shop.search_by_isbn("978-3-16-148410-0").await.unwrap_err();
        assert!(matches!(err, RequestError::Transport(_)));
    }

    #[tokio::test]
    async fn search_by_isbn_surfaces_error_status() {
        let shop = shop(StubTransport::status(404, ""));
        let err = shop.search_by_isbn("978-3-16-148410-0").await.unwrap_err();
        assert!(matches!(err, RequestError::NotFound));
    }

    #[tokio::test]
    async fn read_operations_pass_body_through() {
        let shop = shop(StubTransport::ok(BOOK));
        let expected = json!({"id": 1, "title": "X"});
        assert_eq!(shop.get_book_list().await, expected);
        assert_eq!(shop.get_books_by_isbn("1").await, expected);
        assert_eq!(shop.get_books_by_author("a").await, expected);
        assert_eq!(shop.get_books_by_title("t").await, expected);
        assert_eq!(shop.get_book_review("1").await, Some(expected.clone()));
        assert_eq!(shop.get_all_books().await, expected);
        assert_eq!(shop.search_by_isbn("1").await.unwrap(), expected);
        assert_eq!(shop.search_by_author("a").await, expected);
        assert_eq!(shop.search_by_title("t").await, expected);
    }

    #[tokio::test]
    async fn get_books_by_isbn_sends_isbn_query() {
        let shop = shop(StubTransport::ok("[]"));
        shop.get_books_by_isbn("978-3-16-148410-0").await;
        let req = last_request(&shop);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path(), "/books");
        assert!(req.query().unwrap().contains("isbn=978-3-16-148410-0"));
    }

    #[tokio::test]
    async fn delete_book_review_targets_review_path() {
        let shop = shop(StubTransport::status(204, ""));
        let deleted = shop.delete_book_review("123456", "7890").await;
        assert_eq!(deleted, Some(Value::Null));
        let req = last_request(&shop);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path(), "/books/123456/review/7890");
    }

    #[tokio::test]
    async fn register_new_user_sends_body_verbatim() {
        let shop = shop(StubTransport::status(201, r#"{"username":"a"}"#));
        let registration = json!({"username": "a", "password": "b"});
        let created = shop.register_new_user(&registration).await;
        assert_eq!(created, Some(json!({"username": "a"})));

        let req = last_request(&shop);
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path(), "/users/register");
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, registration);
    }

    #[tokio::test]
    async fn alternate_listing_targets_books_all() {
        let shop = shop(StubTransport::ok("[]"));
        shop.get_all_books().await;
        assert_eq!(last_request(&shop).url, "http://bookshop.com/books/all");
    }

    #[tokio::test]
    async fn send_propagates_errors() {
        let shop = shop(StubTransport::unreachable());
        let request = shop.client().build_list_books();
        assert!(shop.send(request).await.is_err());
    }

    #[tokio::test]
    async fn malformed_body_falls_back() {
        let shop = shop(StubTransport::ok("<html>not json</html>"));
        assert_eq!(shop.get_book_list().await, json!([]));
        assert!(shop.get_book_review("123456").await.is_none());
    }

    #[tokio::test]
    async fn search_by_isbn_surfaces_malformed_body() {
        let shop = shop(StubTransport::ok("<html>not json</html>"));
        let err = shop.search_by_isbn("978-3-16-148410-0").await.unwrap_err();
        assert!(matches!(err, RequestError::Deserialization(_)));
    }
}
