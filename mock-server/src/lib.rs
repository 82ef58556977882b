use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub isbn: String,
    pub title: String,
    pub author: String,
}

impl Book {
    pub fn new(id: &str, isbn: &str, title: &str, author: &str) -> Self {
        Self {
            id: id.to_string(),
            isbn: isbn.to_string(),
            title: title.to_string(),
            author: author.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BookFilter {
    pub isbn: Option<String>,
    pub author: Option<String>,
    pub title: Option<String>,
}

impl BookFilter {
    fn matches(&self, book: &Book) -> bool {
        self.isbn.as_ref().map_or(true, |isbn| *isbn == book.isbn)
            && self.author.as_ref().map_or(true, |author| *author == book.author)
            && self.title.as_ref().map_or(true, |title| *title == book.title)
    }
}

#[derive(Deserialize)]
pub struct UserInput {
    pub username: String,
    pub password: String,
}

/// Reviews are opaque JSON objects; the server only owns their `id`.
pub type Review = Map<String, Value>;

#[derive(Debug, Default)]
pub struct Shop {
    pub books: Vec<Book>,
    pub reviews: HashMap<String, Vec<Review>>,
    pub users: HashMap<String, String>,
}

impl Shop {
    /// A small catalogue with a few well-known titles.
    pub fn seeded() -> Self {
        Self {
            books: vec![
                Book::new("123456", "978-3-16-148410-0", "Harry Potter", "J.K. Rowling"),
                Book::new("234567", "978-0-261-10221-7", "The Hobbit", "J.R.R. Tolkien"),
                Book::new("345678", "978-0-452-28423-4", "1984", "George Orwell"),
                Book::new("456789", "978-0-7475-3849-9", "The Chamber of Secrets", "J.K. Rowling"),
            ],
            ..Self::default()
        }
    }

    fn has_book(&self, id: &str) -> bool {
        self.books.iter().any(|book| book.id == id)
    }
}

pub type Db = Arc<RwLock<Shop>>;

pub fn app() -> Router {
    app_with(Shop::seeded())
}

pub fn app_with(shop: Shop) -> Router {
    let db: Db = Arc::new(RwLock::new(shop));
    Router::new()
        .route("/books", get(list_books))
        .route("/books/all", get(all_books))
        .route("/books/{id}", get(get_book))
        .route("/books/{id}/review", get(get_reviews).post(upsert_review))
        .route("/books/{id}/review/{review_id}", delete(delete_review))
        .route("/users/register", post(register_user))
        .route("/users/login", post(login_user))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, Shop::seeded()).await
}

pub async fn serve(listener: TcpListener, shop: Shop) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(shop)).await
}

async fn list_books(State(db): State<Db>, Query(filter): Query<BookFilter>) -> Json<Vec<Book>> {
    let shop = db.read().await;
    Json(shop.books.iter().filter(|book| filter.matches(book)).cloned().collect())
}

async fn all_books(State(db): State<Db>) -> Json<Vec<Book>> {
    Json(db.read().await.books.clone())
}

async fn get_book(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Book>, StatusCode> {
    let shop = db.read().await;
    shop.books
        .iter()
        .find(|book| book.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn get_reviews(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Review>>, StatusCode> {
    let shop = db.read().await;
    if !shop.has_book(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(shop.reviews.get(&id).cloned().unwrap_or_default()))
}

/// Replaces the review whose `id` matches the body, otherwise adds a new one.
async fn upsert_review(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Review>), StatusCode> {
    let Value::Object(mut review) = body else {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    };
    let mut shop = db.write().await;
    if !shop.has_book(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let reviews = shop.reviews.entry(id).or_default();

    let existing = review
        .get("id")
        .and_then(Value::as_str)
        .and_then(|review_id| {
            reviews
                .iter()
                .position(|r| r.get("id").and_then(Value::as_str) == Some(review_id))
        });
    match existing {
        Some(idx) => {
            reviews[idx] = review.clone();
            Ok((StatusCode::OK, Json(review)))
        }
        None => {
            review.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
            reviews.push(review.clone());
            Ok((StatusCode::CREATED, Json(review)))
        }
    }
}

async fn delete_review(
    State(db): State<Db>,
    Path((id, review_id)): Path<(String, String)>,
) -> Result<Json<Review>, StatusCode> {
    let mut shop = db.write().await;
    let reviews = shop.reviews.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    let idx = reviews
        .iter()
        .position(|r| r.get("id").and_then(Value::as_str) == Some(review_id.as_str()))
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(reviews.remove(idx)))
}

async fn register_user(
    State(db): State<Db>,
    Json(input): Json<UserInput>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let mut shop = db.write().await;
    if shop.users.contains_key(&input.username) {
        return Err(StatusCode::CONFLICT);
    }
    shop.users.insert(input.username.clone(), input.password);
    tracing::info!(username = %input.username, "registered user");
    Ok((StatusCode::CREATED, Json(json!({ "username": input.username }))))
}

async fn login_user(
    State(db): State<Db>,
    Json(input): Json<UserInput>,
) -> Result<Json<Value>, StatusCode> {
    let shop = db.read().await;
    match shop.users.get(&input.username) {
        Some(password) if *password == input.password => Ok(Json(json!({
            "username": input.username,
            "message": "login successful",
        }))),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}
