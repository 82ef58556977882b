//! Payload types for the bookshop API.
//!
//! # Design
//! The client does not own the server's schema. Books and reviews come back
//! as raw JSON and are handed to the caller untouched. Request bodies are any
//! `Serialize` value; the structs below are conveniences that serialize to
//! exactly the fields the bookshop expects.

use serde::{Deserialize, Serialize};

/// A book listing exactly as the server returned it.
pub type Books = serde_json::Value;

/// Review data exactly as the server returned it.
pub type Review = serde_json::Value;

/// Username and password, used both to register and to log in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Body for adding or modifying a review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewDraft {
    pub rating: u8,
    pub comment: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn credentials_serialize_to_username_and_password_only() {
        let value = serde_json::to_value(Credentials::new("john_doe", "password123")).unwrap();
        assert_eq!(value, json!({"username": "john_doe", "password": "password123"}));
    }

    #[test]
    fn review_draft_serializes_rating_as_number() {
        let draft = ReviewDraft {
            rating: 4,
            comment: "Great book!".to_string(),
        };
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value, json!({"rating": 4, "comment": "Great book!"}));
    }
}
