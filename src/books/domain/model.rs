use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::domain::Identifiable;
use crate::utils::date::serializer;

// BookEntity is the persisted catalog entry. The book_id is assigned by the repository
// on creation and the isbn is unique across all books.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookEntity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_id: Option<String>,
    pub title: String,
    pub author: String,
    pub isbn: String,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl BookEntity {
    pub fn new(title: &str, author: &str, isbn: &str) -> Self {
        Self {
            book_id: None,
            title: title.to_string(),
            author: author.to_string(),
            isbn: isbn.to_string(),
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }

    // copy of this book as it is stored for the first time
    pub(crate) fn assign_id(&self) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            book_id: Some(Uuid::new_v4().to_string()),
            title: self.title.to_string(),
            author: self.author.to_string(),
            isbn: self.isbn.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Identifiable for BookEntity {
    fn id(&self) -> String {
        self.book_id.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use crate::books::domain::model::BookEntity;
    use crate::core::domain::Identifiable;

    #[tokio::test]
    async fn test_should_build_books() {
        let book = BookEntity::new("My book", "Jon Doe", "12345");
        assert_eq!("My book", book.title.as_str());
        assert_eq!("Jon Doe", book.author.as_str());
        assert_eq!("12345", book.isbn.as_str());
        assert_eq!(None, book.book_id);
        assert_eq!("", book.id().as_str());
    }

    #[tokio::test]
    async fn test_should_assign_id() {
        let book = BookEntity::new("My book", "Jon Doe", "12345");
        let saved = book.assign_id();
        assert!(saved.book_id.is_some());
        assert_eq!(book.isbn, saved.isbn);
        assert_eq!(book.title, saved.title);
        assert_ne!(saved.book_id, book.assign_id().book_id);
    }

    #[tokio::test]
    async fn test_should_not_serialize_missing_id() {
        let val = serde_json::to_value(BookEntity::new("My book", "Jon Doe", "12345")).expect("should serialize");
        assert!(val.get("book_id").is_none());
        assert_eq!("12345", val["isbn"]);
    }
}
