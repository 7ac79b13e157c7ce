use serde::{Deserialize, Serialize};
use crate::books::domain::model::BookEntity;
use crate::core::validation::{require_not_blank, Validate};

// BookDto is the wire shape of a book for the catalog API. Every field is optional so
// that missing input surfaces as validation messages instead of a parse failure; the
// id is assigned by the catalog and ignored on input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookDto {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
}

impl BookDto {
    pub fn new(title: &str, author: &str, isbn: &str) -> BookDto {
        BookDto {
            id: None,
            title: Some(title.to_string()),
            author: Some(author.to_string()),
            isbn: Some(isbn.to_string()),
        }
    }

    // builds a new, not yet persisted, entity; the caller validates first
    pub fn to_entity(&self) -> BookEntity {
        BookEntity::new(
            self.title.as_deref().unwrap_or_default(),
            self.author.as_deref().unwrap_or_default(),
            self.isbn.as_deref().unwrap_or_default())
    }
}

impl Validate for BookDto {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = vec![];
        require_not_blank("title", self.title.as_deref(), &mut errors);
        require_not_blank("author", self.author.as_deref(), &mut errors);
        require_not_blank("isbn", self.isbn.as_deref(), &mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl From<&BookEntity> for BookDto {
    fn from(other: &BookEntity) -> Self {
        Self {
            id: other.book_id.clone(),
            title: Some(other.title.to_string()),
            author: Some(other.author.to_string()),
            isbn: Some(other.isbn.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use crate::books::domain::model::BookEntity;
    use crate::books::dto::BookDto;
    use crate::core::validation::Validate;

    #[tokio::test]
    async fn test_should_build_books() {
        let book = BookDto::new("My book", "Jon Doe", "12345");
        assert_eq!(Some("12345"), book.isbn.as_deref());
        assert_eq!(Some("My book"), book.title.as_deref());
        assert!(book.validate().is_ok());
    }

    #[tokio::test]
    async fn test_should_report_every_missing_field() {
        let book: BookDto = serde_json::from_value(json!({})).expect("should parse empty book");
        let errors = book.validate().expect_err("should fail validation");
        assert_eq!(3, errors.len());
    }

    #[tokio::test]
    async fn test_should_report_blank_field() {
        let book: BookDto = serde_json::from_value(json!({"title": "My book", "author": " ", "isbn": "12345"}))
            .expect("should parse book");
        assert_eq!(vec!["author must not be empty".to_string()], book.validate().expect_err("should fail validation"));
    }

    #[tokio::test]
    async fn test_should_ignore_id_when_building_entity() {
        let mut book = BookDto::new("My book", "Jon Doe", "12345");
        book.id = Some("10".to_string());
        let entity = book.to_entity();
        assert_eq!(None, entity.book_id);
        assert_eq!("Jon Doe", entity.author.as_str());
    }

    #[tokio::test]
    async fn test_should_map_entity_to_wire_shape() {
        let entity = BookEntity::new("My book", "Jon Doe", "12345").assign_id();
        let val = serde_json::to_value(BookDto::from(&entity)).expect("should serialize");
        assert_eq!(json!({
            "id": entity.book_id,
            "title": "My book",
            "author": "Jon Doe",
            "isbn": "12345",
        }), val);
    }
}
