pub mod service;

use async_trait::async_trait;
use crate::books::domain::model::BookEntity;
use crate::core::library::LibraryResult;

pub const ISBN_ALREADY_EXISTS: &str = "ISBN already exists";

#[async_trait]
pub trait CatalogService: Sync + Send {
    // fails with LibraryError::BusinessRule when the isbn is already catalogued
    async fn add_book(&self, book: &BookEntity) -> LibraryResult<BookEntity>;
    async fn find_book_by_id(&self, id: &str) -> LibraryResult<Option<BookEntity>>;
    // false when there was no book to remove
    async fn remove_book(&self, id: &str) -> LibraryResult<bool>;
}
