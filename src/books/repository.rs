pub mod ddb_book_repository;
pub mod memory_book_repository;

use async_trait::async_trait;
use crate::books::domain::model::BookEntity;
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;

// BookRepository implementations reject a create whose isbn is already stored with
// LibraryError::DuplicateKey, atomically with the insert.
#[async_trait]
pub trait BookRepository: Repository<BookEntity> {
    async fn exists_by_isbn(&self, isbn: &str) -> LibraryResult<bool>;
}
