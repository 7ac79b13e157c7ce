use async_trait::async_trait;
use tracing::{info, warn};
use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::catalog::domain::{CatalogService, ISBN_ALREADY_EXISTS};
use crate::core::domain::Identifiable;
use crate::core::library::{LibraryError, LibraryResult};

pub(crate) struct CatalogServiceImpl {
    book_repository: Box<dyn BookRepository>,
}

impl CatalogServiceImpl {
    pub(crate) fn new(book_repository: Box<dyn BookRepository>) -> Self {
        Self {
            book_repository,
        }
    }
}

#[async_trait]
impl CatalogService for CatalogServiceImpl {
    async fn add_book(&self, book: &BookEntity) -> LibraryResult<BookEntity> {
        if self.book_repository.exists_by_isbn(book.isbn.as_str()).await? {
            warn!(isbn = book.isbn.as_str(), "rejected book with existing isbn");
            return Err(LibraryError::business_rule(ISBN_ALREADY_EXISTS));
        }
        // a concurrent add of the same isbn can pass the check above, the repository
        // has the final word
        let saved = self.book_repository.create(book).await.map_err(|err| match err {
            LibraryError::DuplicateKey { .. } => {
                warn!(isbn = book.isbn.as_str(), "lost race for isbn");
                LibraryError::business_rule(ISBN_ALREADY_EXISTS)
            }
            other => other,
        })?;
        info!(book_id = saved.id().as_str(), isbn = saved.isbn.as_str(), "added book");
        Ok(saved)
    }

    async fn find_book_by_id(&self, id: &str) -> LibraryResult<Option<BookEntity>> {
        self.book_repository.get(id).await
    }

    async fn remove_book(&self, id: &str) -> LibraryResult<bool> {
        let removed = self.book_repository.delete(id).await?;
        if removed {
            info!(book_id = id, "removed book");
        }
        Ok(removed)
    }
}
