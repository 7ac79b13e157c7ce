use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use async_trait::async_trait;
use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::core::domain::Identifiable;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::Repository;

#[derive(Debug, Default)]
struct Books {
    by_id: HashMap<String, BookEntity>,
    // isbn -> book_id
    by_isbn: HashMap<String, String>,
}

// MemoryBookRepository keeps books in process. The isbn check and the insert happen
// under one write lock.
#[derive(Debug, Default)]
pub struct MemoryBookRepository {
    books: RwLock<Books>,
}

impl MemoryBookRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> LibraryResult<RwLockReadGuard<'_, Books>> {
        self.books.read().map_err(|_| LibraryError::runtime("books lock poisoned", Some("read".to_string())))
    }

    fn write(&self) -> LibraryResult<RwLockWriteGuard<'_, Books>> {
        self.books.write().map_err(|_| LibraryError::runtime("books lock poisoned", Some("write".to_string())))
    }
}

#[async_trait]
impl Repository<BookEntity> for MemoryBookRepository {
    async fn create(&self, entity: &BookEntity) -> LibraryResult<BookEntity> {
        let mut books = self.write()?;
        if books.by_isbn.contains_key(entity.isbn.as_str()) {
            return Err(LibraryError::duplicate_key(format!("isbn {} already stored", entity.isbn).as_str()));
        }
        let book = entity.assign_id();
        books.by_isbn.insert(book.isbn.to_string(), book.id());
        books.by_id.insert(book.id(), book.clone());
        Ok(book)
    }

    async fn get(&self, id: &str) -> LibraryResult<Option<BookEntity>> {
        Ok(self.read()?.by_id.get(id).cloned())
    }

    async fn delete(&self, id: &str) -> LibraryResult<bool> {
        let mut books = self.write()?;
        match books.by_id.remove(id) {
            Some(book) => {
                books.by_isbn.remove(book.isbn.as_str());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl BookRepository for MemoryBookRepository {
    async fn exists_by_isbn(&self, isbn: &str) -> LibraryResult<bool> {
        Ok(self.read()?.by_isbn.contains_key(isbn))
    }
}
