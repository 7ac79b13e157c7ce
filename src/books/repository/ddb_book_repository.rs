use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::{AttributeValue, Put, ReturnValue, TransactWriteItem};
use chrono::Utc;

use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::Repository;
use crate::utils::ddb::{parse_date_attribute, parse_item, parse_string_attribute};

// DDBBookRepository stores books keyed by book_id and, in a second table, one guard
// item per isbn. Both are written in a single transaction so that the isbn stays unique.
#[derive(Debug)]
pub struct DDBBookRepository {
    client: Client,
    table_name: String,
    isbn_table_name: String,
}

impl DDBBookRepository {
    pub(crate) fn new(client: Client, table_name: &str, isbn_table_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            isbn_table_name: isbn_table_name.to_string(),
        }
    }
}

#[async_trait]
impl Repository<BookEntity> for DDBBookRepository {
    async fn create(&self, entity: &BookEntity) -> LibraryResult<BookEntity> {
        let book = entity.assign_id();
        let book_id = book.book_id.clone().unwrap_or_default();
        let val = serde_json::to_value(&book)?;
        let book_put = Put::builder()
            .table_name(self.table_name.as_str())
            .condition_expression("attribute_not_exists(book_id)")
            .set_item(Some(parse_item(val)?))
            .build();
        let isbn_put = Put::builder()
            .table_name(self.isbn_table_name.as_str())
            .condition_expression("attribute_not_exists(isbn)")
            .item("isbn", AttributeValue::S(book.isbn.to_string()))
            .item("book_id", AttributeValue::S(book_id))
            .build();
        self.client
            .transact_write_items()
            .transact_items(TransactWriteItem::builder().put(book_put).build())
            .transact_items(TransactWriteItem::builder().put(isbn_put).build())
            .send()
            .await.map_err(LibraryError::from)?;
        Ok(book)
    }

    async fn get(&self, id: &str) -> LibraryResult<Option<BookEntity>> {
        let table_name: &str = self.table_name.as_ref();
        self.client
            .get_item()
            .table_name(table_name)
            .key("book_id", AttributeValue::S(id.to_string()))
            .consistent_read(true)
            .send()
            .await.map_err(LibraryError::from)
            .map(|res| res.item().map(map_to_book))
    }

    async fn delete(&self, id: &str) -> LibraryResult<bool> {
        let table_name: &str = self.table_name.as_ref();
        let res = self.client.delete_item()
            .table_name(table_name)
            .key("book_id", AttributeValue::S(id.to_string()))
            .return_values(ReturnValue::AllOld)
            .send()
            .await.map_err(LibraryError::from)?;
        let Some(old) = res.attributes() else {
            return Ok(false);
        };
        // release the isbn so it can be catalogued again
        if let Some(isbn) = parse_string_attribute("isbn", old) {
            self.client.delete_item()
                .table_name(self.isbn_table_name.as_str())
                .key("isbn", AttributeValue::S(isbn))
                .send()
                .await.map_err(LibraryError::from)?;
        }
        Ok(true)
    }
}

#[async_trait]
impl BookRepository for DDBBookRepository {
    async fn exists_by_isbn(&self, isbn: &str) -> LibraryResult<bool> {
        let isbn_table_name: &str = self.isbn_table_name.as_ref();
        self.client
            .get_item()
            .table_name(isbn_table_name)
            .key("isbn", AttributeValue::S(isbn.to_string()))
            .consistent_read(true)
            .send()
            .await.map_err(LibraryError::from)
            .map(|res| res.item().is_some())
    }
}

fn map_to_book(map: &HashMap<String, AttributeValue>) -> BookEntity {
    BookEntity {
        book_id: parse_string_attribute("book_id", map),
        title: parse_string_attribute("title", map).unwrap_or(String::from("")),
        author: parse_string_attribute("author", map).unwrap_or(String::from("")),
        isbn: parse_string_attribute("isbn", map).unwrap_or(String::from("")),
        created_at: parse_date_attribute("created_at", map).unwrap_or(Utc::now().naive_utc()),
        updated_at: parse_date_attribute("updated_at", map).unwrap_or(Utc::now().naive_utc()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use async_once::AsyncOnce;
    use aws_sdk_dynamodb::Client;
    use aws_sdk_dynamodb::types::AttributeValue;
    use lazy_static::lazy_static;

    use crate::books::domain::model::BookEntity;
    use crate::books::repository::BookRepository;
    use crate::books::repository::ddb_book_repository::{DDBBookRepository, map_to_book};
    use crate::core::domain::Configuration;
    use crate::core::library::LibraryError;
    use crate::core::repository::{Repository, RepositoryStore};
    use crate::utils::ddb::{build_db_client, create_table, delete_table};

    lazy_static! {
        static ref CLIENT: AsyncOnce<Client> = AsyncOnce::new(async {
                let mut config = Configuration::new("test");
                config.store = RepositoryStore::LocalDynamoDB;
                let client = build_db_client(&config).await;
                let _ = delete_table(&client, "test_books").await;
                let _ = delete_table(&client, "test_books_isbn").await;
                let _ = create_table(&client, "test_books", "book_id").await;
                let _ = create_table(&client, "test_books_isbn", "isbn").await;
                client
            });
    }

    async fn books_repo() -> DDBBookRepository {
        DDBBookRepository::new(CLIENT.get().await.clone(), "test_books", "test_books_isbn")
    }

    #[tokio::test]
    async fn test_should_map_item_to_book() {
        let item = HashMap::from([
            ("book_id".to_string(), AttributeValue::S("b1".to_string())),
            ("title".to_string(), AttributeValue::S("My book".to_string())),
            ("author".to_string(), AttributeValue::S("Jon Doe".to_string())),
            ("isbn".to_string(), AttributeValue::S("12345".to_string())),
        ]);
        let book = map_to_book(&item);
        assert_eq!(Some("b1".to_string()), book.book_id);
        assert_eq!("My book", book.title.as_str());
        assert_eq!("Jon Doe", book.author.as_str());
        assert_eq!("12345", book.isbn.as_str());
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB Local on localhost:8000"]
    async fn test_should_create_get_books() {
        let books_repo = books_repo().await;
        let book = BookEntity::new("test book", "Jon Doe", "ddb_isbn_1");
        let saved = books_repo.create(&book).await.expect("should create book");
        let book_id = saved.book_id.clone().expect("should assign id");

        let loaded = books_repo.get(book_id.as_str()).await.expect("should return book");
        assert_eq!(Some(book_id), loaded.and_then(|b| b.book_id));
        assert!(books_repo.exists_by_isbn("ddb_isbn_1").await.expect("should check isbn"));
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB Local on localhost:8000"]
    async fn test_should_reject_duplicate_isbn() {
        let books_repo = books_repo().await;
        let _ = books_repo.create(&BookEntity::new("test book", "Jon Doe", "ddb_isbn_2"))
            .await.expect("should create book");
        let res = books_repo.create(&BookEntity::new("other book", "Jane Doe", "ddb_isbn_2")).await;
        assert!(matches!(res, Err(LibraryError::DuplicateKey { .. })));
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB Local on localhost:8000"]
    async fn test_should_create_delete_books() {
        let books_repo = books_repo().await;
        let saved = books_repo.create(&BookEntity::new("test book", "Jon Doe", "ddb_isbn_3"))
            .await.expect("should create book");
        let book_id = saved.book_id.expect("should assign id");

        assert!(books_repo.delete(book_id.as_str()).await.expect("should delete book"));
        assert!(!books_repo.delete(book_id.as_str()).await.expect("should report missing book"));
        assert_eq!(None, books_repo.get(book_id.as_str()).await.expect("should query book"));
        assert!(!books_repo.exists_by_isbn("ddb_isbn_3").await.expect("should check isbn"));
    }
}
