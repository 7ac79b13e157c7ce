use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use async_trait::async_trait;
use crate::core::library::{LibraryError, LibraryResult};

#[async_trait]
pub trait Repository<Entity>: Sync + Send {
    // create an entity and return the stored copy with its identifier assigned
    async fn create(&self, entity: &Entity) -> LibraryResult<Entity>;

    // get an entity, None if it does not exist
    async fn get(&self, id: &str) -> LibraryResult<Option<Entity>>;

    // delete an entity, false if there was nothing to delete
    async fn delete(&self, id: &str) -> LibraryResult<bool>;
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum RepositoryStore {
    DynamoDB,
    LocalDynamoDB,
    Memory,
}

impl FromStr for RepositoryStore {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dynamodb" => Ok(RepositoryStore::DynamoDB),
            "local-dynamodb" => Ok(RepositoryStore::LocalDynamoDB),
            "memory" => Ok(RepositoryStore::Memory),
            _ => Err(LibraryError::validation(
                format!("unsupported store {}", s).as_str(), Some("CATALOG_STORE".to_string()))),
        }
    }
}

impl Display for RepositoryStore {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            RepositoryStore::DynamoDB => write!(f, "dynamodb"),
            RepositoryStore::LocalDynamoDB => write!(f, "local-dynamodb"),
            RepositoryStore::Memory => write!(f, "memory"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::repository::RepositoryStore;

    #[tokio::test]
    async fn test_should_format_store() {
        let stores = vec![
            RepositoryStore::DynamoDB,
            RepositoryStore::LocalDynamoDB,
            RepositoryStore::Memory,
        ];
        for store in stores {
            let parsed: RepositoryStore = store.to_string().parse().expect("should parse store");
            assert_eq!(store, parsed);
        }
    }

    #[tokio::test]
    async fn test_should_reject_unknown_store() {
        assert!("mysql".parse::<RepositoryStore>().is_err());
    }
}
