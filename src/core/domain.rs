use std::env;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::RepositoryStore;

// Identifiable defines common traits that can be shared by persistent objects
pub trait Identifiable: Sync + Send {
    fn id(&self) -> String;
}

// ServerRuntime selects how the HTTP router is hosted
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ServerRuntime {
    Http,
    Lambda,
}

impl FromStr for ServerRuntime {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" => Ok(ServerRuntime::Http),
            "lambda" => Ok(ServerRuntime::Lambda),
            _ => Err(LibraryError::validation(
                format!("unsupported runtime {}", s).as_str(), Some("CATALOG_RUNTIME".to_string()))),
        }
    }
}

impl Display for ServerRuntime {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ServerRuntime::Http => write!(f, "http"),
            ServerRuntime::Lambda => write!(f, "lambda"),
        }
    }
}

// Configuration abstracts config options for the catalog service
#[derive(Debug, PartialEq, Clone)]
pub struct Configuration {
    pub branch_id: String,
    pub store: RepositoryStore,
    pub runtime: ServerRuntime,
    pub books_table: String,
    pub isbn_table: String,
    pub ddb_endpoint: String,
    pub bind_address: String,
}

impl Configuration {
    pub fn new(branch_id: &str) -> Self {
        Configuration {
            branch_id: branch_id.to_string(),
            store: RepositoryStore::Memory,
            runtime: ServerRuntime::Http,
            books_table: "books".to_string(),
            isbn_table: "books_isbn".to_string(),
            ddb_endpoint: "http://localhost:8000".to_string(),
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }

    /// Loads the configuration from `CATALOG_*` environment variables, falling back
    /// to the defaults of [`Configuration::new`].
    pub fn from_env() -> LibraryResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> LibraryResult<Self>
        where F: Fn(&str) -> Option<String> {
        let branch = lookup("CATALOG_BRANCH").unwrap_or_else(|| "dev".to_string());
        let mut config = Configuration::new(branch.as_str());
        if let Some(store) = lookup("CATALOG_STORE") {
            config.store = store.parse()?;
        }
        if let Some(runtime) = lookup("CATALOG_RUNTIME") {
            config.runtime = runtime.parse()?;
        }
        if let Some(table) = lookup("CATALOG_BOOKS_TABLE") {
            config.books_table = non_blank("CATALOG_BOOKS_TABLE", table)?;
        }
        if let Some(table) = lookup("CATALOG_ISBN_TABLE") {
            config.isbn_table = non_blank("CATALOG_ISBN_TABLE", table)?;
        }
        if let Some(endpoint) = lookup("CATALOG_DDB_ENDPOINT") {
            config.ddb_endpoint = non_blank("CATALOG_DDB_ENDPOINT", endpoint)?;
        }
        if let Some(bind) = lookup("CATALOG_BIND") {
            config.bind_address = non_blank("CATALOG_BIND", bind)?;
        }
        if config.books_table == config.isbn_table {
            return Err(LibraryError::validation(
                "books and isbn tables must differ", Some("CATALOG_ISBN_TABLE".to_string())));
        }
        Ok(config)
    }
}

fn non_blank(key: &str, value: String) -> LibraryResult<String> {
    if value.trim().is_empty() {
        Err(LibraryError::validation(format!("{} must not be empty", key).as_str(), Some(key.to_string())))
    } else {
        Ok(value.trim().to_string())
    }
}
