//! In-memory demo data: authors and the books that reference them.
//!
//! Rows carry raw integer ids; they are exposed to clients only through the
//! encrypted-lookup fields in [`crate::serializers`].

pub mod table;

pub use table::Table;

use lookup::PrimaryKey;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: u64,
    pub name: String,
}

impl PrimaryKey for Author {
    fn pk(&self) -> Value {
        Value::from(self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: u64,
    pub title: String,
    pub author_id: u64,
}

impl PrimaryKey for Book {
    fn pk(&self) -> Value {
        Value::from(self.id)
    }
}

/// All demo tables. Cheap to clone; clones share rows.
#[derive(Debug, Clone, Default)]
pub struct Store {
    pub authors: Table<Author>,
    pub books: Table<Book>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_author(&self, name: impl Into<String>) -> Author {
        let name = name.into();
        self.authors.insert_with(|id| Author { id, name })
    }

    pub fn create_book(&self, title: impl Into<String>, author: &Author) -> Book {
        let title = title.into();
        let author_id = author.id;
        self.books.insert_with(|id| Book {
            id,
            title,
            author_id,
        })
    }
}
