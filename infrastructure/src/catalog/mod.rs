//! Book catalog adapters

mod google_books;

pub use google_books::GoogleBooksClient;
