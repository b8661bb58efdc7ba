//! Command implementations.

pub mod books;
pub mod config;
pub mod export;

pub use self::books::execute_books;
pub use self::config::execute_config;
pub use self::export::execute_export;
