pub mod association;
pub mod author;
pub mod book;
