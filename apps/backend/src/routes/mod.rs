pub mod auth;
pub mod billing;
pub mod flashcards;
pub mod lookup;
pub mod products;
pub mod session;
pub mod words;
