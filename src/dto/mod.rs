pub mod auth;
pub mod favorites;
pub mod products;
pub mod quotes;
pub mod suppliers;
