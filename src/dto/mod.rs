pub mod auth;
pub mod favorites;
pub mod recipes;
pub mod reviews;
