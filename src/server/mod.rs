mod analytics;
mod auth;
mod bookmarks;
pub mod dto;
mod pages;
mod products;
pub mod response;
mod router;
mod scripts;
pub mod validation;

pub use router::{AppState, create_router};
