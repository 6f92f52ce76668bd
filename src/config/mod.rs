mod server;

pub use server::{Credentials, ServerConfig};
