// Adapters layer: concrete implementations of the domain ports (snapshot storage, rationale over HTTP).

pub mod groq;
pub mod storage;

pub use groq::GroqClient;
pub use storage::{InMemoryStore, JsonFileStore};
