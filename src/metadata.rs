mod document;
mod field;
mod loader;

pub use loader::{ModelMetadata, DEFAULT_INPUT_SIZE, MAX_INPUT_SIZE};
