//! Provider module
//!
//! Defines the Provider trait and a registry of the enumerated search and
//! analysis providers.

mod loader;
mod registry;
mod traits;

// Provider implementations
pub mod brave;
pub mod gemini;
pub mod huggingface;
pub mod openrouter;

pub use loader::ProviderLoader;
pub use registry::ProviderRegistry;
pub use traits::*;
