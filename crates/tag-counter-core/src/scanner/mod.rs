pub mod walk;

pub use walk::{compile_patterns, discover};
