pub mod building;
pub mod error;
pub mod models;
pub mod parsing;
pub mod pipeline;
pub mod reference;

// Re-export key types for easier usage
pub use building::SectionBuilder;
pub use error::StyleguideError;
pub use models::{Modifier, ParseOptions, Section};
pub use parsing::{ParseError, RawBlock};
pub use pipeline::{Pipeline, SourceFile};
pub use reference::{resolve, resolve_owned};
