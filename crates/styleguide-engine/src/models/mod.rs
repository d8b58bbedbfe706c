pub mod options;
pub mod section;

pub use options::{DEFAULT_PARAM_PREFIX, ParseOptions};
pub use section::{Modifier, Section, is_numeric_reference};
