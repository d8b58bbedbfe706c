/// Failure to turn one comment block into a section.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Styleguide reference is empty")]
    MissingReference,
    #[error("Invalid weight '{value}': expected an integer")]
    InvalidWeight { value: String },
    #[error("Invalid value '{value}' for '{name}': expected true or false")]
    InvalidFlag { name: String, value: String },
}
