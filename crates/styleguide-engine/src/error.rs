use crate::parsing::ParseError;

/// Fatal build failures. No partial section list is returned alongside them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StyleguideError {
    #[error("Failed to parse block {block} in {file}: {source}")]
    BlockParse {
        file: String,
        /// 0-based position of the block within its file
        block: usize,
        source: ParseError,
    },

    #[error(
        "Reference collision: '{previous}' and '{current}' both resolve from reference '{reference}'"
    )]
    ReferenceCollision {
        previous: String,
        current: String,
        reference: String,
    },
}
