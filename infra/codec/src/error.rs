use std::borrow::Cow;

/// Errors raised while converting images to and from typed records.
#[sluice_derive::sluice_error]
pub enum CodecError {
    /// The intermediate document did not match the target type.
    #[error("JSON error{}: {source}", format_context(.context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// A numeric attribute held something that is not a decimal number.
    #[error("Invalid number{}: {message}", format_context(.context))]
    InvalidNumber { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A record must serialize to a map of attributes.
    #[error("Not an attribute map{}: {message}", format_context(.context))]
    NotAnObject { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
