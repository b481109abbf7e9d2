use std::borrow::Cow;

/// Errors that escape a routing or dispatch call.
///
/// Handler failures never show up here: they stop at the table handler and
/// are reported through its error sink.
#[sluice_derive::sluice_error]
pub enum StreamError {
    /// An image could not be decoded into the table's entity type.
    #[error("Decode error{}: {source}", format_context(.context))]
    Decode { source: sluice_codec::CodecError, context: Option<Cow<'static, str>> },

    /// A record lacks the image its event kind requires.
    #[error("Missing image{}: {message}", format_context(.context))]
    MissingImage { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The batch's source ARN does not have the stream ARN shape.
    #[error("Invalid source ARN{}: {message}", format_context(.context))]
    InvalidSourceArn { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Two table handlers were registered for the same table.
    #[error("Duplicate table handler{}: {message}", format_context(.context))]
    DuplicateSource { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// An event filter string names no known combination of kinds.
    #[error("Invalid event filter{}: {message}", format_context(.context))]
    InvalidFilter { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
