use std::borrow::Cow;

/// Why an invocation failed. Any of these makes the host retry the batch.
#[sluice_derive::sluice_error]
pub enum InvocationError {
    /// The payload is not a change batch.
    #[error("Invalid payload{}: {source}", format_context(.context))]
    Payload { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// Routing or decoding failed.
    #[error("Stream error{}: {source}", format_context(.context))]
    Stream { source: sluice_events::StreamError, context: Option<Cow<'static, str>> },

    /// The deadline passed before every handler settled.
    #[error("Invocation timed out{}: {message}", format_context(.context))]
    Timeout { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
