use sluice_derive::sluice_error;
use std::borrow::Cow;

#[sluice_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Rejected{}: {message}", format_context(.context))]
    Rejected { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<String, DemoError> {
    let raw = std::fs::read_to_string("/definitely/missing").context("Reading fixture")?;
    Ok(raw)
}

fn reject() -> Result<(), DemoError> {
    Err(DemoError::Rejected { message: "nope".into(), context: None }).context("Validating")
}

fn main() {
    let err = read().unwrap_err();
    assert!(err.to_string().starts_with("IO error (Reading fixture)"));

    let err = reject().unwrap_err();
    assert_eq!(err.to_string(), "Rejected (Validating): nope");

    let err: DemoError = "boom".into();
    assert_eq!(err.to_string(), "Internal error: boom");
}
