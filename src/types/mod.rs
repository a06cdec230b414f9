use thiserror::Error;

pub mod colors;
pub mod detection;
pub mod rich_text;

pub use colors::*;
pub use detection::*;
pub use rich_text::*;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Empty required field: {0}")]
    EmptyField(&'static str),

    #[error("Unknown content type: {0}")]
    UnknownContentType(String),

    #[error("Value out of bounds: {value}, expected {min}..={max}")]
    OutOfBounds { value: f32, min: f32, max: f32 },
}
