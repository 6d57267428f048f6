use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RadialError {
    #[error("Invalid range: min ({min}) must be below max ({max})")]
    InvalidRange { min: f64, max: f64 },
    #[error("Invalid size: {0} (must be a positive number of pixels)")]
    InvalidSize(f64),
    #[error("Invalid color '{0}': expected a named accent or #rrggbb")]
    InvalidColor(String),
}
