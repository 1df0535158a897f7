use std::fmt;

/// Error types for generation, evaluation and rendering of random equation systems
#[derive(Debug, Clone, PartialEq)]
pub enum EquationsError {
    /// invalid generator settings, raised before any random draw
    Configuration(String),
    /// state vector too short or nonlinearity applied outside of its domain
    Domain(String),
    Io(String),
    Render(String),
}

impl fmt::Display for EquationsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EquationsError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            EquationsError::Domain(msg) => write!(f, "Domain error: {}", msg),
            EquationsError::Io(msg) => write!(f, "I/O error: {}", msg),
            EquationsError::Render(msg) => write!(f, "Render error: {}", msg),
        }
    }
}

impl std::error::Error for EquationsError {}

impl From<std::io::Error> for EquationsError {
    fn from(err: std::io::Error) -> Self {
        EquationsError::Io(err.to_string())
    }
}
