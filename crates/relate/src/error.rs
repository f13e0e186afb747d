use std::fmt;

#[derive(Debug)]
pub enum RelateError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (dataset count, bad pair reference, policy shape).
    ConfigValidation(String),
    /// A referenced dataset does not exist or has no data.
    UnknownDataset(String),
    /// Missing mapped column in input data.
    MissingColumn { dataset: String, column: String },
    /// IO error (CSV read, etc.).
    Io(String),
}

impl fmt::Display for RelateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::UnknownDataset(name) => write!(f, "unknown dataset: {name}"),
            Self::MissingColumn { dataset, column } => {
                write!(f, "dataset '{dataset}': missing column '{column}'")
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for RelateError {}
