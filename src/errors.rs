use std::fmt;

/// Fatal conditions. An empty sample is deliberately not one of these —
/// spec.md treats it as a logged, zero-result `Ok`.
#[derive(Debug)]
pub enum FaldiscoError {
    MissingJoinKeyColumn,
    MultipleJoinKeyColumns { columns: Vec<String> },
    MissingFieldPrefix { column: String },
    NoFieldsForSide { side: &'static str },
    Io(std::io::Error),
    Csv(csv::Error),
    Toml(toml::de::Error),
}

impl fmt::Display for FaldiscoError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FaldiscoError::MissingJoinKeyColumn => {
                write!(f, "sample has no column prefixed with r_j__")
            }
            FaldiscoError::MultipleJoinKeyColumns { columns } => {
                write!(f, "sample has more than one r_j__ column: {}", columns.join(", "))
            }
            FaldiscoError::MissingFieldPrefix { column } => {
                write!(f, "column '{}' is not prefixed with r__, t__, or r_j__", column)
            }
            FaldiscoError::NoFieldsForSide { side } => {
                write!(f, "sample has no {} fields", side)
            }
            FaldiscoError::Io(e) => write!(f, "I/O error: {}", e),
            FaldiscoError::Csv(e) => write!(f, "CSV error: {}", e),
            FaldiscoError::Toml(e) => write!(f, "config error: {}", e),
        }
    }
}

impl std::error::Error for FaldiscoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FaldiscoError::Io(e) => Some(e),
            FaldiscoError::Csv(e) => Some(e),
            FaldiscoError::Toml(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FaldiscoError {
    fn from(e: std::io::Error) -> Self {
        FaldiscoError::Io(e)
    }
}

impl From<csv::Error> for FaldiscoError {
    fn from(e: csv::Error) -> Self {
        FaldiscoError::Csv(e)
    }
}

impl From<toml::de::Error> for FaldiscoError {
    fn from(e: toml::de::Error) -> Self {
        FaldiscoError::Toml(e)
    }
}
