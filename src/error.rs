use std::fmt;

#[derive(Debug)]
pub enum IndexError {
    Config(String),
    Manifest(String),
    Io(std::io::Error),
    Spawn(std::io::Error),
    Serialization(serde_json::Error),
    Other(String),
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexError::Config(e) => write!(f, "Config error: {}", e),
            IndexError::Manifest(e) => write!(f, "Manifest error: {}", e),
            IndexError::Io(e) => write!(f, "IO error: {}", e),
            IndexError::Spawn(e) => write!(f, "Thread spawn error: {}", e),
            IndexError::Serialization(e) => write!(f, "Serialization error: {}", e),
            IndexError::Other(e) => write!(f, "Error: {}", e),
        }
    }
}

impl std::error::Error for IndexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IndexError::Io(e) | IndexError::Spawn(e) => Some(e),
            IndexError::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for IndexError {
    fn from(err: std::io::Error) -> Self {
        IndexError::Io(err)
    }
}

impl From<serde_json::Error> for IndexError {
    fn from(err: serde_json::Error) -> Self {
        IndexError::Serialization(err)
    }
}

impl From<String> for IndexError {
    fn from(err: String) -> Self {
        IndexError::Other(err)
    }
}

impl From<&str> for IndexError {
    fn from(err: &str) -> Self {
        IndexError::Other(err.to_string())
    }
}
