use std::fmt;

#[derive(Debug)]
pub enum PortraitError {
    Timeout(String),
    Invocation(String),
    AllModelsFailed(String),
}

impl fmt::Display for PortraitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortraitError::Timeout(msg) => write!(f, "Generation timeout: {}", msg),
            PortraitError::Invocation(msg) => write!(f, "Generation error: {}", msg),
            PortraitError::AllModelsFailed(msg) => write!(f, "All models failed: {}", msg),
        }
    }
}

impl std::error::Error for PortraitError {}
