pub type EditResult<T> = Result<T, EditError>;

#[derive(thiserror::Error, Debug)]
pub enum EditError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("lookup error: {0}")]
    Lookup(String),

    #[error("font load error: {0}")]
    FontLoad(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("export error: {0}")]
    Export(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("offload error: {0}")]
    Offload(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EditError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn lookup(msg: impl Into<String>) -> Self {
        Self::Lookup(msg.into())
    }

    pub fn font_load(msg: impl Into<String>) -> Self {
        Self::FontLoad(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn offload(msg: impl Into<String>) -> Self {
        Self::Offload(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
