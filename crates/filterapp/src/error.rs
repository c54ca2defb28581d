use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Filter definition not found: {0}")]
    DefinitionNotFound(String),

    #[error("Filter not found: {0}")]
    FilterNotFound(String),

    #[error("Invalid filter definition '{id}': {reason}")]
    InvalidDefinition { id: String, reason: String },

    #[error("Operator '{operator}' is not available for '{definition}'")]
    InvalidOperator {
        definition: String,
        operator: String,
    },

    #[error("Filter {0} has no filter type yet")]
    Unconfigured(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Linked filter: {0}")]
    LinkedFilter(String),

    #[error("Filter definitions are still loading")]
    NotReady,

    #[error("Filters are being applied")]
    Applying,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Registry error: {0}")]
    Registry(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, FilterError>;
