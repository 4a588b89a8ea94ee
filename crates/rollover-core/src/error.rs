use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{0}")]
    InvalidTimezone(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("HTTP request failed")]
    Http(#[from] reqwest_middleware::Error),

    #[error("Failed to read service response")]
    Decode(#[from] reqwest::Error),

    #[error("Task service responded with {status}: {body}")]
    Service { status: u16, body: String },

    #[error("Task {task_id} has an unparseable {field}: '{value}'")]
    MalformedTask {
        task_id: String,
        field: &'static str,
        value: String,
    },
}

impl CoreError {
    /// Whether the error came from talking to the task service rather than from local state.
    pub fn is_service_error(&self) -> bool {
        matches!(
            self,
            CoreError::Http(_) | CoreError::Decode(_) | CoreError::Service { .. }
        )
    }
}
