/// Recoverable, display-only failure of an external fetch.
///
/// These never mutate view state and are never retried automatically; the
/// UI surfaces the message and moves on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Non-success HTTP status with the response body as message.
    Status { code: u16, message: String },
    /// Connection-level failure before any response arrived.
    Transport(String),
    /// A response body that did not match the expected shape.
    Decode(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Status { code, message } => write!(f, "request failed ({code}): {message}"),
            ApiError::Transport(msg) => write!(f, "transport error: {msg}"),
            ApiError::Decode(msg) => write!(f, "malformed response: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::ApiError;

    #[test]
    fn messages_are_self_describing() {
        let e = ApiError::Status {
            code: 404,
            message: "Run not found".to_string(),
        };
        assert_eq!(e.to_string(), "request failed (404): Run not found");
        assert_eq!(
            ApiError::Transport("refused".to_string()).to_string(),
            "transport error: refused"
        );
    }
}
