use thiserror::Error;

/// Failure of a call against the profile backend.
///
/// `Display` yields the bare message so it can be stored as the session error
/// without further formatting.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered `{ success: false, message }`.
    #[error("{0}")]
    Rejected(String),

    #[error("{}", transport_message(.0))]
    Transport(#[from] reqwasm::Error),

    #[error("{0}")]
    Decode(#[source] serde_json::Error),

    #[error("{0}")]
    Encode(#[source] serde_json::Error),
}

impl ApiError {
    /// Message surfaced to the user.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

// A failed fetch is a JS `TypeError`; show only its message, the way the browser would.
#[allow(unreachable_patterns)]
fn transport_message(err: &reqwasm::Error) -> String {
    match err {
        reqwasm::Error::JsError(js) => js.message.clone(),
        reqwasm::Error::SerdeError(e) => e.to_string(),
        other => other.to_string(),
    }
}

/// Failure of an object storage upload.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("browser rejected the upload request: {0}")]
    Browser(String),

    #[error("upload failed before the server answered")]
    Network,

    #[error("storage answered with status {status}")]
    Rejected { status: u16 },

    #[error("malformed storage response: {0}")]
    MalformedResponse(String),

    #[error("invalid storage endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

impl From<wasm_bindgen::JsValue> for StorageError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        StorageError::Browser(format!("{:?}", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_displays_server_message_verbatim() {
        let err = ApiError::Rejected("User not found!".to_string());
        assert_eq!(err.message(), "User not found!");
    }

    #[test]
    fn decode_displays_parser_message() {
        let parse = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let expected = parse.to_string();
        assert_eq!(ApiError::Decode(parse).message(), expected);
    }

    #[test]
    fn transport_serde_failure_keeps_parser_message() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let expected = parse.to_string();
        let err = ApiError::from(reqwasm::Error::SerdeError(parse));
        assert_eq!(err.message(), expected);
    }

    #[test]
    fn storage_rejection_names_status() {
        let err = StorageError::Rejected { status: 403 };
        assert_eq!(err.to_string(), "storage answered with status 403");
    }
}
