use thiserror::Error;
use wasm_bindgen::JsValue;

/// Everything that can go wrong in the page behavior layer.
///
/// None of these are fatal: callers log them and fall back to skipping the
/// affected feature or reporting a failed save.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BehaviorError {
    #[error("request did not complete: {0}")]
    Transport(String),

    #[error("server responded with status {0}")]
    Rejected(u16),

    #[error("element #{0} is not present on this page")]
    MissingElement(String),

    #[error("local storage is unavailable")]
    StorageUnavailable,

    #[error("invalid page data: {0}")]
    InvalidPageData(String),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("drawing failed: {0}")]
    Drawing(String),
}

/// Renders a thrown JS value for log output
pub fn describe_js(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            BehaviorError::MissingElement("expenseForm".into()).to_string(),
            "element #expenseForm is not present on this page"
        );
        assert_eq!(BehaviorError::Rejected(404).to_string(), "server responded with status 404");
    }
}
