use gloo::net::http::{Request, Response};
use shared::{ResponseSummary, SubmissionRequest, PROGRAMMATIC_REQUEST_HEADER, PROGRAMMATIC_REQUEST_VALUE};

use super::errors::{describe_js, BehaviorError};

/// A completed HTTP response whose body has not been read yet
#[allow(async_fn_in_trait)]
pub trait FormResponse {
    fn summary(&self) -> ResponseSummary;

    async fn read_body(self) -> Result<String, BehaviorError>;
}

/// Network boundary used by the form controller
#[allow(async_fn_in_trait)]
pub trait FormTransport {
    type Response: FormResponse;

    /// Posts the form fields to `request.action`. Errors only when the
    /// request did not complete; status codes are left to the caller.
    async fn post_form(&self, request: &SubmissionRequest) -> Result<Self::Response, BehaviorError>;
}

/// Fetch-backed client for the server that rendered the page
#[derive(Clone, Default)]
pub struct ApiClient;

impl ApiClient {
    pub fn new() -> Self {
        Self
    }
}

impl FormTransport for ApiClient {
    type Response = Response;

    async fn post_form(&self, request: &SubmissionRequest) -> Result<Response, BehaviorError> {
        let body = web_sys::FormData::new().map_err(|e| BehaviorError::Transport(describe_js(&e)))?;
        for (name, value) in request.fields() {
            body.append_with_str(name, value)
                .map_err(|e| BehaviorError::Transport(describe_js(&e)))?;
        }

        Request::post(&request.action)
            .header(PROGRAMMATIC_REQUEST_HEADER, PROGRAMMATIC_REQUEST_VALUE)
            .body(body)
            .map_err(|e| BehaviorError::Transport(format!("Failed to build request: {}", e)))?
            .send()
            .await
            .map_err(|e| BehaviorError::Transport(format!("Network error: {}", e)))
    }
}

impl FormResponse for Response {
    fn summary(&self) -> ResponseSummary {
        ResponseSummary {
            status: self.status(),
            redirected: self.redirected(),
            url: self.url(),
        }
    }

    async fn read_body(self) -> Result<String, BehaviorError> {
        self.text()
            .await
            .map_err(|e| BehaviorError::Transport(format!("Failed to read response: {}", e)))
    }
}
