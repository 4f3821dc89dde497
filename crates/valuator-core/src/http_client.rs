use std::collections::{BTreeMap, HashMap};
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::process::Command;
use tracing::debug;

/// HTTP method set needed by the valuation API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// HTTP request envelope used by transport calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
    pub timeout_ms: u64,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
            timeout_ms: 10_000,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// HTTP response envelope returned by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok_json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Transport-level HTTP error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    message: String,
}

impl HttpError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for HttpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for HttpError {}

/// Transport contract used by [`ValuationApi`](crate::ValuationApi).
pub trait HttpClient: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>>;
}

/// In-process HTTP client backed by reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Arc<reqwest::Client>,
}

impl ReqwestHttpClient {
    /// Fails when the TLS backend cannot be initialised.
    pub fn new() -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("valuator/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HttpError::new(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client: Arc::new(client),
        })
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            debug!(method = request.method.as_str(), url = %request.url, "sending request");

            let mut builder = match request.method {
                HttpMethod::Get => self.client.get(&request.url),
                HttpMethod::Post => self.client.post(&request.url),
            };

            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }

            builder = builder.timeout(std::time::Duration::from_millis(request.timeout_ms));

            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await.map_err(|e| {
                if e.is_timeout() {
                    HttpError::new(format!("request timeout: {}", e))
                } else if e.is_connect() {
                    HttpError::new(format!("connection failed: {}", e))
                } else {
                    HttpError::new(format!("request failed: {}", e))
                }
            })?;

            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| HttpError::new(format!("failed to read response body: {}", e)))?;

            Ok(HttpResponse { status, body })
        })
    }
}

/// Appended by curl after the body so the status code can be split off.
const CURL_STATUS_SUFFIX: &str = "\n%{http_code}";

/// HTTP client that shells out to the `curl` executable.
#[derive(Debug, Clone)]
pub struct CurlHttpClient {
    program: String,
}

impl CurlHttpClient {
    pub fn new() -> Self {
        Self::with_program("curl")
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn arguments(request: &HttpRequest) -> Vec<String> {
        let mut args = vec![
            String::from("--silent"),
            String::from("--show-error"),
            String::from("-X"),
            String::from(request.method.as_str()),
            request.url.clone(),
            String::from("--max-time"),
            format!("{:.3}", request.timeout_ms as f64 / 1_000.0),
            String::from("--write-out"),
            String::from(CURL_STATUS_SUFFIX),
        ];

        for (name, value) in &request.headers {
            args.push(String::from("-H"));
            args.push(format!("{name}: {value}"));
        }

        if let Some(body) = &request.body {
            args.push(String::from("--data"));
            args.push(body.clone());
        }

        args
    }

    fn parse_output(stdout: &str) -> Result<HttpResponse, HttpError> {
        let (body, status) = stdout
            .rsplit_once('\n')
            .ok_or_else(|| HttpError::new("curl output is missing the status line"))?;
        let status = status
            .trim()
            .parse::<u16>()
            .map_err(|_| HttpError::new(format!("curl reported invalid status '{status}'")))?;

        Ok(HttpResponse::with_status(status, body))
    }
}

impl Default for CurlHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for CurlHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            debug!(method = request.method.as_str(), url = %request.url, "invoking curl");

            let output = Command::new(&self.program)
                .args(Self::arguments(&request))
                .kill_on_drop(true)
                .output()
                .await
                .map_err(|e| HttpError::new(format!("failed to run {}: {}", self.program, e)))?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(HttpError::new(format!(
                    "{} exited with {}: {}",
                    self.program,
                    output.status,
                    stderr.trim()
                )));
            }

            let stdout = String::from_utf8(output.stdout)
                .map_err(|_| HttpError::new("response body is not valid UTF-8"))?;
            Self::parse_output(&stdout)
        })
    }
}

/// Offline transport with canned responses keyed by method and URL.
///
/// Unrouted requests receive a 404. Every request is recorded.
#[derive(Debug, Default)]
pub struct MockHttpClient {
    routes: HashMap<(HttpMethod, String), Result<HttpResponse, HttpError>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(
        mut self,
        method: HttpMethod,
        url: impl Into<String>,
        response: HttpResponse,
    ) -> Self {
        self.routes.insert((method, url.into()), Ok(response));
        self
    }

    pub fn with_error(mut self, method: HttpMethod, url: impl Into<String>, error: HttpError) -> Self {
        self.routes.insert((method, url.into()), Err(error));
        self
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl HttpClient for MockHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let result = self
            .routes
            .get(&(request.method, request.url.clone()))
            .cloned()
            .unwrap_or_else(|| Ok(HttpResponse::with_status(404, "no mock route")));

        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_names_are_lowercased() {
        let request = HttpRequest::post("https://example.test/annual-data")
            .with_header("Content-Type", "application/json");

        assert_eq!(
            request.headers.get("content-type").map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn curl_arguments_carry_method_headers_and_body() {
        let request = HttpRequest::post("https://example.test/annual-data")
            .with_header("accept", "application/json")
            .with_body(r#"{"year":2024}"#)
            .with_timeout_ms(2_500);

        let args = CurlHttpClient::arguments(&request);
        let joined = args.join(" ");
        assert!(joined.starts_with("--silent --show-error -X POST https://example.test/annual-data"));
        assert!(joined.contains("--max-time 2.500"));
        assert!(joined.contains("-H accept: application/json"));
        assert_eq!(args.last().map(String::as_str), Some(r#"{"year":2024}"#));
    }

    #[test]
    fn curl_output_splits_status_from_body() {
        let response = CurlHttpClient::parse_output("[{\"a\":1}]\n200").expect("must parse");
        assert_eq!(response, HttpResponse::ok_json("[{\"a\":1}]"));

        let response = CurlHttpClient::parse_output("line one\nline two\n503").expect("must parse");
        assert_eq!(response.status, 503);
        assert_eq!(response.body, "line one\nline two");

        assert!(CurlHttpClient::parse_output("no status").is_err());
    }

    #[test]
    fn reqwest_client_builds() {
        assert!(ReqwestHttpClient::new().is_ok());
    }

    #[cfg(unix)]
    fn fake_curl(dir: &tempfile::TempDir, script: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.path().join("curl");
        std::fs::write(&path, format!("#!/bin/sh\n{script}\n")).expect("write script");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("chmod script");
        path.display().to_string()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn curl_success_splits_status_off_stdout() {
        let dir = tempfile::tempdir().expect("temp dir");
        let client = CurlHttpClient::with_program(fake_curl(&dir, r#"printf '[{"a":1}]\n201'"#));

        let response = client
            .execute(HttpRequest::get("https://example.test/a"))
            .await
            .expect("curl succeeded");

        assert_eq!(response, HttpResponse::with_status(201, r#"[{"a":1}]"#));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn curl_non_zero_exit_is_a_transport_error_with_stderr() {
        let dir = tempfile::tempdir().expect("temp dir");
        let client = CurlHttpClient::with_program(fake_curl(
            &dir,
            "echo 'curl: (6) Could not resolve host: example.test' >&2\nexit 6",
        ));

        let error = client
            .execute(HttpRequest::get("https://example.test/a"))
            .await
            .expect_err("curl failed");

        assert!(error
            .to_string()
            .ends_with(": curl: (6) Could not resolve host: example.test"));
    }

    #[tokio::test]
    async fn curl_missing_program_fails_to_run() {
        let client = CurlHttpClient::with_program("valuator-no-such-curl");

        let error = client
            .execute(HttpRequest::get("https://example.test/a"))
            .await
            .expect_err("program is missing");

        assert!(error
            .to_string()
            .starts_with("failed to run valuator-no-such-curl:"));
    }

    #[tokio::test]
    async fn mock_returns_404_for_unknown_routes_and_records_requests() {
        let client = MockHttpClient::new().with_response(
            HttpMethod::Get,
            "https://example.test/a",
            HttpResponse::ok_json("[]"),
        );

        let hit = client
            .execute(HttpRequest::get("https://example.test/a"))
            .await
            .expect("routed");
        let miss = client
            .execute(HttpRequest::post("https://example.test/a"))
            .await
            .expect("unrouted still responds");

        assert!(hit.is_success());
        assert_eq!(miss.status, 404);
        assert_eq!(client.requests().len(), 2);
    }
}
