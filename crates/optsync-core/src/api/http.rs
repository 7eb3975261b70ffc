//! reqwest implementation of the option store contract.

use std::future::Future;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use super::{
    OptionBackend, OPTIONS_PATH, QUOTA_RESET_LOGS_PATH, QUOTA_RESET_STATUS_PATH,
    QUOTA_RESET_TRIGGER_PATH, RESET_MODEL_RATIO_PATH,
};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::models::{ApiResponse, OptionEntry, OptionUpdate, QuotaResetLog, QuotaResetStatus};
use crate::util::compact_text;

#[derive(Clone)]
pub struct HttpOptionBackend {
    config: ClientConfig,
    client: Client,
}

impl HttpOptionBackend {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            config,
            client: builder.build()?,
        })
    }

    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self
            .client
            .request(method, self.config.endpoint(path))
            .header(reqwest::header::ACCEPT, "application/json");
        match self.config.access_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

impl OptionBackend for HttpOptionBackend {
    fn list_options(&self) -> impl Future<Output = Result<ApiResponse<Vec<OptionEntry>>>> + Send {
        let request = self.request(Method::GET, OPTIONS_PATH);
        send_envelope(request)
    }

    fn put_option(&self, update: OptionUpdate) -> impl Future<Output = Result<ApiResponse>> + Send {
        tracing::debug!("PUT {} key={}", OPTIONS_PATH, update.key);
        let request = self.request(Method::PUT, OPTIONS_PATH).json(&update);
        send_envelope(request)
    }

    fn reset_model_ratio(&self) -> impl Future<Output = Result<ApiResponse>> + Send {
        let request = self.request(Method::POST, RESET_MODEL_RATIO_PATH);
        send_envelope(request)
    }

    fn quota_reset_status(
        &self,
    ) -> impl Future<Output = Result<ApiResponse<QuotaResetStatus>>> + Send {
        let request = self.request(Method::GET, QUOTA_RESET_STATUS_PATH);
        send_envelope(request)
    }

    fn quota_reset_logs(
        &self,
        limit: u32,
    ) -> impl Future<Output = Result<ApiResponse<Vec<QuotaResetLog>>>> + Send {
        let request = self
            .request(Method::GET, QUOTA_RESET_LOGS_PATH)
            .query(&[("limit", limit)]);
        send_envelope(request)
    }

    fn trigger_quota_reset(&self) -> impl Future<Output = Result<ApiResponse>> + Send {
        let request = self.request(Method::POST, QUOTA_RESET_TRIGGER_PATH);
        send_envelope(request)
    }
}

/// Send a request and decode the `{success, message, data}` envelope.
///
/// Non-2xx responses that still carry an envelope are returned as server
/// failures so their message reaches the user.
async fn send_envelope<T: DeserializeOwned>(request: RequestBuilder) -> Result<ApiResponse<T>> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        return Ok(serde_json::from_str(&body)?);
    }

    match serde_json::from_str::<ApiResponse<T>>(&body) {
        Ok(envelope) if !envelope.success => Ok(envelope),
        _ => Err(Error::Status(parse_api_error(status, &body))),
    }
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::sync::oneshot;

    use super::*;

    /// Serve one canned response and hand back the raw request text.
    async fn spawn_one_shot_server(
        status_line: &str,
        body: &str,
    ) -> (ClientConfig, oneshot::Receiver<String>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test server");
        let address = listener.local_addr().expect("local address");
        let body = body.to_string();
        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        let (sender, receiver) = oneshot::channel();

        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let raw_request = read_request(&mut socket).await;
                let _ = sender.send(raw_request);
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });

        let config = ClientConfig::new(format!("http://{address}/api"))
            .expect("config")
            .with_access_token(Some("admin-token".to_string()));
        (config, receiver)
    }

    /// Read headers plus a `content-length` body, however it is chunked.
    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut raw = Vec::new();
        let mut chunk = [0_u8; 1024];
        loop {
            let read = socket.read(&mut chunk).await.unwrap_or(0);
            if read == 0 {
                break;
            }
            raw.extend_from_slice(&chunk[..read]);
            let text = String::from_utf8_lossy(&raw).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if raw.len() >= header_end + 4 + content_length {
                    return text;
                }
            }
        }
        String::from_utf8_lossy(&raw).to_string()
    }

    #[tokio::test]
    async fn list_options_sends_bearer_token_and_parses_entries() {
        let body = r#"{"success":true,"message":"","data":[{"key":"QuotaResetTime","value":"03:30"}]}"#;
        let (config, request) = spawn_one_shot_server("200 OK", body).await;
        let backend = HttpOptionBackend::new(config).unwrap();

        let response = backend.list_options().await.unwrap();
        assert!(response.success);
        assert_eq!(
            response.data.unwrap(),
            vec![OptionEntry {
                key: "QuotaResetTime".to_string(),
                value: "03:30".to_string(),
            }]
        );

        let raw_request = request.await.unwrap();
        assert!(raw_request.starts_with("GET /api/options "));
        assert!(raw_request
            .to_ascii_lowercase()
            .contains("authorization: bearer admin-token"));
    }

    #[tokio::test]
    async fn put_option_sends_key_value_body() {
        let (config, request) =
            spawn_one_shot_server("200 OK", r#"{"success":true,"message":""}"#).await;
        let backend = HttpOptionBackend::new(config).unwrap();

        let response = backend
            .put_option(OptionUpdate::new("QuotaResetEnabled", "false"))
            .await
            .unwrap();
        assert!(response.success);

        let raw_request = request.await.unwrap();
        assert!(raw_request.starts_with("PUT /api/options "));
        assert!(raw_request.contains(r#"{"key":"QuotaResetEnabled","value":"false"}"#));
    }

    #[tokio::test]
    async fn conflict_with_envelope_is_a_server_failure() {
        let (config, _request) = spawn_one_shot_server(
            "409 Conflict",
            r#"{"success":false,"message":"a reset is already running"}"#,
        )
        .await;
        let backend = HttpOptionBackend::new(config).unwrap();

        let response = backend.trigger_quota_reset().await.unwrap();
        assert!(!response.success);
        assert_eq!(response.message, "a reset is already running");
    }

    #[tokio::test]
    async fn plain_error_status_is_a_transport_failure() {
        let (config, _request) =
            spawn_one_shot_server("502 Bad Gateway", "upstream unavailable").await;
        let backend = HttpOptionBackend::new(config).unwrap();

        let error = backend.list_options().await.unwrap_err();
        assert!(error.to_string().contains("upstream unavailable (502)"));
    }

    #[tokio::test]
    async fn quota_logs_pass_limit_query() {
        let (config, request) =
            spawn_one_shot_server("200 OK", r#"{"success":true,"data":[]}"#).await;
        let backend = HttpOptionBackend::new(config).unwrap();

        let response = backend.quota_reset_logs(20).await.unwrap();
        assert_eq!(response.data, Some(Vec::new()));

        let raw_request = request.await.unwrap();
        assert!(raw_request.starts_with("GET /api/quota-reset/logs?limit=20 "));
    }

    #[test]
    fn parse_api_error_handles_empty_body() {
        assert_eq!(parse_api_error(StatusCode::BAD_GATEWAY, "  "), "HTTP 502");
    }
}
