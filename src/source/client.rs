//! HTTP client for the sensor API.

use reqwest::Client;
use tracing::debug;

use crate::config::ApiSettings;
use crate::data::{PumpState, Reading};
use crate::error::FetchError;

/// Read-only client for the readings and pump status endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    readings_url: String,
    pump_url: String,
}

impl ApiClient {
    pub fn new(settings: &ApiSettings) -> Result<Self, FetchError> {
        let http = Client::builder().timeout(settings.timeout()).build()?;
        Ok(Self {
            http,
            readings_url: settings.readings_url.clone(),
            pump_url: settings.pump_url.clone(),
        })
    }

    pub fn readings_url(&self) -> &str {
        &self.readings_url
    }

    /// Fetch the reading list, newest first as served.
    pub async fn fetch_readings(&self) -> Result<Vec<Reading>, FetchError> {
        let readings: Vec<Reading> = self
            .http
            .get(&self.readings_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(count = readings.len(), url = %self.readings_url, "Fetched readings");
        Ok(readings)
    }

    /// Fetch the current pump state.
    pub async fn fetch_pump_status(&self) -> Result<PumpState, FetchError> {
        let state: PumpState = self
            .http
            .get(&self.pump_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(status = state.status, url = %self.pump_url, "Fetched pump status");
        Ok(state)
    }
}

#[cfg(test)]
pub(crate) mod test_server {
    //! Minimal HTTP responder for exercising the client without a real API.

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve `status` and `body` to every connection until the test ends.
    /// Returns the base URL (`http://127.0.0.1:port`).
    pub async fn serve(status: u16, body: &str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let body = body.to_string();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let body = body.clone();
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 4096];
                    let _ = socket.read(&mut buf).await;
                    let response = format!(
                        "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        format!("http://{}", addr)
    }

    /// A URL nothing is listening on.
    pub async fn closed_port() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }
}

#[cfg(test)]
mod tests {
    use super::test_server::{closed_port, serve};
    use super::*;

    fn settings(base: &str) -> ApiSettings {
        ApiSettings {
            readings_url: format!("{}/api/data", base),
            pump_url: format!("{}/api/pump", base),
            timeout_secs: 2,
            ..ApiSettings::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_readings() {
        let base = serve(
            200,
            r#"[{"soil_moisture":25,"pH":5.5,"humidity":60,"temperature":28},{"soil_moisture":40}]"#,
        )
        .await;
        let client = ApiClient::new(&settings(&base)).unwrap();

        let readings = client.fetch_readings().await.unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].ph, Some(5.5));
        assert!(readings[1].ph.is_none());
    }

    #[tokio::test]
    async fn test_fetch_empty_list() {
        let base = serve(200, "[]").await;
        let client = ApiClient::new(&settings(&base)).unwrap();
        assert!(client.fetch_readings().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_pump_status() {
        let base = serve(200, r#"{"status":true}"#).await;
        let client = ApiClient::new(&settings(&base)).unwrap();
        assert!(client.fetch_pump_status().await.unwrap().status);
    }

    #[tokio::test]
    async fn test_server_error_status() {
        let base = serve(500, r#"{"error":"boom"}"#).await;
        let client = ApiClient::new(&settings(&base)).unwrap();

        let err = client.fetch_readings().await.unwrap_err();
        assert!(matches!(err, FetchError::Status(500)));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let base = serve(200, "not json").await;
        let client = ApiClient::new(&settings(&base)).unwrap();

        let err = client.fetch_readings().await.unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let base = closed_port().await;
        let client = ApiClient::new(&settings(&base)).unwrap();

        let err = client.fetch_readings().await.unwrap_err();
        assert!(matches!(err, FetchError::Connection(_)));
    }
}
