//! HTTP telemetry transport.
//!
//! Implements [`TelemetryPort`] by POSTing JSON reports to the LAN
//! collector endpoint.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: `esp_idf_svc::http::client::EspHttpConnection`, one
//! connection per report (the collector sits on the local network; the
//! handshake cost is negligible at one report per sample period).
//! On host/test: records the payloads for assertions and logs them.

use log::debug;

use crate::app::ports::TelemetryPort;
use crate::error::CommsError;

pub struct HttpTelemetry {
    endpoint: &'static str,
    #[cfg(not(target_os = "espidf"))]
    sent: Vec<std::string::String>,
}

impl HttpTelemetry {
    pub fn new(endpoint: &'static str) -> Self {
        Self {
            endpoint,
            #[cfg(not(target_os = "espidf"))]
            sent: Vec::new(),
        }
    }

    pub fn endpoint(&self) -> &'static str {
        self.endpoint
    }

    /// Payload history, for host tests.
    #[cfg(not(target_os = "espidf"))]
    pub fn sent(&self) -> &[std::string::String] {
        &self.sent
    }
}

impl TelemetryPort for HttpTelemetry {
    #[cfg(target_os = "espidf")]
    fn send(&mut self, json: &str) -> Result<(), CommsError> {
        use esp_idf_svc::http::Method;
        use esp_idf_svc::http::client::{Configuration, EspHttpConnection};
        use esp_idf_svc::io::Write;

        let mut conn = EspHttpConnection::new(&Configuration::default())
            .map_err(|_| CommsError::HttpRequestFailed)?;

        let content_length = json.len().to_string();
        let headers = [
            ("Content-Type", "application/json"),
            ("Content-Length", content_length.as_str()),
        ];
        conn.initiate_request(Method::Post, self.endpoint, &headers)
            .map_err(|_| CommsError::HttpRequestFailed)?;
        conn.write_all(json.as_bytes())
            .map_err(|_| CommsError::HttpRequestFailed)?;
        conn.initiate_response()
            .map_err(|_| CommsError::HttpRequestFailed)?;

        let status = conn.status();
        if !(200..300).contains(&status) {
            debug!("telemetry POST rejected with status {status}");
            return Err(CommsError::HttpRequestFailed);
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn send(&mut self, json: &str) -> Result<(), CommsError> {
        debug!("telemetry(sim) POST {}: {json}", self.endpoint);
        self.sent.push(json.to_string());
        Ok(())
    }
}
