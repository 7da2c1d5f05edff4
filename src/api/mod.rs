// src/api/mod.rs
use std::time::Duration;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::core::config::{Config, ConfigError};
use crate::validation::SelectedFile;

pub mod error;
pub mod retry;
pub mod types;

#[cfg(test)]
pub mod stub;

pub use error::ApiError;
pub use retry::RetryPolicy;
use types::{
    AnalyseRequest, BulkAnalysisResult, BulkPiiResult, InsightsResult, PassphraseRequest,
    PassphraseResult, PasswordAnalysisResult,
};

/// Backend service locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub analyse: Url,
    pub passphrase: Url,
    pub insights: Url,
    pub bulk: Url,
    pub bulk_pii: Url,
}

impl Endpoints {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            analyse: parse_url("ANALYSE_URL", &config.analyse_url)?,
            passphrase: parse_url("PASSPHRASE_URL", &config.passphrase_url)?,
            insights: parse_url("INSIGHTS_URL", &config.insights_url)?,
            bulk: parse_url("BULK_URL", &config.bulk_url)?,
            bulk_pii: parse_url("BULK_PII_URL", &config.bulk_pii_url)?,
        })
    }

    /// All services behind one host, on their default paths.
    pub fn with_base(base: &str) -> Result<Self, ConfigError> {
        let base = base.trim_end_matches('/');
        Ok(Self {
            analyse: parse_url("ANALYSE_URL", &format!("{}/analyse", base))?,
            passphrase: parse_url("PASSPHRASE_URL", &format!("{}/generate-passphrase", base))?,
            insights: parse_url("INSIGHTS_URL", &format!("{}/generate_insights", base))?,
            bulk: parse_url("BULK_URL", &format!("{}/bulk", base))?,
            bulk_pii: parse_url("BULK_PII_URL", &format!("{}/bulk_pii", base))?,
        })
    }
}

fn parse_url(key: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// File contents read once and re-sent on every retry.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub async fn read(file: &SelectedFile) -> Result<Self, ApiError> {
        let bytes = tokio::fs::read(&file.path)
            .await
            .map_err(|e| ApiError::setup(format!("Failed to read {}: {}", file.name, e)))?;

        Ok(Self {
            file_name: file.name.clone(),
            bytes,
        })
    }

    fn form(&self) -> Form {
        let part = Part::bytes(self.bytes.clone()).file_name(self.file_name.clone());
        Form::new().part("file", part)
    }
}

/// Thin client for the audit services. One call is one attempt; callers
/// wrap calls in a [`RetryPolicy`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    endpoints: Endpoints,
    request_timeout: Duration,
    upload_timeout: Duration,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let endpoints = Endpoints::from_config(config)?;
        Self::with_endpoints(endpoints, config.request_timeout, config.upload_timeout)
    }

    pub fn with_endpoints(
        endpoints: Endpoints,
        request_timeout: Duration,
        upload_timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let builder = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));

        // Tests talk to a loopback stub; a proxy from the environment must not intercept it
        #[cfg(test)]
        let builder = builder.no_proxy();

        let http = builder.build()?;

        Ok(Self {
            http,
            endpoints,
            request_timeout,
            upload_timeout,
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub async fn analyse(&self, password: &str) -> Result<PasswordAnalysisResult, ApiError> {
        log::debug!("POST {}", self.endpoints.analyse);
        let request = self.http
            .post(self.endpoints.analyse.clone())
            .timeout(self.request_timeout)
            .json(&AnalyseRequest { password });

        self.send_json(request).await
    }

    pub async fn generate_passphrase(&self, phrases: &[String]) -> Result<PassphraseResult, ApiError> {
        log::debug!("POST {} ({} phrases)", self.endpoints.passphrase, phrases.len());
        let request = self.http
            .post(self.endpoints.passphrase.clone())
            .timeout(self.request_timeout)
            .json(&PassphraseRequest { phrases });

        self.send_json(request).await
    }

    pub async fn insights(&self) -> Result<InsightsResult, ApiError> {
        log::debug!("GET {}", self.endpoints.insights);
        let request = self.http
            .get(self.endpoints.insights.clone())
            .timeout(self.request_timeout);

        self.send_json(request).await
    }

    pub async fn bulk_analysis(&self, upload: &Upload) -> Result<BulkAnalysisResult, ApiError> {
        log::debug!("POST {} ({}, {} bytes)", self.endpoints.bulk, upload.file_name, upload.bytes.len());
        let request = self.http
            .post(self.endpoints.bulk.clone())
            .timeout(self.upload_timeout)
            .multipart(upload.form());

        self.send_json(request).await
    }

    pub async fn bulk_pii(&self, upload: &Upload) -> Result<BulkPiiResult, ApiError> {
        log::debug!("POST {} ({}, {} bytes)", self.endpoints.bulk_pii, upload.file_name, upload.bytes.len());
        let request = self.http
            .post(self.endpoints.bulk_pii.clone())
            .timeout(self.upload_timeout)
            .multipart(upload.form());

        self.send_json(request).await
    }

    /// Fetch a report. `reference` may be absolute or relative to `base`.
    pub async fn download(&self, base: &Url, reference: &str) -> Result<Vec<u8>, ApiError> {
        let url = resolve_reference(base, reference)?;
        log::debug!("GET {}", url);

        let response = self.http
            .get(url)
            .timeout(self.upload_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(ApiError::from_response(status, &body));
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let err = ApiError::from_response(status, &body);
            log::warn!("Backend returned {}: {}", status, err.user_message());
            return Err(err);
        }

        Ok(response.json::<T>().await?)
    }
}

pub fn resolve_reference(base: &Url, reference: &str) -> Result<Url, ApiError> {
    let reference = reference.trim();
    if reference.is_empty() || reference == "#" {
        return Err(ApiError::setup("No download link available"));
    }

    base.join(reference)
        .map_err(|e| ApiError::setup(format!("Invalid download link '{}': {}", reference, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::NetworkErrorKind;
    use crate::api::stub::StubBackend;

    fn client_for(base: &str) -> ApiClient {
        ApiClient::with_endpoints(
            Endpoints::with_base(base).unwrap(),
            Duration::from_secs(5),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn closed_port_base() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    #[test]
    fn resolves_relative_and_absolute_links() {
        let base = Url::parse("http://127.0.0.1:5000/bulk").unwrap();
        assert_eq!(
            resolve_reference(&base, "/download/a.csv").unwrap().as_str(),
            "http://127.0.0.1:5000/download/a.csv"
        );
        assert_eq!(
            resolve_reference(&base, "http://10.0.0.2:5006/download/b.csv").unwrap().as_str(),
            "http://10.0.0.2:5006/download/b.csv"
        );
        assert!(matches!(resolve_reference(&base, "#"), Err(ApiError::Setup { .. })));
        assert!(matches!(resolve_reference(&base, ""), Err(ApiError::Setup { .. })));
    }

    #[test]
    fn invalid_endpoint_is_reported_with_its_key() {
        let config = Config {
            bulk_url: "not a url".into(),
            ..Config::default()
        };
        match Endpoints::from_config(&config) {
            Err(ConfigError::InvalidUrl { key, .. }) => assert_eq!(key, "BULK_URL"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[actix_web::test]
    async fn analyse_round_trip() {
        let stub = StubBackend::start().await;
        let client = client_for(&stub.base);

        let result = client.analyse("summer2024").await.unwrap();
        assert_eq!(result.original_password, "summer2024");
        assert_eq!(result.crack_times["dictionary_attack"], 0.5);
        assert_eq!(result.vulnerabilities.len(), 1);
    }

    #[actix_web::test]
    async fn server_error_carries_backend_message() {
        let stub = StubBackend::start().await;
        let client = client_for(&stub.base);

        let err = client.analyse(StubBackend::REJECTED_PASSWORD).await.unwrap_err();
        assert!(matches!(err, ApiError::Server { status: 400, .. }));
        assert_eq!(err.user_message(), "Server error: Please provide a valid password string");
    }

    #[actix_web::test]
    async fn passphrase_and_insights() {
        let stub = StubBackend::start().await;
        let client = client_for(&stub.base);

        let phrases = vec!["blue whale".to_string(), "1987".to_string()];
        let passphrase = client.generate_passphrase(&phrases).await.unwrap();
        assert_eq!(passphrase.passphrase, "blue whale-1987!9");

        let insights = client.insights().await.unwrap();
        assert_eq!(insights.insights.len(), 2);
        assert_eq!(insights.insights[0].header, "Length beats complexity");
    }

    #[actix_web::test]
    async fn uploads_and_downloads_reports() {
        let stub = StubBackend::start().await;
        let client = client_for(&stub.base);
        let upload = Upload { file_name: "list.csv".into(), bytes: b"password\nhunter22\n".to_vec() };

        let bulk = client.bulk_analysis(&upload).await.unwrap();
        assert_eq!(bulk.total_passwords_analyzed, 4);
        let report = client.download(&client.endpoints().bulk, &bulk.download_link).await.unwrap();
        assert!(report.starts_with(b"password,strength"));

        let pii = client.bulk_pii(&upload).await.unwrap();
        assert!(pii.statistics.is_consistent());
        let report = client.download(&client.endpoints().bulk_pii, &pii.download_url).await.unwrap();
        assert!(!report.is_empty());
    }

    #[actix_web::test]
    async fn wrong_upload_type_is_a_server_error() {
        let stub = StubBackend::start().await;
        let client = client_for(&stub.base);
        let upload = Upload { file_name: "list.txt".into(), bytes: b"x".to_vec() };

        let err = client.bulk_pii(&upload).await.unwrap_err();
        assert_eq!(err.user_message(), "Server error: File type not allowed. Please upload a CSV file.");
    }

    #[actix_web::test]
    async fn missing_report_is_a_server_error() {
        let stub = StubBackend::start().await;
        let client = client_for(&stub.base);

        let err = client.download(&client.endpoints().bulk, "/download/missing.csv").await.unwrap_err();
        assert!(matches!(err, ApiError::Server { status: 404, .. }));
    }

    #[actix_web::test]
    async fn closed_port_is_a_network_error() {
        let client = client_for(&closed_port_base());

        let err = client.insights().await.unwrap_err();
        assert!(matches!(err, ApiError::Network { kind: NetworkErrorKind::Connect, .. }), "{:?}", err);
        assert!(err.is_retryable());
    }

    #[actix_web::test]
    async fn slow_backend_times_out() {
        let stub = StubBackend::start().await;
        let endpoints = Endpoints {
            analyse: Url::parse(&format!("{}/slow", stub.base)).unwrap(),
            ..Endpoints::with_base(&stub.base).unwrap()
        };
        let client = ApiClient::with_endpoints(endpoints, Duration::from_millis(50), Duration::from_secs(5)).unwrap();

        let err = client.analyse("summer2024").await.unwrap_err();
        assert!(matches!(err, ApiError::Network { kind: NetworkErrorKind::Timeout, .. }), "{:?}", err);
    }

    #[actix_web::test]
    async fn malformed_body_is_unknown() {
        let stub = StubBackend::start().await;
        let endpoints = Endpoints {
            insights: Url::parse(&format!("{}/garbage", stub.base)).unwrap(),
            ..Endpoints::with_base(&stub.base).unwrap()
        };
        let client = ApiClient::with_endpoints(endpoints, Duration::from_secs(5), Duration::from_secs(5)).unwrap();

        let err = client.insights().await.unwrap_err();
        assert!(matches!(err, ApiError::Unknown { .. }), "{:?}", err);
    }

    #[tokio::test]
    async fn unreadable_upload_is_a_setup_error() {
        let file = SelectedFile {
            path: std::path::PathBuf::from("/definitely/not/here.csv"),
            name: "here.csv".into(),
            size: 0,
        };
        let err = Upload::read(&file).await.unwrap_err();
        assert!(err.user_message().starts_with("Error: Failed to read here.csv"));
    }
}
