#![allow(dead_code)]

use std::net::SocketAddr;

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use waitlist::config::{Config, EmailJsConfig, SheetsConfig};

pub const SHEET_ID: &str = "test-sheet";
pub const ACCESS_TOKEN: &str = "test-access-token";
pub const APPEND_PATH: &str = "/v4/spreadsheets/test-sheet/values/A:B:append";
pub const METADATA_PATH: &str = "/v4/spreadsheets/test-sheet";
pub const EMAIL_SEND_PATH: &str = "/api/v1.0/email/send";

/// A running server wired to mock Google and EmailJS APIs.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub google: MockServer,
    pub emailjs: MockServer,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// POST a JSON body to the submission endpoint, return (body, status).
    pub async fn submit_json(&self, data: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/submit-email"))
            .json(data)
            .send()
            .await
            .expect("submit json failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// POST a raw body with the given content type, return (body, status).
    pub async fn submit_raw(&self, content_type: &str, raw: &'static str) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/submit-email"))
            .header("content-type", content_type)
            .body(raw)
            .send()
            .await
            .expect("submit raw failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Submit the landing page form, return (html, status).
    pub async fn join(&self, email: &str) -> (String, StatusCode) {
        let resp = self
            .client
            .post(self.url("/waitlist"))
            .form(&[("email", email)])
            .send()
            .await
            .expect("join form failed");
        let status = resp.status();
        (resp.text().await.unwrap_or_default(), status)
    }

    pub async fn mock_token(&self) {
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type="))
            .and(body_string_contains("assertion="))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": ACCESS_TOKEN,
                "expires_in": 3599,
                "token_type": "Bearer",
            })))
            .mount(&self.google)
            .await;
    }

    pub async fn mock_metadata(&self, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(METADATA_PATH))
            .and(query_param("fields", "properties.title"))
            .and(header("authorization", format!("Bearer {ACCESS_TOKEN}").as_str()))
            .respond_with(response)
            .mount(&self.google)
            .await;
    }

    /// Token + metadata succeed, append answers 200 and must be hit `expected` times.
    pub async fn mock_sheets_ok(&self, expected: u64) {
        self.mock_token().await;
        self.mock_metadata(
            ResponseTemplate::new(200).set_body_json(json!({ "properties": { "title": "Waitlist" } })),
        )
        .await;
        self.mock_append(ResponseTemplate::new(200).set_body_json(append_ok()), expected)
            .await;
    }

    pub async fn mock_append(&self, response: ResponseTemplate, expected: u64) {
        Mock::given(method("POST"))
            .and(path(APPEND_PATH))
            .and(query_param("valueInputOption", "USER_ENTERED"))
            .and(header("authorization", format!("Bearer {ACCESS_TOKEN}").as_str()))
            .respond_with(response)
            .expect(expected)
            .mount(&self.google)
            .await;
    }

    pub async fn mock_email(&self, response: ResponseTemplate, expected: u64) {
        Mock::given(method("POST"))
            .and(path(EMAIL_SEND_PATH))
            .respond_with(response)
            .expect(expected)
            .mount(&self.emailjs)
            .await;
    }
}

pub fn append_ok() -> Value {
    json!({
        "spreadsheetId": SHEET_ID,
        "tableRange": "Sheet1!A1:B1",
        "updates": {
            "spreadsheetId": SHEET_ID,
            "updatedRange": "Sheet1!A2:B2",
            "updatedRows": 1,
            "updatedColumns": 2,
            "updatedCells": 2,
        }
    })
}

pub fn google_error(code: u16, status: &str, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(code).set_body_json(json!({
        "error": { "code": code, "message": message, "status": status }
    }))
}

pub fn test_private_key() -> String {
    std::fs::read_to_string("tests/fixtures/service_account_key.pem")
        .expect("missing test key fixture")
}

pub fn test_config(google: &MockServer, emailjs: &MockServer) -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        max_body_size: 65_536,
        http_timeout_secs: 5,
        cors_origins: vec![],
        log_level: "warn".to_string(),
        sheets: Some(SheetsConfig {
            client_email: "waitlist@test-project.iam.gserviceaccount.com".to_string(),
            private_key: test_private_key(),
            spreadsheet_id: SHEET_ID.to_string(),
            range: "A:B".to_string(),
            token_uri: format!("{}/token", google.uri()),
            api_base: google.uri(),
        }),
        emailjs: Some(EmailJsConfig {
            service_id: "service_test".to_string(),
            template_id: "template_test".to_string(),
            user_id: "user_test".to_string(),
            access_token: None,
            api_base: emailjs.uri(),
        }),
    }
}

/// Spawn a fully configured test app.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Spawn a test app after letting the caller adjust the config.
pub async fn spawn_app_with(configure: impl FnOnce(&mut Config)) -> TestApp {
    let google = MockServer::start().await;
    let emailjs = MockServer::start().await;

    let mut config = test_config(&google, &emailjs);
    configure(&mut config);

    let app = waitlist::build_app(config);

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        addr,
        client,
        google,
        emailjs,
    }
}
