// src/api/stub.rs
//
// In-process stand-in for the audit services, bound to an ephemeral port.
use std::time::Duration;
use actix_web::dev::ServerHandle;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use serde::Deserialize;
use serde_json::json;

pub struct StubBackend {
    pub base: String,
    handle: ServerHandle,
}

#[derive(Deserialize)]
struct AnalyseBody {
    password: String,
}

#[derive(Deserialize)]
struct PassphraseBody {
    phrases: Vec<String>,
}

impl StubBackend {
    /// Password the stub answers with a 400.
    pub const REJECTED_PASSWORD: &'static str = "rejected-by-backend";

    pub async fn start() -> Self {
        let server = HttpServer::new(|| {
            App::new()
                .route("/analyse", web::post().to(analyse))
                .route("/slow", web::post().to(slow))
                .route("/garbage", web::get().to(garbage))
                .route("/generate-passphrase", web::post().to(passphrase))
                .route("/generate_insights", web::get().to(insights))
                .route("/bulk", web::post().to(bulk))
                .route("/bulk_pii", web::post().to(bulk_pii))
                .route("/download/{name}", web::get().to(download))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind stub backend");

        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        Self {
            base: format!("http://{}", addr),
            handle,
        }
    }
}

impl Drop for StubBackend {
    fn drop(&mut self) {
        // The stop command is sent eagerly; completion is not awaited
        let _ = self.handle.stop(false);
    }
}

async fn analyse(body: web::Json<AnalyseBody>) -> HttpResponse {
    if body.password == StubBackend::REJECTED_PASSWORD {
        return HttpResponse::BadRequest().json(json!({"error": "Please provide a valid password string"}));
    }

    HttpResponse::Ok().json(json!({
        "original_password": body.password,
        "strength": 0.21,
        "new_strength": 0.93,
        "suggested_password": "Summ3r!Breeze#2024",
        "vulnerabilities_detected": ["Contains a year"],
        "improvement_suggestions": ["Add symbols", "Use more than 12 characters"],
        "time_to_crack": {
            "password": body.password,
            "crack_times": {
                "dictionary_attack": {"days": 0, "minutes": 30},
                "offline_brute_force": {"days": 2, "minutes": 0},
                "rainbow_table": {"days": 0, "minutes": 0.2}
            }
        },
        "new_time_to_crack": {
            "password": "Summ3r!Breeze#2024",
            "crack_times": {
                "dictionary_attack": {"days": 400000, "minutes": 0},
                "offline_brute_force": {"days": 9000000, "minutes": 0}
            }
        }
    }))
}

async fn slow() -> HttpResponse {
    actix_web::rt::time::sleep(Duration::from_millis(500)).await;
    HttpResponse::Ok().json(json!({"strength": 0.5}))
}

async fn garbage() -> HttpResponse {
    HttpResponse::Ok().content_type("application/json").body("{not json")
}

async fn passphrase(body: web::Json<PassphraseBody>) -> HttpResponse {
    if body.phrases.is_empty() {
        return HttpResponse::BadRequest().json(json!({"error": "Please provide at least one phrase"}));
    }

    HttpResponse::Ok().json(json!({
        "passphrase": format!("{}!9", body.phrases.join("-")),
        "strength": 0.91,
        "time_to_crack": {"crack_times": {"offline_brute_force": {"days": 36500, "minutes": 0}}}
    }))
}

async fn insights() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "insights": [
            {"header": "Length beats complexity", "quote": "Every extra character multiplies the search space."},
            {"header": "Never reuse passwords", "quote": "One breach should not unlock every account."}
        ]
    }))
}

// Multipart bodies are only sniffed for the declared file name
fn uploaded_file_name(body: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(body);
    let start = text.find("filename=\"")? + "filename=\"".len();
    let end = text[start..].find('"')?;
    Some(text[start..start + end].to_string())
}

async fn bulk(body: web::Bytes) -> HttpResponse {
    match uploaded_file_name(&body) {
        Some(name) if name.ends_with(".csv") || name.ends_with(".xlsx") || name.ends_with(".xls") => {}
        _ => return HttpResponse::BadRequest().json(json!({"error": "Unsupported file format"})),
    }

    HttpResponse::Ok().json(json!({
        "download_link": "/download/bulk-report.csv",
        "total_passwords_analyzed": 4,
        "weak_passwords": 2,
        "moderate_passwords": 1,
        "strong_passwords": 1,
        "password_details": [
            {"password": "hunter22", "strength": "0.12", "issues": "Too short\nCommon word", "suggested_password": "Hunt3r!Moon#22"},
            {"password": "Tr0ub4dor&3", "strength": "0.71", "issues": "", "suggested_password": "Tr0ub4dor&3-Sky"}
        ]
    }))
}

async fn bulk_pii(req: HttpRequest, body: web::Bytes) -> HttpResponse {
    match uploaded_file_name(&body) {
        Some(name) if name.ends_with(".csv") => {}
        _ => {
            return HttpResponse::BadRequest()
                .json(json!({"error": "File type not allowed. Please upload a CSV file."}))
        }
    }

    let host = req.connection_info().host().to_string();
    HttpResponse::Ok().json(json!({
        "message": "File processed successfully",
        "download_url": format!("http://{}/download/pii-report.csv", host),
        "statistics": {"matched_passwords": 1, "not_matched_passwords": 3, "total_passwords": 4}
    }))
}

async fn download(path: web::Path<String>) -> HttpResponse {
    match path.as_str() {
        "bulk-report.csv" => HttpResponse::Ok()
            .content_type("text/csv")
            .body("password,strength,issues,suggested_password\nhunter22,12,Too short,Hunt3r!Moon#22\n"),
        "pii-report.csv" => HttpResponse::Ok()
            .content_type("text/csv")
            .body("password,remark\njohn1987,Contains birth year\n"),
        _ => HttpResponse::NotFound().json(json!({"error": "File not found"})),
    }
}
