//! CLI integration tests for the oas-conform binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("oas-conform"));
    cmd.env_remove("RUST_LOG");
    cmd
}

// Helper to create a temp document file
fn write_temp_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const LOCAL_JSON: &str = r#"{
    "swagger": "2.0",
    "info": { "title": "My Local API", "version": "1.0.0" },
    "paths": {
        "/cotacoes": { "get": { "summary": "Get stock quotes" } },
        "/users": { "get": { "summary": "Get users" } }
    },
    "securityDefinitions": {
        "api_key": { "type": "apiKey", "name": "api_key", "in": "header" }
    }
}"#;

const REFERENCE_YAML: &str = "openapi: 3.0.0
info:
  title: B3 API
  version: 2.0.0
paths:
  /users:
    get:
      responses:
        200:
          description: ok
components:
  schemas:
    ContactApiModel:
      type: object
  securitySchemes:
    oauth2_client_credentials:
      type: oauth2
";

fn fixtures(dir: &TempDir) -> (std::path::PathBuf, std::path::PathBuf) {
    (
        write_temp_file(dir, "local.json", LOCAL_JSON),
        write_temp_file(dir, "b3.yaml", REFERENCE_YAML),
    )
}

mod compare_command {
    use super::*;

    #[test]
    fn text_report() {
        let dir = TempDir::new().unwrap();
        let (local, reference) = fixtures(&dir);

        cmd()
            .args([
                "compare",
                local.to_str().unwrap(),
                reference.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("Divergences:"))
            .stdout(predicate::str::contains(
                "Path '/cotacoes' in local API not found in B3 API.",
            ))
            .stdout(predicate::str::contains(
                "Method 'get' for path '/users' found in both APIs.",
            ));
    }

    #[test]
    fn json_report() {
        let dir = TempDir::new().unwrap();
        let (local, reference) = fixtures(&dir);

        let output = cmd()
            .args([
                "compare",
                local.to_str().unwrap(),
                reference.to_str().unwrap(),
                "--json",
            ])
            .output()
            .unwrap();
        assert!(output.status.success());

        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(
            report["divergences"]["security"],
            serde_json::json!([
                "Security scheme 'api_key' in local API not found in B3 API.",
                "Security scheme 'oauth2_client_credentials' in B3 API not found in local API."
            ])
        );
        assert_eq!(
            report["divergences"]["schemas"],
            serde_json::json!(["Schema 'ContactApiModel' in B3 API not found in local API."])
        );
    }

    #[test]
    fn pretty_requires_json() {
        let dir = TempDir::new().unwrap();
        let (local, reference) = fixtures(&dir);

        cmd()
            .args([
                "compare",
                local.to_str().unwrap(),
                reference.to_str().unwrap(),
                "--pretty",
            ])
            .assert()
            .failure()
            .code(2);
    }

    #[test]
    fn report_to_output_file() {
        let dir = TempDir::new().unwrap();
        let (local, reference) = fixtures(&dir);
        let out = dir.path().join("report.json");

        cmd()
            .args([
                "compare",
                local.to_str().unwrap(),
                reference.to_str().unwrap(),
                "--json",
                "--pretty",
                "--output",
                out.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());

        let content = fs::read_to_string(&out).unwrap();
        assert!(content.contains("\"divergences\": {\n"));
    }

    #[test]
    fn strict_fails_on_divergence() {
        let dir = TempDir::new().unwrap();
        let (local, reference) = fixtures(&dir);

        cmd()
            .args([
                "compare",
                local.to_str().unwrap(),
                reference.to_str().unwrap(),
                "--strict",
            ])
            .assert()
            .failure()
            .code(1);
    }

    #[test]
    fn strict_passes_for_identical_documents() {
        let dir = TempDir::new().unwrap();
        let (local, _) = fixtures(&dir);

        cmd()
            .args([
                "compare",
                local.to_str().unwrap(),
                local.to_str().unwrap(),
                "--strict",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("0 divergence(s)"));
    }

    #[test]
    fn unsupported_format() {
        let dir = TempDir::new().unwrap();
        let (_, reference) = fixtures(&dir);
        let local = write_temp_file(&dir, "local.txt", LOCAL_JSON);

        cmd()
            .args([
                "compare",
                local.to_str().unwrap(),
                reference.to_str().unwrap(),
            ])
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("unsupported file format"));
    }

    #[test]
    fn file_not_found() {
        let dir = TempDir::new().unwrap();
        let (local, _) = fixtures(&dir);

        cmd()
            .args(["compare", local.to_str().unwrap(), "/nonexistent/b3.json"])
            .assert()
            .failure()
            .code(3)
            .stderr(predicate::str::contains("reference document"));
    }

    #[test]
    fn invalid_json() {
        let dir = TempDir::new().unwrap();
        let (_, reference) = fixtures(&dir);
        let local = write_temp_file(&dir, "local.json", "{ not json");

        cmd()
            .args([
                "compare",
                local.to_str().unwrap(),
                reference.to_str().unwrap(),
            ])
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("invalid JSON"));
    }
}

mod adapt_command {
    use super::*;

    #[test]
    fn writes_yaml_output() {
        let dir = TempDir::new().unwrap();
        let (local, reference) = fixtures(&dir);
        let out = dir.path().join("adapted.yaml");

        cmd()
            .args([
                "adapt",
                local.to_str().unwrap(),
                reference.to_str().unwrap(),
                "--output",
                out.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "renamed path '/cotacoes' to '/v1/market-data/quotes'",
            ))
            .stdout(predicate::str::contains("upgraded swagger 2.0 to openapi 3.0.0"))
            .stdout(predicate::str::contains(
                "Adapted OpenAPI specification saved to:",
            ));

        let adapted = oas_conform::load_document(&out).unwrap();
        assert_eq!(adapted["openapi"], "3.0.0");
        assert!(adapted.get("swagger").is_none());
        assert!(adapted["paths"].get("/v1/market-data/quotes").is_some());
        assert!(adapted["components"]["schemas"]
            .get("ContactApiModel")
            .is_some());
        assert!(adapted["components"]["securitySchemes"]
            .get("oauth2_client_credentials")
            .is_some());
    }

    #[test]
    fn leaves_input_file_untouched() {
        let dir = TempDir::new().unwrap();
        let (local, reference) = fixtures(&dir);
        let out = dir.path().join("adapted.json");

        cmd()
            .args([
                "adapt",
                local.to_str().unwrap(),
                reference.to_str().unwrap(),
                "-o",
                out.to_str().unwrap(),
            ])
            .assert()
            .success();

        assert_eq!(fs::read_to_string(&local).unwrap(), LOCAL_JSON);
        let content = fs::read_to_string(&out).unwrap();
        assert!(content.contains("\"openapi\": \"3.0.0\""));
    }

    #[test]
    fn unsupported_output_format() {
        let dir = TempDir::new().unwrap();
        let (local, reference) = fixtures(&dir);
        let out = dir.path().join("adapted.xml");

        cmd()
            .args([
                "adapt",
                local.to_str().unwrap(),
                reference.to_str().unwrap(),
                "--output",
                out.to_str().unwrap(),
            ])
            .assert()
            .failure()
            .code(2);
        assert!(!out.exists());
    }

    #[test]
    fn output_is_required() {
        let dir = TempDir::new().unwrap();
        let (local, reference) = fixtures(&dir);

        cmd()
            .args(["adapt", local.to_str().unwrap(), reference.to_str().unwrap()])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--output"));
    }
}

mod run_command {
    use super::*;

    #[test]
    fn prints_report_then_writes_document() {
        let dir = TempDir::new().unwrap();
        let (local, reference) = fixtures(&dir);
        let out = dir.path().join("adapted.json");

        cmd()
            .args([
                "run",
                local.to_str().unwrap(),
                reference.to_str().unwrap(),
                "--output",
                out.to_str().unwrap(),
                "--json",
            ])
            .assert()
            .success()
            .stdout(predicate::str::starts_with("Comparison Report:\n{\n"))
            .stdout(predicate::str::contains(
                "Adapted OpenAPI specification saved to:",
            ));

        assert!(out.exists());
    }
}

#[cfg(feature = "remote")]
mod conformance_command {
    use super::*;

    #[test]
    fn unreachable_service_prints_fallback() {
        let dir = TempDir::new().unwrap();
        let (local, _) = fixtures(&dir);

        cmd()
            .env_remove("OAS_CONFORM_API_KEY")
            .args([
                "conformance",
                local.to_str().unwrap(),
                "--endpoint",
                "http://127.0.0.1:9/v1/chat/completions",
                "--model",
                "test-model",
                "--timeout-secs",
                "5",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "No response generated, please try again.",
            ));
    }

    #[test]
    fn endpoint_is_required() {
        let dir = TempDir::new().unwrap();
        let (local, _) = fixtures(&dir);

        cmd()
            .env_remove("OAS_CONFORM_ENDPOINT")
            .env_remove("OAS_CONFORM_MODEL")
            .args(["conformance", local.to_str().unwrap()])
            .assert()
            .failure()
            .code(2);
    }

    #[test]
    fn missing_document_fails_before_request() {
        cmd()
            .args([
                "conformance",
                "/nonexistent/api.json",
                "--endpoint",
                "http://127.0.0.1:9/v1/chat/completions",
                "--model",
                "test-model",
            ])
            .assert()
            .failure()
            .code(3);
    }
}
