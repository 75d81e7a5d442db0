//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::TapConfig;
use crate::engine::{StreamStatus, SyncReport};
use crate::error::{Error, Result, ResultExt};
use crate::output::{Emitter, JsonLinesWriter, Message};
use crate::state::StateManager;
use crate::tap::{Connector, IntercomTap, ReadOptions};
use serde_json::{json, Value};
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
    tap: IntercomTap,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self {
            cli,
            tap: IntercomTap::new(),
        }
    }

    /// Run the CLI command, writing messages to stdout
    pub async fn run(&self) -> Result<()> {
        let mut out = JsonLinesWriter::stdout(self.cli.format.is_pretty());
        self.run_with(&mut out).await
    }

    /// Run the CLI command against any emitter
    pub async fn run_with(&self, out: &mut dyn Emitter) -> Result<()> {
        match &self.cli.command {
            Commands::Spec => self.spec(out),
            Commands::Check => self.check(out).await,
            Commands::Discover => self.discover(out).await,
            Commands::Read {
                streams,
                state_per_page,
            } => self.read(streams, *state_per_page, out).await,
        }
    }

    /// Load configuration
    fn load_config(&self) -> Result<TapConfig> {
        // Inline config takes precedence
        if let Some(json_str) = &self.cli.config_json {
            return TapConfig::from_json_str(json_str);
        }
        if let Some(path) = &self.cli.config {
            return TapConfig::from_file(path);
        }
        Err(Error::config("Config not specified (use --config or --config-json)"))
    }

    /// Load state
    fn load_state(&self) -> Result<StateManager> {
        if let Some(state_json) = &self.cli.state_json {
            StateManager::from_json(state_json).context("Invalid --state-json")
        } else if let Some(path) = &self.cli.state {
            StateManager::from_file(path)
                .with_context(|| format!("Failed to load state from {}", path.display()))
        } else {
            Ok(StateManager::in_memory())
        }
    }

    /// Show spec
    fn spec(&self, out: &mut dyn Emitter) -> Result<()> {
        let spec = self.tap.spec();
        out.emit_value(&json!({
            "type": "SPEC",
            "spec": {
                "name": spec.name,
                "title": spec.title,
                "description": spec.description,
                "connectionSpecification": spec.config_schema
            }
        }))
    }

    /// Check connection
    async fn check(&self, out: &mut dyn Emitter) -> Result<()> {
        let config = self.load_config()?;
        let result = self.tap.check(&config).await?;

        if result.success {
            out.emit_value(&json!({
                "type": "CONNECTION_STATUS",
                "connectionStatus": {
                    "status": "SUCCEEDED",
                    "message": "Connection successful"
                }
            }))
        } else {
            let message = result.message.unwrap_or_default();
            out.emit_value(&json!({
                "type": "CONNECTION_STATUS",
                "connectionStatus": {
                    "status": "FAILED",
                    "message": format!("Connection failed: {message}")
                }
            }))?;
            Err(Error::ConnectionCheck { message })
        }
    }

    /// Discover streams
    async fn discover(&self, out: &mut dyn Emitter) -> Result<()> {
        let config = self.load_config()?;
        let catalog = self.tap.discover(&config).await?;
        out.emit_value(&json!({
            "type": "CATALOG",
            "catalog": catalog
        }))
    }

    /// Read streams
    async fn read(&self, streams: &[String], state_per_page: bool, out: &mut dyn Emitter) -> Result<()> {
        let config = self.load_config()?;
        let state = self.load_state()?;
        let options = ReadOptions {
            streams: (!streams.is_empty()).then(|| streams.to_vec()),
            state_per_page,
        };

        let report = self.tap.read(&config, state.clone(), &options, out).await?;

        out.emit(&Message::state(&state.snapshot().await))?;
        out.emit_value(&summary(&report))?;
        info!(
            records = report.stats.records_synced(),
            excluded = report.stats.records_excluded(),
            "Read complete"
        );

        report.into_result().map(|_| ())
    }
}

/// Final SYNC_SUMMARY message
fn summary(report: &SyncReport) -> Value {
    let failed = report.failed_streams().len();
    let successful = report.results.len() - failed;
    let status = if failed == 0 {
        "SUCCEEDED"
    } else if successful == 0 {
        "FAILED"
    } else {
        "PARTIAL"
    };

    let streams: Vec<Value> = report
        .results
        .iter()
        .map(|result| {
            let stats = report.stats.stream(&result.stream).cloned().unwrap_or_default();
            json!({
                "stream": result.stream,
                "status": match result.status {
                    StreamStatus::Success => "SUCCESS",
                    StreamStatus::Failed => "FAILED",
                },
                "records": stats.records,
                "excluded": stats.excluded,
                "pages": stats.pages,
                "error": result.error
            })
        })
        .collect();

    json!({
        "type": "SYNC_SUMMARY",
        "summary": {
            "status": status,
            "connector": crate::NAME,
            "total_records": report.stats.records_synced(),
            "total_streams": report.results.len(),
            "successful_streams": successful,
            "failed_streams": failed,
            "duration_ms": report.stats.duration_ms,
            "streams": streams
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::MessageCollector;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn runner(args: &[&str]) -> Runner {
        let mut argv = vec!["tap-intercom"];
        argv.extend_from_slice(args);
        Runner::new(Cli::parse_from(argv))
    }

    fn config_json(uri: &str) -> String {
        json!({"access_token": "tok", "api_url": uri, "max_retries": 0}).to_string()
    }

    #[tokio::test]
    async fn test_spec_without_config() {
        let mut out = MessageCollector::new();
        runner(&["spec"]).run_with(&mut out).await.unwrap();
        assert_eq!(out.values[0]["type"], json!("SPEC"));
        assert_eq!(
            out.values[0]["spec"]["connectionSpecification"]["required"],
            json!(["access_token"])
        );
    }

    #[tokio::test]
    async fn test_missing_config() {
        let mut out = MessageCollector::new();
        let err = runner(&["discover"]).run_with(&mut out).await.unwrap_err();
        assert!(err.is_config_error());
    }

    #[tokio::test]
    async fn test_discover_catalog() {
        let mut out = MessageCollector::new();
        runner(&["discover", "--config-json", r#"{"access_token":"t"}"#])
            .run_with(&mut out)
            .await
            .unwrap();
        let catalog = &out.values[0];
        assert_eq!(catalog["type"], json!("CATALOG"));
        assert_eq!(catalog["catalog"]["streams"].as_array().unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_check_failure_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admins"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let mut out = MessageCollector::new();
        let err = runner(&["check", "--config-json", &config_json(&server.uri())])
            .run_with(&mut out)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ConnectionCheck { .. }));
        assert_eq!(out.values[0]["connectionStatus"]["status"], json!("FAILED"));
    }

    #[tokio::test]
    async fn test_read_emits_final_state_and_summary() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "type": "list",
                "data": [{"id": "1", "name": "a"}, {"id": "2", "name": "b"}]
            })))
            .mount(&server)
            .await;

        let mut out = MessageCollector::new();
        runner(&["read", "--streams", "tags", "--config-json", &config_json(&server.uri())])
            .run_with(&mut out)
            .await
            .unwrap();

        assert!(matches!(out.messages.last(), Some(Message::State { .. })));
        let summary = &out.values[0]["summary"];
        assert_eq!(summary["status"], json!("SUCCEEDED"));
        assert_eq!(summary["total_records"], json!(2));
        assert_eq!(summary["streams"][0]["stream"], json!("tags"));
    }

    #[tokio::test]
    async fn test_read_failure_is_partial() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/teams"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let mut out = MessageCollector::new();
        let err = runner(&["read", "--streams", "tags,teams", "--config-json", &config_json(&server.uri())])
            .run_with(&mut out)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::SyncFailed { ref streams } if streams == &vec!["teams".to_string()]));
        let summary = &out.values[0]["summary"];
        assert_eq!(summary["status"], json!("PARTIAL"));
        assert_eq!(summary["failed_streams"], json!(1));
    }

    #[tokio::test]
    async fn test_read_persists_state_file() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/contacts/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": "c1", "updated_at": 1_700_000_000}]
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let state_path = dir.path().join("state.json");
        let state_arg = state_path.to_string_lossy().to_string();

        let mut out = MessageCollector::new();
        runner(&[
            "read",
            "--streams",
            "contacts",
            "--state",
            &state_arg,
            "--config-json",
            &config_json(&server.uri()),
        ])
        .run_with(&mut out)
        .await
        .unwrap();

        let saved: Value = serde_json::from_str(&std::fs::read_to_string(&state_path).unwrap()).unwrap();
        assert_eq!(
            saved["bookmarks"]["contacts"]["replication_key_value"],
            json!(1_700_000_000)
        );
    }
}
