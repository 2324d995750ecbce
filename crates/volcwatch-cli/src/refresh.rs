//! One refresh cycle: fetch both HANS lists, reconcile, and render.

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use volcwatch_core::{reconcile, AppConfig, ColorCode, ReconciledRecord};
use volcwatch_sources::HansClient;

use crate::render::{render_snapshot, OutputFormat};

/// The reconciled volcano set produced by one successful refresh.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct Snapshot {
    pub refreshed_at: DateTime<Utc>,
    pub records: Vec<ReconciledRecord>,
}

impl Snapshot {
    pub(crate) fn count_by_color(&self, color: ColorCode) -> usize {
        self.records
            .iter()
            .filter(|r| r.color_code == color)
            .count()
    }
}

/// Fetches the elevated list, then the monitored list, and reconciles them.
///
/// Either list failing aborts the cycle. Per-volcano detail failures only
/// drop the affected record.
pub(crate) async fn refresh_snapshot(
    client: &HansClient,
    config: &AppConfig,
    include_monitored: bool,
) -> anyhow::Result<Snapshot> {
    let elevated = client
        .get_elevated_volcanoes()
        .await
        .context("failed to fetch elevated volcano list")?;

    let monitored = if include_monitored {
        client
            .get_monitored_volcanoes()
            .await
            .context("failed to fetch monitored volcano list")?
    } else {
        Vec::new()
    };

    let outcome = reconcile(&elevated, &monitored, client, config.detail_concurrency).await;
    let snapshot = Snapshot {
        refreshed_at: Utc::now(),
        records: outcome.records,
    };

    tracing::info!(
        total = snapshot.records.len(),
        red = snapshot.count_by_color(ColorCode::Red),
        orange = snapshot.count_by_color(ColorCode::Orange),
        yellow = snapshot.count_by_color(ColorCode::Yellow),
        green = snapshot.count_by_color(ColorCode::Green),
        unassigned = snapshot.count_by_color(ColorCode::Unassigned),
        "volcano refresh complete"
    );

    Ok(snapshot)
}

pub(crate) async fn run_refresh(
    config: &AppConfig,
    include_monitored: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let client = HansClient::from_config(config)?;
    let snapshot = refresh_snapshot(&client, config, include_monitored).await?;
    print!("{}", render_snapshot(&snapshot, format)?);
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use serde_json::json;
    use volcwatch_core::{config, Environment, RecordSource};
    use volcwatch_sources::HttpSettings;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    pub(crate) fn test_config(hans_base_url: &str) -> AppConfig {
        AppConfig {
            env: Environment::Test,
            log_level: "info".to_owned(),
            hans_base_url: hans_base_url.to_owned(),
            ambee_base_url: config::DEFAULT_AMBEE_BASE_URL.to_owned(),
            ambee_api_key: None,
            ambee_country: "IDN".to_owned(),
            user_agent: "volcwatch-test/0.1".to_owned(),
            request_timeout_secs: 0,
            max_retries: 0,
            retry_backoff_base_ms: 0,
            detail_concurrency: 4,
            refresh_interval_secs: 600,
        }
    }

    pub(crate) fn test_client(server: &MockServer) -> HansClient {
        HansClient::with_base_url(&HttpSettings::default(), &server.uri())
            .expect("failed to build test HansClient")
    }

    async fn mount(server: &MockServer, route: &str, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(template)
            .mount(server)
            .await;
    }

    pub(crate) async fn mount_healthy_hans(server: &MockServer) {
        mount(
            server,
            "/getElevatedVolcanoes",
            ResponseTemplate::new(200)
                .set_body_json(json!([{"vnum": "311240", "color_code": "ORANGE"}])),
        )
        .await;
        mount(
            server,
            "/getMonitoredVolcanoes",
            ResponseTemplate::new(200).set_body_json(json!({
                "result": [{"vnum": "311240"}, {"vnum": "312030"}]
            })),
        )
        .await;
        mount(
            server,
            "/getVolcano/311240",
            ResponseTemplate::new(200).set_body_json(json!({"latitude": 52.1, "longitude": -174.1})),
        )
        .await;
        mount(
            server,
            "/getVolcano/312030",
            ResponseTemplate::new(200).set_body_json(json!({"lat": "55.4", "lng": "-161.9"})),
        )
        .await;
    }

    #[tokio::test]
    async fn snapshot_holds_elevated_then_monitored_records() {
        let server = MockServer::start().await;
        mount_healthy_hans(&server).await;

        let snapshot = refresh_snapshot(&test_client(&server), &test_config(&server.uri()), true)
            .await
            .unwrap();

        let got: Vec<_> = snapshot
            .records
            .iter()
            .map(|r| (r.id.as_str(), r.color_code, r.source))
            .collect();
        assert_eq!(
            got,
            vec![
                ("311240", ColorCode::Orange, RecordSource::Elevated),
                ("312030", ColorCode::Green, RecordSource::Monitored),
            ]
        );
        assert_eq!(snapshot.count_by_color(ColorCode::Green), 1);
    }

    #[tokio::test]
    async fn monitored_list_failure_aborts_the_whole_refresh() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/getElevatedVolcanoes",
            ResponseTemplate::new(200)
                .set_body_json(json!([{"vnum": "311240", "color_code": "RED"}])),
        )
        .await;
        mount(&server, "/getMonitoredVolcanoes", ResponseTemplate::new(500)).await;
        mount(
            &server,
            "/getVolcano/311240",
            ResponseTemplate::new(200).set_body_json(json!({"latitude": 52.1, "longitude": -174.1})),
        )
        .await;

        let result =
            refresh_snapshot(&test_client(&server), &test_config(&server.uri()), true).await;

        let err = result.expect_err("a monitored-list failure must not yield a partial snapshot");
        assert!(
            format!("{err:#}").contains("failed to fetch monitored volcano list"),
            "got: {err:#}"
        );
    }

    #[tokio::test]
    async fn elevated_list_failure_aborts_before_monitored_fetch() {
        let server = MockServer::start().await;
        mount(&server, "/getElevatedVolcanoes", ResponseTemplate::new(503)).await;
        Mock::given(method("GET"))
            .and(path("/getMonitoredVolcanoes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let result =
            refresh_snapshot(&test_client(&server), &test_config(&server.uri()), true).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn elevated_only_skips_monitored_list() {
        let server = MockServer::start().await;
        mount_healthy_hans(&server).await;

        let snapshot = refresh_snapshot(&test_client(&server), &test_config(&server.uri()), false)
            .await
            .unwrap();

        assert_eq!(snapshot.records.len(), 1);
        assert_eq!(snapshot.records[0].source, RecordSource::Elevated);
    }
}
