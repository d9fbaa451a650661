//! # Integration Test Flows
//!
//! Full load cycles through the real HTTP transport against the fake
//! backend:
//!
//! 1. **Happy path**: every slot rendered, `call_kw` bodies as expected
//! 2. **Critical failure**: summary error aborts the cycle before phase 2
//! 3. **Isolation**: HTTP, decode and timeout failures stay in their section
//! 4. **Outputs**: file sink and markup escaping

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;

    use license_dashboard::{
        DashboardConfig, DashboardService, FileSink, HttpRpcTransport, LoadPhase, MemorySink,
        OutputTargets, RemoteQueryError, SecondaryDispatch, Section, SectionStatus, Slot,
    };

    use crate::integration::fake_backend::{FakeBackend, Reply};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn config_for(backend: &FakeBackend) -> DashboardConfig {
        let mut config = DashboardConfig::default();
        config.backend.base_url = backend.base_url();
        config
    }

    fn dashboard(
        config: DashboardConfig,
    ) -> (DashboardService<HttpRpcTransport>, Arc<MemorySink>) {
        let transport = HttpRpcTransport::new(&config.backend).expect("transport");
        let sink = Arc::new(MemorySink::new());
        let service =
            DashboardService::new(config, transport, OutputTargets::new().bind_all(sink.clone()))
                .expect("valid config");
        (service, sink)
    }

    fn status_of(outcome: &license_dashboard::LoadOutcome, section: Section) -> SectionStatus {
        outcome
            .report()
            .and_then(|r| r.section(section))
            .map(|r| r.status.clone())
            .expect("section reported")
    }

    // =============================================================================
    // HAPPY PATH
    // =============================================================================

    #[tokio::test]
    async fn test_full_cycle_over_http() {
        let backend = FakeBackend::healthy().await;
        let (service, sink) = dashboard(config_for(&backend));

        let outcome = service.load().await.unwrap();

        assert!(outcome.report().unwrap().is_complete());
        assert_eq!(service.phase(), LoadPhase::Ready);
        assert_eq!(
            backend.methods_called(),
            vec![
                "get_license_statistics",
                "get_license_by_edition",
                "get_license_trends",
                "get_license_by_client",
                "get_module_usage",
                "get_expiring_licenses"
            ]
        );

        assert_eq!(sink.get(Slot::StatTotal).as_deref(), Some("120"));
        assert_eq!(sink.get(Slot::StatExpiring).as_deref(), Some("5"));

        let clients = sink.get(Slot::TopClients).unwrap();
        assert_eq!(clients.matches("<tr>").count(), 2);
        assert!(clients.find("Acme (AC1)").unwrap() < clients.find("Globex (GL2)").unwrap());
        assert!(clients.contains(r#"<td class="text-right">5</td>"#));

        let expiring = sink.get(Slot::ExpiringLicenses).unwrap();
        assert!(expiring.contains(">1 days<"));
        assert!(expiring.contains("13 days"));
    }

    #[tokio::test]
    async fn test_call_kw_request_shape() {
        let backend = FakeBackend::healthy().await;
        let (service, _sink) = dashboard(config_for(&backend));

        service.load().await.unwrap();

        let calls = backend.calls();
        assert!(calls.iter().all(|c| c.model == "license.analytics"));
        let first = &calls[0].body;
        assert_eq!(first["jsonrpc"], "2.0");
        assert_eq!(first["method"], "call");
        assert_eq!(first["params"]["model"], "license.analytics");
        assert_eq!(first["params"]["method"], "get_license_statistics");
        assert_eq!(first["params"]["args"], json!([]));
        assert_eq!(first["params"]["kwargs"], json!({}));

        assert_eq!(backend.args_of("get_license_trends"), Some(json!([12])));
        assert_eq!(backend.args_of("get_license_by_client"), Some(json!([10])));
        assert_eq!(backend.args_of("get_expiring_licenses"), Some(json!([30])));

        let ids: Vec<_> = calls.iter().map(|c| c.body["id"].as_u64().unwrap()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_concurrent_dispatch_over_http() {
        let backend = FakeBackend::healthy().await;
        let mut config = config_for(&backend);
        config.load.secondary_dispatch = SecondaryDispatch::Concurrent;
        let (service, sink) = dashboard(config);

        let outcome = service.load().await.unwrap();

        assert!(outcome.report().unwrap().is_complete());
        assert_eq!(backend.calls().len(), 6);
        assert_eq!(backend.methods_called()[0], "get_license_statistics");
        assert!(sink.get(Slot::LicenseTrends).unwrap().contains("Sep 2026"));
    }

    // =============================================================================
    // CRITICAL PATH FAILURES
    // =============================================================================

    #[tokio::test]
    async fn test_summary_rpc_error_aborts_cycle() {
        let backend = FakeBackend::healthy().await;
        backend.reply(
            "get_license_statistics",
            Reply::RpcError {
                code: 200,
                message: "Odoo Server Error".into(),
                detail: "Access denied".into(),
            },
        );
        let (service, sink) = dashboard(config_for(&backend));

        let outcome = service.load().await.unwrap();

        match outcome.error() {
            Some(RemoteQueryError::Rpc { code, message, .. }) => {
                assert_eq!(*code, 200);
                assert!(message.contains("Access denied"));
            }
            other => panic!("expected RPC error, got {other:?}"),
        }
        assert_eq!(backend.methods_called(), vec!["get_license_statistics"]);
        assert_eq!(service.phase(), LoadPhase::Failed);
        assert!(service.view_state().is_loading());
        assert!(sink.get(Slot::ErrorBanner).unwrap().contains("Access denied"));
        assert!(sink.get(Slot::TopClients).is_none());
    }

    #[tokio::test]
    async fn test_summary_without_result_aborts_cycle() {
        let backend = FakeBackend::healthy().await;
        backend.reply(
            "get_license_statistics",
            Reply::Raw(r#"{"jsonrpc":"2.0","id":1}"#.into()),
        );
        let (service, sink) = dashboard(config_for(&backend));

        let outcome = service.load().await.unwrap();

        assert!(matches!(
            outcome.error(),
            Some(RemoteQueryError::Decode(msg)) if msg.contains("neither result nor error")
        ));
        assert_eq!(service.phase(), LoadPhase::Failed);
        assert_eq!(backend.calls().len(), 1);
        assert!(sink.get(Slot::StatTotal).is_none());
    }

    #[tokio::test]
    async fn test_unreachable_backend_fails_phase_one() {
        // Grab a free port, then release it so nothing is listening.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let mut config = DashboardConfig::default();
        config.backend.base_url = format!("http://127.0.0.1:{port}");
        let (service, _sink) = dashboard(config);

        let outcome = service.load().await.unwrap();

        assert!(matches!(
            outcome.error(),
            Some(RemoteQueryError::Connection(_) | RemoteQueryError::Transport(_))
        ));
        assert_eq!(service.cycle_counts(), (1, 1));
    }

    // =============================================================================
    // SECONDARY ISOLATION
    // =============================================================================

    #[tokio::test]
    async fn test_http_status_failure_is_isolated() {
        let backend = FakeBackend::healthy().await;
        backend.reply("get_module_usage", Reply::Status(502));
        let (service, sink) = dashboard(config_for(&backend));

        let outcome = service.load().await.unwrap();

        assert!(matches!(
            status_of(&outcome, Section::TopModules),
            SectionStatus::Failed(RemoteQueryError::HttpStatus { status: 502 })
        ));
        assert!(sink.get(Slot::TopModules).is_none());
        assert!(sink.get(Slot::ExpiringLicenses).is_some());
        assert_eq!(backend.calls().len(), 6);
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let backend = FakeBackend::healthy().await;
        backend.reply("get_license_trends", Reply::Raw("{not json".into()));
        backend.reply(
            "get_license_by_client",
            Reply::Result(json!([{"name": "Acme", "count": "many"}])),
        );
        let (service, _sink) = dashboard(config_for(&backend));

        let outcome = service.load().await.unwrap();

        assert!(matches!(
            status_of(&outcome, Section::Trends),
            SectionStatus::Failed(RemoteQueryError::Decode(_))
        ));
        assert!(matches!(
            status_of(&outcome, Section::TopClients),
            SectionStatus::Failed(RemoteQueryError::Decode(_))
        ));
        assert!(matches!(
            status_of(&outcome, Section::Editions),
            SectionStatus::Rendered { rows: 2 }
        ));
    }

    #[tokio::test]
    async fn test_slow_endpoint_times_out() {
        let backend = FakeBackend::healthy().await;
        backend.reply(
            "get_expiring_licenses",
            Reply::Slow(Duration::from_secs(3), json!([])),
        );
        let mut config = config_for(&backend);
        config.load.query_timeout = Some(Duration::from_millis(300));
        let (service, sink) = dashboard(config);

        let outcome = service.load().await.unwrap();

        assert!(matches!(
            status_of(&outcome, Section::ExpiringLicenses),
            SectionStatus::Failed(RemoteQueryError::Timeout { timeout_ms: 300, .. })
        ));
        assert!(sink.get(Slot::ExpiringLicenses).is_none());
        assert!(sink.get(Slot::TopModules).is_some());
    }

    // =============================================================================
    // OUTPUTS
    // =============================================================================

    #[tokio::test]
    async fn test_markup_in_backend_text_is_escaped() {
        let backend = FakeBackend::healthy().await;
        backend.reply(
            "get_license_by_client",
            Reply::Result(json!([
                {"name": "<script>alert(1)</script>", "code": "A&B", "count": 1}
            ])),
        );
        let (service, sink) = dashboard(config_for(&backend));

        service.load().await.unwrap();

        let clients = sink.get(Slot::TopClients).unwrap();
        assert!(!clients.contains("<script>"));
        assert!(clients.contains("&lt;script&gt;alert(1)&lt;/script&gt; (A&amp;B)"));
    }

    #[tokio::test]
    async fn test_file_sink_writes_every_slot() {
        let backend = FakeBackend::healthy().await;
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(&backend);
        let transport = HttpRpcTransport::new(&config.backend).unwrap();
        let sink = Arc::new(FileSink::new(dir.path()).unwrap());
        let service =
            DashboardService::new(config, transport, OutputTargets::new().bind_all(sink.clone()))
                .unwrap();

        service.load().await.unwrap();

        for slot in Slot::ALL {
            assert!(sink.path_for(slot).exists(), "missing {slot}.html");
        }
        let total = std::fs::read_to_string(sink.path_for(Slot::StatTotal)).unwrap();
        assert_eq!(total, "120");
    }

    #[tokio::test]
    async fn test_config_file_drives_query_parameters() {
        let backend = FakeBackend::healthy().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.toml");
        std::fs::write(
            &path,
            format!(
                r#"
                [backend]
                base_url = "{}"

                [queries]
                trends_months = 6
                top_clients_limit = 5
                expiring_horizon_days = 14
                "#,
                backend.base_url()
            ),
        )
        .unwrap();

        let mut config = DashboardConfig::load(&path).unwrap();
        // Environment overrides must not redirect this test.
        config.backend.base_url = backend.base_url();
        config.load.query_timeout = None;
        let (service, sink) = dashboard(config);

        service.load().await.unwrap();

        assert_eq!(backend.args_of("get_license_trends"), Some(json!([6])));
        assert_eq!(backend.args_of("get_license_by_client"), Some(json!([5])));
        assert_eq!(backend.args_of("get_expiring_licenses"), Some(json!([14])));
        assert!(sink.get(Slot::ExpiringLicenses).is_some());
    }
}
