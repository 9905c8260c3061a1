//! tests/dispatch_tests.rs
//! Pruebas de `DispatchService`: reparto, envío con ritmo y registro.

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use actix_rt::test;
    use sqlx::{Pool, Sqlite};

    use crate::config::DispatchConfig;
    use crate::errors::ApiError;
    use crate::models::send_model::{SendRequest, WebhookTarget};
    use crate::services::company_service::CompanyService;
    use crate::services::dispatch_service::DispatchService;
    use crate::services::send_record_service::SendRecordService;
    use crate::tests::{fast_dispatch_config, seed_companies, start_receiver, test_pool};

    fn build_service(pool: &Pool<Sqlite>, config: DispatchConfig) -> DispatchService {
        let sends = SendRecordService::new(pool.clone());
        let companies = CompanyService::new(pool.clone(), sends.clone());
        DispatchService::new(companies, sends, config).expect("DispatchService")
    }

    fn target(id: &str, url: &str) -> WebhookTarget {
        WebhookTarget {
            id: id.to_string(),
            webhook_url: url.to_string(),
            name: format!("hook-{}", id),
        }
    }

    fn request(ids: Vec<String>, webhooks: Vec<WebhookTarget>, range: &str, skip: bool) -> SendRequest {
        SendRequest {
            company_ids: ids,
            webhooks,
            employee_range: range.to_string(),
            skip_webhooks: skip,
        }
    }

    fn row(company: &str, webhook: &str, status: &str) -> (String, String, String) {
        (company.to_string(), webhook.to_string(), status.to_string())
    }

    async fn statuses_for_batch(pool: &Pool<Sqlite>, batch_id: &str) -> Vec<(String, String, String)> {
        sqlx::query_as(
            "SELECT company_id, webhook_id, status FROM company_sends WHERE batch_id = ?1 ORDER BY company_id",
        )
        .bind(batch_id)
        .fetch_all(pool)
        .await
        .unwrap()
    }

    #[test]
    async fn skip_webhooks_records_every_assigned_company() {
        let pool = test_pool().await;
        // "10001+" => 40000 / 15000 = 2 compañías por webhook
        let ids = seed_companies(&pool, 5, Some("10001+")).await;
        let service = build_service(&pool, fast_dispatch_config());

        let webhooks = vec![
            target("w1", "http://127.0.0.1:1/never"),
            target("w2", "http://127.0.0.1:1/never"),
        ];
        let resp = service
            .send_batch(request(ids, webhooks, "10001+", true))
            .await
            .unwrap();

        assert!(resp.success);
        assert_eq!(resp.total_companies, 5);
        assert_eq!(resp.companies_not_assigned, 1);
        assert_eq!(resp.employee_range, "10001+");
        assert_eq!(resp.distribution.len(), 2);
        assert_eq!(resp.distribution[0].webhook, "hook-w1");
        assert_eq!((resp.distribution[0].sent, resp.distribution[0].failed), (2, 0));
        assert_eq!((resp.distribution[1].sent, resp.distribution[1].failed), (2, 0));

        let rows = statuses_for_batch(&pool, &resp.batch_id).await;
        assert_eq!(
            rows,
            vec![
                row("c01", "w1", "sent"),
                row("c02", "w1", "sent"),
                row("c03", "w2", "sent"),
                row("c04", "w2", "sent"),
            ]
        );

        let range: Option<String> =
            sqlx::query_scalar("SELECT DISTINCT employee_range FROM company_sends")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(range.as_deref(), Some("10001+"));
    }

    #[test]
    async fn batch_timestamp_is_iso8601() {
        let pool = test_pool().await;
        let ids = seed_companies(&pool, 1, Some("1-10")).await;
        let service = build_service(&pool, fast_dispatch_config());

        let resp = service
            .send_batch(request(ids, vec![target("w1", "http://x")], "1-10", true))
            .await
            .unwrap();

        assert!(resp.batch_timestamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&resp.batch_timestamp).is_ok());
        assert_eq!(resp.batch_id.len(), 36);
    }

    #[test]
    async fn missing_ids_or_webhooks_is_a_validation_error() {
        let pool = test_pool().await;
        let ids = seed_companies(&pool, 2, Some("1-10")).await;
        let service = build_service(&pool, fast_dispatch_config());

        let err = service
            .send_batch(request(vec![], vec![target("w1", "http://x")], "1-10", true))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let err = service
            .send_batch(request(ids, vec![], "1-10", true))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    async fn unknown_ids_are_not_found() {
        let pool = test_pool().await;
        let service = build_service(&pool, fast_dispatch_config());

        let err = service
            .send_batch(request(
                vec!["nope".into()],
                vec![target("w1", "http://x")],
                "1-10",
                true,
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    async fn not_sure_range_assigns_nothing() {
        let pool = test_pool().await;
        let ids = seed_companies(&pool, 3, Some("not sure")).await;
        let service = build_service(&pool, fast_dispatch_config());

        let resp = service
            .send_batch(request(ids, vec![target("w1", "http://x")], "not sure", true))
            .await
            .unwrap();

        assert!(resp.distribution.is_empty());
        assert_eq!(resp.companies_not_assigned, 3);
        assert!(statuses_for_batch(&pool, &resp.batch_id).await.is_empty());
    }

    #[test]
    async fn companies_are_fetched_in_chunks_and_request_order() {
        let pool = test_pool().await;
        let mut ids = seed_companies(&pool, 7, Some("1-10")).await;
        ids.reverse();
        ids.push("c07".into()); // duplicado
        ids.push("missing".into());

        let config = DispatchConfig {
            fetch_chunk_size: 3,
            ..fast_dispatch_config()
        };
        let sends = SendRecordService::new(pool.clone());
        let companies = CompanyService::new(pool.clone(), sends);

        let fetched = companies
            .fetch_by_ids(&ids, config.fetch_chunk_size)
            .await
            .unwrap();
        let order: Vec<&str> = fetched.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, vec!["c07", "c06", "c05", "c04", "c03", "c02", "c01"]);
    }

    #[test]
    async fn real_dispatch_posts_each_company_with_metadata() {
        let pool = test_pool().await;
        let receiver = start_receiver().await;
        let ids = seed_companies(&pool, 12, Some("11-50")).await;
        let config = DispatchConfig {
            sub_batch_size: 5,
            ..fast_dispatch_config()
        };
        let service = build_service(&pool, config);

        let webhooks = vec![WebhookTarget {
            id: "w1".into(),
            webhook_url: receiver.url("/ok"),
            name: "Primary".into(),
        }];
        let resp = service
            .send_batch(request(ids, webhooks, "11-50", false))
            .await
            .unwrap();

        assert_eq!(resp.distribution.len(), 1);
        assert_eq!(resp.distribution[0].sent, 12);
        assert_eq!(resp.distribution[0].failed, 0);

        let hits = receiver.received();
        assert_eq!(hits.len(), 12);
        for hit in &hits {
            assert!(hit["company_name"].as_str().unwrap().starts_with("Company "));
            let meta = &hit["_batch_metadata"];
            assert_eq!(meta["batch_id"], resp.batch_id.as_str());
            assert_eq!(meta["batch_timestamp"], resp.batch_timestamp.as_str());
            assert_eq!(meta["employee_range"], "11-50");
            assert_eq!(meta["webhook_name"], "Primary");
            assert_eq!(meta["source"], "hq-data-warehouse");
        }

        assert_eq!(statuses_for_batch(&pool, &resp.batch_id).await.len(), 12);
        receiver.stop().await;
    }

    #[test]
    async fn failed_deliveries_are_counted_but_recorded_as_sent() {
        let pool = test_pool().await;
        let receiver = start_receiver().await;
        let ids = seed_companies(&pool, 4, Some("1-10")).await;
        let service = build_service(&pool, fast_dispatch_config());

        let webhooks = vec![target("w1", &receiver.url("/fail"))];
        let resp = service
            .send_batch(request(ids, webhooks, "1-10", false))
            .await
            .unwrap();

        assert_eq!(resp.distribution[0].sent, 0);
        assert_eq!(resp.distribution[0].failed, 4);
        assert_eq!(receiver.received().len(), 4);

        let rows = statuses_for_batch(&pool, &resp.batch_id).await;
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|(_, _, status)| status == "sent"));
        receiver.stop().await;
    }

    #[test]
    async fn delivery_outcome_can_be_recorded() {
        let pool = test_pool().await;
        let receiver = start_receiver().await;
        let ids = seed_companies(&pool, 3, Some("1-10")).await;
        let config = DispatchConfig {
            record_delivery_outcome: true,
            ..fast_dispatch_config()
        };
        let service = build_service(&pool, config);

        let resp = service
            .send_batch(request(
                ids,
                vec![target("w1", &receiver.url("/fail"))],
                "1-10",
                false,
            ))
            .await
            .unwrap();

        let rows = statuses_for_batch(&pool, &resp.batch_id).await;
        assert!(rows.iter().all(|(_, _, status)| status == "failed"));
        receiver.stop().await;
    }

    #[test]
    async fn unreachable_webhook_does_not_abort_the_batch() {
        let pool = test_pool().await;
        let receiver = start_receiver().await;
        // "10001+" => 2 por webhook
        let ids = seed_companies(&pool, 4, Some("10001+")).await;
        let service = build_service(&pool, fast_dispatch_config());

        let webhooks = vec![
            target("down", "http://127.0.0.1:1/unreachable"),
            target("up", &receiver.url("/ok")),
        ];
        let resp = service
            .send_batch(request(ids, webhooks, "10001+", false))
            .await
            .unwrap();

        assert_eq!((resp.distribution[0].sent, resp.distribution[0].failed), (0, 2));
        assert_eq!((resp.distribution[1].sent, resp.distribution[1].failed), (2, 0));
        assert_eq!(receiver.received().len(), 2);
        assert_eq!(statuses_for_batch(&pool, &resp.batch_id).await.len(), 4);
        receiver.stop().await;
    }

    #[test]
    async fn sub_batches_are_paced() {
        let pool = test_pool().await;
        let receiver = start_receiver().await;
        let ids = seed_companies(&pool, 5, Some("1-10")).await;
        let config = DispatchConfig {
            sub_batch_size: 2,
            interval_ms: 60,
            ..fast_dispatch_config()
        };
        let service = build_service(&pool, config);

        let start = Instant::now();
        let resp = service
            .send_batch(request(
                ids,
                vec![target("w1", &receiver.url("/ok"))],
                "1-10",
                false,
            ))
            .await
            .unwrap();
        let elapsed = start.elapsed();

        // 3 sub-lotes => 2 pausas, nunca una después del último
        assert_eq!(resp.distribution[0].sent, 5);
        assert!(elapsed >= Duration::from_millis(120), "elapsed={:?}", elapsed);
        receiver.stop().await;
    }

    #[test]
    async fn failing_to_record_sends_fails_the_request() {
        let pool = test_pool().await;
        let ids = seed_companies(&pool, 2, Some("1-10")).await;
        let service = build_service(&pool, fast_dispatch_config());

        sqlx::query("DROP TABLE company_sends")
            .execute(&pool)
            .await
            .unwrap();

        let err = service
            .send_batch(request(ids, vec![target("w1", "http://x")], "1-10", true))
            .await
            .unwrap_err();
        match err {
            ApiError::Database(msg) => assert!(msg.starts_with("Failed to record sends: ")),
            other => panic!("se esperaba Database, llegó {:?}", other),
        }
    }
}
