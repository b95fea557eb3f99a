use httpmock::prelude::*;
use serde_json::json;
use violations_etl::{ElasticsearchSink, IndexState, PagePlan, PaginationDriver, SocrataSource};

const DATASET_ID: &str = "nc67-uf89";
const INDEX: &str = "nycparkviolationdataset";

fn violation(plate: &str, fine_amount: &str) -> serde_json::Value {
    json!({
        "plate": plate,
        "state": "NY",
        "summons_number": "1448411399",
        "license_type": "PAS",
        "issue_date": "06/14/2019",
        "violation_time": "08:24A",
        "violation": "NO PARKING-STREET CLEANING",
        "fine_amount": fine_amount,
        "penalty_amount": "10",
        "interest_amount": "0",
        "reduction_amount": "0",
        "payment_amount": "0",
        "amount_due": "55",
        "precinct": "109",
        "county": "Q",
        "issuing_agency": "TRAFFIC"
    })
}

fn source_for(server: &MockServer) -> SocrataSource {
    SocrataSource::new(server.base_url(), DATASET_ID, "test-token").unwrap()
}

fn sink_for(server: &MockServer) -> ElasticsearchSink {
    ElasticsearchSink::new(server.base_url(), INDEX, "elastic", "changeme")
}

#[tokio::test]
async fn test_end_to_end_batch_index_with_real_http() {
    let source_server = MockServer::start();
    let es_server = MockServer::start();

    // 5 source rows at page size 2 resolve to 2 full pages.
    let count_mock = source_server.mock(|when, then| {
        when.method(GET)
            .path(format!("/resource/{}.json", DATASET_ID))
            .query_param("$select", "COUNT(*)");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!([{"COUNT": "5"}]));
    });

    let page0_mock = source_server.mock(|when, then| {
        when.method(GET)
            .path(format!("/resource/{}.json", DATASET_ID))
            .query_param("$limit", "2")
            .query_param("$offset", "0");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!([
                violation("GMK1754", "45"),
                violation("HLR9883", "forty-five")
            ]));
    });

    let page1_mock = source_server.mock(|when, then| {
        when.method(GET)
            .path(format!("/resource/{}.json", DATASET_ID))
            .query_param("$limit", "2")
            .query_param("$offset", "2");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!([
                violation("JRP5546", "65"),
                violation("KWD3301", "115")
            ]));
    });

    let index_mock = es_server.mock(|when, then| {
        when.method(PUT).path(format!("/{}", INDEX));
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"acknowledged": true}));
    });

    let bulk_mock = es_server.mock(|when, then| {
        when.method(POST)
            .path("/_bulk")
            .header("Content-Type", "application/x-ndjson")
            .header_exists("authorization");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"took": 3, "errors": false, "items": []}));
    });

    let sink = sink_for(&es_server);
    assert_eq!(sink.ensure_index().await.unwrap(), IndexState::Created);
    index_mock.assert();

    let driver = PaginationDriver::new(source_for(&source_server), sink);
    let plan = driver.resolve_plan(2, None, None).await.unwrap();
    assert_eq!(
        plan,
        PagePlan {
            page_size: 2,
            num_pages: 2,
            init_offset: 0
        }
    );

    let report = driver.run(&plan).await.unwrap();

    count_mock.assert();
    page0_mock.assert();
    page1_mock.assert();
    bulk_mock.assert_hits(2);

    assert_eq!(report.pages_processed, 2);
    assert_eq!(report.records_fetched, 4);
    // The non-numeric fine_amount drops one record; everything else lands.
    assert_eq!(report.records_indexed, 3);
    assert_eq!(report.records_dropped, 1);
    assert_eq!(report.pages_failed, 0);
}

#[tokio::test]
async fn test_destination_failures_do_not_abort_the_run() {
    let source_server = MockServer::start();
    let es_server = MockServer::start();

    let page_mock = source_server.mock(|when, then| {
        when.method(GET).path(format!("/resource/{}.json", DATASET_ID));
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!([violation("GMK1754", "45")]));
    });

    let bulk_mock = es_server.mock(|when, then| {
        when.method(POST).path("/_bulk");
        then.status(503).body("cluster unavailable");
    });

    let driver = PaginationDriver::new(source_for(&source_server), sink_for(&es_server));
    let plan = PagePlan {
        page_size: 1,
        num_pages: 3,
        init_offset: 0,
    };
    let report = driver.run(&plan).await.unwrap();

    // Every page is still fetched and attempted; exit stays clean.
    page_mock.assert_hits(3);
    bulk_mock.assert_hits(3);
    assert_eq!(report.pages_processed, 3);
    assert_eq!(report.pages_failed, 3);
    assert_eq!(report.records_indexed, 0);
}

#[tokio::test]
async fn test_source_failure_mid_run_is_fatal() {
    let source_server = MockServer::start();
    let es_server = MockServer::start();

    let page0_mock = source_server.mock(|when, then| {
        when.method(GET)
            .path(format!("/resource/{}.json", DATASET_ID))
            .query_param("$offset", "0");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!([violation("GMK1754", "45")]));
    });

    let page1_mock = source_server.mock(|when, then| {
        when.method(GET)
            .path(format!("/resource/{}.json", DATASET_ID))
            .query_param("$offset", "1");
        then.status(504);
    });

    let bulk_mock = es_server.mock(|when, then| {
        when.method(POST).path("/_bulk");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"took": 1, "errors": false, "items": []}));
    });

    let driver = PaginationDriver::new(source_for(&source_server), sink_for(&es_server));
    let plan = PagePlan {
        page_size: 1,
        num_pages: 3,
        init_offset: 0,
    };
    let err = driver.run(&plan).await.unwrap_err();

    assert!(matches!(
        err,
        violations_etl::EtlError::SourceUnavailableError { .. }
    ));
    page0_mock.assert();
    page1_mock.assert();
    // Only the page before the failure made it to the destination.
    bulk_mock.assert_hits(1);
}

#[tokio::test]
async fn test_manual_offset_resumes_a_run() {
    let source_server = MockServer::start();
    let es_server = MockServer::start();

    let page0_mock = source_server.mock(|when, then| {
        when.method(GET)
            .path(format!("/resource/{}.json", DATASET_ID))
            .query_param("$limit", "2")
            .query_param("$offset", "4000");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!([violation("GMK1754", "45"), violation("JRP5546", "65")]));
    });

    let page1_mock = source_server.mock(|when, then| {
        when.method(GET)
            .path(format!("/resource/{}.json", DATASET_ID))
            .query_param("$limit", "2")
            .query_param("$offset", "4002");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!([violation("KWD3301", "115")]));
    });

    let index_mock = es_server.mock(|when, then| {
        when.method(PUT).path(format!("/{}", INDEX));
        then.status(400)
            .header("Content-Type", "application/json")
            .json_body(json!({
                "error": {
                    "type": "resource_already_exists_exception",
                    "reason": "index already exists"
                },
                "status": 400
            }));
    });

    let bulk_mock = es_server.mock(|when, then| {
        when.method(POST).path("/_bulk");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"took": 2, "errors": false, "items": []}));
    });

    // A previous run already created the index; resuming must not care.
    let sink = sink_for(&es_server);
    assert_eq!(sink.ensure_index().await.unwrap(), IndexState::AlreadyExists);
    index_mock.assert();

    let driver = PaginationDriver::new(source_for(&source_server), sink);
    let plan = driver.resolve_plan(2, Some(2), Some(4000)).await.unwrap();
    let report = driver.run(&plan).await.unwrap();

    page0_mock.assert();
    page1_mock.assert();
    bulk_mock.assert_hits(2);
    assert_eq!(report.records_indexed, 3);
    assert_eq!(report.records_dropped, 0);
}
