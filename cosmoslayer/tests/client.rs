use std::time::{Duration, Instant};

use cosmoslayer::{
    headers,
    memory::MemoryTransport,
    prelude::*,
    request::{JSON, JSON_PATCH},
};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Order {
    id: String,
    customer: String,
    total: f64,
}

fn order(id: &str) -> Order {
    Order {
        id: id.to_string(),
        customer: "c-1".to_string(),
        total: 12.5,
    }
}

fn service_headers(pairs: &[(&str, &str)]) -> Headers {
    pairs.iter().copied().collect()
}

#[tokio::test]
async fn create_posts_to_the_document_feed() {
    let transport = MemoryTransport::new();
    transport
        .push_json(
            201,
            service_headers(&[(headers::REQUEST_CHARGE, "7.43")]),
            json!({ "id": "o-1", "_rid": "AbC=", "_etag": "\"1\"" }),
        )
        .await;
    let client = DocumentClient::new(transport.clone());

    let created = client
        .create_document(
            &Context::new(),
            "shop",
            "orders",
            &order("o-1"),
            Some(
                CreateDocumentOptions::default()
                    .with_partition_key("pk1")
                    .with_upsert(true),
            ),
        )
        .await
        .unwrap();

    assert_eq!(created.request_charge(), 7.43);
    assert_eq!(created.resource.unwrap().etag.as_deref(), Some("\"1\""));

    let sent = transport.last_request().await.unwrap();
    assert_eq!(sent.method, Method::Post);
    assert_eq!(sent.path(), "dbs/shop/colls/orders/docs");
    assert_eq!(sent.headers.get(headers::PARTITION_KEY), Some(r#"["pk1"]"#));
    assert_eq!(sent.headers.get(headers::UPSERT), Some("true"));
    assert_eq!(sent.headers.get(headers::CONTENT_TYPE), Some(JSON));

    let body: Order = serde_json::from_slice(sent.body.as_deref().unwrap()).unwrap();
    assert_eq!(body, order("o-1"));
}

#[tokio::test]
async fn upsert_always_sets_the_flag() {
    let transport = MemoryTransport::new();
    transport.push_json(200, Headers::new(), json!({ "id": "o-1" })).await;
    let client = DocumentClient::new(transport.clone());

    client
        .upsert_document(&Context::new(), "shop", "orders", &order("o-1"), None)
        .await
        .unwrap();

    let sent = transport.last_request().await.unwrap();
    assert_eq!(sent.headers.get(headers::UPSERT), Some("true"));
    assert!(!sent.headers.contains(headers::PARTITION_KEY));
}

#[tokio::test]
async fn rendered_headers_reach_the_transport_unmodified() {
    let transport = MemoryTransport::new();
    transport
        .push_json(200, Headers::new(), serde_json::to_value(order("o-1")).unwrap())
        .await;
    let client = DocumentClient::new(transport.clone());

    let options = GetDocumentOptions::default()
        .with_partition_key(("c-1", 2024))
        .with_consistency_level(ConsistencyLevel::Session)
        .with_session_token("0:1#42");
    let fetched = client
        .get_document::<Order>(&Context::new(), "shop", "orders", "o-1", Some(options.clone()))
        .await
        .unwrap();

    assert_eq!(fetched.resource, Some(order("o-1")));

    let sent = transport.last_request().await.unwrap();
    assert_eq!(sent.method, Method::Get);
    assert_eq!(sent.path(), "dbs/shop/colls/orders/docs/o-1");
    assert_eq!(sent.headers, options.as_headers().unwrap());
    assert_eq!(sent.headers.get(headers::IF_NONE_MATCH), Some("false"));
    assert!(sent.body.is_none());
}

#[tokio::test]
async fn missing_documents_surface_the_service_status() {
    let client = DocumentClient::new(MemoryTransport::new());

    let err = client
        .get_document::<Order>(&Context::new(), "shop", "orders", "nope", None)
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn invalid_names_fail_before_any_request() {
    let transport = MemoryTransport::new();
    let client = DocumentClient::new(transport.clone());

    let err = client
        .get_document::<Order>(&Context::new(), "", "orders", "o-1", None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DocumentDbError::Encoding(EncodingError::EmptyResourceName(_))
    ));

    let err = client
        .delete_document(
            &Context::new(),
            "shop",
            "orders",
            "o-1",
            Some(DeleteDocumentOptions::default().with_partition_key(Vec::<PartitionKeyValue>::new())),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DocumentDbError::Encoding(EncodingError::UnsupportedKeyType(_))
    ));

    assert!(transport.requests().await.is_empty());
}

#[tokio::test]
async fn dot_segment_names_never_address_another_resource() {
    let transport = MemoryTransport::new();
    let client = DocumentClient::new(transport.clone());
    let context = Context::new();

    let err = client
        .delete_document(&context, "shop", "orders", "..", None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DocumentDbError::Encoding(EncodingError::ReservedResourceName("document", _))
    ));

    let err = client
        .get_document::<Order>(&context, "..", "orders", "o-1", None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DocumentDbError::Encoding(EncodingError::ReservedResourceName("database", _))
    ));

    let err = client
        .delete_stored_procedure(&context, "shop", "orders", ".")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DocumentDbError::Encoding(EncodingError::ReservedResourceName(..))
    ));

    assert!(transport.requests().await.is_empty());
}

#[tokio::test]
async fn always_sent_flags_are_rendered_without_options() {
    let transport = MemoryTransport::new();
    transport.push_json(201, Headers::new(), json!({ "id": "o-1" })).await;
    transport
        .push_json(200, Headers::new(), serde_json::to_value(order("o-1")).unwrap())
        .await;
    let client = DocumentClient::new(transport.clone());
    let context = Context::new();

    client
        .create_document(&context, "shop", "orders", &order("o-1"), None)
        .await
        .unwrap();
    client
        .get_document::<Order>(&context, "shop", "orders", "o-1", None)
        .await
        .unwrap();

    let requests = transport.requests().await;
    assert_eq!(requests[0].headers.get(headers::UPSERT), Some("false"));
    assert_eq!(
        requests[1].headers,
        service_headers(&[(headers::IF_NONE_MATCH, "false")])
    );
}

#[tokio::test]
async fn listing_renders_only_the_set_options() {
    let transport = MemoryTransport::new();
    transport
        .push_json(200, Headers::new(), json!({ "Documents": [], "_count": 0 }))
        .await;
    let client = DocumentClient::new(transport.clone());

    client
        .list_documents::<Order>(
            &Context::new(),
            "shop",
            "orders",
            Some(
                ListDocumentOptions::default()
                    .with_max_item_count(50)
                    .with_continuation("abc"),
            ),
        )
        .await
        .unwrap();

    let sent = transport.last_request().await.unwrap();
    assert_eq!(sent.path(), "dbs/shop/colls/orders/docs");
    assert_eq!(
        sent.headers,
        service_headers(&[(headers::MAX_ITEM_COUNT, "50"), (headers::CONTINUATION, "abc")])
    );
}

#[tokio::test]
async fn continuation_tokens_round_trip_byte_for_byte() {
    let token = r#"{"token":"+RID:~AbC#RT:1#TRC:2","range":{"min":"","max":"FF"}}"#;
    let transport = MemoryTransport::new();
    transport
        .push_json(
            200,
            service_headers(&[(headers::CONTINUATION, token), (headers::ITEM_COUNT, "1")]),
            json!({ "Documents": [order("o-1")], "_count": 1 }),
        )
        .await;
    transport
        .push_json(200, Headers::new(), json!({ "Documents": [order("o-2")], "_count": 1 }))
        .await;
    let client = DocumentClient::new(transport.clone());
    let context = Context::new();

    let first = client
        .list_documents::<Order>(&context, "shop", "orders", None)
        .await
        .unwrap();
    assert_eq!(first.items, vec![order("o-1")]);
    assert_eq!(first.metadata.item_count, Some(1));
    assert_eq!(first.continuation(), Some(token));

    let options = ListDocumentOptions::default().with_continuation(first.continuation().unwrap());
    let second = client
        .list_documents::<Order>(&context, "shop", "orders", Some(options))
        .await
        .unwrap();
    assert_eq!(second.items, vec![order("o-2")]);
    assert!(!second.has_more());

    let sent = transport.last_request().await.unwrap();
    assert_eq!(sent.headers.get(headers::CONTINUATION), Some(token));
}

#[tokio::test]
async fn pages_stream_until_the_continuation_runs_out() {
    let transport = MemoryTransport::new();
    for (id, continuation) in [("o-1", Some("t1")), ("o-2", Some("t2")), ("o-3", None)] {
        let scripted = match continuation {
            Some(token) => service_headers(&[(headers::CONTINUATION, token)]),
            None => Headers::new(),
        };
        transport
            .push_json(200, scripted, json!({ "Documents": [order(id)], "_count": 1 }))
            .await;
    }
    let client = DocumentClient::new(transport.clone());
    let context = Context::new();

    let pages = client
        .list_documents_pages::<Order>(
            &context,
            "shop",
            "orders",
            ListDocumentOptions::default().with_max_item_count(1),
        )
        .collect::<Vec<_>>()
        .await;

    let ids = pages
        .into_iter()
        .flat_map(|page| page.unwrap().items)
        .map(|order| order.id)
        .collect::<Vec<_>>();
    assert_eq!(ids, ["o-1", "o-2", "o-3"]);

    let continuations = transport
        .requests()
        .await
        .iter()
        .map(|request| request.headers.get(headers::CONTINUATION).map(str::to_string))
        .collect::<Vec<_>>();
    assert_eq!(
        continuations,
        [None, Some("t1".to_string()), Some("t2".to_string())]
    );
}

#[tokio::test]
async fn change_feed_follows_etags_and_stops_when_nothing_changed() {
    let transport = MemoryTransport::new();
    transport
        .push_json(
            200,
            service_headers(&[(headers::ETAG, "\"41\"")]),
            json!({ "Documents": [{ "id": "a" }], "_count": 1 }),
        )
        .await;
    transport
        .push_empty(304, service_headers(&[(headers::ETAG, "\"41\"")]))
        .await;
    let client = DocumentClient::new(transport.clone());
    let context = Context::new();

    let pages = client
        .list_documents_pages::<Value>(
            &context,
            "shop",
            "orders",
            ListDocumentOptions::default()
                .with_incremental_feed(true)
                .with_partition_key_range_id("0"),
        )
        .collect::<Vec<_>>()
        .await;

    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].as_ref().unwrap().items.len(), 1);
    assert!(pages[1].as_ref().unwrap().items.is_empty());

    let requests = transport.requests().await;
    assert_eq!(requests[0].headers.get(headers::A_IM), Some(headers::INCREMENTAL_FEED));
    assert!(!requests[0].headers.contains(headers::IF_NONE_MATCH));
    assert_eq!(requests[1].headers.get(headers::IF_NONE_MATCH), Some("\"41\""));
    assert_eq!(
        requests[1].headers.get(headers::PARTITION_KEY_RANGE_ID),
        Some("0")
    );
}

#[tokio::test]
async fn page_stream_stops_after_an_error() {
    let transport = MemoryTransport::new();
    transport
        .push_json(
            200,
            service_headers(&[(headers::CONTINUATION, "t1")]),
            json!({ "Documents": [], "_count": 0 }),
        )
        .await;
    transport
        .push_json(429, Headers::new(), json!({ "code": "TooManyRequests" }))
        .await;
    let client = DocumentClient::new(transport.clone());
    let context = Context::new();

    let pages = client
        .list_documents_pages::<Value>(&context, "shop", "orders", ListDocumentOptions::default())
        .collect::<Vec<_>>()
        .await;

    assert_eq!(pages.len(), 2);
    assert_eq!(pages[1].as_ref().unwrap_err().status(), Some(429));
    assert_eq!(transport.requests().await.len(), 2);
}

#[tokio::test]
async fn cancelling_the_context_abandons_the_call() {
    let transport = MemoryTransport::builder()
        .with_latency(Duration::from_secs(30))
        .build();
    let client = DocumentClient::new(transport.clone());

    let token = CancellationToken::new();
    let context = Context::new().with_cancellation(token.child_token());
    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        token.cancel();
    });

    let started = Instant::now();
    let err = client
        .get_document::<Order>(&context, "shop", "orders", "o-1", None)
        .await
        .unwrap_err();

    assert!(matches!(err, DocumentDbError::Cancelled));
    assert!(started.elapsed() < Duration::from_secs(5));
    canceller.await.unwrap();
}

#[tokio::test]
async fn context_timeouts_abandon_slow_calls() {
    let transport = MemoryTransport::builder()
        .with_latency(Duration::from_secs(30))
        .build();
    let client = DocumentClient::new(transport);
    let context = Context::new().with_timeout(Duration::from_millis(20));

    let err = client
        .delete_document(&context, "shop", "orders", "o-1", None)
        .await
        .unwrap_err();

    assert!(matches!(err, DocumentDbError::Timeout(_)));
}

#[tokio::test]
async fn queries_are_not_implemented() {
    let transport = MemoryTransport::new();
    let client = DocumentClient::new(transport.clone());

    let err = client
        .query_documents(
            &Context::new(),
            "shop",
            "orders",
            "SELECT * FROM c",
            Some(QueryDocumentsOptions::default()),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DocumentDbError::NotImplemented(_)));
    assert!(transport.requests().await.is_empty());
}

#[tokio::test]
async fn deletes_report_metadata_for_empty_bodies() {
    let transport = MemoryTransport::new();
    transport
        .push_empty(
            204,
            service_headers(&[
                (headers::REQUEST_CHARGE, "5.71"),
                (headers::SESSION_TOKEN, "0:1#43"),
            ]),
        )
        .await;
    let client = DocumentClient::new(transport.clone());

    let metadata = client
        .delete_document(
            &Context::new(),
            "shop",
            "orders",
            "o-1",
            Some(
                DeleteDocumentOptions::default()
                    .with_partition_key("c-1")
                    .with_pre_trigger("audit")
                    .with_pre_trigger("validate"),
            ),
        )
        .await
        .unwrap();

    assert_eq!(metadata.status, 204);
    assert_eq!(metadata.request_charge, 5.71);
    assert_eq!(metadata.session_token.as_deref(), Some("0:1#43"));

    let sent = transport.last_request().await.unwrap();
    assert_eq!(sent.method, Method::Delete);
    assert_eq!(
        sent.headers.get(headers::PRE_TRIGGER_INCLUDE),
        Some("audit,validate")
    );
}

#[tokio::test]
async fn replace_sends_the_precondition() {
    let transport = MemoryTransport::new();
    transport
        .push_json(412, Headers::new(), json!({ "code": "PreconditionFailed" }))
        .await;
    let client = DocumentClient::new(transport.clone());

    let err = client
        .replace_document(
            &Context::new(),
            "shop",
            "orders",
            "o-1",
            &order("o-1"),
            Some(ReplaceDocumentOptions::default().with_if_match("\"1\"")),
        )
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(412));
    let sent = transport.last_request().await.unwrap();
    assert_eq!(sent.method, Method::Put);
    assert_eq!(sent.path(), "dbs/shop/colls/orders/docs/o-1");
    assert_eq!(sent.headers.get(headers::IF_MATCH), Some("\"1\""));
}

#[tokio::test]
async fn patch_sends_operations_and_condition_in_the_body() {
    let transport = MemoryTransport::new();
    transport
        .push_json(
            200,
            Headers::new(),
            json!({ "id": "o-1", "customer": "c-1", "total": 15.0 }),
        )
        .await;
    let client = DocumentClient::new(transport.clone());

    let patched = client
        .patch_document::<Order>(
            &Context::new(),
            "shop",
            "orders",
            "o-1",
            &[PatchOperation::increment("/total", 2.5)],
            Some(
                PatchDocumentOptions::default()
                    .with_partition_key("c-1")
                    .with_condition("from c where c.total > 10"),
            ),
        )
        .await
        .unwrap();
    assert_eq!(patched.resource.unwrap().total, 15.0);

    let sent = transport.last_request().await.unwrap();
    assert_eq!(sent.method, Method::Patch);
    assert_eq!(sent.headers.get(headers::CONTENT_TYPE), Some(JSON_PATCH));
    let body: Value = serde_json::from_slice(sent.body.as_deref().unwrap()).unwrap();
    assert_eq!(
        body,
        json!({
            "condition": "from c where c.total > 10",
            "operations": [{ "op": "incr", "path": "/total", "value": 2.5 }]
        })
    );
}

#[tokio::test]
async fn stored_procedures_round_trip() {
    let v1 = "function (a, b) { return a + b; }";
    let v2 = "function (a, b) { getContext().getResponse().setBody(a + b); }";
    let transport = MemoryTransport::new();
    transport
        .push_json(201, Headers::new(), json!({ "id": "sum", "body": v1 }))
        .await;
    transport
        .push_json(200, Headers::new(), json!({ "id": "sum", "body": v2, "_etag": "\"2\"" }))
        .await;
    transport
        .push_json(
            200,
            Headers::new(),
            json!({ "id": "sum", "body": v2, "_rid": "Sp1=", "_etag": "\"2\"" }),
        )
        .await;
    transport
        .push_json(
            200,
            service_headers(&[(headers::REQUEST_CHARGE, "3.2")]),
            json!(42),
        )
        .await;
    transport
        .push_json(
            200,
            Headers::new(),
            json!({ "StoredProcedures": [{ "id": "sum", "body": v2 }], "_count": 1 }),
        )
        .await;
    transport.push_empty(204, Headers::new()).await;
    let client = DocumentClient::new(transport.clone());
    let context = Context::new();

    let created = client
        .create_stored_procedure(&context, "shop", "orders", "sum", v1)
        .await
        .unwrap();
    assert_eq!(created.resource.unwrap().resource.id, "sum");

    let replaced = client
        .replace_stored_procedure(&context, "shop", "orders", "sum", v2)
        .await
        .unwrap()
        .into_resource()
        .unwrap();
    assert_eq!(replaced.body, v2);
    assert_eq!(replaced.resource.etag.as_deref(), Some("\"2\""));

    let fetched = client
        .get_stored_procedure(&context, "shop", "orders", "sum")
        .await
        .unwrap()
        .into_resource()
        .unwrap();
    assert_eq!(fetched.resource.id, "sum");
    assert_eq!(fetched.resource.rid.as_deref(), Some("Sp1="));
    assert_eq!(fetched.body, v2);

    let result = client
        .execute_stored_procedure::<i64, _>(
            &context,
            "shop",
            "orders",
            "sum",
            &(40, 2),
            Some(ExecuteStoredProcedureOptions::default().with_partition_key("c-1")),
        )
        .await
        .unwrap();
    assert_eq!(result.resource, Some(42));
    assert_eq!(result.request_charge(), 3.2);

    let listed = client
        .list_stored_procedures(&context, "shop", "orders")
        .await
        .unwrap();
    assert_eq!(listed.resource.unwrap().stored_procedures.len(), 1);

    client
        .delete_stored_procedure(&context, "shop", "orders", "sum")
        .await
        .unwrap();

    let requests = transport.requests().await;
    let calls = requests
        .iter()
        .map(|request| (request.method, request.path()))
        .collect::<Vec<_>>();
    assert_eq!(
        calls,
        [
            (Method::Post, "dbs/shop/colls/orders/sprocs".to_string()),
            (Method::Put, "dbs/shop/colls/orders/sprocs/sum".to_string()),
            (Method::Get, "dbs/shop/colls/orders/sprocs/sum".to_string()),
            (Method::Post, "dbs/shop/colls/orders/sprocs/sum".to_string()),
            (Method::Get, "dbs/shop/colls/orders/sprocs".to_string()),
            (Method::Delete, "dbs/shop/colls/orders/sprocs/sum".to_string()),
        ]
    );

    let body = |i: usize| -> Value {
        serde_json::from_slice(requests[i].body.as_deref().unwrap()).unwrap()
    };
    assert_eq!(body(0), json!({ "id": "sum", "body": v1 }));
    assert_eq!(body(1), json!({ "id": "sum", "body": v2 }));
    assert_eq!(requests[1].headers.get(headers::CONTENT_TYPE), Some(JSON));
    assert!(requests[2].body.is_none());
    assert_eq!(body(3), json!([40, 2]));
    assert_eq!(requests[3].headers.get(headers::PARTITION_KEY), Some(r#"["c-1"]"#));
}

#[tokio::test]
async fn stored_procedure_failures_are_reported() {
    let transport = MemoryTransport::new();
    transport
        .push_json(400, Headers::new(), json!({ "code": "BadRequest", "message": "boom" }))
        .await;
    let client = DocumentClient::new(transport);

    let err = client
        .execute_stored_procedure::<Value, _>(&Context::new(), "shop", "orders", "sum", &[1], None)
        .await
        .unwrap_err();

    match err {
        DocumentDbError::Remote { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("boom"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}
