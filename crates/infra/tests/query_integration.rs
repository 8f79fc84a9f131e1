//! Query state driven by real façade calls

mod support;

use serde_json::json;
use support::TestClient;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};
use xanodash_domain::{CredentialList, Period};
use xanodash_infra::{mutate_then_refetch, Query, TokenStore};

#[tokio::test]
async fn credential_list_reloads_after_create() {
    let ctx = TestClient::start(Some("tok")).await;

    Mock::given(method("GET"))
        .and(path("/xano-credentials/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .up_to_n_times(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/xano-credentials/list"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"items": [{"id": 7, "credential_name": "Staging"}]})),
        )
        .mount(&ctx.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/xano-credentials/create"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 7, "credential_name": "Staging"})),
        )
        .expect(1)
        .mount(&ctx.server)
        .await;

    let credentials = ctx.client.credentials();
    let list_api = credentials.clone();
    let query: Query<(), CredentialList> = Query::new((), move |()| {
        let api = list_api.clone();
        async move { api.list().await }
    });

    query.refetch().await;
    assert!(query.state().data.unwrap().items.is_empty());

    let created =
        mutate_then_refetch(credentials.create("Staging", "xk_live"), &query).await.unwrap();

    assert_eq!(created.id, 7);
    assert_eq!(query.state().data.unwrap().items[0].credential_name, "Staging");
}

#[tokio::test]
async fn failed_mutation_keeps_list() {
    let ctx = TestClient::start(Some("tok")).await;

    Mock::given(method("GET"))
        .and(path("/xano-credentials/list"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"items": [{"id": 1, "credential_name": "Prod"}]})),
        )
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/xano-credentials/delete"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&ctx.server)
        .await;

    let credentials = ctx.client.credentials();
    let list_api = credentials.clone();
    let query = Query::new((), move |()| {
        let api = list_api.clone();
        async move { api.list().await }
    });
    query.refetch().await;

    let err = mutate_then_refetch(credentials.delete(999), &query).await.unwrap_err();

    assert!(err.to_string().contains("404"));
    let state = query.state();
    assert_eq!(state.data.unwrap().items.len(), 1);
    assert!(state.error.is_none());
}

#[tokio::test]
async fn period_change_refetches_summary() {
    let ctx = TestClient::start(Some("tok")).await;

    for (period, total) in [("7d", 70), ("30d", 300)] {
        Mock::given(method("GET"))
            .and(path("/analytics/summary"))
            .and(query_param("period", period))
            .and(query_param("compare", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total_calls": total,
                "successful_calls": total,
                "failed_calls": 0,
                "success_rate": 100.0,
                "avg_response_time_ms": 12.0
            })))
            .expect(1)
            .mount(&ctx.server)
            .await;
    }

    let analytics = ctx.client.analytics();
    let query = Query::new(Period::last_week(), move |period: Period| {
        let api = analytics.clone();
        async move { api.summary(&period, Some(true)).await }
    })
    .requires_session(ctx.tokens.clone());

    query.refetch().await;
    assert_eq!(query.state().data.unwrap().total_calls, 70);

    query.set_params(Period::last_week()).await;
    query.set_params(Period::last_month()).await;
    assert_eq!(query.state().data.unwrap().total_calls, 300);
}

#[tokio::test]
async fn signed_out_query_never_hits_the_network() {
    let ctx = TestClient::start(Some("tok")).await;
    ctx.tokens.clear_token().unwrap();

    let billing = ctx.client.billing();
    let query = Query::new((), move |()| {
        let api = billing.clone();
        async move { api.usage().await }
    })
    .requires_session(ctx.tokens.clone());

    query.refetch().await;

    assert!(query.state().is_idle());
    assert!(ctx.server.received_requests().await.unwrap().is_empty());
}
