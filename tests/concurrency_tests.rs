//! Many operations in flight on one client.

mod common;

use common::builders::{group_json, success};
use common::scripted_client;
use futures::future::join_all;
use grouper_client::{Group, Query};
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_concurrent_finds_share_one_client() {
    let (client, http) = scripted_client();
    for index in 0..8 {
        http.push_json(
            200,
            success(
                "WsFindGroupsResults",
                json!({"groupResults": [group_json(&format!("org:g{index}"), &index.to_string())]}),
            ),
        )
        .await;
    }

    let queries: Vec<Query> = (0..8)
        .map(|index| Query::find_by_group_name(format!("org:g{index}")))
        .collect();
    let results = join_all(
        queries
            .iter()
            .map(|query| client.find_groups(Some(query), None)),
    )
    .await;

    let mut found: Vec<Group> = results
        .into_iter()
        .flat_map(|result| result.unwrap())
        .collect();
    found.sort_by(|a, b| a.name().cmp(&b.name()));
    assert_eq!(found.len(), 8);
    assert_eq!(http.request_count().await, 8);
    assert_eq!(http.pending_responses().await, 0);
}

#[tokio::test]
async fn test_client_usable_from_spawned_tasks() {
    let (client, http) = scripted_client();
    for _ in 0..4 {
        http.push_json(200, success("WsFindGroupsResults", json!({}))).await;
    }
    let client = Arc::new(client);

    let handles: Vec<_> = (0..4)
        .map(|index| {
            let client = Arc::clone(&client);
            tokio::spawn(async move {
                let query = Query::find_by_approximate_name(format!("team{index}"));
                client.find_groups(Some(&query), None).await
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().unwrap().is_empty());
    }
    assert_eq!(http.request_count().await, 4);
}
