//! Group find, save and delete against scripted service responses.

mod common;

use common::builders::{delete_entry, failure, group_json, success};
use common::{relative_path, request_fields, scripted_client};
use grouper_client::{
    ApiErrorKind, CompositeType, Group, GroupToSave, GrouperError, HttpMethod, Query, ResultCode,
    SaveMode, StemScope,
};
use serde_json::json;

#[tokio::test]
async fn test_find_groups_by_query() {
    let (client, http) = scripted_client();
    http.push_json(
        200,
        success(
            "WsFindGroupsResults",
            json!({"groupResults": [group_json("org:a:x", "1"), group_json("org:b:x", "2")]}),
        ),
    )
    .await;

    let query = Query::find_by_stem_name("org:a", StemScope::AllInSubtree)
        | Query::find_by_stem_name("org:b", StemScope::OneLevel);
    let groups = client.find_groups(Some(&query), None).await.unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].name(), Some("org:a:x"));
    assert_eq!(groups[1].uuid(), Some("2"));
    assert_eq!(groups[1].display_extension(), Some("x"));

    let requests = http.requests().await;
    assert_eq!(requests[0].method, HttpMethod::Post);
    assert_eq!(relative_path(&requests[0]), "groups");
    let fields = request_fields(&requests[0], "WsRestFindGroupsRequest");
    assert_eq!(fields["wsQueryFilter"], query.to_group_filter());
}

#[tokio::test]
async fn test_find_groups_by_lookups() {
    let (client, http) = scripted_client();
    http.push_json(200, success("WsFindGroupsResults", json!({}))).await;

    let lookups = [Group::named("org:a").unwrap(), Group::with_uuid("42").unwrap()];
    let groups = client.find_groups(None, Some(&lookups[..])).await.unwrap();
    assert!(groups.is_empty());

    let fields = request_fields(&http.requests().await[0], "WsRestFindGroupsRequest");
    assert_eq!(
        fields["wsGroupLookups"],
        json!([{"groupName": "org:a"}, {"uuid": "42"}])
    );
}

#[tokio::test]
async fn test_find_groups_argument_rules() {
    let (client, http) = scripted_client();

    let empty = client.find_groups(None, Some(&[])).await.unwrap();
    assert!(empty.is_empty());

    let neither = client.find_groups(None, None).await.unwrap_err();
    assert!(matches!(neither, GrouperError::Precondition { .. }));

    let query = Query::find_by_group_name("a:b");
    let both = client
        .find_groups(Some(&query), Some(&[Group::named("a:b").unwrap()][..]))
        .await
        .unwrap_err();
    assert!(matches!(both, GrouperError::Precondition { .. }));

    assert_eq!(http.request_count().await, 0);
}

#[tokio::test]
async fn test_find_groups_decodes_composites() {
    let (client, http) = scripted_client();
    http.push_json(
        200,
        success(
            "WsFindGroupsResults",
            json!({"groupResults": [{
                "name": "org:both",
                "uuid": "c1",
                "detail": {
                    "hasComposite": "T",
                    "compositeType": "intersection",
                    "leftGroup": group_json("org:left", "l1"),
                    "rightGroup": group_json("org:right", "r1"),
                }
            }]}),
        ),
    )
    .await;

    let groups = client
        .find_groups(Some(&Query::find_by_group_name("org:both")), None)
        .await
        .unwrap();
    let composite = groups[0].composite_detail().unwrap();
    assert_eq!(composite.composite_type, CompositeType::Intersection);
    assert_eq!(composite.left.name(), Some("org:left"));
    assert_eq!(composite.right.uuid(), Some("r1"));
}

#[tokio::test]
async fn test_save_groups_back_patches_uuid() {
    let (client, http) = scripted_client();
    http.push_json(
        201,
        success(
            "WsGroupSaveResults",
            json!({"results": [{"wsGroup": group_json("a:b", "123"), "resultMetadata": {"success": "T"}}]}),
        ),
    )
    .await;

    let mut group = Group::named("a:b").unwrap();
    assert_eq!(group.uuid(), None);
    let saved = client.save_groups([&mut group]).await.unwrap();

    assert_eq!(saved.len(), 1);
    assert_eq!(group.uuid(), Some("123"));
    assert_eq!(group.name(), Some("a:b"));

    let fields = request_fields(&http.requests().await[0], "WsRestGroupSaveRequest");
    assert_eq!(
        fields["wsGroupToSaves"],
        json!([{
            "wsGroup": {"name": "a:b"},
            "wsGroupLookup": {"groupName": "a:b"},
            "saveMode": "INSERT_OR_UPDATE",
            "createParentStemsIfNotExist": "F",
        }])
    );
}

#[tokio::test]
async fn test_save_groups_mixed_inputs_and_rename() {
    let (client, http) = scripted_client();
    http.push_json(
        201,
        success(
            "WsGroupSaveResults",
            json!({"results": [
                {"wsGroup": group_json("org:plain", "p1")},
                {"wsGroup": group_json("org:renamed", "r1")},
            ]}),
        ),
    )
    .await;

    let mut plain = Group::named("org:plain").unwrap();
    let mut renamed = Group::named("org:renamed")
        .unwrap()
        .with_description("moved");
    let wrappers = vec![
        GroupToSave::from(&mut plain),
        GroupToSave::new(&mut renamed)
            .with_lookup(Group::named("org:original").unwrap())
            .with_save_mode(SaveMode::Update)
            .create_parent_stems_if_not_exist(true),
    ];
    client.save_groups(wrappers).await.unwrap();

    assert_eq!(plain.uuid(), Some("p1"));
    assert_eq!(renamed.uuid(), Some("r1"));
    assert_eq!(renamed.name(), Some("org:renamed"));

    let fields = request_fields(&http.requests().await[0], "WsRestGroupSaveRequest");
    let second = &fields["wsGroupToSaves"][1];
    assert_eq!(second["wsGroupLookup"], json!({"groupName": "org:original"}));
    assert_eq!(second["saveMode"], "UPDATE");
    assert_eq!(second["createParentStemsIfNotExist"], "T");
    assert_eq!(second["wsGroup"]["description"], "moved");
}

#[tokio::test]
async fn test_save_groups_rename_and_reuse_of_old_name() {
    let (client, http) = scripted_client();
    http.push_json(
        201,
        success(
            "WsGroupSaveResults",
            json!({"results": [
                {"wsGroup": group_json("a:y", "u0")},
                {"wsGroup": group_json("a:x", "u1")},
            ]}),
        ),
    )
    .await;

    let mut renamed = Group::named("a:y").unwrap();
    let mut fresh = Group::named("a:x").unwrap();
    client
        .save_groups([
            GroupToSave::new(&mut renamed).with_lookup(Group::named("a:x").unwrap()),
            GroupToSave::new(&mut fresh),
        ])
        .await
        .unwrap();

    assert_eq!(renamed.name(), Some("a:y"));
    assert_eq!(renamed.uuid(), Some("u0"));
    assert_eq!(fresh.name(), Some("a:x"));
    assert_eq!(fresh.uuid(), Some("u1"));
}

#[tokio::test]
async fn test_save_group_failure_raises_kind() {
    let (client, http) = scripted_client();
    http.push_json(
        500,
        failure("WsGroupSaveResults", "PROBLEM_SAVING_GROUPS", "no parent stem", json!({})),
    )
    .await;

    let mut group = Group::named("missing:parent:g").unwrap();
    let err = client.save_group(&mut group).await.unwrap_err();
    let api = err.as_api_error().unwrap();
    assert_eq!(api.kind, ApiErrorKind::ProblemSavingGroups);
    assert_eq!(api.message, "no parent stem");
    assert_eq!(api.path, "groups");
    assert!(api.input.get("WsRestGroupSaveRequest").is_some());
    assert_eq!(group.uuid(), None);
}

#[tokio::test]
async fn test_delete_groups_recovers_partial_results() {
    let (client, http) = scripted_client();
    http.push_json(
        500,
        failure(
            "WsGroupDeleteResults",
            "PROBLEM_DELETING_GROUPS",
            "one failed",
            json!({"results": [
                delete_entry("wsGroup", group_json("a:x", "1"), "SUCCESS"),
                delete_entry("wsGroup", group_json("a:y", "2"), "EXCEPTION"),
            ]}),
        ),
    )
    .await;

    let groups = [Group::named("a:x").unwrap(), Group::named("a:y").unwrap()];
    let outcomes = client.delete_groups(&groups).await.unwrap();

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].entity, groups[0]);
    assert!(outcomes[0].is_success());
    assert_eq!(outcomes[1].result_code, ResultCode::Exception);
}

#[tokio::test]
async fn test_delete_groups_other_errors_propagate() {
    let (client, http) = scripted_client();
    http.push_json(
        500,
        failure("WsGroupDeleteResults", "INSUFFICIENT_PRIVILEGES", "denied", json!({})),
    )
    .await;

    let err = client
        .delete_groups(&[Group::named("a:x").unwrap()])
        .await
        .unwrap_err();
    assert!(err.is_api_kind(ApiErrorKind::InsufficientPrivileges));
}

#[tokio::test]
async fn test_delete_groups_empty_is_noop() {
    let (client, http) = scripted_client();
    assert!(client.delete_groups(&[]).await.unwrap().is_empty());
    assert_eq!(http.request_count().await, 0);
}
