//! Integration tests for the access check route.

use axum::http::StatusCode;
use chrono::Utc;
use uuid::Uuid;

use docspace_core::types::{AclEntryId, SpaceId, UserId};
use docspace_entity::group::GroupRole;
use docspace_entity::permission::{AclEffect, AclEntry, Action, ResourceType, SpaceRoleBinding};
use docspace_entity::resource::ResourceRef;

use crate::helpers::TestApp;

struct Workspace {
    space: SpaceId,
    doc: Uuid,
}

async fn seed(app: &TestApp, owner: UserId) -> Workspace {
    let space = SpaceId::new();
    let doc = Uuid::new_v4();
    let resources = &app.state.repositories.resources;
    resources
        .insert(&ResourceRef::space(space, owner), "Engineering")
        .await
        .unwrap();
    resources
        .insert(&ResourceRef::document(doc, space, owner), "Roadmap")
        .await
        .unwrap();
    Workspace { space, doc }
}

fn doc_path(doc: Uuid, action: &str) -> String {
    format!("/api/v1/access/document/{doc}?action={action}")
}

#[tokio::test]
async fn test_guest_reads_but_cannot_write() {
    let app = TestApp::new();
    let owner = app.register("owner", "correct-horse").await;
    let ws = seed(&app, owner).await;
    let guest = app.register("visitor", "correct-horse").await;
    app.grant_role(guest, GroupRole::Guest).await;
    let token = app.login("visitor", "correct-horse").await;

    let read = app
        .request("GET", &doc_path(ws.doc, "read"), None, Some(&token))
        .await;
    assert_eq!(read.status, StatusCode::OK);
    assert_eq!(read.body["allowed"], true);
    assert_eq!(read.body["tier"], "role_default");

    let write = app
        .request("GET", &doc_path(ws.doc, "write"), None, Some(&token))
        .await;
    assert_eq!(write.status, StatusCode::FORBIDDEN);

    // Same answer whether or not the document exists.
    let ghost = app
        .request("GET", &doc_path(Uuid::new_v4(), "write"), None, Some(&token))
        .await;
    assert_eq!(ghost.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_missing_document_is_not_found_for_capable_role() {
    let app = TestApp::new();
    let admin = app.register("admin", "correct-horse").await;
    app.grant_role(admin, GroupRole::Admin).await;
    let token = app.login("admin", "correct-horse").await;

    let response = app
        .request("GET", &doc_path(Uuid::new_v4(), "read"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_explicit_deny_overrides_admin() {
    let app = TestApp::new();
    let owner = app.register("owner", "correct-horse").await;
    let ws = seed(&app, owner).await;
    let admin = app.register("boss", "correct-horse").await;
    app.grant_role(admin, GroupRole::Admin).await;
    app.state
        .repositories
        .acl
        .insert_entry(&AclEntry {
            id: AclEntryId::new(),
            resource_type: ResourceType::Document,
            resource_id: ws.doc,
            user_id: admin,
            action: Action::Delete,
            effect: AclEffect::Deny,
            created_at: Utc::now(),
        })
        .await
        .unwrap();
    let token = app.login("boss", "correct-horse").await;

    let delete = app
        .request("GET", &doc_path(ws.doc, "delete"), None, Some(&token))
        .await;
    assert_eq!(delete.status, StatusCode::FORBIDDEN);

    let manage = app
        .request("GET", &doc_path(ws.doc, "manage"), None, Some(&token))
        .await;
    assert_eq!(manage.status, StatusCode::OK);
}

#[tokio::test]
async fn test_user_role_writes_only_own_space() {
    let app = TestApp::new();
    let owner = app.register("owner", "correct-horse").await;
    app.grant_role(owner, GroupRole::User).await;
    let ws = seed(&app, owner).await;
    let other = app.register("other", "correct-horse").await;
    app.grant_role(other, GroupRole::User).await;

    let owner_token = app.login("owner", "correct-horse").await;
    let other_token = app.login("other", "correct-horse").await;

    let own = app
        .request("GET", &doc_path(ws.doc, "write"), None, Some(&owner_token))
        .await;
    assert_eq!(own.status, StatusCode::OK);

    let foreign = app
        .request("GET", &doc_path(ws.doc, "write"), None, Some(&other_token))
        .await;
    assert_eq!(foreign.status, StatusCode::FORBIDDEN);

    // Association also gates reads for the user role.
    let space_path = format!("/api/v1/access/space/{}?action=read", ws.space);
    let foreign_read = app
        .request("GET", &space_path, None, Some(&other_token))
        .await;
    assert_eq!(foreign_read.status, StatusCode::FORBIDDEN);
    let own_read = app
        .request("GET", &space_path, None, Some(&owner_token))
        .await;
    assert_eq!(own_read.status, StatusCode::OK);
}

#[tokio::test]
async fn test_space_binding_grants_write() {
    let app = TestApp::new();
    let owner = app.register("owner", "correct-horse").await;
    let ws = seed(&app, owner).await;
    let editor = app.register("editor", "correct-horse").await;

    let groups = &app.state.repositories.groups;
    let team = groups
        .create("roadmap-editors", Some("Roadmap editors"), GroupRole::Guest)
        .await
        .unwrap();
    groups.add_member(team.id, editor).await.unwrap();
    app.state
        .repositories
        .acl
        .bind_space_role(&SpaceRoleBinding {
            space_id: ws.space,
            group_id: team.id,
            role: GroupRole::User,
        })
        .await
        .unwrap();
    let token = app.login("editor", "correct-horse").await;

    let write = app
        .request("GET", &doc_path(ws.doc, "write"), None, Some(&token))
        .await;
    assert_eq!(write.status, StatusCode::OK);
    assert_eq!(write.body["tier"], "space_group");
}

#[tokio::test]
async fn test_no_rules_is_forbidden() {
    let app = TestApp::new();
    let owner = app.register("owner", "correct-horse").await;
    let ws = seed(&app, owner).await;
    app.register("stranger", "correct-horse").await;
    let token = app.login("stranger", "correct-horse").await;

    let response = app
        .request("GET", &doc_path(ws.doc, "read"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "FORBIDDEN");
}

#[tokio::test]
async fn test_bad_action_or_type_is_bad_request() {
    let app = TestApp::new();
    app.register("owner", "correct-horse").await;
    let token = app.login("owner", "correct-horse").await;

    let action = app
        .request("GET", &doc_path(Uuid::new_v4(), "fly"), None, Some(&token))
        .await;
    assert_eq!(action.status, StatusCode::BAD_REQUEST);

    let kind = app
        .request(
            "GET",
            &format!("/api/v1/access/folder/{}?action=read", Uuid::new_v4()),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(kind.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_access_requires_token() {
    let app = TestApp::new();
    let response = app
        .request("GET", &doc_path(Uuid::new_v4(), "read"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_mixed_roles_most_permissive_group_wins() {
    let app = TestApp::new();
    let owner = app.register("owner", "correct-horse").await;
    let ws = seed(&app, owner).await;
    let pat = app.register("pat", "correct-horse").await;
    app.grant_role(pat, GroupRole::User).await;
    app.grant_role(pat, GroupRole::Guest).await;
    let token = app.login("pat", "correct-horse").await;

    let read = app
        .request("GET", &doc_path(ws.doc, "read"), None, Some(&token))
        .await;
    assert_eq!(read.status, StatusCode::OK);
    assert_eq!(read.body["allowed"], true);
    assert_eq!(read.body["tier"], "role_default");

    let write = app
        .request("GET", &doc_path(ws.doc, "write"), None, Some(&token))
        .await;
    assert_eq!(write.status, StatusCode::FORBIDDEN);
}
