//! Resource service round trips against the in-memory backend.
//!
//! These cover the collection-level guarantees every resource shares:
//! created ids are unique, updates replace fields, deletes stick, and a
//! second delete of the same id fails.

use std::collections::HashSet;
use std::sync::Arc;

use cms_client::{
    form::{IMAGE_FIELD, METHOD_FIELD},
    testing::MockBackend,
    types::{News, NewsDraft, PublishStatus, Slider, SliderDraft, TeamMember},
    ApiError, CmsClient, CredentialStore, Entity, EntityId, FileUpload, HttpMethod, ImageInput,
};
use serde_json::json;

fn cms(backend: &Arc<MockBackend>) -> CmsClient {
    CmsClient::from_parts(backend.client(), Arc::new(CredentialStore::new()))
}

fn seeded_news() -> Arc<MockBackend> {
    Arc::new(MockBackend::new().with_collection(
        "/news",
        vec![
            json!({"id": 1, "title": "Spring rates", "content": "Rates fell", "status": "published"}),
            json!({"id": 2, "title": "New office", "content": "We moved", "status": "draft"}),
        ],
    ))
}

#[tokio::test]
async fn test_create_then_list_contains_new_entity_once() {
    let backend = seeded_news();
    let news = cms(&backend).resource::<News>();

    let before = news.list().await.unwrap();
    let existing: HashSet<EntityId> = before.iter().map(|n| n.id.clone()).collect();

    let created = news
        .create(&NewsDraft {
            title: "Scholarship fund".into(),
            content: "Applications open".into(),
            status: PublishStatus::Published,
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(!existing.contains(&created.id));

    let after = news.list().await.unwrap();
    assert_eq!(after.len(), before.len() + 1);
    assert_eq!(after.iter().filter(|n| n.id == created.id).count(), 1);
    assert!(created.created_at.is_some());
}

#[tokio::test]
async fn test_create_sends_multipart_post_with_method_field() {
    let backend = seeded_news();
    let news = cms(&backend).resource::<News>();

    news.create(&NewsDraft {
        title: "Title".into(),
        content: "Body".into(),
        ..Default::default()
    })
    .await
    .unwrap();

    let call = backend.calls().pop().unwrap();
    assert_eq!(call.method, HttpMethod::Post);
    assert_eq!(call.path, "/news");
    let form = call.form.unwrap();
    assert_eq!(form.get_text(METHOD_FIELD), Some("POST"));
    assert_eq!(form.get_text("status"), Some("draft"));
    assert_eq!(form.get_text("category"), None);
}

#[tokio::test]
async fn test_update_then_list_reflects_fields_and_keeps_image() {
    let backend = Arc::new(MockBackend::new().with_collection(
        "/sliders",
        vec![json!({
            "id": 10,
            "title": "Fund your degree",
            "image": "/storage/sliders/10-hero.jpg",
            "sort_order": 1,
            "is_published": 1,
        })],
    ));
    let sliders = cms(&backend).resource::<Slider>();

    let current = sliders.list().await.unwrap().remove(0);
    let mut draft = current.to_draft();
    draft.title = "Fund your masters".into();
    draft.sort_order = 3;

    let updated = sliders.update(&current.id, &draft).await.unwrap();
    assert_eq!(updated.title, "Fund your masters");

    let call = backend.calls().pop().unwrap();
    let form = call.form.unwrap();
    assert_eq!(form.get_text(METHOD_FIELD), Some("PUT"));
    assert!(form.file(IMAGE_FIELD).is_none(), "existing URL must not be re-uploaded");

    let listed = sliders.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Fund your masters");
    assert_eq!(listed[0].sort_order, 3);
    assert!(listed[0].is_published);
    assert_eq!(listed[0].image.as_deref(), Some("/storage/sliders/10-hero.jpg"));
}

#[tokio::test]
async fn test_update_with_new_file_replaces_image() {
    let backend = Arc::new(MockBackend::new().with_collection(
        "/sliders",
        vec![json!({"id": 1, "title": "Hero", "image": "/storage/sliders/1-old.jpg"})],
    ));
    let sliders = cms(&backend).resource::<Slider>();

    let draft = SliderDraft {
        title: "Hero".into(),
        image: ImageInput::Upload(FileUpload::new("new.jpg", "image/jpeg", vec![0xff, 0xd8])),
        ..Default::default()
    };
    let updated = sliders.update(&EntityId::Number(1), &draft).await.unwrap();

    assert_eq!(updated.image.as_deref(), Some("/storage/sliders/1-new.jpg"));
}

#[tokio::test]
async fn test_delete_is_permanent_and_repeat_is_not_found() {
    let backend = seeded_news();
    let news = cms(&backend).resource::<News>();
    let id = EntityId::Number(1);

    news.delete(&id).await.unwrap();

    let listed = news.list().await.unwrap();
    assert!(listed.iter().all(|n| n.id != id));

    let err = news.delete(&id).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.message(), "Record not found.");
}

#[tokio::test]
async fn test_failures_are_normalized_with_resource_fallbacks() {
    let backend = seeded_news();
    let news = cms(&backend).resource::<News>();

    backend.fail_next(500, None);
    let err = news.list().await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Api {
            status: 500,
            message: "Failed to fetch news".into()
        }
    );

    backend.fail_next_network();
    let err = news.delete(&EntityId::Number(2)).await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Network {
            message: "Failed to delete news article".into()
        }
    );

    backend.fail_next(422, Some("The title field is required."));
    let err = news.create(&NewsDraft::default()).await.unwrap_err();
    assert_eq!(err.message(), "The title field is required.");
}

#[tokio::test]
async fn test_toggle_publish_sends_only_the_flag() {
    let backend = Arc::new(MockBackend::new().with_collection(
        "/team-members",
        vec![json!({"id": 5, "name": "Ama", "position": "Advisor", "is_published": true})],
    ));
    let team = cms(&backend).resource::<TeamMember>();

    let member = team.toggle_publish(&EntityId::Number(5), false).await.unwrap();
    assert!(!member.is_published);
    assert_eq!(member.name, "Ama");

    let call = backend.calls().pop().unwrap();
    assert_eq!(call.path, "/team-members/5/toggle-publish");
    let form = call.form.unwrap();
    assert_eq!(form.get_text(METHOD_FIELD), Some("PATCH"));
    assert_eq!(form.get_text("is_published"), Some("0"));
    assert_eq!(form.get_text("name"), None);
}
