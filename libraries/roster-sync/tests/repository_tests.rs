//! Repository behavior against a mock directory service.

use roster_client::{ApiClient, ClientConfig};
use roster_core::{KeyValueStore, NewUser, UserApi, UserId, UserPatch};
use roster_storage::{MemoryStore, UserCache, USERS_KEY};
use roster_sync::{BackingKind, UserRepository};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user_json(id: u64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "email": format!("user{}@reqres.in", id),
        "first_name": format!("First{}", id),
        "last_name": format!("Last{}", id),
        "avatar": format!("https://reqres.in/img/faces/{}-image.jpg", id)
    })
}

fn page_json(page: u32, ids: std::ops::RangeInclusive<u64>) -> serde_json::Value {
    let data: Vec<_> = ids.map(user_json).collect();
    serde_json::json!({
        "page": page,
        "per_page": 6,
        "total": 12,
        "total_pages": 2,
        "data": data
    })
}

async fn mount_page(server: &MockServer, page: u32, ids: std::ops::RangeInclusive<u64>) {
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(page, ids)))
        .expect(1)
        .mount(server)
        .await;
}

struct Fixture {
    repo: UserRepository,
    store: Arc<MemoryStore>,
}

async fn open(server: &MockServer) -> Fixture {
    open_with(server, Arc::new(MemoryStore::new())).await
}

async fn open_with(server: &MockServer, store: Arc<MemoryStore>) -> Fixture {
    let api: Arc<dyn UserApi> = Arc::new(ApiClient::new(ClientConfig::new(server.uri())).unwrap());
    let repo = UserRepository::open(api, UserCache::new(store.clone()))
        .await
        .unwrap();
    Fixture { repo, store }
}

fn ids(users: &[roster_core::User]) -> Vec<u64> {
    users.iter().map(|u| u.id.get()).collect()
}

// =============================================================================
// Bootstrap
// =============================================================================

#[tokio::test]
async fn first_page_bootstraps_snapshot() {
    let server = MockServer::start().await;
    mount_page(&server, 1, 1..=6).await;
    mount_page(&server, 2, 7..=12).await;

    let fx = open(&server).await;
    assert_eq!(fx.repo.backing_kind().await, BackingKind::Remote);

    let first = fx.repo.list(1).await.unwrap();
    assert_eq!(ids(&first.users), vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(first.total_pages, 2);
    assert_eq!(fx.repo.backing_kind().await, BackingKind::Cached);

    // Served from the snapshot; each remote page was fetched exactly once
    let second = fx.repo.list(2).await.unwrap();
    assert_eq!(ids(&second.users), vec![7, 8, 9, 10, 11, 12]);
    assert_eq!(second.total_pages, 2);

    let persisted = fx.store.get(USERS_KEY).await.unwrap().unwrap();
    let persisted: Vec<roster_core::User> = serde_json::from_str(&persisted).unwrap();
    assert_eq!(persisted.len(), 12);
}

#[tokio::test]
async fn failed_second_page_keeps_remote_backing() {
    let server = MockServer::start().await;
    mount_page(&server, 1, 1..=6).await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fx = open(&server).await;

    let first = fx.repo.list(1).await.unwrap();
    assert_eq!(first.users.len(), 6);
    assert_eq!(fx.repo.backing_kind().await, BackingKind::Remote);
    assert!(fx.store.get(USERS_KEY).await.unwrap().is_none());
}

#[tokio::test]
async fn remote_page_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fx = open(&server).await;
    let err = fx.repo.list(1).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to fetch users");
}

#[tokio::test]
async fn single_remote_page_skips_second_fetch() {
    let server = MockServer::start().await;
    let data: Vec<_> = (1..=4).map(user_json).collect();
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "page": 1,
            "per_page": 6,
            "total": 4,
            "total_pages": 1,
            "data": data
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(2, 7..=12)))
        .expect(0)
        .mount(&server)
        .await;

    let fx = open(&server).await;
    let first = fx.repo.list(1).await.unwrap();

    assert_eq!(first.total_pages, 1);
    assert_eq!(fx.repo.backing_kind().await, BackingKind::Cached);
    assert_eq!(fx.repo.snapshot().await.map(|s| s.len()), Some(4));
}

#[tokio::test]
async fn concurrent_first_reads_bootstrap_once() {
    let server = MockServer::start().await;
    // Each page is fetched exactly once even with two readers racing
    mount_page(&server, 1, 1..=6).await;
    mount_page(&server, 2, 7..=12).await;

    let fx = open(&server).await;
    let (a, b) = tokio::join!(fx.repo.list(1), fx.repo.list(1));

    assert_eq!(ids(&a.unwrap().users), vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(ids(&b.unwrap().users), vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(fx.repo.snapshot().await.map(|s| s.len()), Some(12));
}

#[tokio::test]
async fn page_zero_is_rejected() {
    let server = MockServer::start().await;
    let fx = open(&server).await;
    assert!(fx.repo.list(0).await.is_err());
}

#[tokio::test]
async fn persisted_snapshot_serves_reads_without_remote() {
    let server = MockServer::start().await;
    let store = Arc::new(MemoryStore::new());
    let users: Vec<_> = (1..=8)
        .map(|id| NewUser::new("F", "L", "f@l.io").into_user(UserId::new(id)))
        .collect();
    UserCache::new(store.clone()).store(&users).await.unwrap();

    let fx = open_with(&server, store).await;
    assert_eq!(fx.repo.backing_kind().await, BackingKind::Cached);

    let page = fx.repo.list(2).await.unwrap();
    assert_eq!(ids(&page.users), vec![7, 8]);
    assert_eq!(page.total_pages, 2);

    // Beyond the end: empty, not an error
    assert!(fx.repo.list(5).await.unwrap().is_empty());
}

// =============================================================================
// Writes
// =============================================================================

async fn bootstrapped(server: &MockServer) -> Fixture {
    mount_page(server, 1, 1..=6).await;
    mount_page(server, 2, 7..=12).await;
    let fx = open(server).await;
    fx.repo.list(1).await.unwrap();
    fx
}

#[tokio::test]
async fn created_user_gets_next_local_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com",
            "id": "487",
            "createdAt": "2024-06-01T10:00:00.000Z"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let fx = bootstrapped(&server).await;

    let user = fx
        .repo
        .create(NewUser::new("Ada", "Lovelace", "ada@example.com"))
        .await
        .unwrap();

    assert_eq!(user.id, UserId::new(13));
    assert_eq!(user.full_name(), "Ada Lovelace");
    assert!(user.avatar.starts_with("https://ui-avatars.com/api/?name=Ada+Lovelace"));

    let third = fx.repo.list(3).await.unwrap();
    assert_eq!(ids(&third.users), vec![13]);
    assert_eq!(third.total_pages, 3);
}

#[tokio::test]
async fn create_without_snapshot_starts_one() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({ "id": "9" })))
        .mount(&server)
        .await;

    let fx = open(&server).await;
    let user = fx
        .repo
        .create(NewUser::new("Ada", "Lovelace", "ada@example.com"))
        .await
        .unwrap();

    assert_eq!(user.id, UserId::new(1));
    assert_eq!(user.email, "ada@example.com");
    assert_eq!(fx.repo.backing_kind().await, BackingKind::Cached);
    assert_eq!(fx.repo.snapshot().await.map(|s| s.len()), Some(1));
}

#[tokio::test]
async fn create_during_bootstrap_keeps_remote_records() {
    let server = MockServer::start().await;
    mount_page(&server, 1, 1..=6).await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_json(2, 7..=12))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({ "id": "77" })))
        .mount(&server)
        .await;

    let fx = open(&server).await;
    let (listed, created) = tokio::join!(fx.repo.list(1), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        fx.repo
            .create(NewUser::new("Ada", "Lovelace", "ada@example.com"))
            .await
    });

    assert_eq!(listed.unwrap().users.len(), 6);
    assert_eq!(created.unwrap().id, UserId::new(13));
    assert_eq!(fx.repo.snapshot().await.map(|s| s.len()), Some(13));
}

#[tokio::test]
async fn invalid_user_never_reaches_remote() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let fx = open(&server).await;
    assert!(fx.repo.create(NewUser::new("", "Lovelace", "ada@example.com")).await.is_err());
    assert!(fx.repo.create(NewUser::new("Ada", "Lovelace", "not-an-email")).await.is_err());
}

#[tokio::test]
async fn update_merges_into_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/users/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "first_name": "Janet",
            "updatedAt": "2024-06-01T10:00:00.000Z"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let fx = bootstrapped(&server).await;

    let patch = UserPatch {
        first_name: Some("Janet".to_string()),
        ..UserPatch::default()
    };
    let returned = fx.repo.update(UserId::new(2), patch.clone()).await.unwrap();
    assert_eq!(returned, patch);

    let user = fx.repo.get(UserId::new(2)).await.unwrap();
    assert_eq!(user.first_name, "Janet");
    assert_eq!(user.last_name, "Last2");
    assert_eq!(user.email, "user2@reqres.in");
}

#[tokio::test]
async fn failed_update_leaves_snapshot_alone() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let fx = bootstrapped(&server).await;

    let patch = UserPatch {
        email: Some("new@reqres.in".to_string()),
        ..UserPatch::default()
    };
    let err = fx.repo.update(UserId::new(3), patch).await.unwrap_err();
    assert_eq!(err.to_string(), "Update failed");

    let user = fx.repo.get(UserId::new(3)).await.unwrap();
    assert_eq!(user.email, "user3@reqres.in");
}

#[tokio::test]
async fn delete_removes_from_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/users/9"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;
    let fx = bootstrapped(&server).await;

    fx.repo.delete(UserId::new(9)).await.unwrap();

    let first = fx.repo.list(1).await.unwrap();
    assert_eq!(first.total, 11);
    let mut listed = Vec::new();
    for page in 1..=first.total_pages {
        listed.extend(ids(&fx.repo.list(page).await.unwrap().users));
    }
    assert_eq!(listed, vec![1, 2, 3, 4, 5, 6, 7, 8, 10, 11, 12]);

    // Gone from the snapshot, so the lookup goes to the remote
    let err = fx.repo.get(UserId::new(9)).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to fetch user");
}

#[tokio::test]
async fn get_falls_back_to_remote_on_snapshot_miss() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/40"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": user_json(40) })),
        )
        .expect(1)
        .mount(&server)
        .await;
    let fx = bootstrapped(&server).await;

    // Hit: no remote call
    assert_eq!(fx.repo.get(UserId::new(5)).await.unwrap().first_name, "First5");

    let user = fx.repo.get(UserId::new(40)).await.unwrap();
    assert_eq!(user.first_name, "First40");
}
