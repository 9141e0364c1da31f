//! End-to-end flows through the application context against a mock
//! directory service.

use roster_console::{AppContext, ConsoleConfig, Navigation, Route};
use roster_core::{Credentials, UserId};
use roster_sync::{BackingKind, LoadPhase};
use tempfile::TempDir;
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

async fn mount_directory(server: &MockServer) {
    for (page, ids) in [(1u32, 1..=6u64), (2, 7..=12)] {
        let data: Vec<_> = ids.map(user_json).collect();
        Mock::given(method("GET"))
            .and(path("/users"))
            .and(query_param("page", page.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "page": page,
                "per_page": 6,
                "total": 12,
                "total_pages": 2,
                "data": data
            })))
            .expect(1)
            .mount(server)
            .await;
    }
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "token": "QpwL5tke4Pnpja7X4" })),
        )
        .mount(server)
        .await;
}

fn config(server: &MockServer, dir: &TempDir) -> ConsoleConfig {
    let mut config = ConsoleConfig::default();
    config.api.base_url = server.uri();
    config.storage.database_url = format!("sqlite://{}", dir.path().join("state/roster.db").display());
    config
}

fn credentials() -> Credentials {
    Credentials::new("eve.holt@reqres.in", "cityslicka")
}

// =============================================================================
// Session
// =============================================================================

mod session {
    use super::*;

    #[tokio::test]
    async fn test_login_unlocks_protected_routes() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        let dir = TempDir::new().unwrap();

        let ctx = AppContext::build(&config(&server, &dir)).await.unwrap();
        assert_eq!(
            ctx.guard.navigate("/users").await.unwrap(),
            Navigation::Redirect(Route::Entry)
        );

        ctx.auth.login(&credentials()).await.unwrap();
        assert_eq!(
            ctx.guard.navigate("/users").await.unwrap(),
            Navigation::Render(Route::Users)
        );

        ctx.auth.logout().await.unwrap();
        assert_eq!(
            ctx.guard.navigate("/add-user").await.unwrap(),
            Navigation::Redirect(Route::Entry)
        );
    }

    #[tokio::test]
    async fn test_session_survives_restart() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        let dir = TempDir::new().unwrap();
        let config = config(&server, &dir);

        {
            let ctx = AppContext::build(&config).await.unwrap();
            ctx.auth.login(&credentials()).await.unwrap();
        }

        let ctx = AppContext::build(&config).await.unwrap();
        assert!(ctx.session.is_authenticated().await.unwrap());
    }

    #[tokio::test]
    async fn test_ephemeral_state_is_not_kept() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        let dir = TempDir::new().unwrap();
        let mut config = config(&server, &dir);
        config.storage.ephemeral = true;

        {
            let ctx = AppContext::build(&config).await.unwrap();
            ctx.auth.login(&credentials()).await.unwrap();
        }

        let ctx = AppContext::build(&config).await.unwrap();
        assert!(!ctx.session.is_authenticated().await.unwrap());
        assert!(!dir.path().join("state").exists());
    }
}

// =============================================================================
// Directory
// =============================================================================

mod directory {
    use super::*;

    #[tokio::test]
    async fn test_snapshot_survives_restart() {
        let server = MockServer::start().await;
        mount_directory(&server).await;
        let dir = TempDir::new().unwrap();
        let config = config(&server, &dir);

        {
            let ctx = AppContext::build(&config).await.unwrap();
            let mut directory = ctx.directory();
            directory.set_page(1).await;
            assert_eq!(directory.phase(), LoadPhase::Loaded);
            assert_eq!(directory.total_pages(), 2);
        }

        // Reopened from disk: reads never reach the remote again
        let ctx = AppContext::build(&config).await.unwrap();
        assert_eq!(ctx.repository.backing_kind().await, BackingKind::Cached);

        let mut directory = ctx.directory();
        directory.set_page(2).await;
        let ids: Vec<u64> = directory.users().iter().map(|u| u.id.get()).collect();
        assert_eq!(ids, vec![7, 8, 9, 10, 11, 12]);
    }

    #[tokio::test]
    async fn test_delete_through_controller() {
        let server = MockServer::start().await;
        mount_directory(&server).await;
        Mock::given(method("DELETE"))
            .and(path("/users/3"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        let dir = TempDir::new().unwrap();

        let ctx = AppContext::build(&config(&server, &dir)).await.unwrap();
        let mut directory = ctx.directory();
        directory.set_page(1).await;

        directory.request_delete(UserId::new(3));
        assert_eq!(directory.confirm_delete().await, Some(UserId::new(3)));
        assert!(directory.users().iter().all(|u| u.id != UserId::new(3)));

        let snapshot = ctx.repository.snapshot().await.unwrap();
        assert_eq!(snapshot.len(), 11);
    }

    #[tokio::test]
    async fn test_return_from_edit_merges_into_holding_page() {
        let server = MockServer::start().await;
        mount_directory(&server).await;
        let dir = TempDir::new().unwrap();

        let ctx = AppContext::build(&config(&server, &dir)).await.unwrap();
        ctx.directory().set_page(1).await;

        let mut edited = ctx.repository.get(UserId::new(8)).await.unwrap();
        edited.first_name = "Carried".to_string();

        let directory = ctx.directory_after_edit(edited.clone()).await;

        assert_eq!(directory.page(), 2);
        assert_eq!(directory.phase(), LoadPhase::Loaded);
        let shown = directory
            .users()
            .iter()
            .find(|u| u.id == UserId::new(8))
            .unwrap();
        assert_eq!(shown, &edited);
        // The snapshot itself was not touched by the merge
        assert_eq!(ctx.repository.get(UserId::new(8)).await.unwrap().first_name, "First8");
    }
}
