use repaykaro::api::endpoints::{self, Resource};
use repaykaro::api::{ApiClient, RemoteApi};
use repaykaro::auth::{SendOtpOutcome, VerifyOtpOutcome};
use repaykaro::navigation::{Route, Screen, Tab};
use repaykaro::notify::RecordingNotifier;
use repaykaro::store::{FileStore, MemoryStore, SessionStore, FIRST_LAUNCH_KEY, TOKEN_KEY};
use repaykaro::{App, Config};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(splash_delay_ms: u64) -> Config {
    Config {
        splash_delay_ms,
        ..Config::default()
    }
}

fn app_with(server: &MockServer, store: Arc<dyn SessionStore>) -> (App, Arc<RecordingNotifier>) {
    let api: Arc<dyn RemoteApi> = Arc::new(
        ApiClient::new(
            &format!("{}/api/v1/", server.uri()),
            Duration::from_secs(5),
            store.clone(),
        )
        .unwrap(),
    );
    let toasts = Arc::new(RecordingNotifier::new());
    let app = App::with_parts(test_config(50), store, api, toasts.clone());
    (app, toasts)
}

#[tokio::test]
async fn fresh_install_to_logged_in_and_back_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/clientAuth/login"))
        .and(body_json(json!({ "phone": "9876543210" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/clientAuth/validate-otp"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "jwtToken": "xyz" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/clients/get-client"))
        .and(header("authorization", "Bearer xyz"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "client": { "name": "Asha" } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let (app, toasts) = app_with(&server, store.clone());

    assert_eq!(app.session.bootstrap().await, Some(Screen::Splash));
    assert_eq!(
        store.snapshot().get(FIRST_LAUNCH_KEY).map(String::as_str),
        Some("false")
    );
    assert_eq!(
        app.session.wait_past_splash().await,
        Some(Screen::Unauthenticated)
    );

    let nav = app.session.navigation();
    assert_eq!(nav.routes(), vec![Route::Home]);

    app.auth.open_login();
    assert_eq!(app.auth.send_otp("9876543210").await, SendOtpOutcome::Sent);
    assert_eq!(
        nav.current(),
        Some(Route::Otp {
            mobile: "9876543210".into()
        })
    );

    assert_eq!(
        app.auth.verify_otp("9876543210", "1234").await,
        VerifyOtpOutcome::Verified
    );
    assert_eq!(app.session.current_screen(), Some(Screen::Authenticated));
    assert_eq!(nav.routes(), vec![Route::BottomTab { tab: Tab::Dashboard }]);

    let dashboard = endpoints::fetch(app.api.as_ref(), Resource::Dashboard)
        .await
        .unwrap();
    assert_eq!(dashboard.field("client"), Some(&json!({ "name": "Asha" })));

    app.auth.logout().await.unwrap();
    assert_eq!(app.session.current_screen(), Some(Screen::Unauthenticated));
    assert_eq!(nav.routes(), vec![Route::Home]);
    assert!(!store.snapshot().contains_key(TOKEN_KEY));

    let messages: Vec<String> = toasts.toasts().into_iter().map(|t| t.message).collect();
    assert_eq!(
        messages,
        vec!["OTP sent successfully!", "OTP Verified! Redirecting..."]
    );
}

#[tokio::test]
async fn relaunch_from_file_store_skips_splash_and_restores_login() {
    let server = MockServer::start().await;
    let tmp = tempfile::TempDir::new().unwrap();
    let store_path = tmp.path().join("session.json");

    {
        let (app, _) = app_with(&server, Arc::new(FileStore::new(&store_path)));
        assert_eq!(app.session.bootstrap().await, Some(Screen::Splash));
        app.session.store().set(TOKEN_KEY, "abc").await.unwrap();
        app.session.shutdown();
    }

    let (app, _) = app_with(&server, Arc::new(FileStore::new(&store_path)));
    assert_eq!(app.session.bootstrap().await, Some(Screen::Authenticated));
    assert!(app.session.state().splash_done);
    assert_eq!(
        app.session.navigation().routes(),
        vec![Route::BottomTab { tab: Tab::Dashboard }]
    );
}

#[tokio::test]
async fn rejected_otp_keeps_user_on_otp_screen() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/clientAuth/validate-otp"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": false, "message": "Incorrect OTP" })),
        )
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::with_entries([(FIRST_LAUNCH_KEY, "false")]));
    let (app, toasts) = app_with(&server, store.clone());
    app.session.bootstrap().await;

    let nav = app.session.navigation();
    nav.navigate(Route::Otp {
        mobile: "9876543210".into(),
    });

    assert_eq!(
        app.auth.verify_otp("9876543210", "9999").await,
        VerifyOtpOutcome::Rejected("Incorrect OTP".into())
    );
    assert_eq!(app.session.current_screen(), Some(Screen::Unauthenticated));
    assert_eq!(
        nav.current(),
        Some(Route::Otp {
            mobile: "9876543210".into()
        })
    );
    assert_eq!(toasts.last_message().as_deref(), Some("Incorrect OTP"));
    assert!(!store.snapshot().contains_key(TOKEN_KEY));
}

#[tokio::test]
async fn corrupt_store_file_replays_splash_only_once() {
    let server = MockServer::start().await;
    let tmp = tempfile::TempDir::new().unwrap();
    let store_path = tmp.path().join("session.json");
    std::fs::write(&store_path, "{\"isFirstLaunch\": \"false\", ").unwrap();

    {
        let (app, _) = app_with(&server, Arc::new(FileStore::new(&store_path)));
        assert_eq!(app.session.bootstrap().await, Some(Screen::Splash));
        app.session.store().set(TOKEN_KEY, "abc").await.unwrap();
        app.session.shutdown();
    }

    let (app, _) = app_with(&server, Arc::new(FileStore::new(&store_path)));
    assert_eq!(app.session.bootstrap().await, Some(Screen::Authenticated));
}

#[tokio::test]
async fn configured_toast_duration_reaches_the_notifier() {
    let server = MockServer::start().await;
    let store: Arc<dyn SessionStore> = Arc::new(MemoryStore::new());
    let api: Arc<dyn RemoteApi> = Arc::new(
        ApiClient::new(&server.uri(), Duration::from_secs(5), store.clone()).unwrap(),
    );
    let toasts = Arc::new(RecordingNotifier::new());
    let config = Config {
        toast_duration_ms: 500,
        ..test_config(50)
    };
    let app = App::with_parts(config, store, api, toasts.clone());

    assert_eq!(app.auth.send_otp("123").await, SendOtpOutcome::InvalidPhone);
    assert_eq!(toasts.toasts()[0].duration_ms, 500);
}
