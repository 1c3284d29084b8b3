use axum::Router;
use logbook::{app::AppState, db, http};
use sqlx::sqlite::SqlitePoolOptions;
use tokio::task::JoinHandle;

async fn start_server() -> (String, JoinHandle<()>) {
    let db_url = "sqlite://:memory:";
    let db_url = db::ensure_sqlite_path(db_url);
    // One connection: every pool connection would get its own in-memory db.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&db_url)
        .await
        .expect("connect memory sqlite");
    db::run_migrations(&pool).await.expect("migrate");
    let state = AppState { db: pool };
    let app: Router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), handle)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

async fn login(base: &str, client: &reqwest::Client, name: &str) {
    let res = client
        .post(format!("{}/auth/login", base))
        .form(&[("name", name)])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 302);
    assert_eq!(res.headers()["location"], "/dashboard");
}

async fn create_entry(base: &str, client: &reqwest::Client, title: &str, body: &str, vis: &str) {
    let res = client
        .post(format!("{}/logs", base))
        .form(&[("title", title), ("body", body), ("visibility", vis)])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 302);
    assert_eq!(res.headers()["location"], "/dashboard");
}

/// Entry ids linked from a rendered page, in document order.
fn entry_ids(html: &str) -> Vec<String> {
    let marker = "href=\"/logs/";
    let mut ids = Vec::new();
    let mut rest = html;
    while let Some(pos) = rest.find(marker) {
        rest = &rest[pos + marker.len()..];
        let candidate: String = rest.chars().take(36).collect();
        if uuid::Uuid::parse_str(&candidate).is_ok() && !ids.contains(&candidate) {
            ids.push(candidate);
        }
    }
    ids
}

#[tokio::test]
async fn unauthenticated_visitors_are_sent_to_login() {
    let (base, _srv) = start_server().await;
    let client = client();

    for path in ["/logs", "/logs/add", "/dashboard"] {
        let res = client.get(format!("{base}{path}")).send().await.unwrap();
        assert_eq!(res.status().as_u16(), 302, "{path}");
        assert_eq!(res.headers()["location"], "/", "{path}");
    }
}

#[tokio::test]
async fn login_opens_a_session() {
    let (base, _srv) = start_server().await;
    let client = client();
    login(&base, &client, "alice").await;

    let res = client
        .get(format!("{}/dashboard", base))
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());
    let html = res.text().await.unwrap();
    assert!(html.contains("alice"));
}

#[tokio::test]
async fn create_then_list_shows_public_entry() {
    let (base, _srv) = start_server().await;
    let client = client();
    login(&base, &client, "alice").await;
    create_entry(&base, &client, "First entry", "<b>hello</b> world", "public").await;

    let res = client.get(format!("{}/logs", base)).send().await.unwrap();
    assert!(res.status().is_success());
    let html = res.text().await.unwrap();
    assert!(html.contains("First entry"));
    assert!(html.contains("alice"));
    // The preview strips markup from the body
    assert!(html.contains("hello world"));
    assert!(!html.contains("&lt;b&gt;"));
}

#[tokio::test]
async fn private_entries_stay_off_the_public_feed() {
    let (base, _srv) = start_server().await;
    let client = client();
    login(&base, &client, "alice").await;
    create_entry(&base, &client, "Secret note", "shh", "private").await;

    let res = client.get(format!("{}/logs", base)).send().await.unwrap();
    let html = res.text().await.unwrap();
    assert!(!html.contains("Secret note"));

    // The owner still sees it on the dashboard, flagged private
    let res = client
        .get(format!("{}/dashboard", base))
        .send()
        .await
        .unwrap();
    let html = res.text().await.unwrap();
    assert!(html.contains("Secret note"));
    assert!(html.contains("private"));
}

#[tokio::test]
async fn feed_is_newest_first() {
    let (base, _srv) = start_server().await;
    let client = client();
    login(&base, &client, "alice").await;
    create_entry(&base, &client, "Older entry", "", "public").await;
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    create_entry(&base, &client, "Newer entry", "", "public").await;

    let res = client.get(format!("{}/logs", base)).send().await.unwrap();
    let html = res.text().await.unwrap();
    let newer = html.find("Newer entry").expect("newer listed");
    let older = html.find("Older entry").expect("older listed");
    assert!(newer < older, "newest entry should render first");
}

#[tokio::test]
async fn detail_view_renders_and_missing_id_is_404() {
    let (base, _srv) = start_server().await;
    let client = client();
    login(&base, &client, "alice").await;
    create_entry(&base, &client, "Readable", "full body text", "public").await;

    let res = client.get(format!("{}/logs", base)).send().await.unwrap();
    let id = entry_ids(&res.text().await.unwrap())
        .into_iter()
        .next()
        .expect("entry id");

    let res = client
        .get(format!("{}/logs/{}", base, id))
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());
    let html = res.text().await.unwrap();
    assert!(html.contains("Readable"));
    assert!(html.contains("full body text"));

    let res = client
        .get(format!("{}/logs/{}", base, uuid::Uuid::new_v4()))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 404);
}

#[tokio::test]
async fn ownership_gates_edit_and_update() {
    let (base, _srv) = start_server().await;
    let alice = client();
    login(&base, &alice, "alice").await;
    create_entry(&base, &alice, "Owned by alice", "original body", "public").await;

    let res = alice.get(format!("{}/logs", base)).send().await.unwrap();
    let id = entry_ids(&res.text().await.unwrap())
        .into_iter()
        .next()
        .expect("entry id");

    let bob = client();
    login(&base, &bob, "bob").await;

    // Non-owner asking for the edit form is bounced to the feed
    let res = bob
        .get(format!("{}/logs/edit/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 302);
    assert_eq!(res.headers()["location"], "/logs");

    // Non-owner update is a no-op redirect
    let res = bob
        .put(format!("{}/logs/{}", base, id))
        .form(&[("title", "hijacked"), ("visibility", "public")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 302);
    assert_eq!(res.headers()["location"], "/logs");

    let res = bob
        .get(format!("{}/logs/{}", base, id))
        .send()
        .await
        .unwrap();
    let html = res.text().await.unwrap();
    assert!(html.contains("Owned by alice"));
    assert!(!html.contains("hijacked"));

    // The owner gets the form with the current fields
    let res = alice
        .get(format!("{}/logs/edit/{}", base, id))
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());
    let html = res.text().await.unwrap();
    assert!(html.contains("Owned by alice"));
    assert!(html.contains("original body"));

    // And the owner's update applies
    let res = alice
        .put(format!("{}/logs/{}", base, id))
        .form(&[
            ("title", "Renamed by alice"),
            ("body", "new body"),
            ("visibility", "private"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 302);
    assert_eq!(res.headers()["location"], "/dashboard");

    let res = alice
        .get(format!("{}/logs/{}", base, id))
        .send()
        .await
        .unwrap();
    let html = res.text().await.unwrap();
    assert!(html.contains("Renamed by alice"));
    assert!(html.contains("new body"));
}

#[tokio::test]
async fn delete_removes_the_entry() {
    let (base, _srv) = start_server().await;
    let client = client();
    login(&base, &client, "alice").await;
    create_entry(&base, &client, "Short lived", "", "public").await;

    let res = client.get(format!("{}/logs", base)).send().await.unwrap();
    let id = entry_ids(&res.text().await.unwrap())
        .into_iter()
        .next()
        .expect("entry id");

    let res = client
        .delete(format!("{}/logs/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 302);
    assert_eq!(res.headers()["location"], "/dashboard");

    let res = client
        .get(format!("{}/logs/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 404);
}

#[tokio::test]
async fn invalid_fields_render_the_error_page() {
    let (base, _srv) = start_server().await;
    let client = client();
    login(&base, &client, "alice").await;

    // Blank title fails the create checks
    let res = client
        .post(format!("{}/logs", base))
        .form(&[("title", "   "), ("body", "x"), ("visibility", "public")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 500);

    // Unknown visibility fails the update checks too
    create_entry(&base, &client, "Valid", "x", "public").await;
    let res = client.get(format!("{}/logs", base)).send().await.unwrap();
    let id = entry_ids(&res.text().await.unwrap())
        .into_iter()
        .next()
        .expect("entry id");
    let res = client
        .put(format!("{}/logs/{}", base, id))
        .form(&[("title", "Valid"), ("visibility", "friends-only")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 500);
}

#[tokio::test]
async fn logout_closes_the_session() {
    let (base, _srv) = start_server().await;
    let client = client();
    login(&base, &client, "alice").await;

    let res = client
        .get(format!("{}/auth/logout", base))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 302);
    assert_eq!(res.headers()["location"], "/");

    let res = client
        .get(format!("{}/dashboard", base))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 302);
    assert_eq!(res.headers()["location"], "/");
}
