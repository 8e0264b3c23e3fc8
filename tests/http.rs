use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct Profile {
    name: String,
    goal: String,
    length: u8,
}

#[derive(Debug, Deserialize)]
struct ActiveSession {
    script: String,
    audio_text: String,
}

#[derive(Debug, Deserialize)]
struct SessionRecord {
    mood_before: u8,
    mood_after: u8,
    notes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snapshot {
    view: String,
    profile: Option<Profile>,
    show_onboarding: bool,
    current_mood: u8,
    streak: u32,
    sessions: Vec<SessionRecord>,
    severe_mood_count: u32,
    banner: Option<String>,
    playing: bool,
    speech_supported: bool,
    active_session: Option<ActiveSession>,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("void_mindful_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/state")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server(data_path: &str) -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_void_mindful"))
        .env("PORT", port.to_string())
        .env("VOID_DATA_PATH", data_path)
        .env("VOID_SPEECH", "off")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = spawn_server(&unique_data_path()).await;
    #[cfg(unix)]
    cleanup::register(server.child.id());
    let server = Arc::new(server);
    *guard = Some(Arc::clone(&server));
    server
}

async fn post(client: &Client, server: &TestServer, path: &str, body: Option<serde_json::Value>) -> Snapshot {
    let mut request = client.post(format!("{}/api/{path}", server.base_url));
    if let Some(body) = body {
        request = request.json(&body);
    }
    let response = request.send().await.unwrap();
    assert!(response.status().is_success(), "{path} failed: {}", response.status());
    response.json().await.unwrap()
}

async fn get_state(client: &Client, server: &TestServer) -> Snapshot {
    client
        .get(format!("{}/api/state", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

fn ana_onboarding() -> serde_json::Value {
    serde_json::json!({
        "name": "Ana",
        "goal": "Focus",
        "length": 5,
        "reminder": "08:00",
        "mood": 2
    })
}

#[tokio::test]
async fn http_index_serves_page() {
    let server = shared_server().await;
    let body = Client::new()
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("<title>Void</title>"));
    assert!(body.contains("day streak"));
}

#[tokio::test]
async fn http_rejects_unknown_session_length() {
    let server = shared_server().await;
    let response = Client::new()
        .post(format!("{}/api/onboarding", server.base_url))
        .json(&serde_json::json!({ "name": "Ana", "goal": "Focus", "length": 7, "mood": 3 }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn http_full_session_flow() {
    let server = spawn_server(&unique_data_path()).await;
    let client = Client::new();

    let initial = get_state(&client, &server).await;
    assert_eq!(initial.view, "home");
    assert!(initial.profile.is_none());
    assert!(initial.show_onboarding);
    assert!(!initial.speech_supported);

    let blocked = post(&client, &server, "session/start", None).await;
    assert_eq!(blocked.view, "home");
    assert!(blocked.show_onboarding);

    let onboarded = post(&client, &server, "onboarding", Some(ana_onboarding())).await;
    let profile = onboarded.profile.expect("profile saved");
    assert_eq!(profile.name, "Ana");
    assert_eq!(profile.goal, "Focus");
    assert_eq!(profile.length, 5);
    assert_eq!(onboarded.current_mood, 2);
    assert!(!onboarded.show_onboarding);

    let started = post(&client, &server, "session/start", None).await;
    assert_eq!(started.view, "session");
    assert_eq!(started.severe_mood_count, 0);
    assert!(started.banner.is_none());
    let session = started.active_session.expect("session generated");
    assert!(!session.script.is_empty());
    assert_eq!(session.script, session.audio_text);

    let toggled = post(&client, &server, "playback/toggle", None).await;
    assert!(!toggled.playing);

    let finished = post(&client, &server, "session/finish", None).await;
    assert_eq!(finished.view, "checkout");
    let back = post(&client, &server, "session/back", None).await;
    assert_eq!(back.view, "session");
    post(&client, &server, "session/finish", None).await;

    let complete = post(
        &client,
        &server,
        "checkout",
        Some(serde_json::json!({ "mood_after": 4, "notes": "felt clearer" })),
    )
    .await;
    assert_eq!(complete.view, "complete");
    assert_eq!(complete.sessions.len(), 1);
    assert_eq!(complete.sessions[0].mood_before, 2);
    assert_eq!(complete.sessions[0].mood_after, 4);
    assert_eq!(complete.sessions[0].notes.as_deref(), Some("felt clearer"));
    assert_eq!(complete.streak, 1);
    assert_eq!(complete.current_mood, 4);

    let home = post(&client, &server, "session/another", None).await;
    assert_eq!(home.view, "home");
    assert_eq!(home.streak, 1);
}

#[tokio::test]
async fn http_state_survives_restart() {
    let data_path = unique_data_path();
    let client = Client::new();
    {
        let server = spawn_server(&data_path).await;
        post(&client, &server, "onboarding", Some(ana_onboarding())).await;
        post(&client, &server, "session/start", None).await;
    }

    let server = spawn_server(&data_path).await;
    let restored = get_state(&client, &server).await;
    assert_eq!(restored.view, "home");
    assert!(!restored.show_onboarding);
    assert_eq!(restored.profile.map(|profile| profile.name).as_deref(), Some("Ana"));
    assert!(restored.active_session.is_some());
}
