//! Launch button against a fake launcher

use docshow::launch::{LaunchOutcome, LaunchTrigger, Notifier, BUSY_LABEL, UNREACHABLE_MESSAGE};
use docshow::page::parse_page;
use docshow::LaunchConfig;
use std::sync::{Arc, Mutex};
use tiny_http::{Method, Response, Server};

#[derive(Default)]
struct Recorder(Mutex<Vec<String>>);

impl Notifier for Recorder {
    fn notify(&self, outcome: &LaunchOutcome) {
        self.0.lock().unwrap().push(outcome.user_message().to_string());
    }
}

fn start_launcher(status: u16, body: &'static str) -> String {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr();
    std::thread::spawn(move || {
        for request in server.incoming_requests() {
            let response = if request.method() == &Method::Post && request.url() == "/launch" {
                Response::from_string(body).with_status_code(status).with_header(
                    "Content-Type: application/json".parse::<tiny_http::Header>().unwrap(),
                )
            } else {
                Response::from_string("Not Found").with_status_code(404)
            };
            let _ = request.respond(response);
        }
    });
    format!("http://{}/launch", addr)
}

fn page() -> Arc<Mutex<docshow::page::Page>> {
    let html = r#"<html><body><button class="btn-primary">Launch</button></body></html>"#;
    Arc::new(Mutex::new(parse_page::<&str>(html, &[]).unwrap()))
}

fn trigger(endpoint: String, recorder: Arc<Recorder>) -> LaunchTrigger {
    let cfg = LaunchConfig {
        endpoint,
        restore_delay_ms: 50,
        timeout_ms: 5000,
        ..Default::default()
    };
    LaunchTrigger::new(cfg, recorder).unwrap()
}

#[tokio::test]
async fn success_surfaces_message_and_restores_control() {
    let endpoint = start_launcher(200, r#"{"status": "success", "message": "Commands started!"}"#);
    let recorder = Arc::new(Recorder::default());
    let trigger = trigger(endpoint, recorder.clone());
    let page = page();

    let activation = trigger.activate(&page).await.expect("control present");
    assert_eq!(activation.outcome, LaunchOutcome::Launched { message: "Commands started!".into() });
    assert_eq!(*recorder.0.lock().unwrap(), vec!["Commands started!".to_string()]);

    {
        let guard = page.lock().unwrap();
        let control = guard.launch_control.as_ref().unwrap();
        assert!(control.disabled);
        assert_eq!(control.label_html, BUSY_LABEL);
    }

    // A second click while busy does nothing
    assert!(trigger.activate(&page).await.is_none());

    activation.restore.await.unwrap();
    let guard = page.lock().unwrap();
    let control = guard.launch_control.as_ref().unwrap();
    assert!(!control.disabled);
    assert_eq!(control.label_html, "Launch");
}

#[tokio::test]
async fn error_status_shows_fixed_text() {
    let endpoint = start_launcher(500, r#"{"message": "should not be shown"}"#);
    let recorder = Arc::new(Recorder::default());
    let page = page();
    let activation = trigger(endpoint, recorder.clone()).activate(&page).await.unwrap();
    assert!(!activation.outcome.is_success());
    assert_eq!(*recorder.0.lock().unwrap(), vec![UNREACHABLE_MESSAGE.to_string()]);
    activation.restore.await.unwrap();
    assert!(!page.lock().unwrap().launch_control.as_ref().unwrap().disabled);
}

#[tokio::test]
async fn malformed_body_is_a_failure() {
    let endpoint = start_launcher(200, r#"{"status": "success"}"#);
    let recorder = Arc::new(Recorder::default());
    let activation = trigger(endpoint, recorder).activate(&page()).await.unwrap();
    assert!(matches!(activation.outcome, LaunchOutcome::Failed { .. }));
}

#[tokio::test]
async fn unreachable_launcher_restores_control() {
    let port = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
    let recorder = Arc::new(Recorder::default());
    let page = page();
    let activation = trigger(format!("http://127.0.0.1:{}/launch", port), recorder.clone())
        .activate(&page)
        .await
        .unwrap();
    assert_eq!(activation.outcome.user_message(), UNREACHABLE_MESSAGE);
    activation.restore.await.unwrap();
    let guard = page.lock().unwrap();
    assert_eq!(guard.launch_control.as_ref().unwrap().label_html, "Launch");
}
