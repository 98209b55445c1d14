use std::net::SocketAddr;
use std::sync::Arc;

use chrono::NaiveDateTime;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use webworker::config::{AppState, Config};
use webworker::http::NOT_FOUND_BODY;
use webworker::server;

struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<std::io::Result<()>>,
    _root: TempDir,
}

impl TestServer {
    async fn start(configure: impl FnOnce(&mut Config)) -> Self {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(
            root.path().join("page.html"),
            "<html>\n<body>\n<p>Served at <cs371date></p>\n<p>by <cs371server></p>\n</body>\n</html>\n",
        )
        .unwrap();
        std::fs::write(root.path().join("a.html"), "<p>alpha <cs371server></p>\n").unwrap();
        std::fs::write(root.path().join("b.txt"), "bravo <cs371date>\n").unwrap();

        let mut config = Config::defaults().unwrap();
        config.server.port = 0;
        config.http.root_dir = root.path().to_string_lossy().into_owned();
        config.logging.access_log = false;
        configure(&mut config);

        let listener = server::create_reusable_listener(
            "127.0.0.1:0".parse().unwrap(),
            config.server.backlog,
        )
        .unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(AppState::new(&config));

        let (tx, rx) = oneshot::channel::<()>();
        let task = tokio::spawn(server::start_server_loop(listener, state, async {
            let _ = rx.await;
        }));

        Self {
            addr,
            shutdown: Some(tx),
            task,
            _root: root,
        }
    }

    async fn send(&self, request: &str) -> String {
        let mut stream = TcpStream::connect(self.addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = Vec::new();
        stream.read_to_end(&mut response).await.unwrap();
        String::from_utf8(response).unwrap()
    }

    async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.task.await.unwrap().unwrap();
    }
}

fn split(response: &str) -> (&str, &str) {
    response.split_once("\n\n").expect("header terminator")
}

fn header_date(head: &str) -> NaiveDateTime {
    let value = head
        .lines()
        .find_map(|l| l.strip_prefix("Date: "))
        .expect("Date header");
    let value = value.strip_suffix(" GMT").expect("GMT suffix");
    NaiveDateTime::parse_from_str(value, "%b %d, %Y %I:%M:%S %p").expect("parsable date")
}

#[tokio::test]
async fn test_existing_file_is_rendered() {
    let server = TestServer::start(|_| {}).await;
    let response = server
        .send("GET /page.html HTTP/1.1\r\nHost: localhost\r\nUser-Agent: test\r\n\r\n")
        .await;

    let (head, body) = split(&response);
    assert!(head.starts_with("HTTP/1.1 200 OK\nDate: "));
    assert!(head.contains("\nServer: Jon's very own server\n"));
    assert!(head.contains("\nConnection: close\n"));
    assert!(head.ends_with("\nContent-Type: text/html"));
    assert!(!head.contains("Content-Length"));

    assert!(!body.contains("<cs371date>"));
    assert!(!body.contains("<cs371server>"));
    assert!(body.contains("<p>by Luis Server</p>"));
    // line terminators are dropped
    assert!(!body.contains('\n'));

    server.stop().await;
}

#[tokio::test]
async fn test_missing_file_returns_fixed_page() {
    let server = TestServer::start(|_| {}).await;
    for target in ["/nothing.html", "/dir/../nothing", "/%2e%2e/x", "/"] {
        let response = server.send(&format!("GET {target} HTTP/1.1\r\n\r\n")).await;
        let (head, body) = split(&response);
        assert!(head.starts_with("HTTP/1.1 404 Not Found\n"), "target {target}");
        assert_eq!(body, NOT_FOUND_BODY, "target {target}");
    }
    server.stop().await;
}

#[tokio::test]
async fn test_blank_request_is_not_found() {
    let server = TestServer::start(|_| {}).await;
    let response = server.send("\r\n").await;
    let (head, body) = split(&response);
    assert!(head.starts_with("HTTP/1.1 404 Not Found\n"));
    assert_eq!(body, NOT_FOUND_BODY);
    server.stop().await;
}

#[tokio::test]
async fn test_closed_without_request_is_not_found() {
    let server = TestServer::start(|_| {}).await;
    let mut stream = TcpStream::connect(server.addr).await.unwrap();
    stream.shutdown().await.unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    assert!(response.starts_with("HTTP/1.1 404 Not Found\n"));
    assert!(response.ends_with(NOT_FOUND_BODY));
    server.stop().await;
}

#[tokio::test]
async fn test_separator_is_optional() {
    let server = TestServer::start(|_| {}).await;
    let with = server.send("GET /a.html HTTP/1.0\r\n\r\n").await;
    let without = server.send("GET a.html HTTP/1.0\r\n\r\n").await;
    assert_eq!(split(&with).1, "<p>alpha Luis Server</p>");
    assert_eq!(split(&with).1, split(&without).1);
    server.stop().await;
}

#[tokio::test]
async fn test_sequential_requests_differ_only_in_tokens() {
    let server = TestServer::start(|_| {}).await;
    let first = server.send("GET /page.html HTTP/1.1\r\n\r\n").await;
    let second = server.send("GET /page.html HTTP/1.1\r\n\r\n").await;

    let (head1, body1) = split(&first);
    let (head2, body2) = split(&second);
    assert!(header_date(head1) <= header_date(head2));

    let strip_date = |body: &str| {
        let start = body.find("Served at ").unwrap() + "Served at ".len();
        let end = body[start..].find("</p>").unwrap() + start;
        assert!(end > start, "substituted date must not be empty");
        format!("{}{}", &body[..start], &body[end..])
    };
    assert_eq!(strip_date(body1), strip_date(body2));

    server.stop().await;
}

#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    let server = Arc::new(TestServer::start(|_| {}).await);

    let mut tasks = Vec::new();
    for i in 0..16 {
        let server = Arc::clone(&server);
        tasks.push(tokio::spawn(async move {
            let (target, expected_type) = if i % 2 == 0 {
                ("/a.html", "text/html")
            } else {
                ("/b.txt", "text/plain")
            };
            let response = server.send(&format!("GET {target} HTTP/1.1\r\n\r\n")).await;
            (i, expected_type, response)
        }));
    }

    for task in tasks {
        let (i, expected_type, response) = task.await.unwrap();
        let (head, body) = split(&response);
        assert!(head.starts_with("HTTP/1.1 200 OK\n"));
        assert!(head.ends_with(&format!("Content-Type: {expected_type}")));
        if i % 2 == 0 {
            assert_eq!(body, "<p>alpha Luis Server</p>");
        } else {
            assert!(body.starts_with("bravo "));
            assert!(!body.contains("alpha"));
        }
    }

    let server = Arc::try_unwrap(server).unwrap_or_else(|_| panic!("server still shared"));
    server.stop().await;
}

#[tokio::test]
async fn test_restored_line_breaks_and_crlf_headers() {
    let server = TestServer::start(|cfg| {
        cfg.render.restore_line_breaks = true;
        cfg.http.crlf_headers = true;
    })
    .await;
    let response = server.send("GET /a.html HTTP/1.1\r\n\r\n").await;
    let (head, body) = response.split_once("\r\n\r\n").unwrap();
    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
    assert_eq!(body, "<p>alpha Luis Server</p>\n");
    server.stop().await;
}

#[tokio::test]
async fn test_confinement_blocks_traversal() {
    let outside = tempfile::tempdir().unwrap();
    std::fs::write(outside.path().join("secret.txt"), "top secret").unwrap();
    let secret = outside.path().join("secret.txt");

    let open = TestServer::start(|_| {}).await;
    let response = open
        .send(&format!("GET /{} HTTP/1.1\r\n\r\n", secret.display()))
        .await;
    assert_eq!(split(&response).1, "top secret");
    open.stop().await;

    let confined = TestServer::start(|cfg| cfg.http.confine_to_root = true).await;
    let response = confined
        .send(&format!("GET /{} HTTP/1.1\r\n\r\n", secret.display()))
        .await;
    assert_eq!(split(&response).1, NOT_FOUND_BODY);
    confined.stop().await;
}

#[tokio::test]
async fn test_connection_limit_rejects_overflow() {
    let server = TestServer::start(|cfg| cfg.performance.max_connections = Some(1)).await;

    // hold the only slot open by never finishing the request head
    let mut holder = TcpStream::connect(server.addr).await.unwrap();
    holder.write_all(b"GET /a.html HTTP/1.1\r\n").await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    let mut rejected = TcpStream::connect(server.addr).await.unwrap();
    let _ = rejected.write_all(b"GET /a.html HTTP/1.1\r\n\r\n").await;
    let mut buf = Vec::new();
    let _ = rejected.read_to_end(&mut buf).await;
    assert!(buf.is_empty());

    holder.write_all(b"\r\n").await.unwrap();
    let mut response = String::new();
    holder.read_to_string(&mut response).await.unwrap();
    assert!(response.ends_with("<p>alpha Luis Server</p>"));

    server.stop().await;
}
