use dotenvy::dotenv;
use libhttpd::network::Bind;
use libhttpd::network::application::http::*;
use libhttpd::network::tcp::{TcpAcceptor, TcpConnection};
use std::env;
use std::io::{Read, Write};
use std::net::TcpStream;
use std::thread;
use std::time::Duration;

fn greet(_req: &Request, resp: &mut Response<TcpConnection>, params: &[&str]) -> HandlerResult {
    resp.add_header("content-type", "text/plain")?;
    resp.send(b"hello ")?;
    resp.send(params[0].as_bytes())?;
    Ok(())
}

fn listen(address: &str) -> TcpAcceptor {
    let config = ServerConfig {
        address,
        read_timeout_ms: 2000,
        ..ServerConfig::default()
    };
    TcpAcceptor::listen(&config).expect("Failed to open listening socket")
}

/// Serves `connections` requests on a background thread and returns the address.
fn spawn_server(connections: usize) -> (String, thread::JoinHandle<()>) {
    dotenv().ok();
    let bind = env::var("TEST_HTTP_BIND").unwrap_or("127.0.0.1:0".to_string());
    let mut acceptor = listen(&bind);
    let address = acceptor.local_addr().unwrap().to_string();
    let handle = thread::spawn(move || {
        let mut router: Router<HandlerFn<TcpConnection>> = Router::new();
        router.route("/hello/<name>", greet).unwrap();
        let server = Server::new(router);
        for _ in 0..connections {
            let conn = acceptor.bind("").unwrap();
            server.handle_connection(conn);
        }
    });
    (address, handle)
}

fn exchange(address: &str, request: &[u8]) -> String {
    let mut stream = TcpStream::connect(address).expect("Failed to connect to server");
    stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    stream.write_all(request).unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();
    response
}

#[test]
fn test_serve_over_tcp() {
    let (address, server) = spawn_server(2);

    let response = exchange(&address, b"GET /hello/tcp HTTP/1.1\r\nHost: localhost\r\n\r\n");
    assert_eq!(
        response,
        "HTTP/1.0 200 \r\ncontent-type: text/plain\r\n\r\nhello tcp"
    );

    let response = exchange(&address, b"DELETE /hello/tcp HTTP/1.0\r\n\r\n");
    assert_eq!(response, "HTTP/1.0 405 \r\n\r\n");

    server.join().unwrap();
}

#[test]
fn test_idle_client_is_dropped_after_read_timeout() {
    let mut acceptor = listen("127.0.0.1:0").with_read_timeout(Some(Duration::from_millis(100)));
    let address = acceptor.local_addr().unwrap();
    let server = thread::spawn(move || {
        let router: Router<HandlerFn<TcpConnection>> = Router::new();
        Server::new(router).handle_connection(acceptor.bind("").unwrap());
    });

    let mut stream = TcpStream::connect(address).unwrap();
    stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    stream.write_all(b"GET / HTTP/1.0\r\n").unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).unwrap();
    assert!(response.is_empty());

    server.join().unwrap();
}

#[test]
fn test_backlog_is_advisory() {
    let config = ServerConfig::from_json(r#"{"address":"127.0.0.1:0","backlog":1}"#).unwrap();
    assert_eq!(config.backlog, 1);
    let acceptor = TcpAcceptor::listen(&config).unwrap();
    assert!(acceptor.local_addr().is_some());
}
