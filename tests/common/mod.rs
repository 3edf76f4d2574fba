//! Shared utilities for integration tests.

use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::net::TcpListener;
use tracelevel::config::{LoggingConfig, ServerConfig};
use tracelevel::http::LevelServer;
use tracelevel::lifecycle::Shutdown;
use tracelevel::{logger, LevelHandle, Logger};

/// In-memory sink for formatted records.
#[derive(Clone, Default)]
pub struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub logger: Logger,
    pub handle: LevelHandle,
    pub output: Capture,
    pub shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start a level control server on an ephemeral port.
pub async fn start_server(logging: LoggingConfig) -> TestServer {
    let output = Capture::default();
    let sink = output.clone();
    let (logger, handle) = logger::create_with_writer(&logging, move || sink.clone());

    let mut config = ServerConfig::default();
    config.logging = logging;
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = LevelServer::new(config, handle.clone());
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer {
        addr,
        logger,
        handle,
        output,
        shutdown,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
