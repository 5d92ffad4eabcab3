use std::net::SocketAddr;
use std::sync::Arc;

use minimath_core::ProgressStore;
use minimath_server::AppState;
use tokio::sync::oneshot;

/// A backend bound to an ephemeral localhost port
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        let store = ProgressStore::open_in_memory().expect("in-memory store");
        let state = Arc::new(AppState::new(store));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");

        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            minimath_server::serve(listener, state, async {
                let _ = rx.await;
            })
            .await
            .expect("server");
        });

        Self {
            addr,
            shutdown: Some(tx),
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    #[allow(dead_code)]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.url(), path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}
