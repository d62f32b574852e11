// ── Debug trigger server ──
//
// Unauthenticated local HTTP surface for poking the platform by hand.
// Three fixed paths, any method, empty 204 on a match. Unmatched paths are
// never answered; the request stays open until the client gives up.

use std::convert::Infallible;
use std::io;

use chrono::{SecondsFormat, Utc};
use http_body_util::Empty;
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use honeywell_core::Platform;

/// Platform operation a debug path maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Add,
    Reachability,
    Remove,
}

impl Trigger {
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/add" => Some(Self::Add),
            "/reachability" => Some(Self::Reachability),
            "/remove" => Some(Self::Remove),
            _ => None,
        }
    }

    async fn fire(self, platform: &Platform) {
        match self {
            Self::Add => {
                platform.add(&timestamp_name()).await;
            }
            Self::Reachability => platform.update_reachability().await,
            Self::Remove => {
                platform.remove().await;
            }
        }
    }
}

/// Name for accessories created through `/add`: the current UTC time.
fn timestamp_name() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

// ── Accept loop ──────────────────────────────────────────────────────

/// Serve debug triggers on `listener` until `shutdown` is cancelled.
pub async fn serve(
    listener: TcpListener,
    platform: Platform,
    shutdown: CancellationToken,
) -> io::Result<()> {
    info!(addr = %listener.local_addr()?, "Server Listening...");

    loop {
        tokio::select! {
            () = shutdown.cancelled() => {
                info!("debug server shutting down");
                return Ok(());
            }
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "accept failed");
                        continue;
                    }
                };
                debug!(%peer, "debug connection");

                let io = TokioIo::new(stream);
                let platform = platform.clone();
                tokio::task::spawn(async move {
                    let service = service_fn(move |req| handle(platform.clone(), req));
                    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                        debug!(error = %err, "debug connection closed");
                    }
                });
            }
        }
    }
}

async fn handle(
    platform: Platform,
    req: Request<Incoming>,
) -> Result<Response<Empty<Bytes>>, Infallible> {
    let Some(trigger) = Trigger::from_path(req.uri().path()) else {
        warn!(
            method = %req.method(),
            path = req.uri().path(),
            "unknown debug route, request left open"
        );
        let never: Infallible = std::future::pending().await;
        match never {}
    };

    debug!(method = %req.method(), ?trigger, "debug trigger");
    trigger.fire(&platform).await;

    let mut response = Response::new(Empty::new());
    *response.status_mut() = StatusCode::NO_CONTENT;
    Ok(response)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;

    use honeywell_core::{HostApi, PlatformConfig};

    use crate::host::LocalHost;

    struct Harness {
        addr: SocketAddr,
        platform: Platform,
        shutdown: CancellationToken,
        server: tokio::task::JoinHandle<io::Result<()>>,
        _dir: tempfile::TempDir,
    }

    async fn start() -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let host: Arc<dyn HostApi> = Arc::new(LocalHost::open(dir.path()).unwrap());
        let config = PlatformConfig::from_raw(Some("https://example.com"), None).unwrap();
        let platform = Platform::new(config, Some(host));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = CancellationToken::new();
        let server = tokio::spawn(serve(listener, platform.clone(), shutdown.clone()));

        Harness {
            addr,
            platform,
            shutdown,
            server,
            _dir: dir,
        }
    }

    fn url(addr: SocketAddr, path: &str) -> String {
        format!("http://{addr}{path}")
    }

    #[test]
    fn paths_map_to_triggers() {
        assert_eq!(Trigger::from_path("/add"), Some(Trigger::Add));
        assert_eq!(Trigger::from_path("/reachability"), Some(Trigger::Reachability));
        assert_eq!(Trigger::from_path("/remove"), Some(Trigger::Remove));
        assert_eq!(Trigger::from_path("/"), None);
        assert_eq!(Trigger::from_path("/add/"), None);
    }

    #[test]
    fn timestamp_names_are_utc_millis() {
        let name = timestamp_name();
        assert!(name.ends_with('Z'), "{name}");
        assert_eq!(name.len(), "2026-10-18T09:15:02.123Z".len());
        assert!(chrono::DateTime::parse_from_rfc3339(&name).is_ok());
    }

    #[tokio::test]
    async fn add_then_remove_restores_size() {
        let h = start().await;
        let client = reqwest::Client::new();
        let before = h.platform.accessory_count().await;

        let resp = client.get(url(h.addr, "/add")).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NO_CONTENT);
        assert!(resp.bytes().await.unwrap().is_empty());
        assert_eq!(h.platform.accessory_count().await, before + 1);

        let resp = client.post(url(h.addr, "/remove")).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NO_CONTENT);
        assert_eq!(h.platform.accessory_count().await, before);

        h.shutdown.cancel();
    }

    #[tokio::test]
    async fn reachability_marks_accessories_unreachable() {
        let h = start().await;
        h.platform.add("Den").await.unwrap();

        let resp = reqwest::Client::new()
            .put(url(h.addr, "/reachability"))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), reqwest::StatusCode::NO_CONTENT);
        let snap = h.platform.accessories().await;
        assert_eq!(snap.len(), 1);
        assert!(!snap[0].reachable);

        h.shutdown.cancel();
    }

    #[tokio::test]
    async fn unknown_path_is_never_answered() {
        let h = start().await;
        let pending = reqwest::Client::new().get(url(h.addr, "/status")).send();

        let outcome = tokio::time::timeout(Duration::from_millis(300), pending).await;

        assert!(outcome.is_err(), "expected the request to hang");
        assert_eq!(h.platform.accessory_count().await, 0);

        h.shutdown.cancel();
    }

    #[tokio::test]
    async fn cancellation_stops_the_accept_loop() {
        let h = start().await;
        h.shutdown.cancel();

        let result = tokio::time::timeout(Duration::from_secs(5), h.server)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }
}
