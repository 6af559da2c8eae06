//! Shared test helpers: an embedded backend that speaks the dashboard API's
//! JSON conventions.
#![allow(dead_code)]

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use request_governor_lib::config::ClientConfig;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Running backend plus a count of the requests it served.
pub struct Backend {
    pub addr: SocketAddr,
    pub hits: Arc<AtomicU32>,
}

impl Backend {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig { base_url: format!("http://{}", self.addr), ..ClientConfig::default() }
    }

    pub fn hits(&self) -> u32 {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Start the embedded backend on an ephemeral port.
///
/// Routes:
/// - `/products`: 200 `{success, data: [...]}`
/// - `/bare`: 200 without envelope
/// - `/empty`: 204
/// - `/missing`: 404
/// - `/expired`: 401 "logged in on another device"
/// - `/forbidden`: 403 without body
/// - `/broken`: 500 `{error}`
/// - `/gateway`: 502 without body
/// - `/invalid`: 422 `{message}`
/// - `/slow`: 200 after 500ms
/// - `/echo`: 200 with the request's authorization header and JSON body
/// - `/flaky`: 503 for the first two requests, then 200
pub async fn spawn_backend() -> Result<Backend, Box<dyn std::error::Error + Send + Sync>> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let hits = Arc::new(AtomicU32::new(0));
    let flaky = Arc::new(AtomicU32::new(0));

    let counter = hits.clone();
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let counter = counter.clone();
            let flaky = flaky.clone();
            tokio::spawn(async move {
                let svc = service_fn(move |req: Request<Incoming>| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    let flaky = flaky.clone();
                    async move { Ok::<_, Infallible>(route(req, &flaky).await) }
                });
                let _ = ConnBuilder::new(TokioExecutor::new())
                    .serve_connection(TokioIo::new(stream), svc)
                    .await;
            });
        }
    });

    Ok(Backend { addr, hits })
}

async fn route(req: Request<Incoming>, flaky: &AtomicU32) -> Response<Full<Bytes>> {
    match req.uri().path() {
        "/products" => json(StatusCode::OK, r#"{"success":true,"data":[{"id":1,"name":"Maize"}]}"#),
        "/bare" => json(StatusCode::OK, r#"{"id":2}"#),
        "/empty" => json(StatusCode::NO_CONTENT, ""),
        "/missing" => json(StatusCode::NOT_FOUND, r#"{"message":"no such product"}"#),
        "/expired" => json(
            StatusCode::UNAUTHORIZED,
            r#"{"message":"Session ended: logged in on another device"}"#,
        ),
        "/forbidden" => json(StatusCode::FORBIDDEN, ""),
        "/broken" => json(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error":"database unavailable"}"#),
        "/gateway" => json(StatusCode::BAD_GATEWAY, ""),
        "/invalid" => json(StatusCode::UNPROCESSABLE_ENTITY, r#"{"message":"quantity must be > 0"}"#),
        "/slow" => {
            tokio::time::sleep(Duration::from_millis(500)).await;
            json(StatusCode::OK, r#"{"data":"late"}"#)
        }
        "/flaky" => {
            if flaky.fetch_add(1, Ordering::SeqCst) < 2 {
                json(StatusCode::SERVICE_UNAVAILABLE, "")
            } else {
                json(StatusCode::OK, r#"{"data":"recovered"}"#)
            }
        }
        "/echo" => {
            let method = req.method().to_string();
            let auth = req
                .headers()
                .get(hyper::header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = match req.into_body().collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(_) => Bytes::new(),
            };
            let body: serde_json::Value =
                serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
            let payload = serde_json::json!({
                "data": { "method": method, "authorization": auth, "body": body }
            });
            json(StatusCode::OK, &payload.to_string())
        }
        _ => json(StatusCode::NOT_FOUND, ""),
    }
}

fn json(status: StatusCode, body: &str) -> Response<Full<Bytes>> {
    let mut resp = Response::new(Full::new(Bytes::from(body.to_string())));
    *resp.status_mut() = status;
    if !body.is_empty() {
        resp.headers_mut().insert(
            hyper::header::CONTENT_TYPE,
            hyper::header::HeaderValue::from_static("application/json"),
        );
    }
    resp
}

/// An address nothing listens on.
pub fn closed_addr() -> Result<SocketAddr, std::io::Error> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    listener.local_addr()
}
