use bytes::Bytes;
use http_body_util::Full;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::time::Duration;

use crate::config::ClientConfig;

pub type HttpClient = Client<HttpConnector, Full<Bytes>>;

/// Build the pooled HTTP/1.1 client used for backend calls
///
/// Connections are reused across governed calls; the pool keeps idle
/// connections for `pool_idle_timeout_secs`.
pub fn build_http_client(config: &ClientConfig) -> HttpClient {
    let mut connector = HttpConnector::new();
    connector.set_connect_timeout(Some(Duration::from_millis(config.connect_timeout_ms)));
    connector.set_nodelay(true);

    let mut builder = Client::builder(TokioExecutor::new());
    builder.pool_idle_timeout(Duration::from_secs(config.pool_idle_timeout_secs));

    if config.pool_max_idle_per_host > 0 {
        builder.pool_max_idle_per_host(config.pool_max_idle_per_host);
    }

    builder.build(connector)
}
