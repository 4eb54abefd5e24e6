//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use cleartrip_relay::config::RelayConfig;
use cleartrip_relay::lifecycle::build_state;
use cleartrip_relay::{HttpServer, Shutdown};
use tokio::net::TcpListener;

/// A relay running in the background on an ephemeral port.
#[allow(dead_code)]
pub struct RunningRelay {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

#[allow(dead_code)]
impl RunningRelay {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for RunningRelay {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Config pointing both partners at mock servers.
#[allow(dead_code)]
pub fn partner_config(hotel_url: &str, flight_url: &str) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.hotel.base_url = hotel_url.to_string();
    config.hotel.api_key = "test-api-key".into();
    config.flight.base_url = flight_url.to_string();
    config.flight.username = "agent".into();
    config.flight.password = "secret".into();
    config.flight.tenant_id = "tenant-1".into();
    config
}

/// Build state from `config` and serve it until the returned handle drops.
#[allow(dead_code)]
pub async fn start_relay(config: RelayConfig) -> RunningRelay {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = build_state(config).unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = HttpServer::new(state).run(listener, server_shutdown).await;
    });

    wait_until_listening(addr).await;
    RunningRelay { addr, shutdown }
}

/// Client that never reuses connections between assertions.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

async fn wait_until_listening(addr: SocketAddr) {
    for _ in 0..50 {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("relay did not start listening on {}", addr);
}
