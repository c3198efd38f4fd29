use hecrypt_core::SchemesConfig;
use hecrypt_server::config::Config;
use hecrypt_storage::{BackendKind, StorageConfig};
use std::net::SocketAddr;
use tokio::net::TcpListener;

pub struct TestServer {
    pub url: String,
    #[allow(dead_code)]
    pub addr: SocketAddr,
}

/// Fast parameters, uploads go to the in-memory store
pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".into(),
        port: 0, // OS assigns port
        max_upload_bytes: 64 * 1024,
        schemes: SchemesConfig::insecure_fast(),
        storage: StorageConfig {
            backend: BackendKind::Memory,
            path_prefix: "encrypted".into(),
            ..Default::default()
        },
    }
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(test_config()).await
    }

    pub async fn start_with(config: Config) -> Self {
        let state = hecrypt_server::state::AppState::new(&config).await.unwrap();
        let app = hecrypt_server::routes::router(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{addr}"),
            addr,
        }
    }
}
