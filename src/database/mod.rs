pub mod disconnected;
pub mod users;

#[cfg(test)]
pub mod memory;

pub use disconnected::Disconnected;
pub use users::*;

use mongodb::bson::doc;
use mongodb::{Client, Collection, Database};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{redact_uri, AppConfig};

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

/// Builds the repository the handlers use. Never fails: when no client can
/// be created (no credentials, bad URI, SRV lookup failure) the error is
/// logged and every request gets a 500 instead.
pub async fn connect(config: &AppConfig) -> Arc<dyn UserRepository> {
    let Some(uri) = config.database_uri.as_deref() else {
        log::error!("❌ Failed to connect to MongoDB: neither MONGODB_URI nor DB_USER_PASS is set");
        return Arc::new(Disconnected::new("database credentials are not configured"));
    };

    match MongoDB::connect(uri, &config.database_name).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            log::error!("❌ Failed to connect to MongoDB: {}", e);
            Arc::new(Disconnected::new(e.to_string()))
        }
    }
}

impl MongoDB {
    /// Creates the process-wide client and checks the server once.
    ///
    /// A failed ping is logged and the handle is returned anyway: the driver
    /// keeps monitoring the deployment and operations fail until it is
    /// reachable. Parsing the URI (including the SRV lookup) can fail.
    pub async fn connect(uri: &str, database_name: &str) -> Result<Self, mongodb::error::Error> {
        log::info!("🔌 Connecting to MongoDB at {}", redact_uri(uri));

        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        client_options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(Duration::from_secs(300));
        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(database_name);
        let mongodb = Self { db };

        match mongodb.ping().await {
            Ok(()) => log::info!("✅ Connected to MongoDB (database: {})", database_name),
            Err(e) => log::error!("❌ Failed to connect to MongoDB: {}", e),
        }

        Ok(mongodb)
    }

    pub async fn ping(&self) -> Result<(), mongodb::error::Error> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }
}
