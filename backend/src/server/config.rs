//! HTTP server configuration object.

use std::net::SocketAddr;

use car_listings::outbound::persistence::DbPool;
use car_listings::outbound::security::SigningSecret;
use car_listings::outbound::storage::LocalImageStore;

/// Everything the server needs to build its adapters.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) image_store: LocalImageStore,
    pub(crate) signing_secret: SigningSecret,
}

impl ServerConfig {
    /// Construct a server configuration from validated runtime parts.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        db_pool: DbPool,
        image_store: LocalImageStore,
        signing_secret: SigningSecret,
    ) -> Self {
        Self {
            bind_addr,
            db_pool,
            image_store,
            signing_secret,
        }
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
