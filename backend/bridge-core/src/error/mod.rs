pub mod bridge;
pub mod codec;
pub mod config;
pub mod registry;
pub mod server;
pub mod viewer;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Registry(#[from] registry::RegistryError),

    #[error(transparent)]
    Bridge(#[from] bridge::BridgeError),

    #[error(transparent)]
    Codec(#[from] codec::CodecError),

    #[error(transparent)]
    Server(#[from] server::ServerError),

    #[error(transparent)]
    Viewer(#[from] viewer::ViewerError),

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}
