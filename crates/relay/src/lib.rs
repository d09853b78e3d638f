pub mod error;
mod path;
pub mod relay;
#[cfg(feature = "server")]
pub mod server;
pub mod wire;

pub use crate::path::{DEFAULT_ORIGIN, Origin};
#[cfg(feature = "mock")]
pub use crate::relay::MockRelay;
pub use crate::relay::{DEFAULT_USER_AGENT, DirectRelay, ProxyRelay, Relay};
use std::sync::Arc;

pub type RelayHandle = Arc<dyn Relay + Send + Sync>;
