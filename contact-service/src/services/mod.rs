pub mod database;
pub mod metrics;
pub mod providers;
pub mod relay;

pub use database::{ContactStore, PersistenceError, PgContactStore};
pub use metrics::{get_metrics, init_metrics};
pub use providers::{
    DeliveryReceipt, MessengerProvider, MockMessengerProvider, ProviderError, VkProvider,
};
pub use relay::{FormRelayHandler, RelayError};
