pub mod coordinator;
pub mod generator;
pub mod notifier;
pub mod stage;
pub mod transport;

pub use coordinator::Coordinator;
pub use generator::Generator;
pub use notifier::Notifier;
pub use transport::{LoggingTransport, NotificationTransport};
