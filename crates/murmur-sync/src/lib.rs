/// Murmur client-side synchronisation.
///
/// - `MessagingBackend`: the four-operation seam a real server would implement
/// - `Simulator`: in-process backend with injected latency and failures
/// - `InboxController` / `ConversationController`: per-surface client state
///   with single-flight pagination, epoch-checked results and optimistic sends

pub mod backend;
pub mod config;
pub mod conversation;
pub mod error;
pub mod inbox;
pub mod latency;
pub mod observer;
pub mod simulator;
pub mod state;

pub use backend::MessagingBackend;
pub use config::{LatencyConfig, SimulatorConfig};
pub use conversation::{ConversationController, ConversationSnapshot, SendOutcome};
pub use error::{BackendError, ConfigError};
pub use inbox::InboxController;
pub use latency::LatencySimulator;
pub use observer::{NullObserver, SyncEvent, SyncLog, SyncObserver, TracingObserver};
pub use simulator::Simulator;
pub use state::{ControllerOptions, OrderConvention, SyncState};
