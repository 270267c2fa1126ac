/// Murmur shared types.
///
/// Entity models served by the simulated messaging backend and the
/// identifier helpers used to mint them.

pub mod ids;
pub mod models;

pub use models::{ConversationPreview, Message, User};
