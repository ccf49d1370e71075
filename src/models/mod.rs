pub mod session;
pub mod snapshot;
pub mod status;

pub use session::{BreakInterval, SessionRecord};
pub use snapshot::Snapshot;
pub use status::SessionStatus;
