pub mod pending;
pub mod snapshot;
pub mod state;
pub mod user;

pub use pending::{PendingSession, VerificationPurpose};
pub use snapshot::PersistedSnapshot;
pub use state::AuthState;
pub use user::AuthenticatedUser;
