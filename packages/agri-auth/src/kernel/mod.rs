//! Kernel module - infrastructure behind the session manager.

pub mod clock;
pub mod deps;
pub mod otp;
pub mod store;
pub mod test_dependencies;
pub mod traits;
pub mod users;

pub use clock::{FixedClock, SystemClock};
pub use deps::{AuthDeps, TwilioAdapter};
pub use otp::MockOtpProvider;
pub use store::{FileSnapshotStore, MemorySnapshotStore, StoreError};
pub use test_dependencies::TestDependencies;
pub use traits::*;
pub use users::{
    FileUserRepository, InMemoryUserRepository, PLACEHOLDER_USER_NAME, USERS_FILE_NAME,
};
