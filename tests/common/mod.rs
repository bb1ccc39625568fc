//! Common test utilities
//!
//! This module is shared across all integration tests

#[cfg(unix)]
pub mod fake_tools;
pub mod recorder;
pub mod stubs;

#[cfg(unix)]
#[allow(unused_imports)]
pub use fake_tools::FakeTools;
#[allow(unused_imports)]
pub use recorder::{Call, RecordingTransport};
#[allow(unused_imports)]
pub use stubs::{orchestrator_with, StubBehavior, StubSource};

/// Sender id used by relay flow tests
#[allow(dead_code)]
pub const TEST_USER_ID: i64 = 987654321;

/// Chat id used by relay flow tests
#[allow(dead_code)]
pub const TEST_CHAT_ID: i64 = 123456789;
