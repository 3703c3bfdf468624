//! Default endpoint and timing constants.

use std::time::Duration;

/// Default REST gateway URL (a local node).
pub const DEFAULT_REST_URL: &str = "http://localhost:1317";

/// How long a broadcast waits for a delivery result before giving up.
pub const DEFAULT_BROADCAST_TIMEOUT: Duration = Duration::from_secs(60);

/// Delay between inclusion lookups while waiting for a commit.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
