//! Default values shared by configuration and the server.

/// Default HTTP listen address.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";

/// Default deadline for a single KV store call, in milliseconds.
pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 2000;

/// Default deadline for a whole HTTP request, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default key prefix. Empty keeps records under the bare username.
pub const DEFAULT_KEY_PREFIX: &str = "";

/// Maximum accepted request body size (bytes).
pub const MAX_BODY_BYTES: usize = 16 * 1024;

/// Characters Redis treats as glob syntax in `SCAN MATCH` patterns.
pub const GLOB_METACHARACTERS: &[char] = &['*', '?', '[', ']', '\\'];
