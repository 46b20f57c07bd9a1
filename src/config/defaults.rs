// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! # Categories
//!
//! - **Server**: Base URL and request timeout
//! - **Upload**: Limits the server normally publishes as page globals
//! - **Cache**: Fragment image cache size

// ==========================================================================
// Server Defaults
// ==========================================================================

/// Base URL of a locally running search server.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000/";

/// Default timeout for a single request (in seconds).
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Minimum request timeout (in seconds).
pub const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;

/// Maximum request timeout (in seconds).
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 600;

// ==========================================================================
// Upload Defaults
// ==========================================================================

/// Maximum upload size in bytes (10 MiB).
pub const DEFAULT_MAX_UPLOAD_SIZE: u64 = 10 * 1024 * 1024;

/// Extensions accepted by the server, in the server's own notation.
pub const DEFAULT_ALLOWED_EXTENSIONS: &str = ".png,.jpg,.jpeg,.gif";

/// Maximum number of characters in the text filter.
pub const DEFAULT_MAX_CHARS_TEXT_FILTER: usize = 500;

// ==========================================================================
// Cache Defaults
// ==========================================================================

/// Number of fragment images kept in memory.
pub const IMAGE_CACHE_CAPACITY: usize = 64;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(MIN_REQUEST_TIMEOUT_SECS > 0);
    assert!(MAX_REQUEST_TIMEOUT_SECS >= MIN_REQUEST_TIMEOUT_SECS);
    assert!(DEFAULT_REQUEST_TIMEOUT_SECS >= MIN_REQUEST_TIMEOUT_SECS);
    assert!(DEFAULT_REQUEST_TIMEOUT_SECS <= MAX_REQUEST_TIMEOUT_SECS);

    assert!(DEFAULT_MAX_UPLOAD_SIZE > 0);
    assert!(DEFAULT_MAX_CHARS_TEXT_FILTER > 0);
    assert!(IMAGE_CACHE_CAPACITY > 0);
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_timeout_defaults_are_valid() {
        assert_eq!(DEFAULT_REQUEST_TIMEOUT_SECS, 60);
        assert!(DEFAULT_REQUEST_TIMEOUT_SECS >= MIN_REQUEST_TIMEOUT_SECS);
        assert!(DEFAULT_REQUEST_TIMEOUT_SECS <= MAX_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn upload_defaults_match_server_defaults() {
        assert_eq!(DEFAULT_MAX_UPLOAD_SIZE, 10_485_760);
        assert!(DEFAULT_ALLOWED_EXTENSIONS.contains(".jpeg"));
        assert_eq!(DEFAULT_MAX_CHARS_TEXT_FILTER, 500);
    }

    #[test]
    fn default_server_url_ends_with_slash() {
        // Relative routes are joined onto the base URL
        assert!(DEFAULT_SERVER_URL.ends_with('/'));
    }
}
