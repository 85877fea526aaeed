/// Hours after which a cached panel snapshot is no longer trusted.
pub const DEFAULT_FRESHNESS_HOURS: i64 = 24;

/// Longest freshness window a config may ask for (one year).
pub const MAX_FRESHNESS_HOURS: i64 = 24 * 365;

/// Idle gap before a burst of edits is persisted to the local cache.
pub const DEFAULT_DEBOUNCE_MS: u64 = 1_000;

/// Namespace prefix for every key written to the local store.
pub const CACHE_NAMESPACE: &str = "contest-wizard/v1";

/// Syllabus categories that make a competition's subject selection academic.
///
/// Matching is case-insensitive. Hosts can override the list through
/// [`crate::config::WizardConfig::academic_categories`].
pub const DEFAULT_ACADEMIC_CATEGORIES: &[&str] = &[
    "mathematics",
    "science",
    "english",
    "social science",
    "computer science",
    "general knowledge",
];

/// Maximum length of a stage name.
pub const MAX_STAGE_NAME_LENGTH: usize = 80;

/// Limits applied when talking to the remote document store.
pub mod http {
    /// Seconds allowed to establish a connection.
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;

    /// Seconds allowed for a whole request, connection included.
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

    pub const USER_AGENT: &str = "contest-wizard";
}
