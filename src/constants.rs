//! Application-wide constants
//!
//! Constants are grouped by their purpose.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 5001;

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

/// `DATABASE_URL` scheme that selects the in-process store
pub const MEMORY_DATABASE_SCHEME: &str = "memory://";

// =============================================================================
// AUTHENTICATION DEFAULTS
// =============================================================================

/// Admin bearer tokens are valid for 30 days
pub const DEFAULT_JWT_EXPIRY_DAYS: i64 = 30;

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: u64 = 6;

/// Maximum password length
pub const MAX_PASSWORD_LENGTH: u64 = 128;

/// Maximum admin display name length
pub const MAX_NAME_LENGTH: u64 = 100;

/// Admin roles. Stored on the record, not used for gating.
pub mod roles {
    pub const ADMIN: &str = "admin";
}

// =============================================================================
// EVENTS
// =============================================================================

/// Maximum event title length
pub const MAX_EVENT_TITLE_LENGTH: u64 = 100;

/// Maximum event description length
pub const MAX_EVENT_DESCRIPTION_LENGTH: u64 = 2000;

/// Maximum location length
pub const MAX_LOCATION_LENGTH: u64 = 200;

// =============================================================================
// REGISTRATIONS
// =============================================================================

/// Random bytes in a check-in token (rendered as hex, so twice as many chars)
pub const CHECK_IN_TOKEN_BYTES: usize = 16;

/// Attempts at drawing a check-in token that is not already taken
pub const MAX_TOKEN_ATTEMPTS: usize = 3;

/// Maximum student name length
pub const MAX_STUDENT_NAME_LENGTH: u64 = 100;

/// Programs a student can register under
pub mod programs {
    pub const COMPUTER: &str = "Computer Engineering";
    pub const ELECTRICAL: &str = "Electrical Engineering";
    pub const MECHANICAL: &str = "Mechanical Engineering";
    pub const INDUSTRIAL: &str = "Industrial Engineering";
    pub const BIOMEDICAL: &str = "Biomedical Engineering";
    pub const AEROSPACE: &str = "Aerospace Engineering";
    pub const CHEMICAL: &str = "Chemical Engineering";
    pub const CIVIL: &str = "Civil Engineering";
    pub const OTHER: &str = "Other";

    pub const ALL: &[&str] = &[
        COMPUTER, ELECTRICAL, MECHANICAL, INDUSTRIAL, BIOMEDICAL, AEROSPACE, CHEMICAL, CIVIL,
        OTHER,
    ];
}

// =============================================================================
// QR CODES
// =============================================================================

/// Minimum rendered QR image width in pixels
pub const QR_CODE_WIDTH: u32 = 300;

/// Attachment file name for the emailed QR code
pub const QR_CODE_FILENAME: &str = "qr-code.png";

// =============================================================================
// MAIL DEFAULTS
// =============================================================================

/// Default transactional email API base URL
pub const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com";

/// Default sender
pub const DEFAULT_MAIL_FROM: &str = "MUES Events <onboarding@resend.dev>";

/// Default timeout for the email API in seconds
pub const DEFAULT_MAIL_TIMEOUT_SECONDS: u64 = 10;

// =============================================================================
// ANALYTICS
// =============================================================================

/// Days covered by the registration timeline
pub const ANALYTICS_TIMELINE_DAYS: i64 = 30;

// =============================================================================
// API
// =============================================================================

/// API base path
pub const API_BASE_PATH: &str = "/api";

// =============================================================================
// RATE LIMITING
// =============================================================================

/// Rate limiting configuration
pub mod rate_limits {
    /// Auth endpoints - max requests
    pub const AUTH_MAX_REQUESTS: i64 = 5;
    /// Auth endpoints - window in seconds
    pub const AUTH_WINDOW_SECS: i64 = 60;

    /// Registration endpoints - max requests
    pub const REGISTRATION_MAX_REQUESTS: i64 = 10;
    /// Registration endpoints - window in seconds
    pub const REGISTRATION_WINDOW_SECS: i64 = 60;

    /// General API - max requests
    pub const GENERAL_MAX_REQUESTS: i64 = 100;
    /// General API - window in seconds
    pub const GENERAL_WINDOW_SECS: i64 = 60;
}
