//! Fixed user-facing messages.

// Authentication
pub const UNAUTHORIZED: &str = "Your session has expired. Please log in again.";
pub const FORBIDDEN: &str = "You do not have permission to access this resource.";
pub const INVALID_CREDENTIALS: &str = "Invalid email or password. Please try again.";
pub const ACCOUNT_LOCKED: &str = "Your account has been locked. Please contact support.";
pub const SESSION_EXPIRED: &str = "Your session has expired. Redirecting to login...";
pub const LOGGED_IN_ELSEWHERE: &str =
    "You have been logged in on another device. Please log in again.";

// Network
pub const NETWORK_ERROR: &str =
    "Unable to connect to the server. Please check your internet connection.";
pub const TIMEOUT: &str = "Request timed out. Please try again.";
pub const SERVER_ERROR: &str = "Something went wrong on our end. Please try again later.";

// Validation
pub const VALIDATION_ERROR: &str = "Please check your input and try again.";
pub const INVALID_INPUT: &str = "Invalid input provided. Please correct and try again.";

// Generic
pub const UNKNOWN_ERROR: &str = "An unexpected error occurred. Please try again.";
pub const NOT_FOUND: &str = "The requested resource was not found.";

/// Message the API client uses for 401/403 responses.
pub const AUTHENTICATION_FAILED: &str = "Authentication failed. Please login again.";
