//! Unified error codes for the admin console
//!
//! This module defines all error codes used by the console API and the
//! backend client. Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Backend errors (BaaS tables, procedures, storage)
//! - 4xxx: Catalog errors (vendors, listings, theaters, categories, settings)
//! - 5xxx: Media errors (uploads, watermarking)
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,
    /// Record changed since it was read
    Conflict = 9,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Session has expired
    SessionExpired = 1005,
    /// Account is disabled
    AccountDisabled = 1007,
    /// Too many login attempts
    TooManyAttempts = 1008,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 3xxx: Backend ====================
    /// Backend returned an error response
    BackendError = 3001,
    /// Backend could not be reached
    BackendUnavailable = 3002,
    /// Remote procedure call failed
    RemoteProcedureFailed = 3003,
    /// Object storage upload failed
    StorageUploadFailed = 3004,
    /// Backend rejected the row (constraint or policy)
    BackendRejected = 3005,

    // ==================== 4xxx: Catalog ====================
    /// Vendor not found
    VendorNotFound = 4001,
    /// Vendor document not found
    VendorDocumentNotFound = 4002,
    /// Service listing not found
    ServiceListingNotFound = 4101,
    /// Price must be greater than zero
    InvalidPrice = 4102,
    /// Discounted price exceeds base price
    DiscountExceedsPrice = 4103,
    /// Category not found
    CategoryNotFound = 4201,
    /// Category is required
    CategoryRequired = 4202,
    /// Private theater not found
    TheaterNotFound = 4301,
    /// Theater screen not found
    ScreenNotFound = 4302,
    /// Time slot not found
    TimeSlotNotFound = 4303,
    /// Time slot start is not before its end
    InvalidTimeRange = 4304,
    /// Admin setting not found
    SettingNotFound = 4401,
    /// Invalid color value
    InvalidColor = 4402,

    // ==================== 5xxx: Media ====================
    /// File too large
    FileTooLarge = 5001,
    /// Unsupported file format
    UnsupportedFileFormat = 5002,
    /// Invalid/corrupted image file
    InvalidImageFile = 5003,
    /// No file provided in request
    NoFileProvided = 5004,
    /// Empty file provided
    EmptyFile = 5005,
    /// Image processing failed
    ImageProcessingFailed = 5006,
    /// Watermark could not be applied
    WatermarkFailed = 5007,
    /// Unknown storage bucket
    InvalidBucket = 5008,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",
            ErrorCode::Conflict => "Record was modified by someone else, reload and retry",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::SessionExpired => "Session has expired",
            ErrorCode::AccountDisabled => "Account is disabled",
            ErrorCode::TooManyAttempts => "Too many attempts, try again later",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator access is required",

            // Backend
            ErrorCode::BackendError => "Backend request failed",
            ErrorCode::BackendUnavailable => "Backend is unavailable",
            ErrorCode::RemoteProcedureFailed => "Remote procedure failed",
            ErrorCode::StorageUploadFailed => "File upload failed",
            ErrorCode::BackendRejected => "Backend rejected the change",

            // Catalog
            ErrorCode::VendorNotFound => "Vendor not found",
            ErrorCode::VendorDocumentNotFound => "Vendor document not found",
            ErrorCode::ServiceListingNotFound => "Service listing not found",
            ErrorCode::InvalidPrice => "Price must be greater than zero",
            ErrorCode::DiscountExceedsPrice => "Discounted price cannot exceed the base price",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategoryRequired => "Category is required",
            ErrorCode::TheaterNotFound => "Theater not found",
            ErrorCode::ScreenNotFound => "Screen not found",
            ErrorCode::TimeSlotNotFound => "Time slot not found",
            ErrorCode::InvalidTimeRange => "Start time must be before end time",
            ErrorCode::SettingNotFound => "Setting not found",
            ErrorCode::InvalidColor => "Color must be a #RRGGBB hex value",

            // Media
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::InvalidImageFile => "Invalid image file",
            ErrorCode::NoFileProvided => "No file provided",
            ErrorCode::EmptyFile => "Empty file provided",
            ErrorCode::ImageProcessingFailed => "Image processing failed",
            ErrorCode::WatermarkFailed => "Watermark could not be applied",
            ErrorCode::InvalidBucket => "Unknown storage bucket",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),
            9 => Ok(ErrorCode::Conflict),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::SessionExpired),
            1007 => Ok(ErrorCode::AccountDisabled),
            1008 => Ok(ErrorCode::TooManyAttempts),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::AdminRequired),

            // Backend
            3001 => Ok(ErrorCode::BackendError),
            3002 => Ok(ErrorCode::BackendUnavailable),
            3003 => Ok(ErrorCode::RemoteProcedureFailed),
            3004 => Ok(ErrorCode::StorageUploadFailed),
            3005 => Ok(ErrorCode::BackendRejected),

            // Catalog
            4001 => Ok(ErrorCode::VendorNotFound),
            4002 => Ok(ErrorCode::VendorDocumentNotFound),
            4101 => Ok(ErrorCode::ServiceListingNotFound),
            4102 => Ok(ErrorCode::InvalidPrice),
            4103 => Ok(ErrorCode::DiscountExceedsPrice),
            4201 => Ok(ErrorCode::CategoryNotFound),
            4202 => Ok(ErrorCode::CategoryRequired),
            4301 => Ok(ErrorCode::TheaterNotFound),
            4302 => Ok(ErrorCode::ScreenNotFound),
            4303 => Ok(ErrorCode::TimeSlotNotFound),
            4304 => Ok(ErrorCode::InvalidTimeRange),
            4401 => Ok(ErrorCode::SettingNotFound),
            4402 => Ok(ErrorCode::InvalidColor),

            // Media
            5001 => Ok(ErrorCode::FileTooLarge),
            5002 => Ok(ErrorCode::UnsupportedFileFormat),
            5003 => Ok(ErrorCode::InvalidImageFile),
            5004 => Ok(ErrorCode::NoFileProvided),
            5005 => Ok(ErrorCode::EmptyFile),
            5006 => Ok(ErrorCode::ImageProcessingFailed),
            5007 => Ok(ErrorCode::WatermarkFailed),
            5008 => Ok(ErrorCode::InvalidBucket),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(9), Ok(ErrorCode::Conflict));
        assert_eq!(ErrorCode::try_from(1001), Ok(ErrorCode::NotAuthenticated));
        assert_eq!(ErrorCode::try_from(4301), Ok(ErrorCode::TheaterNotFound));
        assert_eq!(ErrorCode::try_from(5001), Ok(ErrorCode::FileTooLarge));
        assert_eq!(ErrorCode::try_from(9001), Ok(ErrorCode::InternalError));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
        assert_eq!(ErrorCode::try_from(6001), Err(InvalidErrorCode(6001)));
    }

    #[test]
    fn test_serialize_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::NotFound).unwrap(), "3");
        assert_eq!(
            serde_json::to_string(&ErrorCode::ServiceListingNotFound).unwrap(),
            "4101"
        );
    }

    #[test]
    fn test_deserialize() {
        let code: ErrorCode = serde_json::from_str("2003").unwrap();
        assert_eq!(code, ErrorCode::AdminRequired);

        let result: Result<ErrorCode, _> = serde_json::from_str("999");
        assert!(result.is_err());
    }

    #[test]
    fn test_display_and_message() {
        assert_eq!(format!("{}", ErrorCode::Conflict), "9");
        assert_eq!(ErrorCode::NotFound.message(), "Resource not found");
        assert_eq!(
            ErrorCode::CategoryRequired.message(),
            "Category is required"
        );
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::Conflict.is_success());
    }
}
