//! Unified error codes for the storefront
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 6xxx: Catalog errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so views written in
/// other languages can match on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,

    // ==================== 1xxx: Auth ====================
    /// Shared secret did not match
    InvalidCredentials = 1002,
    /// Admin mode required
    AdminRequired = 1003,

    // ==================== 6xxx: Catalog ====================
    /// Catalog item not found
    ItemNotFound = 6001,
    /// Price is negative or not representable
    ItemInvalidPrice = 6002,
    /// More images than an item can hold
    ItemTooManyImages = 6003,
    /// Item name is empty
    ItemNameRequired = 6004,
    /// Image could not be decoded
    ImageInvalid = 6401,
    /// Image exceeds the upload size limit
    ImageTooLarge = 6402,
    /// Image format is not supported
    ImageUnsupportedFormat = 6403,

    // ==================== 9xxx: System ====================
    /// Remote catalog store unreachable
    StoreUnavailable = 9001,
    /// Remote catalog store timed out
    StoreTimeout = 9002,
    /// Remote catalog table does not exist
    StoreMissing = 9003,
    /// Local preference storage failed
    PreferencesUnavailable = 9101,
    /// Local preference storage holds unreadable data
    StorageCorrupted = 9403,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",

            // Auth
            ErrorCode::InvalidCredentials => "Incorrect password",
            ErrorCode::AdminRequired => "Admin mode is required",

            // Catalog
            ErrorCode::ItemNotFound => "Catalog item not found",
            ErrorCode::ItemInvalidPrice => "Price must be zero or greater",
            ErrorCode::ItemTooManyImages => "An item holds at most 3 images",
            ErrorCode::ItemNameRequired => "Item name is required",
            ErrorCode::ImageInvalid => "Image could not be decoded",
            ErrorCode::ImageTooLarge => "Image is too large",
            ErrorCode::ImageUnsupportedFormat => "Image format is not supported",

            // System
            ErrorCode::StoreUnavailable => "Catalog store is unreachable",
            ErrorCode::StoreTimeout => "Catalog store timed out",
            ErrorCode::StoreMissing => "Catalog table is missing",
            ErrorCode::PreferencesUnavailable => "Preferences could not be saved",
            ErrorCode::StorageCorrupted => "Stored preferences are corrupted",
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
            2 => Ok(ErrorCode::ValidationFailed),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),

            // Auth
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::AdminRequired),

            // Catalog
            6001 => Ok(ErrorCode::ItemNotFound),
            6002 => Ok(ErrorCode::ItemInvalidPrice),
            6003 => Ok(ErrorCode::ItemTooManyImages),
            6004 => Ok(ErrorCode::ItemNameRequired),
            6401 => Ok(ErrorCode::ImageInvalid),
            6402 => Ok(ErrorCode::ImageTooLarge),
            6403 => Ok(ErrorCode::ImageUnsupportedFormat),

            // System
            9001 => Ok(ErrorCode::StoreUnavailable),
            9002 => Ok(ErrorCode::StoreTimeout),
            9003 => Ok(ErrorCode::StoreMissing),
            9101 => Ok(ErrorCode::PreferencesUnavailable),
            9403 => Ok(ErrorCode::StorageCorrupted),

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
    fn test_error_code_values() {
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::InvalidCredentials.code(), 1002);
        assert_eq!(ErrorCode::ItemNotFound.code(), 6001);
        assert_eq!(ErrorCode::ItemInvalidPrice.code(), 6002);
        assert_eq!(ErrorCode::ImageTooLarge.code(), 6402);
        assert_eq!(ErrorCode::StoreMissing.code(), 9003);
    }

    #[test]
    fn test_try_from_roundtrip() {
        for code in [
            ErrorCode::ValidationFailed,
            ErrorCode::InvalidFormat,
            ErrorCode::AdminRequired,
            ErrorCode::ItemTooManyImages,
            ErrorCode::ImageUnsupportedFormat,
            ErrorCode::PreferencesUnavailable,
            ErrorCode::StorageCorrupted,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::ItemNotFound).unwrap();
        assert_eq!(json, "6001");

        let code: ErrorCode = serde_json::from_str("9003").unwrap();
        assert_eq!(code, ErrorCode::StoreMissing);

        assert!(serde_json::from_str::<ErrorCode>("12345").is_err());
    }

    #[test]
    fn test_unassigned_general_codes_are_rejected() {
        for value in [0, 1, 3, 4, 7, 8] {
            assert_eq!(ErrorCode::try_from(value), Err(InvalidErrorCode(value)));
        }
    }
}
