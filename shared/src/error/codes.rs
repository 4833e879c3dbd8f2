//! Error codes for the shop back-office
//!
//! Codes are grouped by range:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 5xxx: Reward errors
//! - 6xxx: Menu errors
//! - 7xxx: Customer errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares the code table once: variants, numeric values, default messages
/// and the reverse lookup all come from the same list.
macro_rules! error_codes {
    ($( $(#[$meta:meta])* $name:ident = $value:literal => $message:literal, )+) => {
        /// Error code carried by every [`AppError`](super::AppError)
        ///
        /// Serialized as its bare `u16`.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(into = "u16", try_from = "u16")]
        #[repr(u16)]
        pub enum ErrorCode {
            $( $(#[$meta])* $name = $value, )+
        }

        impl ErrorCode {
            /// Every code, in table order
            pub const ALL: &'static [ErrorCode] = &[ $( ErrorCode::$name, )+ ];

            /// Default developer-facing message
            pub const fn message(&self) -> &'static str {
                match self {
                    $( ErrorCode::$name => $message, )+
                }
            }
        }

        impl TryFrom<u16> for ErrorCode {
            type Error = InvalidErrorCode;

            fn try_from(value: u16) -> Result<Self, Self::Error> {
                match value {
                    $( $value => Ok(ErrorCode::$name), )+
                    _ => Err(InvalidErrorCode(value)),
                }
            }
        }
    };
}

error_codes! {
    // 0xxx: General
    ValidationFailed = 2 => "Validation failed",
    NotFound = 3 => "Resource not found",
    AlreadyExists = 4 => "Resource already exists",
    RequiredField = 7 => "Required field is missing",

    // 1xxx: Auth
    NotAuthenticated = 1001 => "User is not authenticated",
    InvalidCredentials = 1002 => "Invalid username or password",
    TokenExpired = 1003 => "Authentication token has expired",
    TokenInvalid = 1004 => "Authentication token is invalid",
    /// Human verification token rejected
    VerificationFailed = 1005 => "Human verification failed",

    // 2xxx: Permission
    AdminRequired = 2003 => "Administrator role is required",

    // 4xxx: Order
    /// Price is missing, non-finite, not positive or above the limit
    InvalidAmount = 4001 => "Price must be a positive number",
    /// Paid order without a menu item reference
    ItemReferenceRequired = 4002 => "Paid orders must reference a menu item",

    // 5xxx: Reward
    NoRewardAvailable = 5001 => "No rewards available to claim",

    // 6xxx: Menu
    MenuItemNotFound = 6001 => "Menu item not found",
    /// Menu item exists but has been taken off the menu
    MenuItemInactive = 6002 => "Menu item is not available",
    /// Uploaded image rejected (format, size or undecodable content)
    ImageRejected = 6003 => "Image rejected",

    // 7xxx: Customer
    CustomerNotFound = 7001 => "Customer not found",

    // 9xxx: System
    InternalError = 9001 => "Internal server error",
    DatabaseError = 9002 => "Database error",
    /// Store did not answer in time
    StoreTimeout = 9003 => "Store did not respond in time, please retry",
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// A `u16` that names no [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

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
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::NoRewardAvailable.code(), 5001);
        assert_eq!(ErrorCode::MenuItemInactive.code(), 6002);
        assert_eq!(ErrorCode::CustomerNotFound.code(), 7001);
        assert_eq!(ErrorCode::StoreTimeout.code(), 9003);
    }

    #[test]
    fn test_table_lookup_is_consistent() {
        for &code in ErrorCode::ALL {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
            assert!(!code.message().is_empty());
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
        assert_eq!(InvalidErrorCode(4242).to_string(), "invalid error code: 4242");
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::NoRewardAvailable).unwrap();
        assert_eq!(json, "5001");
        let code: ErrorCode = serde_json::from_str("7001").unwrap();
        assert_eq!(code, ErrorCode::CustomerNotFound);
        assert!(serde_json::from_str::<ErrorCode>("12345").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::NotFound.to_string(), "3");
        assert_eq!(ErrorCode::NoRewardAvailable.message(), "No rewards available to claim");
    }
}
