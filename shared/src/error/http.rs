//! HTTP status for each error code

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    pub fn http_status(&self) -> StatusCode {
        use ErrorCode::*;
        match self {
            ValidationFailed | RequiredField | InvalidAmount | ItemReferenceRequired
            | MenuItemInactive | ImageRejected => StatusCode::BAD_REQUEST,

            NotAuthenticated | InvalidCredentials | TokenExpired | TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }

            AdminRequired | VerificationFailed => StatusCode::FORBIDDEN,

            NotFound | MenuItemNotFound | CustomerNotFound => StatusCode::NOT_FOUND,

            // A claim against an empty counter conflicts with current state
            AlreadyExists | NoRewardAvailable => StatusCode::CONFLICT,

            StoreTimeout => StatusCode::SERVICE_UNAVAILABLE,

            InternalError | DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
