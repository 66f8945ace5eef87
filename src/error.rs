use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Every rejected-request outcome the service produces. None of these are
/// process-fatal; each renders as a status code plus a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("no student is registered with that phone number")]
    UnknownStudent,

    #[error("a student with that phone number is already registered")]
    DuplicateStudent,

    #[error("the lab does not take bookings on that weekday")]
    IneligibleDay,

    #[error("that slot has already started")]
    SlotExpired,

    #[error("the student already holds a booking for that day")]
    DuplicateBookingForDay,

    #[error("that slot is fully booked")]
    SlotFull,

    #[error("invalid credentials")]
    AuthFailure,

    #[error("no such slot is configured")]
    UnknownSlot,

    #[error("storage error: {0}")]
    Storage(String),
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let status = match self {
            BookingError::DuplicateStudent
            | BookingError::DuplicateBookingForDay
            | BookingError::SlotFull => StatusCode::CONFLICT,
            BookingError::UnknownStudent
            | BookingError::IneligibleDay
            | BookingError::SlotExpired
            | BookingError::UnknownSlot => StatusCode::UNPROCESSABLE_ENTITY,
            BookingError::AuthFailure => StatusCode::UNAUTHORIZED,
            BookingError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}
