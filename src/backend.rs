use crate::error::BookingError;
use crate::types::{Booking, BookingRow, NewStudent, SlotConfig, Student};
use chrono::NaiveDate;
use uuid::Uuid;

/// Storage seam for students and bookings. `book` must enforce the
/// per-student-per-day and per-slot-capacity invariants atomically with the
/// insert; callers run the eligibility and cutoff checks beforehand.
pub trait AttendanceBackend: Clone + Send + Sync + 'static {
    fn register_student(&self, student: NewStudent) -> Result<Student, BookingError>;
    fn student_by_phone(&self, phone: &str) -> Result<Option<Student>, BookingError>;
    fn students(&self) -> Result<Vec<Student>, BookingError>;
    fn book(&self, phone: &str, date: NaiveDate, slot: &SlotConfig) -> Result<Booking, BookingError>;
    fn bookings(&self) -> Result<Vec<BookingRow>, BookingError>;
    fn bookings_for_date(&self, date: NaiveDate) -> Result<Vec<BookingRow>, BookingError>;
    /// Idempotent; removing an unknown id is a no-op.
    fn remove_booking(&self, id: Uuid) -> Result<(), BookingError>;
    /// Idempotent; cascades to the student's bookings.
    fn remove_student(&self, id: Uuid) -> Result<(), BookingError>;
}
