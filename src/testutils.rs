use crate::backend::AttendanceBackend;
use crate::configuration::Configuration;
use crate::error::BookingError;
use crate::types::{Booking, BookingRow, NewStudent, SlotConfig, Student};
use chrono::{NaiveDate, NaiveTime, Weekday};
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc, Mutex,
};
use uuid::Uuid;

pub struct MockBackendInner {
    pub success: AtomicBool,
    pub calls_to_register_student: AtomicU64,
    pub calls_to_student_by_phone: AtomicU64,
    pub calls_to_students: AtomicU64,
    pub calls_to_book: AtomicU64,
    pub calls_to_bookings: AtomicU64,
    pub calls_to_bookings_for_date: AtomicU64,
    pub calls_to_remove_booking: AtomicU64,
    pub calls_to_remove_student: AtomicU64,
    pub students: Mutex<Vec<Student>>,
    pub bookings: Mutex<Vec<BookingRow>>,
}

/// Hand-rolled counting backend for HTTP tests. `success` flips every
/// mutating call between its Ok result and a representative domain error.
#[derive(Clone)]
pub struct MockBackend(pub Arc<MockBackendInner>);

impl MockBackend {
    pub fn new() -> Self {
        Self(Arc::new(MockBackendInner {
            success: AtomicBool::new(true),
            calls_to_register_student: AtomicU64::default(),
            calls_to_student_by_phone: AtomicU64::default(),
            calls_to_students: AtomicU64::default(),
            calls_to_book: AtomicU64::default(),
            calls_to_bookings: AtomicU64::default(),
            calls_to_bookings_for_date: AtomicU64::default(),
            calls_to_remove_booking: AtomicU64::default(),
            calls_to_remove_student: AtomicU64::default(),
            students: Mutex::default(),
            bookings: Mutex::default(),
        }))
    }

    fn succeeding(&self) -> bool {
        self.0.success.load(Ordering::SeqCst)
    }
}

impl AttendanceBackend for MockBackend {
    fn register_student(&self, student: NewStudent) -> Result<Student, BookingError> {
        self.0
            .calls_to_register_student
            .fetch_add(1, Ordering::SeqCst);
        if !self.succeeding() {
            return Err(BookingError::DuplicateStudent);
        }
        let student = Student {
            id: Uuid::new_v4(),
            first_name: student.first_name,
            last_name: student.last_name,
            phone: student.phone,
            level: student.level,
        };
        self.0.students.lock().unwrap().push(student.clone());
        Ok(student)
    }

    fn student_by_phone(&self, phone: &str) -> Result<Option<Student>, BookingError> {
        self.0
            .calls_to_student_by_phone
            .fetch_add(1, Ordering::SeqCst);
        Ok(self
            .0
            .students
            .lock()
            .unwrap()
            .iter()
            .find(|student| student.phone == phone)
            .cloned())
    }

    fn students(&self) -> Result<Vec<Student>, BookingError> {
        self.0.calls_to_students.fetch_add(1, Ordering::SeqCst);
        Ok(self.0.students.lock().unwrap().clone())
    }

    fn book(
        &self,
        phone: &str,
        date: NaiveDate,
        slot: &SlotConfig,
    ) -> Result<Booking, BookingError> {
        self.0.calls_to_book.fetch_add(1, Ordering::SeqCst);
        if !self.succeeding() {
            return Err(BookingError::SlotFull);
        }
        let student_id = self
            .0
            .students
            .lock()
            .unwrap()
            .iter()
            .find(|student| student.phone == phone)
            .map(|student| student.id)
            .unwrap_or_else(Uuid::new_v4);
        Ok(Booking {
            id: Uuid::new_v4(),
            student_id,
            date,
            slot: slot.name.clone(),
        })
    }

    fn bookings(&self) -> Result<Vec<BookingRow>, BookingError> {
        self.0.calls_to_bookings.fetch_add(1, Ordering::SeqCst);
        Ok(self.0.bookings.lock().unwrap().clone())
    }

    fn bookings_for_date(&self, date: NaiveDate) -> Result<Vec<BookingRow>, BookingError> {
        self.0
            .calls_to_bookings_for_date
            .fetch_add(1, Ordering::SeqCst);
        Ok(self
            .0
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.date == date)
            .cloned()
            .collect())
    }

    fn remove_booking(&self, _id: Uuid) -> Result<(), BookingError> {
        self.0
            .calls_to_remove_booking
            .fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove_student(&self, _id: Uuid) -> Result<(), BookingError> {
        self.0
            .calls_to_remove_student
            .fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub const TEST_ADMIN_USER: &str = "admin";
pub const TEST_ADMIN_PASSWORD: &str = "admin123";

#[derive(Debug, Clone)]
pub struct TestConfiguration;

impl Configuration for TestConfiguration {
    fn port(&self) -> u16 {
        0
    }

    fn database_url(&self) -> Option<String> {
        None
    }

    fn admin_user(&self) -> String {
        TEST_ADMIN_USER.to_string()
    }

    fn admin_password(&self) -> String {
        TEST_ADMIN_PASSWORD.to_string()
    }

    fn frontend_path(&self) -> PathBuf {
        PathBuf::from("frontend/index.html")
    }

    fn slots(&self) -> Vec<SlotConfig> {
        [(12, "12:00 to 14:00"), (14, "14:00 to 16:00"), (16, "16:00 to 18:00")]
            .into_iter()
            .map(|(hour, name)| SlotConfig {
                name: name.to_string(),
                start: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
                capacity: 1,
            })
            .collect()
    }

    fn allowed_weekdays(&self) -> Vec<Weekday> {
        vec![Weekday::Tue, Weekday::Wed, Weekday::Thu]
    }
}
