use crate::backend::AttendanceBackend;
use crate::error::BookingError;
use crate::types::{Booking, BookingRow, NewStudent, SlotConfig, Student};
use chrono::NaiveDate;
use std::sync::{Arc, Mutex};
use tracing::info;
use uuid::Uuid;

/// In-memory backend used when no database is configured. A single mutex
/// guards both tables, so every check-then-insert runs atomically.
#[derive(Debug, Clone, Default)]
pub struct LocalStore {
    inner: Arc<Mutex<StoreInner>>,
}

#[derive(Debug, Default)]
struct StoreInner {
    students: Vec<Student>,
    bookings: Vec<Booking>,
}

impl StoreInner {
    fn join(&self, booking: &Booking) -> Option<BookingRow> {
        let student = self
            .students
            .iter()
            .find(|student| student.id == booking.student_id)?;
        Some(BookingRow {
            id: booking.id,
            date: booking.date,
            slot: booking.slot.clone(),
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone(),
            phone: student.phone.clone(),
            level: student.level,
        })
    }

    fn joined_rows<'a>(
        &'a self,
        filter: impl Fn(&Booking) -> bool + 'a,
    ) -> Vec<BookingRow> {
        let mut rows: Vec<BookingRow> = self
            .bookings
            .iter()
            .filter(|booking| filter(booking))
            .filter_map(|booking| self.join(booking))
            .collect();
        rows.sort_by(|a, b| {
            (a.date, &a.slot, &a.last_name).cmp(&(b.date, &b.slot, &b.last_name))
        });
        rows
    }
}

impl AttendanceBackend for LocalStore {
    fn register_student(&self, student: NewStudent) -> Result<Student, BookingError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.students.iter().any(|s| s.phone == student.phone) {
            return Err(BookingError::DuplicateStudent);
        }
        let student = Student {
            id: Uuid::new_v4(),
            first_name: student.first_name,
            last_name: student.last_name,
            phone: student.phone,
            level: student.level,
        };
        inner.students.push(student.clone());
        info!(phone = %student.phone, "student registered");
        Ok(student)
    }

    fn student_by_phone(&self, phone: &str) -> Result<Option<Student>, BookingError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.students.iter().find(|s| s.phone == phone).cloned())
    }

    fn students(&self) -> Result<Vec<Student>, BookingError> {
        let inner = self.inner.lock().unwrap();
        let mut students = inner.students.clone();
        students.sort_by(|a, b| {
            (&a.last_name, &a.first_name, &a.phone).cmp(&(&b.last_name, &b.first_name, &b.phone))
        });
        Ok(students)
    }

    fn book(
        &self,
        phone: &str,
        date: NaiveDate,
        slot: &SlotConfig,
    ) -> Result<Booking, BookingError> {
        let mut inner = self.inner.lock().unwrap();

        let student_id = inner
            .students
            .iter()
            .find(|student| student.phone == phone)
            .ok_or(BookingError::UnknownStudent)?
            .id;

        if inner
            .bookings
            .iter()
            .any(|booking| booking.student_id == student_id && booking.date == date)
        {
            return Err(BookingError::DuplicateBookingForDay);
        }

        let taken = inner
            .bookings
            .iter()
            .filter(|booking| booking.date == date && booking.slot == slot.name)
            .count() as u32;
        if slot.capacity != 0 && taken >= slot.capacity {
            return Err(BookingError::SlotFull);
        }

        let booking = Booking {
            id: Uuid::new_v4(),
            student_id,
            date,
            slot: slot.name.clone(),
        };
        inner.bookings.push(booking.clone());
        info!(%phone, %date, slot = %slot.name, "booking created");
        Ok(booking)
    }

    fn bookings(&self) -> Result<Vec<BookingRow>, BookingError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.joined_rows(|_| true))
    }

    fn bookings_for_date(&self, date: NaiveDate) -> Result<Vec<BookingRow>, BookingError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.joined_rows(move |booking| booking.date == date))
    }

    fn remove_booking(&self, id: Uuid) -> Result<(), BookingError> {
        let mut inner = self.inner.lock().unwrap();
        inner.bookings.retain(|booking| booking.id != id);
        Ok(())
    }

    fn remove_student(&self, id: Uuid) -> Result<(), BookingError> {
        let mut inner = self.inner.lock().unwrap();
        inner.students.retain(|student| student.id != id);
        inner.bookings.retain(|booking| booking.student_id != id);
        Ok(())
    }
}
