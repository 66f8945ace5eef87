use crate::types::{BookingRow, Student};

/// Flat CSV exports for the admin download endpoints. Column order is part
/// of the contract: one header row, then one row per stored record.

pub fn students_csv(students: &[Student]) -> String {
    let mut out = String::from("first_name,last_name,phone,level\n");
    for student in students {
        out.push_str(&format!(
            "{},{},{},{}\n",
            csv_quote(&student.first_name),
            csv_quote(&student.last_name),
            csv_quote(&student.phone),
            student.level,
        ));
    }
    out
}

pub fn bookings_csv(rows: &[BookingRow]) -> String {
    let mut out = String::from("date,slot,first_name,last_name,phone,level\n");
    for row in rows {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            row.date,
            csv_quote(&row.slot),
            csv_quote(&row.first_name),
            csv_quote(&row.last_name),
            csv_quote(&row.phone),
            row.level,
        ));
    }
    out
}

fn csv_quote(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
