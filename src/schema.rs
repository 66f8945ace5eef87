// Table definitions matching migrations/.

diesel::table! {
    students (id) {
        id -> Uuid,
        first_name -> Text,
        last_name -> Text,
        phone -> Text,
        level -> Text,
    }
}

diesel::table! {
    bookings (id) {
        id -> Uuid,
        student_id -> Uuid,
        date -> Date,
        slot -> Text,
    }
}

diesel::joinable!(bookings -> students (student_id));
diesel::allow_tables_to_appear_in_same_query!(bookings, students);
