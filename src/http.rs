use crate::admission::BookingPolicy;
use crate::backend::AttendanceBackend;
use crate::configuration::Configuration;
use crate::error::BookingError;
use crate::export;
use crate::session::AdminSessions;
use crate::types::{NewStudent, SkillLevel, SlotAvailability};
use axum::extract::{Path, Query, Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{
    routing::get,
    Form, Json, Router,
};
use axum_valid::Valid;
use chrono::{Local, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::fs;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

const ADMIN_COOKIE: &str = "admin_session";

lazy_static! {
    static ref PHONE_RE: Regex = Regex::new(r"^\+?[0-9][0-9\s\-]{5,19}$").unwrap();
}

#[derive(Clone)]
pub struct AppState<B: AttendanceBackend, C: Configuration> {
    backend: B,
    configuration: C,
    policy: Arc<BookingPolicy>,
    sessions: AdminSessions,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
struct RegisterForm {
    #[serde(rename = "nombre")]
    #[validate(length(min = 1, max = 80))]
    first_name: String,
    #[serde(rename = "apellido")]
    #[validate(length(min = 1, max = 80))]
    last_name: String,
    #[serde(rename = "telefono")]
    #[validate(regex(path = *PHONE_RE))]
    phone: String,
    #[serde(rename = "nivel")]
    level: SkillLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
struct BookingForm {
    #[serde(rename = "telefono")]
    #[validate(regex(path = *PHONE_RE))]
    phone: String,
    #[serde(rename = "fecha")]
    date: NaiveDate,
    #[serde(rename = "turno")]
    #[validate(length(min = 1))]
    slot: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoginForm {
    user: String,
    pass: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BookingConfirmation {
    id: Uuid,
    date: NaiveDate,
    slot: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AvailabilityQuery {
    #[serde(rename = "fecha")]
    date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AvailabilityResponse {
    date: NaiveDate,
    eligible: bool,
    slots: Vec<SlotAvailability>,
}

pub fn create_app<B: AttendanceBackend, C: Configuration>(backend: B, configuration: C) -> Router {
    let policy = Arc::new(BookingPolicy::new(
        configuration.slots(),
        configuration.allowed_weekdays(),
    ));
    let state = AppState {
        backend,
        configuration,
        policy,
        sessions: AdminSessions::default(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public = Router::new()
        .route("/", get(get_frontend))
        .route("/registro", get(get_frontend).post(register_student))
        .route("/asistencia", get(get_availability).post(book_slot))
        .route("/login", get(get_frontend).post(login))
        .route("/logout", get(logout));

    let admin = Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/eliminar-asistencia/:id", get(remove_booking))
        .route("/eliminar-alumno/:id", get(remove_student))
        .route("/exportar-alumnos", get(export_students))
        .route("/exportar-asistencias", get(export_bookings))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth::<B, C>,
        ));

    Router::new()
        .merge(public)
        .merge(admin)
        .with_state(state)
        .layer(cors)
}

fn session_token(headers: &HeaderMap) -> Option<Uuid> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == ADMIN_COOKIE {
            Uuid::parse_str(value).ok()
        } else {
            None
        }
    })
}

async fn admin_auth<B: AttendanceBackend, C: Configuration>(
    State(state): State<AppState<B, C>>,
    request: Request,
    next: Next,
) -> Result<Response, BookingError> {
    let token = session_token(request.headers()).ok_or(BookingError::AuthFailure)?;
    if !state.sessions.is_valid(token) {
        return Err(BookingError::AuthFailure);
    }
    Ok(next.run(request).await)
}

async fn get_frontend<B: AttendanceBackend, C: Configuration>(
    State(state): State<AppState<B, C>>,
) -> Result<Html<String>, (StatusCode, String)> {
    let path = state.configuration.frontend_path();
    match fs::read_to_string(&path).await {
        Ok(contents) => Ok(Html(contents)),
        Err(err) => {
            let error_message = format!("Failed to read frontend file: {err}");
            Err((StatusCode::INTERNAL_SERVER_ERROR, error_message))
        }
    }
}

async fn register_student<B: AttendanceBackend, C: Configuration>(
    State(state): State<AppState<B, C>>,
    Valid(Form(form)): Valid<Form<RegisterForm>>,
) -> Result<impl IntoResponse, BookingError> {
    let student = state.backend.register_student(NewStudent {
        first_name: form.first_name,
        last_name: form.last_name,
        phone: form.phone,
        level: form.level,
    })?;
    Ok((StatusCode::CREATED, Json(student)))
}

async fn get_availability<B: AttendanceBackend, C: Configuration>(
    State(state): State<AppState<B, C>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, BookingError> {
    if !state.policy.day_allowed(query.date) {
        return Ok(Json(AvailabilityResponse {
            date: query.date,
            eligible: false,
            slots: vec![],
        }));
    }
    let bookings = state.backend.bookings_for_date(query.date)?;
    let slots = state.policy.availability(query.date, Local::now(), &bookings);
    Ok(Json(AvailabilityResponse {
        date: query.date,
        eligible: true,
        slots,
    }))
}

async fn book_slot<B: AttendanceBackend, C: Configuration>(
    State(state): State<AppState<B, C>>,
    Valid(Form(form)): Valid<Form<BookingForm>>,
) -> Result<Json<BookingConfirmation>, BookingError> {
    // Admission order: slot resolution, student existence, day eligibility
    // and cutoff, then uniqueness and capacity atomically inside the backend.
    if state.policy.slot(&form.slot).is_none() {
        return Err(BookingError::UnknownSlot);
    }
    let student = state
        .backend
        .student_by_phone(&form.phone)?
        .ok_or(BookingError::UnknownStudent)?;
    let slot = state.policy.validate(form.date, &form.slot, Local::now())?;
    let booking = state.backend.book(&student.phone, form.date, slot)?;
    Ok(Json(BookingConfirmation {
        id: booking.id,
        date: booking.date,
        slot: booking.slot,
    }))
}

async fn login<B: AttendanceBackend, C: Configuration>(
    State(state): State<AppState<B, C>>,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, BookingError> {
    if form.user != state.configuration.admin_user()
        || form.pass != state.configuration.admin_password()
    {
        warn!(user = %form.user, "rejected admin login");
        return Err(BookingError::AuthFailure);
    }
    let token = state.sessions.grant();
    info!("admin session granted");
    let cookie = format!("{ADMIN_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax");
    Ok(([(header::SET_COOKIE, cookie)], StatusCode::NO_CONTENT))
}

async fn logout<B: AttendanceBackend, C: Configuration>(
    State(state): State<AppState<B, C>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Some(token) = session_token(&headers) {
        state.sessions.revoke(token);
        info!("admin session revoked");
    }
    let cookie = format!("{ADMIN_COOKIE}=; Path=/; HttpOnly; Max-Age=0");
    ([(header::SET_COOKIE, cookie)], Redirect::to("/"))
}

async fn get_dashboard<B: AttendanceBackend, C: Configuration>(
    State(state): State<AppState<B, C>>,
) -> Result<impl IntoResponse, BookingError> {
    Ok(Json(state.backend.bookings()?))
}

async fn remove_booking<B: AttendanceBackend, C: Configuration>(
    State(state): State<AppState<B, C>>,
    Path(id): Path<Uuid>,
) -> Result<Redirect, BookingError> {
    state.backend.remove_booking(id)?;
    info!(%id, "booking removed");
    Ok(Redirect::to("/dashboard"))
}

async fn remove_student<B: AttendanceBackend, C: Configuration>(
    State(state): State<AppState<B, C>>,
    Path(id): Path<Uuid>,
) -> Result<Redirect, BookingError> {
    state.backend.remove_student(id)?;
    info!(%id, "student removed");
    Ok(Redirect::to("/dashboard"))
}

fn csv_attachment(filename: &str, body: String) -> impl IntoResponse {
    (
        [
            (
                header::CONTENT_TYPE,
                "text/csv; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
}

async fn export_students<B: AttendanceBackend, C: Configuration>(
    State(state): State<AppState<B, C>>,
) -> Result<impl IntoResponse, BookingError> {
    let students = state.backend.students()?;
    Ok(csv_attachment("alumnos.csv", export::students_csv(&students)))
}

async fn export_bookings<B: AttendanceBackend, C: Configuration>(
    State(state): State<AppState<B, C>>,
) -> Result<impl IntoResponse, BookingError> {
    let rows = state.backend.bookings()?;
    Ok(csv_attachment("asistencias.csv", export::bookings_csv(&rows)))
}
