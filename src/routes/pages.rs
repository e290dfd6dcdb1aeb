use actix_identity::Identity;
use actix_web::{
    get,
    http::StatusCode,
    post,
    web::{self, Data},
    HttpMessage, HttpRequest, HttpResponse, Responder,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tera::Context;
use validator::Validate;

use super::{current_user, redirect, render, render_with_status, require_role, STAFF};
use crate::{
    db,
    errors::AppError,
    models::users::{NewUser, Role, User},
    reports::{ReportKind, ReportTable},
    utils::{first_of_month, today},
    AppState,
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(login_handler)
        .service(login_form_handler)
        .service(logout_handler)
        .service(panel_handler)
        .service(staff_handler)
        .service(staff_form_handler)
        .service(reports_handler);
}

/// Resolves the session for a page; `None` means "send to /login".
async fn page_user(
    state: &AppState,
    identity: Option<Identity>,
) -> Result<Option<User>, AppError> {
    match current_user(state, identity).await {
        Ok(user) => Ok(Some(user)),
        Err(AppError::Unauthorized) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Like `page_user`, but a session without one of `allowed` roles is also
/// sent to /login.
async fn page_user_in(
    state: &AppState,
    identity: Option<Identity>,
    allowed: &[Role],
) -> Result<Option<User>, AppError> {
    Ok(page_user(state, identity)
        .await?
        .filter(|user| require_role(user, allowed).is_ok()))
}

fn login_page(status: StatusCode, error: Option<&str>) -> Result<HttpResponse, AppError> {
    let mut context = Context::new();
    context.insert("title", "Login");
    context.insert("error", &error);
    render_with_status(status, "login.html", &context)
}

#[derive(Deserialize)]
pub struct LoginForm {
    login: String,
    password: String,
}

#[get("/login")]
pub async fn login_handler() -> Result<impl Responder, AppError> {
    login_page(StatusCode::OK, None)
}

#[post("/login")]
pub async fn login_form_handler(
    web::Form(form): web::Form<LoginForm>,
    state: Data<AppState>,
    request: HttpRequest,
) -> Result<impl Responder, AppError> {
    if form.login.is_empty() || form.password.is_empty() {
        return login_page(StatusCode::BAD_REQUEST, Some("All fields are required"));
    }

    match db::users::authenticate(&state, &form.login, &form.password).await? {
        Some(user) => {
            Identity::login(&request.extensions(), user.id.to_string())?;
            log::info!("User {} logged in through the login page", user.id);
            Ok(redirect("/panel"))
        }
        None => login_page(StatusCode::UNAUTHORIZED, Some("Wrong login or password.")),
    }
}

#[post("/logout")]
pub async fn logout_handler(identity: Option<Identity>) -> impl Responder {
    if let Some(user) = identity {
        user.logout();
    }
    redirect("/login")
}

#[get("/panel")]
pub async fn panel_handler(
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    let Some(user) = page_user(&state, identity).await? else {
        return Ok(redirect("/login"));
    };

    let mut context = Context::new();
    context.insert("title", "Panel");
    context.insert("username", &user.username);
    context.insert("role", user.role.as_str());
    context.insert("is_staff", &user.role.is_staff());
    context.insert(
        "can_manage",
        &matches!(user.role, Role::Admin | Role::Owner),
    );
    context.insert("version", env!("CARGO_PKG_VERSION"));
    render("panel.html", &context)
}

fn staff_page(status: StatusCode, message: Option<&str>) -> Result<HttpResponse, AppError> {
    let mut context = Context::new();
    context.insert("title", "Register staff");
    context.insert("message", &message);
    render_with_status(status, "staff.html", &context)
}

#[derive(Deserialize)]
pub struct StaffForm {
    username: String,
    email: Option<String>,
    password: String,
    password2: String,
    role: Role,
}

#[get("/staff/new")]
pub async fn staff_handler(
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    if page_user_in(&state, identity, &[Role::Admin, Role::Owner]).await?.is_none() {
        return Ok(redirect("/login"));
    }
    staff_page(StatusCode::OK, None)
}

/// Register form handler for rental staff.
#[post("/staff/new")]
pub async fn staff_form_handler(
    web::Form(form): web::Form<StaffForm>,
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    if page_user_in(&state, identity, &[Role::Admin, Role::Owner]).await?.is_none() {
        return Ok(redirect("/login"));
    }

    if form.password != form.password2 {
        return staff_page(StatusCode::BAD_REQUEST, Some("Passwords do not match"));
    }
    if !matches!(form.role, Role::Owner | Role::Assistant) {
        return staff_page(StatusCode::BAD_REQUEST, Some("Staff must be owner or assistant"));
    }

    let new_user = NewUser {
        username: form.username,
        email: form.email.filter(|e| !e.trim().is_empty()),
        password: form.password,
        role: form.role,
    };
    if let Err(e) = new_user.validate() {
        return staff_page(StatusCode::BAD_REQUEST, Some(&e.to_string()));
    }

    match db::users::create_user(&state, new_user).await {
        Ok(created) => staff_page(
            StatusCode::CREATED,
            Some(&format!("User {} registered", created.username)),
        ),
        Err(AppError::Conflict(msg)) => staff_page(StatusCode::CONFLICT, Some(&msg)),
        Err(e) => Err(e),
    }
}

#[derive(Deserialize, Debug)]
pub struct ReportQuery {
    action: Option<ReportKind>,
    from: Option<String>,
    to: Option<String>,
}

/// Date inputs left blank arrive as empty strings.
fn optional_date(value: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v
            .parse::<NaiveDate>()
            .map(Some)
            .map_err(|_| AppError::Validation(format!("Invalid date {:?}", v))),
    }
}

#[derive(Serialize)]
struct ReportOption {
    key: &'static str,
    label: &'static str,
}

#[get("/reports")]
pub async fn reports_handler(
    state: Data<AppState>,
    query: web::Query<ReportQuery>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    if page_user_in(&state, identity, STAFF).await?.is_none() {
        return Ok(redirect("/login"));
    }

    let to = optional_date(query.to.as_deref())?.unwrap_or_else(today);
    let from = optional_date(query.from.as_deref())?.unwrap_or_else(|| first_of_month(to));

    let table = match query.action {
        None => None,
        Some(ReportKind::Free) => Some(ReportTable::from_rows(
            &db::reports::free_apartments(&state).await?,
        )),
        Some(ReportKind::Active) => Some(ReportTable::from_rows(
            &db::reports::active_rentals(&state).await?,
        )),
        Some(ReportKind::Debts) => {
            Some(ReportTable::from_rows(&db::reports::debtors(&state).await?))
        }
        Some(ReportKind::Income) => {
            if from > to {
                return Err(AppError::Validation(
                    "'from' must be on or before 'to'".into(),
                ));
            }
            Some(ReportTable::from_rows(
                &db::reports::daily_income(&state, from, to).await?,
            ))
        }
    };

    let options: Vec<ReportOption> = ReportKind::ALL
        .iter()
        .map(|k| ReportOption {
            key: k.key(),
            label: k.label(),
        })
        .collect();

    let mut context = Context::new();
    context.insert("title", "Rental reports");
    context.insert("options", &options);
    context.insert("selected", &query.action.map(ReportKind::key));
    context.insert("from", &from.to_string());
    context.insert("to", &to.to_string());
    context.insert("table", &table);
    render("reports.html", &context)
}
