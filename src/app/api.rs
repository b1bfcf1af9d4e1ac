use crate::core::ContactService;
use crate::domain::Contact;
use crate::utils::error::{ContactError, Result};
use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Map, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub const DEFAULT_BASE_PATH: &str = "/api/contacts";

/// Builds the contact routes mounted under `base_path`.
pub fn router(service: ContactService, base_path: &str) -> Router {
    let routes = Router::new()
        .route("/", get(list_contacts).post(create_contact))
        .route(
            "/{email}",
            get(get_contact)
                .put(replace_contact)
                .patch(patch_contact)
                .delete(delete_contact),
        );

    let base_path = base_path.trim_end_matches('/');
    // axum 不允許在根路徑 nest
    let app = if base_path.is_empty() {
        Router::new().merge(routes)
    } else {
        Router::new().nest(base_path, routes)
    };

    app.layer(Extension(Arc::new(service)))
        .layer(TraceLayer::new_for_http())
}

pub async fn create_contact(
    Extension(svc): Extension<Arc<ContactService>>,
    Json(contact): Json<Contact>,
) -> Result<impl IntoResponse> {
    contact.violations().into_result()?;
    let created = svc.create(contact).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_contacts(
    Extension(svc): Extension<Arc<ContactService>>,
) -> Result<Json<Vec<Contact>>> {
    Ok(Json(svc.list_all().await?))
}

pub async fn get_contact(
    Extension(svc): Extension<Arc<ContactService>>,
    Path(email): Path<String>,
) -> Result<Json<Contact>> {
    Ok(Json(svc.get_by_email(&email).await?))
}

pub async fn delete_contact(
    Extension(svc): Extension<Arc<ContactService>>,
    Path(email): Path<String>,
) -> Result<String> {
    svc.delete_by_email(&email).await?;
    Ok(format!("Contact {} deleted successfully", email))
}

pub async fn replace_contact(
    Extension(svc): Extension<Arc<ContactService>>,
    Path(email): Path<String>,
    Json(contact): Json<Contact>,
) -> Result<Json<Contact>> {
    // 先確認聯絡人存在，缺少的鍵一律回 404
    svc.get_by_email(&email).await?;

    // email 以路徑為準，只檢查其他必填欄位
    let violations: Vec<_> = contact
        .violations()
        .into_vec()
        .into_iter()
        .filter(|v| v.field != "email")
        .collect();
    if !violations.is_empty() {
        return Err(ContactError::validation(violations));
    }

    Ok(Json(svc.replace(&email, contact).await?))
}

pub async fn patch_contact(
    Extension(svc): Extension<Arc<ContactService>>,
    Path(email): Path<String>,
    Json(fields): Json<Map<String, Value>>,
) -> Result<Json<Contact>> {
    Ok(Json(svc.patch(&email, &fields).await?))
}
