use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Form, Router};
use minijinja::context;
use serde::{Deserialize, Serialize};

use crate::api::helpers::{category_options, path_category, render_page};
use crate::audit::{AuditEntry, write_audit};
use crate::auth::middleware::SignedIn;
use crate::contacts::{Category, Contact, ContactField, contact_path, display_name};
use crate::error::{ApiError, redirect};
use crate::store::AppState;
use crate::validation;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct NewContactForm {
    pub category: String,
    pub name: String,
    pub phone: String,
    pub email: String,
}

/// Either field may be omitted; only submitted fields are validated and
/// applied.
#[derive(Debug, Deserialize)]
pub struct EditContactForm {
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
struct CategoryGroup<'a> {
    category: Category,
    title: &'static str,
    has_contacts: bool,
    contacts: Vec<ContactSummary<'a>>,
}

#[derive(Debug, Serialize)]
struct ContactSummary<'a> {
    name: &'a str,
    phone: &'a str,
    email: &'a str,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/index", get(list_contacts))
        .route("/contact/new", get(new_contact_form).post(create_contact))
        .route("/index/{category}/{name}/delete", post(delete_contact))
        .route("/{category}/{name}/edit", get(edit_contact_form).post(update_contact))
        .route("/{category}/{name}", get(show_contact))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn list_contacts(
    State(state): State<AppState>,
    signed_in: SignedIn,
) -> Result<Response, ApiError> {
    let mut data = signed_in.data;

    let page = {
        let groups: Vec<CategoryGroup<'_>> = Category::ALL
            .iter()
            .map(|&category| CategoryGroup {
                category,
                title: category.title(),
                has_contacts: data.contact_list.has_contacts(category),
                contacts: data
                    .contact_list
                    .contacts(category)
                    .map(|(name, contact)| ContactSummary {
                        name,
                        phone: &contact.phone,
                        email: &contact.email,
                    })
                    .collect(),
            })
            .collect();
        context! { groups => groups }
    };

    render_page(&state, &mut data, StatusCode::OK, "index.html", page)
}

async fn new_contact_form(
    State(state): State<AppState>,
    signed_in: SignedIn,
) -> Result<Response, ApiError> {
    let mut data = signed_in.data;
    render_page(
        &state,
        &mut data,
        StatusCode::OK,
        "new_contact.html",
        context! {
            categories => category_options(),
            form => NewContactForm::default(),
        },
    )
}

#[tracing::instrument(
    skip_all,
    fields(user = %signed_in.username, category = %form.category),
    err
)]
async fn create_contact(
    State(state): State<AppState>,
    signed_in: SignedIn,
    Form(form): Form<NewContactForm>,
) -> Result<Response, ApiError> {
    let mut data = signed_in.data;
    let name = form.name.trim();

    let checked = validation::check_category(&form.category).and_then(|category| {
        validation::validate_new_contact(
            category,
            name,
            &form.phone,
            &form.email,
            &data.contact_list,
        )
        .map(|()| category)
    });

    let category = match checked {
        Ok(category) => category,
        Err(err) => {
            tracing::debug!(reason = %err, "new contact rejected");
            data.flash(err.to_string());
            return render_page(
                &state,
                &mut data,
                StatusCode::UNPROCESSABLE_ENTITY,
                "new_contact.html",
                context! {
                    categories => category_options(),
                    form => &form,
                },
            );
        }
    };

    data.contact_list.create(
        category,
        name,
        Contact {
            phone: form.phone.clone(),
            email: form.email.clone(),
        },
    );

    write_audit(&AuditEntry {
        actor_name: &signed_in.username,
        action: "contact.create",
        resource: "contact",
        detail: Some(serde_json::json!({"category": category, "name": name})),
    });

    Ok(redirect("/index"))
}

#[tracing::instrument(skip_all, fields(user = %signed_in.username, %category), err)]
async fn delete_contact(
    signed_in: SignedIn,
    Path((category, name)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let category = path_category(&category)?;
    let mut data = signed_in.data;

    if data.contact_list.delete(category, &name).is_some() {
        write_audit(&AuditEntry {
            actor_name: &signed_in.username,
            action: "contact.delete",
            resource: "contact",
            detail: Some(serde_json::json!({"category": category, "name": name})),
        });
    }
    data.flash(format!(
        "Contact information for {} deleted.",
        display_name(&name)
    ));

    Ok(redirect("/index"))
}

async fn edit_contact_form(
    State(state): State<AppState>,
    signed_in: SignedIn,
    Path((category, name)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let category = path_category(&category)?;
    let mut data = signed_in.data;

    let contact = data
        .contact_list
        .read(category, &name)
        .cloned()
        .ok_or(ApiError::NotFound("contact"))?;

    render_page(
        &state,
        &mut data,
        StatusCode::OK,
        "edit_contact.html",
        context! {
            category => category,
            name => name,
            phone => contact.phone,
            email => contact.email,
        },
    )
}

#[tracing::instrument(skip_all, fields(user = %signed_in.username, %category), err)]
async fn update_contact(
    State(state): State<AppState>,
    signed_in: SignedIn,
    Path((category, name)): Path<(String, String)>,
    Form(form): Form<EditContactForm>,
) -> Result<Response, ApiError> {
    let category = path_category(&category)?;
    let mut data = signed_in.data;

    let current = data
        .contact_list
        .read(category, &name)
        .cloned()
        .ok_or(ApiError::NotFound("contact"))?;

    if let Err(err) = validation::validate_update(form.phone.as_deref(), form.email.as_deref()) {
        tracing::debug!(reason = %err, "contact update rejected");
        data.flash(err.to_string());
        return render_page(
            &state,
            &mut data,
            StatusCode::UNPROCESSABLE_ENTITY,
            "edit_contact.html",
            context! {
                category => category,
                name => name,
                phone => current.phone,
                email => current.email,
            },
        );
    }

    let mut changed = Vec::with_capacity(2);
    if let Some(phone) = form.phone {
        data.contact_list
            .update(category, &name, ContactField::Phone, phone);
        changed.push(ContactField::Phone.as_str());
    }
    if let Some(email) = form.email {
        data.contact_list
            .update(category, &name, ContactField::Email, email);
        changed.push(ContactField::Email.as_str());
    }

    write_audit(&AuditEntry {
        actor_name: &signed_in.username,
        action: "contact.update",
        resource: "contact",
        detail: Some(serde_json::json!({
            "category": category,
            "name": name,
            "fields": changed,
        })),
    });
    data.flash(format!(
        "{}'s {} updated.",
        display_name(&name),
        changed.join(" and ")
    ));

    Ok(redirect(&contact_path(category, &name, Some("edit"))))
}

async fn show_contact(
    State(state): State<AppState>,
    signed_in: SignedIn,
    Path((category, name)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let category = path_category(&category)?;
    let mut data = signed_in.data;

    let contact = data
        .contact_list
        .read(category, &name)
        .cloned()
        .ok_or(ApiError::NotFound("contact"))?;

    render_page(
        &state,
        &mut data,
        StatusCode::OK,
        "contact.html",
        context! {
            category => category,
            name => name,
            phone => contact.phone,
            email => contact.email,
        },
    )
}
