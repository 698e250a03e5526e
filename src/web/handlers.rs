use super::pages::{error_page, form_page, preview_page};
use crate::app::{Microsites, SubmitError};
use crate::assets::Upload;
use crate::package::PackageError;
use crate::serve::ServeError;
use crate::submission::SubmissionForm;
use axum::extract::{Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use std::sync::Arc;
use tracing::error;

pub(crate) type AppState = Arc<Microsites>;

fn error_response(status: StatusCode, title: &str, message: &str) -> Response {
    (status, Html(error_page(title, message).into_string())).into_response()
}

fn not_found(message: &str) -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found", message)
}

fn internal(message: &str) -> Response {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong", message)
}

/// Run blocking service work off the async executor.
async fn blocking<T, F>(app: &AppState, work: F) -> Result<T, Response>
where
    F: FnOnce(&Microsites) -> T + Send + 'static,
    T: Send + 'static,
{
    let app = Arc::clone(app);
    tokio::task::spawn_blocking(move || work(&app))
        .await
        .map_err(|e| {
            error!(error = %e, "blocking task failed");
            internal("the request could not be completed")
        })
}

pub(crate) async fn index(State(app): State<AppState>) -> Html<String> {
    Html(form_page(app.themes().ids(), None).into_string())
}

/// Collect multipart fields into a form. Repeated product fields append in
/// the order they arrive.
async fn read_form(mut multipart: Multipart) -> Result<SubmissionForm, String> {
    let mut form = SubmissionForm::default();
    while let Some(field) = multipart.next_field().await.map_err(|e| e.body_text())? {
        let name = field.name().unwrap_or_default().to_string();
        if matches!(name.as_str(), "logo" | "product_image") {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map_err(|e| e.body_text())?;
            let upload = (!filename.is_empty()).then(|| Upload::new(filename, bytes.to_vec()));
            if name == "logo" {
                form.logo = upload;
            } else {
                form.product_images.push(upload);
            }
            continue;
        }

        let value = field.text().await.map_err(|e| e.body_text())?;
        match name.as_str() {
            "business_name" => form.business_name = value,
            "tagline" => form.tagline = value,
            "email" => form.email = value,
            "phone" => form.phone = value,
            "address" => form.address = value,
            "facebook" => form.facebook = value,
            "instagram" => form.instagram = value,
            "twitter" => form.twitter = value,
            "theme" => form.theme = value,
            "product_name" => form.product_names.push(value),
            "product_price" => form.product_prices.push(value),
            "product_description" => form.product_descriptions.push(value),
            _ => {}
        }
    }
    Ok(form)
}

pub(crate) async fn create(State(app): State<AppState>, multipart: Multipart) -> Response {
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, "Bad request", &message),
    };
    let result = match blocking(&app, move |app| app.submit(form)).await {
        Ok(result) => result,
        Err(response) => return response,
    };
    match result {
        Ok(done) => Redirect::to(&format!("/preview/{}", done.slug)).into_response(),
        Err(SubmitError::Validation(e)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(form_page(app.themes().ids(), Some(&e.to_string())).into_string()),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "submission failed");
            internal(&e.to_string())
        }
    }
}

pub(crate) async fn preview(State(app): State<AppState>, Path(slug): Path<String>) -> Response {
    let exists = {
        let slug = slug.clone();
        match blocking(&app, move |app| app.site_exists(&slug)).await {
            Ok(exists) => exists,
            Err(response) => return response,
        }
    };
    if !exists {
        return not_found("Microsite not found!");
    }
    Html(preview_page(&slug).into_string()).into_response()
}

/// `/sites/{slug}` without the trailing slash breaks relative links.
pub(crate) async fn site_redirect(Path(slug): Path<String>) -> Redirect {
    Redirect::permanent(&format!("/sites/{slug}/"))
}

pub(crate) async fn site_root(state: State<AppState>, Path(slug): Path<String>) -> Response {
    site_file(state, Path((slug, String::new()))).await
}

pub(crate) async fn site_file(
    State(app): State<AppState>,
    Path((slug, path)): Path<(String, String)>,
) -> Response {
    match blocking(&app, move |app| app.serve(&slug, &path)).await {
        Ok(Ok(file)) => ([(header::CONTENT_TYPE, file.content_type)], file.bytes).into_response(),
        Ok(Err(ServeError::InvalidPath(p))) => {
            error_response(StatusCode::BAD_REQUEST, "Bad request", &format!("invalid path: {p}"))
        }
        Ok(Err(ServeError::NotFound(_))) => not_found("File not found"),
        Ok(Err(e)) => {
            error!(error = %e, "serving site file failed");
            internal(&e.to_string())
        }
        Err(response) => response,
    }
}

pub(crate) async fn download(State(app): State<AppState>, Path(slug): Path<String>) -> Response {
    match blocking(&app, move |app| app.package(&slug)).await {
        Ok(Ok(archive)) => {
            let disposition = format!("attachment; filename=\"{}\"", archive.filename);
            (
                [
                    (header::CONTENT_TYPE, "application/zip".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                archive.bytes,
            )
                .into_response()
        }
        Ok(Err(PackageError::SiteNotFound(_))) => not_found("Microsite not found!"),
        Ok(Err(e)) => {
            error!(error = %e, "packaging failed");
            internal(&e.to_string())
        }
        Err(response) => response,
    }
}
