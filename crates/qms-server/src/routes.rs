//! HTTP routes
//!
//! ```text
//! GET  /                                   index
//! GET  /complaints|deviations|change-controls   form with a fresh identifier
//! POST /complaints|deviations|change-controls   submit
//! GET  /admin                              password prompt
//! POST /admin                              all records
//! GET  /healthz                            liveness
//! ```

use qms_core::{
    ChangeControlDraft, ComplaintDraft, DeviationDraft, Draft, QmsError, QmsService,
};
use qms_records::RecordType;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::error;
use warp::filters::BoxedFilter;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

use crate::html::{self, Banner};

/// Largest accepted form body
pub const MAX_FORM_BYTES: u64 = 64 * 1024;

type Shared = Arc<QmsService>;

#[derive(Debug, Deserialize)]
struct AdminLogin {
    #[serde(default)]
    password: String,
}

fn page(status: StatusCode, body: String) -> Response {
    warp::reply::with_status(warp::reply::html(body), status).into_response()
}

fn with_service(service: Shared) -> impl Filter<Extract = (Shared,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&service))
}

/// Page for an error the user cannot fix by editing the form
fn failure(err: &QmsError) -> Response {
    let reference = uuid::Uuid::new_v4().to_string();
    error!(%reference, error = %err, "request failed");
    let status = StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    page(status, html::error_page(&err.to_string(), &reference))
}

async fn show_form(record_type: RecordType, service: Shared) -> Result<Response, Infallible> {
    Ok(match service.forms().render(record_type).await {
        Ok(id) => page(StatusCode::OK, html::form_page(&Draft::blank(&id), None)),
        Err(err) => failure(&err),
    })
}

async fn submit_form(mut draft: Draft, service: Shared) -> Result<Response, Infallible> {
    let forms = service.forms();
    let response = match forms.submit(&draft).await {
        Ok(submission) => match forms.render(draft.record_type()).await {
            Ok(next) => page(
                StatusCode::OK,
                html::form_page(
                    &Draft::blank(&next),
                    Some(&Banner::Success(submission.message())),
                ),
            ),
            Err(err) => failure(&err),
        },
        Err(QmsError::Validation(problems)) => page(
            StatusCode::BAD_REQUEST,
            html::form_page(&draft, Some(&Banner::Error(problems.to_string()))),
        ),
        Err(err @ (QmsError::DuplicateId(_) | QmsError::UnissuedId(_))) => {
            match forms.render(draft.record_type()).await {
                Ok(fresh) => {
                    draft.set_id(&fresh);
                    page(
                        StatusCode::CONFLICT,
                        html::form_page(&draft, Some(&Banner::Error(err.to_string()))),
                    )
                }
                Err(err) => failure(&err),
            }
        }
        Err(err) => failure(&err),
    };
    Ok(response)
}

async fn open_admin(login: AdminLogin, service: Shared) -> Result<Response, Infallible> {
    Ok(match service.admin().open(&login.password).await {
        Ok(view) => page(StatusCode::OK, html::admin_view_page(&view)),
        Err(err @ QmsError::AccessDenied) => page(
            StatusCode::FORBIDDEN,
            html::admin_login_page(Some(&Banner::Error(err.to_string()))),
        ),
        Err(err) => failure(&err),
    })
}

fn form_routes<D>(
    record_type: RecordType,
    wrap: fn(D) -> Draft,
    service: Shared,
) -> BoxedFilter<(Response,)>
where
    D: DeserializeOwned + Send + 'static,
{
    let base = warp::path(record_type.slug()).and(warp::path::end());

    let get = base
        .clone()
        .and(warp::get())
        .map(move || record_type)
        .and(with_service(Arc::clone(&service)))
        .and_then(show_form);

    let post = base
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_FORM_BYTES))
        .and(warp::body::form::<D>())
        .map(wrap)
        .and(with_service(service))
        .and_then(submit_form);

    get.or(post).unify().boxed()
}

fn admin_routes(service: Shared) -> BoxedFilter<(Response,)> {
    let base = warp::path("admin").and(warp::path::end());

    let get = base
        .clone()
        .and(warp::get())
        .map(|| page(StatusCode::OK, html::admin_login_page(None)));

    let post = base
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_FORM_BYTES))
        .and(warp::body::form::<AdminLogin>())
        .and(with_service(service))
        .and_then(open_admin);

    get.or(post).unify().boxed()
}

/// Every route of the application
pub fn routes(service: Shared) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let index = warp::path::end()
        .and(warp::get())
        .map(|| page(StatusCode::OK, html::index_page()));

    let health = warp::path("healthz")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| warp::reply::with_status("ok", StatusCode::OK).into_response());

    let complaints = form_routes(
        RecordType::Complaint,
        Draft::Complaint as fn(ComplaintDraft) -> Draft,
        Arc::clone(&service),
    );
    let deviations = form_routes(
        RecordType::Deviation,
        Draft::Deviation as fn(DeviationDraft) -> Draft,
        Arc::clone(&service),
    );
    let change_controls = form_routes(
        RecordType::ChangeControl,
        Draft::ChangeControl as fn(ChangeControlDraft) -> Draft,
        Arc::clone(&service),
    );

    index
        .or(health)
        .unify()
        .or(complaints)
        .unify()
        .or(deviations)
        .unify()
        .or(change_controls)
        .unify()
        .or(admin_routes(service))
        .unify()
        .with(warp::trace::request())
}
