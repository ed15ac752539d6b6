use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::debug;
use utoipa::OpenApi;

use presshost_auth::RequireAuth;
use presshost_core::problemdetails;
use presshost_core::problemdetails::Problem;

use super::types::{CreateSiteRequest, DeleteSiteResponse, SiteResponse};
use crate::services::{CreateSiteParams, SiteError, SiteService};

pub struct AppState {
    pub site_service: Arc<SiteService>,
}

pub fn configure_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sites", post(create_site))
        .route("/sites", get(list_sites))
        .route("/sites/{id}", get(get_site))
        .route("/sites/{id}", delete(delete_site))
}

#[derive(OpenApi)]
#[openapi(
    paths(create_site, list_sites, get_site, delete_site),
    components(schemas(CreateSiteRequest, SiteResponse, DeleteSiteResponse)),
    tags(
        (name = "Sites", description = "Site provisioning and lifecycle endpoints")
    )
)]
pub struct SitesApiDoc;

impl From<SiteError> for Problem {
    fn from(err: SiteError) -> Self {
        match err {
            SiteError::LimitReached => problemdetails::new(StatusCode::BAD_REQUEST)
                .with_title("Site Limit Reached")
                .with_detail("Maximum number of sites reached"),
            SiteError::DomainTaken => problemdetails::new(StatusCode::BAD_REQUEST)
                .with_title("Domain Taken")
                .with_detail("A site with this domain already exists"),
            SiteError::NotFound => problemdetails::new(StatusCode::NOT_FOUND)
                .with_title("Site Not Found")
                .with_detail("Site not found"),
            SiteError::Dispatch(_) | SiteError::Database(_) => {
                problemdetails::new(StatusCode::INTERNAL_SERVER_ERROR)
                    .with_title("Internal Server Error")
                    .with_detail(err.to_string())
            }
        }
    }
}

/// Request a new site. The record is persisted as pending and provisioning
/// happens in the background; poll the site to observe progress.
#[utoipa::path(
    post,
    path = "/sites",
    tag = "Sites",
    request_body = CreateSiteRequest,
    responses(
        (status = 200, description = "Site created, provisioning dispatched", body = SiteResponse),
        (status = 400, description = "Site limit reached or domain already exists"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_site(
    State(state): State<Arc<AppState>>,
    RequireAuth(auth): RequireAuth,
    Json(request): Json<CreateSiteRequest>,
) -> Result<impl IntoResponse, Problem> {
    let site = state
        .site_service
        .create_site(
            auth.user_id(),
            CreateSiteParams {
                domain: request.domain,
                title: request.title,
                admin_email: request.admin_email,
                admin_user: request.admin_user,
            },
        )
        .await
        .map_err(Problem::from)?;

    debug!("Site {} created for user {}", site.id, auth.user_id());
    Ok(Json(SiteResponse::map_from_site(site)))
}

/// List the caller's sites
#[utoipa::path(
    get,
    path = "/sites",
    tag = "Sites",
    responses(
        (status = 200, description = "List of sites", body = [SiteResponse]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_sites(
    State(state): State<Arc<AppState>>,
    RequireAuth(auth): RequireAuth,
) -> Result<impl IntoResponse, Problem> {
    let sites = state
        .site_service
        .list_sites(auth.user_id())
        .await
        .map_err(Problem::from)?;

    Ok(Json(
        sites
            .into_iter()
            .map(SiteResponse::map_from_site)
            .collect::<Vec<_>>(),
    ))
}

/// Get one of the caller's sites by id
#[utoipa::path(
    get,
    path = "/sites/{id}",
    tag = "Sites",
    params(
        ("id" = i32, Path, description = "Site ID")
    ),
    responses(
        (status = 200, description = "Site details", body = SiteResponse),
        (status = 404, description = "Site not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_site(
    State(state): State<Arc<AppState>>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Problem> {
    let site = state
        .site_service
        .get_site(auth.user_id(), id)
        .await
        .map_err(Problem::from)?;

    Ok(Json(SiteResponse::map_from_site(site)))
}

/// Dispatch deletion of one of the caller's sites. The acknowledgement
/// returns before the deletion task is applied.
#[utoipa::path(
    delete,
    path = "/sites/{id}",
    tag = "Sites",
    params(
        ("id" = i32, Path, description = "Site ID")
    ),
    responses(
        (status = 200, description = "Deletion dispatched", body = DeleteSiteResponse),
        (status = 404, description = "Site not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_site(
    State(state): State<Arc<AppState>>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Problem> {
    state
        .site_service
        .delete_site(auth.user_id(), id)
        .await
        .map_err(Problem::from)?;

    Ok(Json(DeleteSiteResponse {
        message: "Site deletion started".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use presshost_auth::AuthContext;
    use presshost_database::test_utils::TestDatabase;
    use presshost_entities::users;
    use presshost_queue::QueueService;
    use sea_orm::{ActiveModelTrait, Set};
    use tower::ServiceExt;

    async fn test_app() -> (TestDatabase, Router, users::Model) {
        let test_db = TestDatabase::with_migrations().await.unwrap();

        let user = users::ActiveModel {
            email: Set("jane@example.com".to_string()),
            username: Set("jane".to_string()),
            password_hash: Set("x".to_string()),
            is_active: Set(true),
            ..Default::default()
        };
        let user = user.insert(test_db.db.as_ref()).await.unwrap();

        let (queue, _receiver) = QueueService::create_channel(16);
        // Keep the channel open for the lifetime of the app
        std::mem::forget(_receiver);

        let site_service = Arc::new(SiteService::new(
            test_db.connection_arc(),
            Arc::new(queue),
            5,
        ));
        let state = Arc::new(AppState { site_service });
        let router = configure_routes().with_state(state);

        (test_db, router, user)
    }

    fn authed(router: Router, user: users::Model) -> Router {
        router.layer(axum::Extension(AuthContext::new(user)))
    }

    #[tokio::test]
    async fn test_create_site_unauthorized_without_context() {
        let (_db, router, _user) = test_app().await;

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/sites")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"domain":"new.example.com","title":"New Site","admin_email":"a@b.c","admin_user":"admin"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_site_returns_pending_representation() {
        let (_db, router, user) = test_app().await;
        let app = authed(router, user);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/sites")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"domain":"new.example.com","title":"New Site","admin_email":"admin@new.example.com","admin_user":"admin"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["domain"], "new.example.com");
        assert_eq!(json["title"], "New Site");
        assert_eq!(json["status"], "pending");
    }

    #[tokio::test]
    async fn test_get_site_not_found_is_problem_response() {
        let (_db, router, user) = test_app().await;
        let app = authed(router, user);

        let response = app
            .oneshot(Request::builder()
                    .uri("/sites/999")
                    .body(Body::empty())
                    .unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()["content-type"],
            "application/problem+json"
        );

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["detail"], "Site not found");
    }

    #[tokio::test]
    async fn test_delete_site_acknowledges() {
        let (_db, router, user) = test_app().await;
        let app = authed(router, user.clone());

        let create = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/sites")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"domain":"doomed.example.com","title":"Doomed","admin_email":"a@b.c","admin_user":"admin"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = create.into_body().collect().await.unwrap().to_bytes();
        let created: serde_json::Value = serde_json::from_slice(&body).unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/sites/{}", created["id"]))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "Site deletion started");
    }
}
