use std::sync::Arc;

use axum::{
    Router,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    routing::get,
};
use credence_common::views::ApiErrorResponse;
use credence_db::storage::Storage;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info_span;
use utoipa::{
    ToSchema,
    openapi::{Contact, Info, License, OpenApi, RefOr, path::Operation},
};
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{config::CredenceApiConfig, context::ApiContext, handlers};

const REQUEST_ID_HEADER: &str = "x-request-id";
const ADMIN_PREFIX: &str = "/api/v1/certificates";

/// Build the service router and its OpenAPI document.
///
/// # Errors
///
/// Fails if the public URL isn't a valid origin or the render assets can't
/// be loaded.
pub async fn make(
    cfg: CredenceApiConfig,
    db: Arc<dyn Storage>,
) -> anyhow::Result<(Router, OpenApi)> {
    let allowed_origin = cfg
        .public_url
        .trim_end_matches('/')
        .parse::<HeaderValue>()?;
    let context = ApiContext::new(cfg, db)?;

    let x_request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(
            x_request_id.clone(),
            MakeRequestUuid,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<_>| {
                    // Log the request ID as generated
                    let request_id = req.headers().get(REQUEST_ID_HEADER);
                    let span = info_span!(
                        "http_request",
                        method = req.method().to_string(),
                        request_id = Option::<&str>::None,
                        path = Option::<&str>::None,
                    );

                    if let Some(request_id) = request_id.and_then(|v| v.to_str().ok()) {
                        span.record("request_id", request_id);
                    };

                    if let Some(path) = req.extensions().get::<MatchedPath>() {
                        span.record("path", path.as_str())
                    } else {
                        span.record("path", req.uri().path())
                    };

                    span
                }),
        )
        .layer(
            CorsLayer::new()
                .allow_credentials(true)
                .allow_origin(allowed_origin)
        )
        .layer(PropagateRequestIdLayer::new(x_request_id));

    let openapi = OpenApi::builder()
        .info(
            Info::builder()
                .title("Credence API Reference")
                .version(env!("CARGO_PKG_VERSION"))
                .description(Some(
                    "Issue internship certificates and verify the links printed on them.",
                ))
                .license(Some(
                    License::builder()
                        .name("Apache 2.0 License")
                        .identifier(Some(env!("CARGO_PKG_LICENSE")))
                        .build()
                ))
                .contact(Some(
                    Contact::builder()
                        .name(Some("Tech Instance"))
                        .url(Some("https://techinstance.com"))
                        .build()
                ))
        )
        .build();

    let (r, mut a) = OpenApiRouter::with_openapi(openapi)
        .routes(routes!(
            handlers::certificates::list_certificates,
            handlers::certificates::create_certificate
        ))
        .routes(routes!(handlers::certificates::certificate_defaults))
        .routes(routes!(
            handlers::certificates::get_certificate,
            handlers::certificates::update_certificate,
            handlers::certificates::delete_certificate
        ))
        .routes(routes!(handlers::certificates::toggle_certificate_status))
        .routes(routes!(handlers::export::preview_certificate))
        .routes(routes!(handlers::export::print_certificate))
        .routes(routes!(handlers::export::download_certificate_pdf))
        .routes(routes!(handlers::export::share_certificate))
        .routes(routes!(handlers::export::certificate_verification_link))
        .routes(routes!(handlers::verify::verify_certificate))
        .routes(routes!(handlers::site::get_map_embed))
        .routes(routes!(handlers::well_known::get_server_well_known))
        .routes(routes!(handlers::health_check))
        .route("/verify", get(handlers::verify::verify_page))
        .layer(middleware)
        .with_state(context)
        .split_for_parts();

    a.paths.paths.iter_mut().for_each(|(path, item)| {
        let admin = path.starts_with(ADMIN_PREFIX);
        apply_default_errors(&mut item.get, admin);
        apply_default_errors(&mut item.post, admin);
        apply_default_errors(&mut item.patch, admin);
        apply_default_errors(&mut item.put, admin);
        apply_default_errors(&mut item.delete, admin);
        apply_default_errors(&mut item.trace, admin);
        apply_default_errors(&mut item.head, admin);
        apply_default_errors(&mut item.options, admin);
    });

    Ok((r, a))
}

fn apply_default_errors(item: &mut Option<Operation>, admin: bool) {
    if let Some(item) = item {
        if admin {
            item.responses.responses.insert(
                "401".into(),
                RefOr::Ref(
                    utoipa::openapi::Ref::builder()
                        .summary("Unauthorized")
                        .ref_location_from_schema_name(ApiErrorResponse::name())
                        .build()
                )
            );
        }

        item.responses.responses.insert(
            "500".into(),
            RefOr::Ref(
                utoipa::openapi::Ref::builder()
                    .summary("Internal server error")
                    .ref_location_from_schema_name(ApiErrorResponse::name())
                    .build()
            )
        );
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{StatusCode, header},
        response::Response,
    };
    use clap::Parser;
    use credence_db::{fixed_data::demo_certificates, storage::memory::MemoryStorage};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    async fn app_with(args: &[&str]) -> Router {
        let mut argv = vec!["credence-api", "--public-url", "https://techinstance.com"];
        argv.extend_from_slice(args);

        let db = Arc::new(MemoryStorage::with_certificates(demo_certificates()));
        make(CredenceApiConfig::parse_from(argv), db).await.unwrap().0
    }

    async fn app() -> Router {
        app_with(&[]).await
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        app.clone().oneshot(req.body(body).unwrap()).await.unwrap()
    }

    async fn body_bytes(resp: Response) -> Vec<u8> {
        to_bytes(resp.into_body(), usize::MAX).await.unwrap().to_vec()
    }

    async fn body_json(resp: Response) -> Value {
        serde_json::from_slice(&body_bytes(resp).await).unwrap()
    }

    async fn body_text(resp: Response) -> String {
        String::from_utf8(body_bytes(resp).await).unwrap()
    }

    #[tokio::test]
    async fn verify_known_id_returns_certificate() {
        let resp = send(&app().await, "GET", "/api/v1/verify?id=TECH-XYZ1234", None).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body["verified"], true);
        assert_eq!(body["certificate"]["intern_name"], "Jane Doe");
        assert_eq!(body["certificate"]["internship_program"], "Full Stack Development");
    }

    #[tokio::test]
    async fn verify_unknown_and_missing_ids() {
        let app = app().await;

        let body = body_json(send(&app, "GET", "/api/v1/verify?id=BOGUS", None).await).await;
        assert_eq!(body["verified"], false);
        assert_eq!(
            body["message"],
            "We couldn't verify the certificate with ID: BOGUS"
        );

        let body = body_json(send(&app, "GET", "/api/v1/verify", None).await).await;
        assert_eq!(body["verified"], false);
        assert_eq!(
            body["message"],
            "No certificate ID was provided for verification."
        );
    }

    #[tokio::test]
    async fn verify_page_renders_html() {
        let app = app().await;

        let resp = send(&app, "GET", "/verify?id=TECH-XYZ1234", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html"));
        let page = body_text(resp).await;
        assert!(page.contains("Certificate Verified"));
        assert!(page.contains("Jane Doe"));

        let page = body_text(send(&app, "GET", "/verify?id=BOGUS", None).await).await;
        assert!(page.contains("Invalid Certificate"));
    }

    #[tokio::test]
    async fn admin_routes_require_token_when_configured() {
        let app = app_with(&["--admin-token", "s3cret"]).await;

        let resp = send(&app, "GET", "/api/v1/certificates", None).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(resp).await["code"], "Unauthorized");

        let req = Request::builder()
            .uri("/api/v1/certificates")
            .header(header::AUTHORIZATION, "Bearer s3cret")
            .body(Body::empty())
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["items"].as_array().unwrap().len(), 4);

        let req = Request::builder()
            .uri("/api/v1/certificates")
            .header(header::AUTHORIZATION, "Bearer wrong")
            .body(Body::empty())
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        // Verification stays public.
        let resp = send(&app, "GET", "/api/v1/verify?id=TECH-XYZ1234", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn certificate_lifecycle() {
        let app = app().await;

        let resp = send(
            &app,
            "POST",
            "/api/v1/certificates",
            Some(json!({
                "intern_name": "Sam Lee",
                "internship_program": "Cloud Engineering",
                "score": "88%"
            })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created = body_json(resp).await;
        let id = created["id"].as_str().unwrap().to_string();
        assert!(id.starts_with("TECH-"));
        assert_eq!(created["company_name"], "Tech Instance");
        assert_eq!(created["status"], "Active");

        let resp = send(
            &app,
            "PATCH",
            &format!("/api/v1/certificates/{id}"),
            Some(json!({ "intern_name": "Samuel Lee", "score": null })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let updated = body_json(resp).await;
        assert_eq!(updated["id"], id.as_str());
        assert_eq!(updated["intern_name"], "Samuel Lee");
        assert_eq!(updated["issue_date"], created["issue_date"]);
        assert!(updated.get("score").is_none());

        let resp = send(
            &app,
            "POST",
            &format!("/api/v1/certificates/{id}/toggle-status"),
            None,
        )
        .await;
        assert_eq!(body_json(resp).await["status"], "Revoked");

        let resp = send(&app, "DELETE", &format!("/api/v1/certificates/{id}"), None).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let resp = send(&app, "GET", &format!("/api/v1/certificates/{id}"), None).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = send(&app, "DELETE", &format!("/api/v1/certificates/{id}"), None).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = body_json(send(&app, "GET", &format!("/api/v1/verify?id={id}"), None).await).await;
        assert_eq!(body["verified"], false);
    }

    #[tokio::test]
    async fn create_rejects_missing_fields_and_taken_ids() {
        let app = app().await;

        let resp = send(
            &app,
            "POST",
            "/api/v1/certificates",
            Some(json!({ "intern_name": "", "internship_program": "Rust" })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["code"], "ValidationFailed");
        assert_eq!(
            body["message"],
            "Missing Information: Please fill in all required fields."
        );

        let resp = send(
            &app,
            "POST",
            "/api/v1/certificates",
            Some(json!({
                "id": "TECH-XYZ1234",
                "intern_name": "Someone",
                "internship_program": "Rust"
            })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn update_cannot_touch_identity_fields() {
        let resp = send(
            &app().await,
            "PATCH",
            "/api/v1/certificates/TECH-XYZ1234",
            Some(json!({ "status": "Revoked" })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn create_rejects_issued_certificate_fields() {
        let resp = send(
            &app().await,
            "POST",
            "/api/v1/certificates",
            Some(json!({
                "intern_name": "Sam Lee",
                "internship_program": "Rust",
                "status": "Revoked"
            })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn intern_photo_must_be_inline_data() {
        let app = app().await;
        let remote = json!({ "kind": "inline", "data_url": "https://evil.example/x.png" });

        let resp = send(
            &app,
            "POST",
            "/api/v1/certificates",
            Some(json!({
                "intern_name": "Sam Lee",
                "internship_program": "Rust",
                "intern_image": remote
            })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let resp = send(
            &app,
            "PATCH",
            "/api/v1/certificates/TECH-XYZ1234",
            Some(json!({ "intern_image": remote })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let stored = body_json(send(&app, "GET", "/api/v1/certificates/TECH-XYZ1234", None).await).await;
        assert_ne!(stored["intern_image"]["data_url"], "https://evil.example/x.png");

        let list = body_json(send(&app, "GET", "/api/v1/certificates", None).await).await;
        assert_eq!(list["items"].as_array().unwrap().len(), 4);

        let resp = send(
            &app,
            "POST",
            "/api/v1/certificates",
            Some(json!({
                "intern_name": "Sam Lee",
                "internship_program": "Rust",
                "intern_image": { "kind": "inline", "data_url": "data:image/png;base64,YWJj" }
            })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn verification_matches_ids_exactly() {
        let body = body_json(
            send(&app().await, "GET", "/api/v1/verify?id=%20TECH-XYZ1234", None).await,
        )
        .await;
        assert_eq!(body["verified"], false);
        assert_eq!(body["submitted_id"], " TECH-XYZ1234");
        assert_eq!(
            body["message"],
            "We couldn't verify the certificate with ID:  TECH-XYZ1234"
        );
    }

    #[tokio::test]
    async fn pdf_download_fails_for_names_it_cannot_spell() {
        let app = app().await;

        let resp = send(
            &app,
            "POST",
            "/api/v1/certificates",
            Some(json!({
                "id": "TECH-UNI0001",
                "intern_name": "Łukasz Nguyễn अजय",
                "internship_program": "Rust"
            })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = send(&app, "GET", "/api/v1/certificates/TECH-UNI0001/pdf", None).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(resp).await;
        assert_eq!(body["code"], "ExportFailed");
        assert!(body["message"].as_str().unwrap().starts_with("Download Failed"));

        // The HTML preview has no such limit.
        let resp = send(&app, "GET", "/api/v1/certificates/TECH-UNI0001/preview", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains("ŁUKASZ"));
    }

    #[tokio::test]
    async fn list_supports_search() {
        let body = body_json(
            send(&app().await, "GET", "/api/v1/certificates?search=john", None).await,
        )
        .await;
        let names: Vec<_> = body["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["intern_name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["John Smith", "Emily Johnson"]);
    }

    #[tokio::test]
    async fn defaults_prefill_the_form() {
        let body = body_json(send(&app().await, "GET", "/api/v1/certificates/defaults", None).await).await;
        assert_eq!(body["company_name"], "Tech Instance");
        assert_eq!(body["duration"], "1-month internship");
        assert!(body["id"].as_str().unwrap().starts_with("TECH-"));
    }

    #[tokio::test]
    async fn exports_preview_print_and_pdf() {
        let app = app().await;

        let resp = send(&app, "GET", "/api/v1/certificates/TECH-XYZ1234/preview?variant=modern", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains("JANE DOE"));

        let resp = send(&app, "GET", "/api/v1/certificates/TECH-XYZ1234/print", None).await;
        assert!(body_text(resp).await.contains("window.print()"));

        let resp = send(&app, "GET", "/api/v1/certificates/TECH-XYZ1234/pdf", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            resp.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"certificate-TECH-XYZ1234.pdf\""
        );
        assert!(body_bytes(resp).await.starts_with(b"%PDF-"));

        let resp = send(&app, "GET", "/api/v1/certificates/BOGUS/pdf", None).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn share_and_link_point_at_verifier() {
        let app = app().await;

        let body = body_json(send(&app, "GET", "/api/v1/certificates/TECH-XYZ1234/share", None).await).await;
        assert_eq!(body["notification"]["variant"], "default");
        assert_eq!(
            body["payload"]["url"],
            "https://techinstance.com/verify?id=TECH-XYZ1234"
        );

        let body = body_json(send(&app, "GET", "/api/v1/certificates/TECH-XYZ1234/link", None).await).await;
        assert_eq!(body["url"], "https://techinstance.com/verify?id=TECH-XYZ1234");
        assert_eq!(body["notification"]["title"], "Link Copied");
    }

    #[tokio::test]
    async fn site_info_and_health() {
        let app = app().await;

        let body = body_json(send(&app, "GET", "/api/v1/site/map", None).await).await;
        assert_eq!(body["zoom"], 14);
        assert_eq!(body["marker_title"], "TechNex Headquarters");

        let body = body_json(send(&app, "GET", "/.well-known/credence/server", None).await).await;
        assert_eq!(body["public_url"], "https://techinstance.com");

        let resp = send(&app, "GET", "/health", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_text(resp).await, "Healthy");
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let resp = send(&app().await, "GET", "/health", None).await;
        assert!(resp.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn openapi_documents_admin_and_public_routes() {
        let db = Arc::new(MemoryStorage::new());
        let (_, api) = make(CredenceApiConfig::parse_from(["credence-api"]), db)
            .await
            .unwrap();

        let paths = &api.paths.paths;
        assert!(paths.contains_key("/api/v1/certificates/{id}/pdf"));
        assert!(paths.contains_key("/api/v1/verify"));
        assert!(!paths.contains_key("/verify"));

        let verify = paths["/api/v1/verify"].get.as_ref().unwrap();
        assert!(!verify.responses.responses.contains_key("401"));
        let list = paths["/api/v1/certificates"].get.as_ref().unwrap();
        assert!(list.responses.responses.contains_key("401"));
    }
}
