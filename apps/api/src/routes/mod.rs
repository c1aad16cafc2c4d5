pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::metrics::handlers as metrics;
use crate::projects::handlers as projects;
use crate::questions::handlers as questions;
use crate::stakeholders::handlers as stakeholders;
use crate::state::AppState;
use crate::tailoring::handlers as tailoring;
use crate::upload::handlers as upload;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Projects
        .route(
            "/api/projects",
            get(projects::handle_list_projects).post(projects::handle_create_project),
        )
        .route(
            "/api/projects/:id",
            get(projects::handle_get_project)
                .patch(projects::handle_update_project)
                .delete(projects::handle_delete_project),
        )
        .route(
            "/api/projects/:id/prd",
            get(projects::handle_get_prd_pdf).put(projects::handle_attach_prd),
        )
        .route("/api/projects/:id/document", get(projects::handle_get_document))
        // Stakeholders
        .route(
            "/api/projects/:id/stakeholders",
            get(stakeholders::handle_list_stakeholders).post(stakeholders::handle_add_stakeholders),
        )
        .route(
            "/api/stakeholders/:id",
            patch(stakeholders::handle_update_stakeholder)
                .delete(stakeholders::handle_delete_stakeholder),
        )
        .route(
            "/api/stakeholder-roles",
            get(stakeholders::handle_stakeholder_roles),
        )
        // Tailoring and review
        .route(
            "/api/generate-tailored-prd",
            post(tailoring::handle_generate_tailored),
        )
        .route(
            "/api/projects/:id/review/drafts",
            post(tailoring::handle_review_drafts),
        )
        .route(
            "/api/projects/:id/review/send",
            post(tailoring::handle_review_send),
        )
        // Upload
        .route("/api/upload-prd", post(upload::handle_upload_prd))
        // Questions
        .route(
            "/api/projects/:id/questions",
            get(questions::handle_list_questions).post(questions::handle_ask_question),
        )
        .route("/api/questions/:id/answers", post(questions::handle_add_answer))
        .route(
            "/api/questions/:id/answers/suggest",
            post(questions::handle_suggest_answer),
        )
        .route(
            "/api/questions/:id/resolve",
            post(questions::handle_resolve_question),
        )
        .route(
            "/api/questions/:id/unresolve",
            post(questions::handle_unresolve_question),
        )
        // Metrics
        .route("/api/metrics", get(metrics::handle_metrics))
        .layer(body_limit)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::models::{PrdAttachment, ReviewStatus};
    use crate::store::Store;
    use crate::testing::{
        bearer_token, seed_project, seed_stakeholder, test_app, test_app_with_generator,
        FakeGenerator, MemoryStore,
    };

    fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, token);
        }
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    const BOUNDARY: &str = "smartprd-boundary";

    /// Multipart body with `(name, file_name, content)` parts; a `None` file name is a text field.
    fn multipart_request(token: &str, parts: &[(&str, Option<&str>, &str)]) -> Request<Body> {
        let mut body = String::new();
        for (name, file_name, content) in parts {
            body.push_str(&format!("--{BOUNDARY}\r\n"));
            match file_name {
                Some(file_name) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                     Content-Type: text/plain\r\n\r\n"
                )),
                None => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
                )),
            }
            body.push_str(content);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));

        Request::builder()
            .method(Method::POST)
            .uri("/api/upload-prd")
            .header(header::AUTHORIZATION, token)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_needs_no_session() {
        let app = build_router(test_app(MemoryStore::default()).state);
        let response = app
            .oneshot(request(Method::GET, "/health", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["service"], "smartprd-api");
    }

    #[tokio::test]
    async fn test_missing_or_bad_token_is_401() {
        let app = build_router(test_app(MemoryStore::default()).state);
        let response = app
            .clone()
            .oneshot(request(Method::GET, "/api/projects", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"]["code"], "UNAUTHORIZED");

        let response = app
            .oneshot(request(Method::GET, "/api/projects", Some("Bearer nope"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_then_fetch_project() {
        let user = Uuid::new_v4();
        let token = bearer_token(user, None);
        let app = build_router(test_app(MemoryStore::default()).state);

        let response = app
            .clone()
            .oneshot(request(
                Method::POST,
                "/api/projects",
                Some(&token),
                Some(json!({
                    "name": "SmartShot",
                    "prdContent": "# SmartShot",
                    "stakeholders": [
                        {"name": "Sarah", "email": "sarah@example.com", "role": "UI/UX Designer"}
                    ]
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        let id = created["id"].as_str().unwrap().to_string();
        assert_eq!(created["stakeholders"][0]["reviewStatus"], "pending");

        let response = app
            .oneshot(request(Method::GET, &format!("/api/projects/{id}"), Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let detail = body_json(response).await;
        assert_eq!(detail["name"], "SmartShot");
        assert_eq!(detail["stakeholders"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_foreign_project_is_403_and_unknown_is_404() {
        let store = MemoryStore::default();
        let project = seed_project(&store, Uuid::new_v4(), Some("PRD"), None);
        let app = build_router(test_app(store).state);
        let token = bearer_token(Uuid::new_v4(), None);

        let response = app
            .clone()
            .oneshot(request(
                Method::GET,
                &format!("/api/projects/{}", project.id),
                Some(&token),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .oneshot(request(
                Method::GET,
                &format!("/api/projects/{}", Uuid::new_v4()),
                Some(&token),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_generate_without_project_id_is_400() {
        let app = build_router(test_app(MemoryStore::default()).state);
        let token = bearer_token(Uuid::new_v4(), None);
        let response = app
            .oneshot(request(
                Method::POST,
                "/api/generate-tailored-prd",
                Some(&token),
                Some(json!({})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"]["message"],
            "Project ID is required"
        );
    }

    #[tokio::test]
    async fn test_generate_reports_per_stakeholder_results() {
        let store = MemoryStore::default();
        let owner = Uuid::new_v4();
        let project = seed_project(&store, owner, Some("# PRD"), None);
        let ok = seed_stakeholder(&store, project.id, "Sarah", "UI/UX Designer");
        seed_stakeholder(&store, project.id, "Alex", "Backend Engineer");
        let app = build_router(
            test_app_with_generator(store.clone(), FakeGenerator::failing_for("Backend Engineer"))
                .state,
        );

        let response = app
            .oneshot(request(
                Method::POST,
                "/api/generate-tailored-prd",
                Some(&bearer_token(owner, None)),
                Some(json!({ "projectId": project.id })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let report = body_json(response).await;
        assert_eq!(report["success"], true);
        assert_eq!(report["results"][0]["success"], true);
        assert_eq!(report["results"][1]["success"], false);
        assert_eq!(
            store.stakeholder(ok.id).unwrap().review_status,
            ReviewStatus::InProgress
        );
    }

    #[tokio::test]
    async fn test_inline_pdf_is_served_with_headers() {
        let store = MemoryStore::default();
        let owner = Uuid::new_v4();
        let project = seed_project(&store, owner, None, None);
        store
            .attach_prd(
                project.id,
                owner,
                PrdAttachment {
                    prd_content: Some(format!(
                        "data:application/pdf;base64,{}",
                        STANDARD.encode(b"%PDF-1.4 body")
                    )),
                    prd_file_name: Some("prd.pdf".to_string()),
                    ..PrdAttachment::default()
                },
            )
            .await
            .unwrap();
        let app = build_router(test_app(store).state);

        let response = app
            .oneshot(request(
                Method::GET,
                &format!("/api/projects/{}/prd", project.id),
                Some(&bearer_token(owner, None)),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(headers[header::CONTENT_DISPOSITION], "inline");
        assert_eq!(headers[header::CACHE_CONTROL], "public, max-age=3600");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"%PDF-1.4 body");
    }

    #[tokio::test]
    async fn test_missing_pdf_is_404() {
        let store = MemoryStore::default();
        let owner = Uuid::new_v4();
        let project = seed_project(&store, owner, Some("plain text PRD"), None);
        let app = build_router(test_app(store).state);

        let response = app
            .oneshot(request(
                Method::GET,
                &format!("/api/projects/{}/prd", project.id),
                Some(&bearer_token(owner, None)),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_document_as_html() {
        let store = MemoryStore::default();
        let owner = Uuid::new_v4();
        let project = seed_project(&store, owner, Some("# Title\n\nSome **bold** text"), None);
        let app = build_router(test_app(store).state);

        let response = app
            .oneshot(request(
                Method::GET,
                &format!("/api/projects/{}/document?format=html", project.id),
                Some(&bearer_token(owner, None)),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
    }

    #[tokio::test]
    async fn test_stakeholder_asks_and_owner_resolves() {
        let store = MemoryStore::default();
        let owner = Uuid::new_v4();
        let project = seed_project(&store, owner, Some("PRD"), None);
        let kim = seed_stakeholder(&store, project.id, "Kim", "QA Engineer");
        let app = build_router(test_app(store).state);

        let response = app
            .clone()
            .oneshot(request(
                Method::POST,
                &format!("/api/projects/{}/questions", project.id),
                Some(&bearer_token(Uuid::new_v4(), Some("kim@example.com"))),
                Some(json!({ "stakeholderId": kim.id, "questionText": "Which devices?" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let question_id = body_json(response).await["id"].as_str().unwrap().to_string();

        let owner_token = bearer_token(owner, None);
        let response = app
            .clone()
            .oneshot(request(
                Method::POST,
                &format!("/api/questions/{question_id}/resolve"),
                Some(&owner_token),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["status"], "resolved");

        let response = app
            .oneshot(request(Method::GET, "/api/metrics", Some(&owner_token), None))
            .await
            .unwrap();
        let metrics = body_json(response).await;
        assert_eq!(metrics["totalQuestions"], 1);
        assert_eq!(metrics["resolutionRate"], 100);
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let app = build_router(test_app(MemoryStore::default()).state);
        let big = "x".repeat(2 * 1024 * 1024);
        let response = app
            .oneshot(request(
                Method::POST,
                "/api/projects",
                Some(&bearer_token(Uuid::new_v4(), None)),
                Some(json!({ "name": big })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_upload_text_file_returns_extracted_text() {
        let app = test_app(MemoryStore::default());
        let router = build_router(app.state.clone());
        let token = bearer_token(Uuid::new_v4(), None);

        let response = router
            .oneshot(multipart_request(&token, &[("file", Some("notes.txt"), "Hello")]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["extractedText"], "Hello");
        assert_eq!(body["filename"], "notes.txt");
        assert_eq!(app.blobs.len(), 1);
        assert!(app.jobs.queued().is_empty());
    }

    #[tokio::test]
    async fn test_upload_into_project_attaches_and_queues() {
        let store = MemoryStore::default();
        let owner = Uuid::new_v4();
        let project = seed_project(&store, owner, None, None);
        let app = test_app(store.clone());
        let router = build_router(app.state.clone());

        let project_id = project.id.to_string();
        let response = router
            .oneshot(multipart_request(
                &bearer_token(owner, None),
                &[
                    ("projectId", None, project_id.as_str()),
                    ("file", Some("prd.md"), "# SmartShot"),
                ],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let stored = store.project(project.id).unwrap();
        assert_eq!(stored.prd_extracted_text.as_deref(), Some("# SmartShot"));
        assert_eq!(stored.prd_file_name.as_deref(), Some("prd.md"));
        let jobs = app.jobs.queued();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].project_id, project.id);
    }

    #[tokio::test]
    async fn test_upload_without_file_field_is_400() {
        let app = test_app(MemoryStore::default());
        let router = build_router(app.state.clone());

        let response = router
            .oneshot(multipart_request(
                &bearer_token(Uuid::new_v4(), None),
                &[("note", None, "no file here")],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["message"], "No file provided");
        assert_eq!(app.blobs.len(), 0);
    }

    #[tokio::test]
    async fn test_upload_with_malformed_project_id_is_400() {
        let app = test_app(MemoryStore::default());
        let router = build_router(app.state.clone());

        let response = router
            .oneshot(multipart_request(
                &bearer_token(Uuid::new_v4(), None),
                &[
                    ("projectId", None, "not-a-uuid"),
                    ("file", Some("notes.txt"), "Hello"),
                ],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(app.blobs.len(), 0);
    }

    #[tokio::test]
    async fn test_delete_project_is_204_then_404() {
        let store = MemoryStore::default();
        let owner = Uuid::new_v4();
        let project = seed_project(&store, owner, Some("PRD"), None);
        let app = build_router(test_app(store.clone()).state);
        let token = bearer_token(owner, None);
        let uri = format!("/api/projects/{}", project.id);

        let response = app
            .clone()
            .oneshot(request(Method::DELETE, &uri, Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(store.project(project.id).is_none());

        let response = app
            .oneshot(request(Method::DELETE, &uri, Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
