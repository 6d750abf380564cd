pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::generation::handlers::handle_generate;
use crate::render::handlers::handle_export;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let max_surface_bytes = state.config.max_surface_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/documents/generate", post(handle_generate))
        .route(
            "/api/v1/documents/export",
            post(handle_export).layer(DefaultBodyLimit::max(max_surface_bytes)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::{Config, DEFAULT_MAX_SURFACE_BYTES};
    use crate::generation::generator::testing::MockProvider;
    use crate::generation::generator::DocumentGenerator;
    use crate::llm_client::ProviderHandle;
    use crate::models::document::{fixtures, DocumentType};
    use crate::render::surface::testing::png_rgb;

    const BOUNDARY: &str = "smartdoc-test-boundary";

    fn state_with(provider: ProviderHandle, max_surface_bytes: usize) -> AppState {
        AppState {
            generator: DocumentGenerator::new(provider),
            config: Config {
                gemini_api_key: None,
                port: 0,
                rust_log: "info".to_string(),
                max_surface_bytes,
            },
        }
    }

    fn app(provider: ProviderHandle) -> Router {
        build_router(state_with(provider, DEFAULT_MAX_SURFACE_BYTES))
    }

    fn valid_payload(document_type: DocumentType) -> String {
        fixtures::record(document_type)
            .content_value()
            .unwrap()
            .to_string()
    }

    fn generate_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/documents/generate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_body(parts: &[(&str, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, data) in parts {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn export_request(parts: &[(&str, &[u8])]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/documents/export")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(ProviderHandle::Unconfigured)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "smartdoc-api");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_generate_returns_tagged_record() {
        let provider = MockProvider::replying(valid_payload(DocumentType::Invoice));
        let response = app(provider.handle())
            .oneshot(generate_request(json!({
                "document_type": "invoice",
                "description": "Three hours of consulting for Acme",
                "language": "en"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["document_type"], "invoice");
        assert_eq!(
            body["content"],
            fixtures::record(DocumentType::Invoice).content_value().unwrap()
        );
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_generate_defaults_to_arabic_prompt() {
        let provider = MockProvider::replying(valid_payload(DocumentType::Report));
        let response = app(provider.handle())
            .oneshot(generate_request(json!({
                "document_type": "report",
                "description": "تقرير مبيعات الربع الثالث"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let prompt = provider.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("تقرير مبيعات الربع الثالث"));
        assert!(prompt.contains("باللغة العربية"));
    }

    #[tokio::test]
    async fn test_generate_blank_description_is_validation_error() {
        let provider = MockProvider::replying(valid_payload(DocumentType::Resume));
        let response = app(provider.handle())
            .oneshot(generate_request(json!({
                "document_type": "resume",
                "description": "   ",
                "language": "en"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(
            body["error"]["message"],
            "Please enter a description of the document."
        );
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_generate_unknown_document_type_is_validation_error() {
        let provider = MockProvider::replying("{}");
        let response = app(provider.handle())
            .oneshot(generate_request(json!({
                "document_type": "poem",
                "description": "a sonnet"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_generate_without_provider_is_unavailable() {
        let response = app(ProviderHandle::Unconfigured)
            .oneshot(generate_request(json!({
                "document_type": "newsletter",
                "description": "Monthly team update",
                "language": "en"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "PROVIDER_UNAVAILABLE");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Gemini API key is not configured"));
    }

    #[tokio::test]
    async fn test_generate_malformed_reply_is_bad_gateway() {
        let provider = MockProvider::replying("Sure! Here is your resume:");
        let response = app(provider.handle())
            .oneshot(generate_request(json!({
                "document_type": "resume",
                "description": "Backend engineer"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "MALFORMED_RESPONSE");
        assert_eq!(
            body["error"]["message"],
            "فشل في توليد المحتوى. يرجى المحاولة مرة أخرى."
        );
    }

    #[tokio::test]
    async fn test_generate_schema_mismatch_is_bad_gateway() {
        let provider = MockProvider::replying(r#"{"title": "only a title"}"#);
        let response = app(provider.handle())
            .oneshot(generate_request(json!({
                "document_type": "report",
                "description": "Quarterly numbers",
                "language": "en"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(json_body(response).await["error"]["code"], "SCHEMA_MISMATCH");
    }

    #[tokio::test]
    async fn test_export_returns_pdf_attachment() {
        let png = png_rgb(210, 590);
        let response = app(ProviderHandle::Unconfigured)
            .oneshot(export_request(&[("language", b"en".as_slice()), ("surface", png.as_slice())]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"AI_Smart_Document.pdf\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_export_without_surface_is_validation_error() {
        let response = app(ProviderHandle::Unconfigured)
            .oneshot(export_request(&[("language", b"en".as_slice())]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(
            body["error"]["message"],
            "The document preview was not provided."
        );
    }

    #[tokio::test]
    async fn test_export_undecodable_surface_is_unprocessable() {
        let response = app(ProviderHandle::Unconfigured)
            .oneshot(export_request(&[("surface", b"not an image".as_slice())]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "EXPORT_FAILURE");
        assert_eq!(
            body["error"]["message"],
            "تعذر إنشاء ملف PDF. يرجى المحاولة مرة أخرى."
        );
    }

    #[tokio::test]
    async fn test_export_too_tall_surface_is_unprocessable() {
        let png = png_rgb(1, 2000);
        let response = app(ProviderHandle::Unconfigured)
            .oneshot(export_request(&[("language", b"en".as_slice()), ("surface", png.as_slice())]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "EXPORT_FAILURE");
        assert_eq!(
            body["error"]["message"],
            "Could not create the PDF file. Please try again."
        );
    }

    #[tokio::test]
    async fn test_export_rejects_unknown_language() {
        let png = png_rgb(10, 10);
        let response = app(ProviderHandle::Unconfigured)
            .oneshot(export_request(&[("language", b"fr".as_slice()), ("surface", png.as_slice())]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_export_enforces_body_limit() {
        let router = build_router(state_with(ProviderHandle::Unconfigured, 1024));
        let oversized = vec![0u8; 8192];
        let response = router
            .oneshot(export_request(&[("surface", oversized.as_slice())]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
        assert_eq!(body["error"]["message"], "معاينة المستند المرفوعة كبيرة جدًا.");
    }

    #[tokio::test]
    async fn test_state_reports_provider_configuration() {
        let state = state_with(ProviderHandle::Unconfigured, DEFAULT_MAX_SURFACE_BYTES);
        let cloned = state.clone();
        assert!(!cloned.generator.is_configured());
        let provider = MockProvider::replying("{}");
        let configured = state_with(provider.handle(), DEFAULT_MAX_SURFACE_BYTES);
        assert!(configured.generator.is_configured());
        assert_eq!(Arc::strong_count(&provider), 2);
    }
}
