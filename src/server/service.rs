use super::response::{write_html, write_json_bytes, write_json_error};
use super::ui::render_swagger_ui;
use crate::apispec::DocumentService;
use may_minihttp::{HttpService, Request, Response};
use serde_json::json;
use std::io;
use std::sync::Arc;
use tracing::{debug, error};

/// HTTP front of a [`DocumentService`].
///
/// Serves every configured document route as JSON, the Swagger UI page at
/// `specs_route` and `/health`.
#[derive(Clone)]
pub struct DocsService {
    pub docs: Arc<DocumentService>,
}

impl DocsService {
    pub fn new(docs: Arc<DocumentService>) -> Self {
        Self { docs }
    }
}

/// Basic health check endpoint returning `{ "status": "ok" }`.
pub fn health_endpoint(res: &mut Response) -> io::Result<()> {
    write_json_bytes(res, 200, json!({ "status": "ok" }).to_string().into_bytes());
    Ok(())
}

/// Serve the document published under `endpoint`, or a 500 carrying the build error.
pub fn apispec_endpoint(res: &mut Response, docs: &DocumentService, endpoint: &str) -> io::Result<()> {
    let body = docs
        .get_apispecs(endpoint)
        .map_err(|e| e.to_string())
        .and_then(|doc| doc.to_json_bytes().map_err(|e| e.to_string()));
    match body {
        Ok(bytes) => write_json_bytes(res, 200, bytes),
        Err(message) => {
            error!(endpoint, error = %message, "failed to build api document");
            write_json_error(res, 500, json!({ "code": 500, "message": message }));
        }
    }
    Ok(())
}

pub fn swagger_ui_endpoint(res: &mut Response, docs: &DocumentService) -> io::Result<()> {
    match render_swagger_ui(&docs.synthesizer().config()) {
        Ok(html) => write_html(res, html),
        Err(e) => {
            error!(error = %e, "failed to render swagger ui");
            write_json_error(res, 500, json!({ "code": 500, "message": e.to_string() }));
        }
    }
    Ok(())
}

fn same_route(a: &str, b: &str) -> bool {
    a.trim_end_matches('/') == b.trim_end_matches('/')
}

impl HttpService for DocsService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let method = req.method().to_string();
        let path = req.path().split('?').next().unwrap_or("").to_string();
        debug!(%method, %path, "docs request");

        if method != "GET" {
            write_json_error(
                res,
                405,
                json!({"error": "Method Not Allowed", "method": method, "path": path}),
            );
            return Ok(());
        }
        if path == "/health" {
            return health_endpoint(res);
        }

        let config = self.docs.synthesizer().config();
        if let Some(spec) = config.specs.iter().find(|s| s.route == path) {
            return apispec_endpoint(res, &self.docs, &spec.endpoint);
        }
        if same_route(&path, &config.specs_route) {
            return swagger_ui_endpoint(res, &self.docs);
        }

        write_json_error(
            res,
            404,
            json!({"error": "Not Found", "method": method, "path": path}),
        );
        Ok(())
    }
}
