pub mod http_server;
pub mod response;
pub mod service;
pub mod ui;

pub use http_server::{start_docs_server, HttpServer, ServerHandle};
pub use service::{apispec_endpoint, health_endpoint, swagger_ui_endpoint, DocsService};
pub use ui::render_swagger_ui;
