//! # pyrin-swagger
//!
//! **pyrin-swagger** builds a Swagger 2.0 / OpenAPI document by introspecting a
//! table of registered routes and the documentation attached to their
//! handlers, then serves it over a `may_minihttp` coroutine server.
//!
//! ## Overview
//!
//! Handlers document themselves with a docstring (summary, description and a
//! YAML fragment after `---`), a structured fragment, or a file under
//! `doc_dir`. The synthesizer fills in everything the route already implies:
//! typed path parameters, query/body locations, paging, locale and timezone
//! parameters, security requirements, `401`/`403`/success responses and tags.
//!
//! ## Architecture
//!
//! - **[`route`]** - Routes, their rules and handlers; route table files
//! - **[`docstring`]** - Handler documentation parsing
//! - **[`draft`]** - Operation value types flowing through synthesis
//! - **[`synth`]** - Parameter merge, response injection, assembly
//! - **[`cache`]** - Per-endpoint document memoization
//! - **[`apispec`]** - Synthesizer plus cache behind `get_apispecs`
//! - **[`server`]** - HTTP endpoints and Swagger UI
//! - **[`hot_reload`]** - Route table reloading
//! - **[`config`]** / **[`runtime_config`]** / **[`logging`]** - Ambient setup
//!
//! ### Document Request Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Server as DocsService
//!     participant Docs as DocumentService
//!     participant Cache as DocumentCache
//!     participant Synth as SpecSynthesizer
//!     participant Routes as RouteSource
//!     participant Extractor as DocstringExtractor
//!
//!     Client->>Server: GET /swagger.json
//!     Server->>Docs: get_apispecs("swagger")
//!     Docs->>Cache: get_or_build("swagger")
//!     alt cached and not live-reload
//!         Cache-->>Docs: Arc<ApiDocument>
//!     else miss
//!         Cache->>Synth: build_document("swagger")
//!         loop every route and verb
//!             Synth->>Routes: handler_for(route, verb)
//!             Synth->>Extractor: extract(route, verb, handler)
//!             Synth->>Synth: fix_metadata
//!         end
//!         Synth->>Synth: normalize paths, fold definitions
//!         Synth-->>Cache: ApiDocument
//!     end
//!     Docs-->>Server: Arc<ApiDocument>
//!     Server-->>Client: 200 application/json
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use http::Method;
//! use pyrin_swagger::route::{Handler, Route, RouteHandlers, RouteTable};
//! use pyrin_swagger::{DocumentService, SpecSynthesizer, StaticConfig, SwaggerConfig, YamlDocstringExtractor};
//! use std::sync::Arc;
//!
//! let table = RouteTable::new().with_route(
//!     Route::new("users.get", "/users/<int:id>", [Method::GET]),
//!     RouteHandlers::function(Handler::new("get_user").with_docstring("Get a user.")),
//! );
//! let synthesizer = SpecSynthesizer::new(
//!     Arc::new(table),
//!     Arc::new(StaticConfig::new(SwaggerConfig::default())),
//!     Arc::new(YamlDocstringExtractor::new()),
//! );
//! let docs = DocumentService::new(synthesizer, false);
//! let doc = docs.get_apispecs("swagger").unwrap();
//! assert!(doc.paths.contains_key("/users/{id}"));
//! ```

pub mod apispec;
pub mod cache;
pub mod cli;
pub mod config;
pub mod docstring;
pub mod draft;
pub mod error;
pub mod hot_reload;
pub mod logging;
pub mod route;
pub mod runtime_config;
pub mod server;
pub mod source;
pub mod synth;
pub mod validator;

pub use apispec::DocumentService;
pub use cache::DocumentCache;
pub use config::{load_config, SwaggerConfig};
pub use docstring::YamlDocstringExtractor;
pub use draft::{OperationDraft, Parameter, ParameterLocation, ParameterType};
pub use error::SwaggerError;
pub use route::{load_route_table, Route, RouteTable};
pub use source::{
    ConfigSource, DefaultStatusCodes, DocstringExtractor, RouteSource, SegmentTagResolver,
    StaticConfig, StatusCodeResolver, TagResolver,
};
pub use synth::{ApiDocument, SpecSynthesizer};
