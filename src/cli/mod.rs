//! # CLI
//!
//! The `pyrin-swagger` binary.
//!
//! ### `serve`
//!
//! ```bash
//! pyrin-swagger serve --config swagger.yaml --routes routes.yaml --addr 0.0.0.0:8080 --watch
//! ```
//!
//! Serves every configured spec route, the Swagger UI at `specs_route` and
//! `/health`. `--watch` reloads the route table on change and turns on
//! live-reload mode.
//!
//! ### `generate`
//!
//! ```bash
//! pyrin-swagger generate --routes routes.yaml --endpoint swagger --output swagger.json
//! ```
//!
//! ### `inspect`
//!
//! ```bash
//! pyrin-swagger inspect --routes routes.yaml
//! ```

mod commands;


pub use commands::{run_cli, Cli, Commands};
