use crate::apispec::DocumentService;
use crate::config::{load_config, SwaggerConfig};
use crate::docstring::YamlDocstringExtractor;
use crate::hot_reload::{watch_routes, ReloadableRoutes};
use crate::route::load_route_table;
use crate::runtime_config::RuntimeConfig;
use crate::server::start_docs_server;
use crate::source::StaticConfig;
use crate::synth::{normalize_path, SpecSynthesizer};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Command-line interface for the API document synthesizer.
#[derive(Parser)]
#[command(name = "pyrin-swagger")]
#[command(about = "Synthesize and serve Swagger documents from a route table", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the configured documents and the Swagger UI
    Serve {
        /// Swagger configuration file (YAML or JSON); defaults apply when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Route table file (YAML or JSON)
        #[arg(short, long)]
        routes: PathBuf,

        /// Address and port to bind the server to
        #[arg(long, default_value = "0.0.0.0:8080")]
        addr: String,

        /// Reload the route table when it changes; implies live-reload mode
        #[arg(long, default_value_t = false)]
        watch: bool,
    },
    /// Build one document and print it
    Generate {
        /// Swagger configuration file (YAML or JSON); defaults apply when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Route table file (YAML or JSON)
        #[arg(short, long)]
        routes: PathBuf,

        /// Spec endpoint to build (default: the first configured spec)
        #[arg(short, long)]
        endpoint: Option<String>,

        /// Write the document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List routes, verbs and the paths they are documented under
    Inspect {
        /// Route table file (YAML or JSON)
        #[arg(short, long)]
        routes: PathBuf,

        /// Swagger configuration supplying `swaggerUiPrefix` and `basePath`
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn read_config(path: Option<&Path>) -> anyhow::Result<SwaggerConfig> {
    match path {
        Some(path) => load_config(path),
        None => Ok(SwaggerConfig::default()),
    }
}

fn synthesizer(config: SwaggerConfig, routes: Arc<ReloadableRoutes>) -> SpecSynthesizer {
    let extractor = match &config.doc_dir {
        Some(dir) => YamlDocstringExtractor::with_doc_dir(dir),
        None => YamlDocstringExtractor::new(),
    };
    SpecSynthesizer::new(routes, Arc::new(StaticConfig::new(config)), Arc::new(extractor))
}

/// Execute the CLI command provided by the user.
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve {
            config,
            routes,
            addr,
            watch,
        } => {
            let runtime = RuntimeConfig::from_env();
            may::config().set_stack_size(runtime.stack_size);

            let mut config = read_config(config.as_deref())?;
            config.live_reload |= runtime.live_reload || watch;
            let live_reload = config.live_reload;

            let routes = Arc::new(ReloadableRoutes::load(&routes)?);
            let _watcher = if watch {
                Some(watch_routes(Arc::clone(&routes), |_| {}).context("failed to watch route table")?)
            } else {
                None
            };

            let docs = Arc::new(DocumentService::new(synthesizer(config, routes), live_reload));
            let handle = start_docs_server(docs, addr.as_str())?;
            info!(live_reload, watch, "serving api documents");
            handle
                .join()
                .map_err(|e| anyhow::anyhow!("server terminated abnormally: {e:?}"))
        }
        Commands::Generate {
            config,
            routes,
            endpoint,
            output,
        } => {
            let config = read_config(config.as_deref())?;
            let endpoint = match endpoint {
                Some(endpoint) => endpoint,
                None => config
                    .specs
                    .first()
                    .map(|s| s.endpoint.clone())
                    .context("no specs configured")?,
            };
            let routes = Arc::new(ReloadableRoutes::load(&routes)?);
            let doc = synthesizer(config, routes).build_document(&endpoint)?;
            let json = serde_json::to_string_pretty(&doc)?;

            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    info!(path = %path.display(), %endpoint, "document written");
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    writeln!(stdout, "{json}")?;
                }
            }
            Ok(())
        }
        Commands::Inspect { routes, config } => {
            let config = read_config(config.as_deref())?;
            let table = load_route_table(&routes)?;
            for route in table.routes() {
                let verbs: Vec<&str> = route.methods.iter().map(|m| m.as_str()).collect();
                let path = normalize_path(
                    &route.rule,
                    config.swagger_ui_prefix.as_deref(),
                    config.base_path.as_deref(),
                );
                let mut flags = Vec::new();
                if route.is_protected {
                    flags.push("protected");
                }
                if route.is_paged {
                    flags.push("paged");
                }
                println!(
                    "{:<20} {:<40} {:<30} {}",
                    verbs.join(","),
                    path,
                    route.endpoint,
                    flags.join(" ")
                );
            }
            Ok(())
        }
    }
}
