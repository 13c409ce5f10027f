use anyhow::Context;
use clap::{Parser, Subcommand};
use docshow::store::ContentStore;
use docshow::{Presenter, PresenterConfig, Viewport};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docshow", version, about = "Headless documentation presentation")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// HTML shell to load instead of the built-in one
    #[arg(long, global = true)]
    page: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load every section and print a snapshot of the page
    Render {
        /// Base URL section documents are fetched from
        #[arg(long)]
        base_url: Option<String>,
        /// Extra fallback entries (JSON object of id -> markdown)
        #[arg(long)]
        store: Option<PathBuf>,
        /// Vertical scroll position to apply after loading
        #[arg(long)]
        scroll: Option<f64>,
        /// Open this section in the modal
        #[arg(long)]
        open: Option<String>,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
    },
    /// Press the launch button once
    Launch {
        /// Launcher endpoint
        #[arg(long)]
        endpoint: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => PresenterConfig::from_json_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => PresenterConfig::default(),
    };
    let html = match &cli.page {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading page {}", path.display()))?,
        None => docshow::DEFAULT_SHELL.to_string(),
    };

    match cli.command {
        Command::Render { base_url, store, scroll, open, width, height } => {
            if base_url.is_some() {
                config.base_url = base_url;
            }
            if let Some(w) = width {
                config.viewport.width = w;
            }
            if let Some(h) = height {
                config.viewport.height = h;
            }
            let mut content = ContentStore::bundled();
            if let Some(path) = store {
                content.extend(
                    ContentStore::from_json_file(&path)
                        .with_context(|| format!("reading store {}", path.display()))?,
                );
            }

            let mut presenter = Presenter::new(config, &html, content)?;
            presenter.start();
            if let Some(y) = scroll {
                presenter.scroll_to(0.0, y);
            }
            if let Some(id) = open {
                if !presenter.open(&id) {
                    log::warn!("no section #{} to open", id);
                }
            }
            print!("{}", presenter.snapshot());
        }
        Command::Launch { endpoint } => {
            if let Some(endpoint) = endpoint {
                config.launch.endpoint = endpoint;
            }
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("starting runtime")?;
            let presenter = Presenter::new(config, &html, ContentStore::empty())?;
            let activation = runtime
                .block_on(presenter.launch())
                .context("page has no usable launch control")?;
            println!("{}", activation.outcome.user_message());
            if !activation.outcome.is_success() {
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
