use clap::{Parser, Subcommand};
use mdsite::{config, output, serve, site};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mdsite")]
#[command(about = "Static site generator for small markdown sites")]
#[command(long_about = "\
Static site generator for small markdown sites

Each markdown file in pages/ becomes one HTML page, wrapped in a shared
template with navigation and a table-of-contents sidebar.

Site structure:

  site/
  ├── config.toml              # Site config (optional)
  ├── pages/
  │   ├── index.md             # → dist/index.html
  │   └── profile.md           # → dist/profile.html
  ├── assets/                  # → dist/assets/
  └── template/
      ├── template.html        # {{TITLE}} {{CONTENT}} {{NAV}} {{TOC}} {{BODY_CLASS}} {{YEAR}}
      └── styles.css           # → dist/styles.css

Markdown extensions:
  :::profile-header            Avatar image, name and message card
  :::scrollable-list           Horizontally scrolling list
  ![x](./assets/a.png)         Rewritten to /assets/a.png

Set RUST_LOG (e.g. RUST_LOG=debug) to control log output.
Run 'mdsite gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Site root directory
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Config file (defaults to <root>/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the site into the output directory
    Build {
        /// Minify HTML and CSS regardless of config
        #[arg(long)]
        minify: bool,
    },
    /// Serve the built output directory over HTTP
    Serve {
        /// Port to listen on (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Parse all pages without writing output
    Check {
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Build { minify } => {
            let mut site_config = load_site_config(&cli.root, cli.config.as_deref())?;
            site_config.build.minify |= minify;
            init_thread_pool(&site_config.build);

            println!("==> Building {}", cli.root.display());
            let report = site::build_site(&cli.root, &site_config)?;
            output::print_build_output(&report);

            if !report.is_success() {
                return Err(format!("{} page(s) failed to build", report.failures.len()).into());
            }
        }
        Command::Serve { port } => {
            let mut site_config = load_site_config(&cli.root, cli.config.as_deref())?;
            if let Some(port) = port {
                site_config.serve.port = port;
            }
            let output_dir = site_config.resolve_paths(&cli.root).output;
            serve::serve(&output_dir, &site_config.serve)?;
        }
        Command::Check { json } => {
            let site_config = load_site_config(&cli.root, cli.config.as_deref())?;
            let pages = site::check_site(&cli.root, &site_config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&pages)?);
            } else {
                output::print_check_output(&pages);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn load_site_config(
    root: &Path,
    config_path: Option<&Path>,
) -> Result<config::SiteConfig, config::ConfigError> {
    match config_path {
        Some(path) if !path.is_file() => Err(config::ConfigError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("config file {} not found", path.display()),
        ))),
        Some(path) => config::load_config_file(path),
        None => config::load_config(root),
    }
}

/// Initialize the rayon thread pool based on build config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(build: &config::BuildConfig) {
    let threads = config::effective_threads(build);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
