use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nbdash::{api, config::DashboardConfig, listing, notebook, Dashboard};

const DEFAULT_PORT: u16 = 8501;
const DEFAULT_HOST: &str = "127.0.0.1";

#[derive(Parser)]
#[command(name = "nbdash")]
#[command(about = "Browse precomputed notebooks and plot images in a dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the dashboard server
    Serve(ServeArgs),
    /// Print the files a panel would list
    List {
        #[arg(value_enum)]
        kind: ListKind,

        #[command(flatten)]
        dirs: DirArgs,
    },
    /// Convert a notebook and print its HTML body to stdout
    Render {
        /// Path to the .ipynb file
        path: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ListKind {
    Notebooks,
    Images,
}

#[derive(clap::Args, Debug, Default, PartialEq)]
struct DirArgs {
    /// Directory holding the notebooks
    #[arg(long)]
    notebooks_dir: Option<PathBuf>,

    /// Directory holding the plot images
    #[arg(long)]
    images_dir: Option<PathBuf>,
}

#[derive(clap::Args, Debug, PartialEq)]
struct ServeArgs {
    /// Port for the HTTP server
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    #[command(flatten)]
    dirs: DirArgs,

    /// Maximum number of converted notebooks kept in memory
    #[arg(long)]
    cache_capacity: Option<usize>,
}

impl Default for ServeArgs {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: DEFAULT_HOST.to_string(),
            dirs: DirArgs::default(),
            cache_capacity: None,
        }
    }
}

/// Initialize tracing. Logs go to stderr so `list`/`render` output stays clean.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "nbdash=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn apply_dirs(config: &mut DashboardConfig, dirs: DirArgs) {
    if let Some(dir) = dirs.notebooks_dir {
        config.notebooks_dir = dir;
    }
    if let Some(dir) = dirs.images_dir {
        config.images_dir = dir;
    }
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = DashboardConfig::load();
    apply_dirs(&mut config, args.dirs);
    if let Some(capacity) = args.cache_capacity {
        config.cache_capacity = capacity;
    }

    tracing::info!(
        "Serving notebooks from {} and images from {}",
        config.notebooks_dir.display(),
        config.images_dir.display()
    );

    let app = api::create_router(Dashboard::new(config));

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Dashboard listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Some(Commands::Serve(args)) => serve(args).await?,
        Some(Commands::List { kind, dirs }) => {
            let mut config = DashboardConfig::load();
            apply_dirs(&mut config, dirs);

            let names = match kind {
                ListKind::Notebooks => listing::list_notebooks(&config.notebooks_dir)?,
                ListKind::Images => listing::list_images(&config.images_dir)?,
            };
            for name in names {
                println!("{}", name);
            }
        }
        Some(Commands::Render { path }) => {
            let body = notebook::convert(&path)?;
            print!("{}", body);
        }
        // Default: start server
        None => serve(ServeArgs::default()).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve_with_defaults() {
        let cli = Cli::try_parse_from(["nbdash"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn serve_flags_default_to_the_shared_constants() {
        let cli = Cli::try_parse_from(["nbdash", "serve"]).unwrap();
        let Some(Commands::Serve(args)) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args, ServeArgs::default());
        assert_eq!(args.port, 8501);
        assert_eq!(args.host, "127.0.0.1");
    }

    #[test]
    fn serve_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "nbdash",
            "serve",
            "-p",
            "9000",
            "--notebooks-dir",
            "nb",
            "--cache-capacity",
            "0",
        ])
        .unwrap();
        let Some(Commands::Serve(args)) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.port, 9000);
        assert_eq!(args.host, DEFAULT_HOST);
        assert_eq!(args.dirs.notebooks_dir, Some(PathBuf::from("nb")));
        assert_eq!(args.cache_capacity, Some(0));
    }
}
