use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Buildpack detection and drop-in linking for Open Liberty runtimes
#[derive(Parser, Debug)]
#[command(
    name = "libertypack",
    about = "Buildpack detection and drop-in linking for Open Liberty runtimes",
    version,
    author,
    long_about = "libertypack inspects an application tree to decide whether it is a raw JVM \
                  application or a packaged Liberty server distribution, emits the matching \
                  build plan, and can link an application directory into a server's dropins \
                  location without copying."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Increase verbosity")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Detect whether an application tree fits this buildpack",
        long_about = "Inspects the application tree and prints the resulting build plan as JSON.\n\n\
                      Exits 0 when detection passes, 100 when the tree is not a fit, and 1 on \
                      error, matching the buildpack lifecycle's detect contract.\n\n\
                      Examples:\n  \
                      libertypack detect\n  \
                      libertypack detect /path/to/app\n  \
                      libertypack detect --server-name testServer /path/to/app"
    )]
    Detect(DetectArgs),

    #[command(
        about = "Link an application directory into a server's dropins directory",
        long_about = "Creates a symlink making the application directory visible inside the \
                      runtime's dropins location. Safe to re-run with unchanged inputs.\n\n\
                      Examples:\n  \
                      libertypack link\n  \
                      libertypack link --source /workspace --runtime-root /layers/ol/runtime"
    )]
    Link(LinkArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct DetectArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to the application tree (defaults to current directory)"
    )]
    pub application_path: Option<PathBuf>,

    #[arg(
        short = 's',
        long,
        value_name = "NAME",
        help = "Packaged server name (defaults to BP_OPENLIBERTY_SERVER_NAME or defaultServer)"
    )]
    pub server_name: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct LinkArgs {
    #[arg(
        long,
        value_name = "DIR",
        help = "Application directory to link (defaults to BPI_OL_DROPIN_DIR or /workspace)"
    )]
    pub source: Option<PathBuf>,

    #[arg(
        long,
        value_name = "DIR",
        help = "Runtime layer root containing usr/servers (defaults to BPI_OL_RUNTIME_ROOT)"
    )]
    pub runtime_root: Option<PathBuf>,
}
