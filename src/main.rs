use clap::{Parser, Subcommand};
use navtree::config::{self, CONFIG_FILENAME, NavTreeConfig};
use navtree::datafile::{read_data_file, write_data_file};
use navtree::scan::TreeBuilder;
use navtree::{output, watch};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "navtree")]
#[command(about = "Build a navigation tree data file from a static site's source directory")]
#[command(long_about = "\
Build a navigation tree data file from a static site's source directory

Directories become sections, pages become leaves. Entries with a display
order sort first, zero-padded so plain key order is display order.

Project structure:

  my-site/
  ├── navtree.toml                 # Optional config ('navtree gen-config')
  ├── source/
  │   ├── index.html.erb           # Front matter: display_order: 1
  │   ├── about.html.md            # No order, sorted by name
  │   ├── getting started/
  │   │   ├── .display_info        # display_order: 2
  │   │   └── install.html.md
  │   └── assets/                  # Ignored
  └── data/
      └── tree.yml                 # Written by 'navtree build'

Resulting tree:

  0001-index.html.erb: /index.html.erb
  0002-getting%20started:
    install.html.md: /getting%20started/install.html.md
  about.html.md: /about.html.md

Log verbosity follows RUST_LOG (default: warn).")]
#[command(version)]
struct Cli {
    /// Project directory (holds navtree.toml and the source directory)
    #[arg(long, default_value = ".", global = true)]
    project: PathBuf,

    /// Config file [default: <project>/navtree.toml]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the source directory and write the data file
    Build {
        /// Write the data file even when automatic_updates is off
        #[arg(long)]
        force: bool,
    },
    /// Scan and print the tree without writing anything
    Check,
    /// Print the tree stored in the existing data file
    Show,
    /// Build, then rebuild whenever the source directory changes
    Watch,
    /// Print a stock navtree.toml with all options documented
    GenConfig,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Build { force } => {
            let config = load_config(&cli)?;
            let data_path = config.data_path(&cli.project);
            let tree = builder(&cli.project, &config).build()?;
            output::print_tree(&tree);
            let outcome = if config.automatic_updates || force {
                Some(write_data_file(&data_path, &tree)?)
            } else {
                tracing::info!("automatic_updates is off; data file left as is");
                None
            };
            output::print_summary(&tree, &data_path, outcome.as_ref());
        }
        Command::Check => {
            let config = load_config(&cli)?;
            let tree = builder(&cli.project, &config).build()?;
            output::print_tree(&tree);
            output::print_summary(&tree, &config.data_path(&cli.project), None);
        }
        Command::Show => {
            let config = load_config(&cli)?;
            let tree = read_data_file(&config.data_path(&cli.project))?;
            output::print_tree(&tree);
        }
        Command::Watch => {
            let config = load_config(&cli)?;
            let data_path = config.data_path(&cli.project);
            println!("==> Watching {}", config.source_path(&cli.project).display());
            watch::watch(&cli.project, &config, |tree, outcome| {
                output::print_summary(tree, &data_path, outcome);
            })?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load `--config`, or `navtree.toml` in the project directory.
///
/// Errors are prefixed with the config file path.
fn load_config(cli: &Cli) -> Result<NavTreeConfig, String> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| cli.project.join(CONFIG_FILENAME));
    config::load_config_file(&path).map_err(|e| format!("{}: {e}", path.display()))
}

fn builder(project: &Path, config: &NavTreeConfig) -> TreeBuilder {
    TreeBuilder::with_front_matter(config.source_path(project), config.scan_options())
}
