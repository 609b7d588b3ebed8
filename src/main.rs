//! CLI entry point for vega-writer

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vega_writer::commands;
use vega_writer::Writer;

#[derive(Parser)]
#[command(name = "vega-writer")]
#[command(author = "Vega")]
#[command(version)]
#[command(about = "Write, score and publish markdown blog posts", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the publish server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Create a new draft
    New {
        /// Title of the new post
        title: String,

        /// Category to file it under
        #[arg(long)]
        category: Option<String>,

        /// SEO description
        #[arg(long)]
        description: Option<String>,
    },

    /// Score a draft's on-page SEO
    Check {
        /// Draft file or name in the drafts directory
        draft: String,
    },

    /// Render a draft to an HTML page
    Preview {
        /// Draft file or name in the drafts directory
        draft: String,

        /// Output file (defaults to the draft path with .html)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Re-render on every change
        #[arg(short, long)]
        watch: bool,
    },

    /// Write the markdown document and structured data of a draft
    Export {
        /// Draft file or name in the drafts directory
        draft: String,

        /// Output directory
        #[arg(short, long, default_value = "export")]
        output: PathBuf,
    },

    /// Publish a draft through the publish endpoint
    Publish {
        /// Draft file or name in the drafts directory
        draft: String,

        /// Endpoint URL (defaults to the configured one)
        #[arg(short, long)]
        endpoint: Option<String>,
    },

    /// List drafts
    List,

    /// Manage categories
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// Display version information
    Version,
}

#[derive(Subcommand)]
enum CategoryAction {
    /// Show all categories
    List,
    /// Add a category
    Add { name: String },
    /// Remove a category
    Remove { name: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "vega_writer=debug,info"
    } else {
        "vega_writer=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Serve { port, ip } => {
            let writer = Writer::new(&base_dir)?;
            tracing::info!("Starting publish server at http://{}:{}", ip, port);
            vega_writer::server::start(&writer, &ip, port).await?;
        }

        Commands::New {
            title,
            category,
            description,
        } => {
            let writer = Writer::new(&base_dir)?;
            tracing::info!("Creating new draft with title: {}", title);
            commands::new::create_draft(
                &writer,
                &title,
                category.as_deref(),
                description.as_deref(),
            )?;
        }

        Commands::Check { draft } => {
            let writer = Writer::new(&base_dir)?;
            commands::check::run(&writer, &writer.draft_path(&draft))?;
        }

        Commands::Preview {
            draft,
            output,
            watch,
        } => {
            let writer = Writer::new(&base_dir)?;
            let draft = writer.draft_path(&draft);
            let output = output.unwrap_or_else(|| commands::preview::default_output(&draft));

            commands::preview::render(&writer, &draft, &output)?;
            println!("Preview written to {}", output.display());

            if watch {
                tokio::task::spawn_blocking(move || {
                    commands::preview::watch(&writer, &draft, &output)
                })
                .await??;
            }
        }

        Commands::Export { draft, output } => {
            let writer = Writer::new(&base_dir)?;
            let output = if output.is_absolute() {
                output
            } else {
                base_dir.join(output)
            };
            commands::export::run(&writer, &writer.draft_path(&draft), &output)?;
        }

        Commands::Publish { draft, endpoint } => {
            let writer = Writer::new(&base_dir)?;
            commands::publish::run(&writer, &writer.draft_path(&draft), endpoint.as_deref())
                .await?;
        }

        Commands::List => {
            let writer = Writer::new(&base_dir)?;
            commands::list::run(&writer)?;
        }

        Commands::Category { action } => {
            let writer = Writer::new(&base_dir)?;
            match action {
                CategoryAction::List => {
                    commands::category::list(&writer)?;
                }
                CategoryAction::Add { name } => {
                    commands::category::add(&writer, &name)?;
                }
                CategoryAction::Remove { name } => {
                    commands::category::remove(&writer, &name)?;
                }
            }
        }

        Commands::Version => {
            println!("vega-writer version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
