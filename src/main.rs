#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ppam_builder::assemble::module_files;
use ppam_builder::error::BuildResult;
use ppam_builder::inspect::{inspect, print_info};
use ppam_builder::references::{Platform, ReferencePolicy, StandardReferences};
use ppam_builder::rewrite::{default_scratch_path, rewrite};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Mode to run in
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a custom ribbon to a saved macro-enabled presentation
    Rewrite(RewriteArgs),

    /// Show the modules and references a build from a source directory would use
    Plan(PlanArgs),

    /// Read the contents of a PowerPoint package
    Inspect(InspectArgs),
}

#[derive(Args)]
struct RewriteArgs {
    /// Ribbon XML to use as the custom UI
    #[arg(short, long)]
    ribbon: PathBuf,

    /// Image shown on the ribbon, referenced from the ribbon XML by its file stem
    #[arg(short, long)]
    logo: PathBuf,

    /// Archive to build into before it replaces the presentation. Must not already exist
    #[arg(short, long)]
    scratch: Option<PathBuf>,

    /// Presentation (pptm or ppam) to modify in place
    filename: PathBuf,
}

#[derive(Args)]
struct PlanArgs {
    /// Office version the add-in is being built with
    #[arg(long, default_value_t = 16)]
    host_version: u32,

    /// Resolve references for 32 bit Windows rather than the platform of this binary
    #[arg(long, default_value_t = false)]
    x86: bool,

    /// Directory holding the VBA modules
    module_dir: PathBuf,
}

#[derive(Args)]
struct InspectArgs {
    /// PowerPoint file to read
    filename: PathBuf,
}

fn main() -> BuildResult<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Rewrite(args) => {
            let scratch = match &args.scratch {
                Some(p) => p.clone(),
                None => default_scratch_path(&args.filename)?,
            };
            let report = rewrite(&args.filename, &args.ribbon, &args.logo, &scratch)?;
            println!("🎀 Added the custom ribbon to {}", args.filename.display());
            println!("Copied {} parts unchanged", report.copied);
            for part in &report.injected {
                println!("  + {part}");
            }
            println!("Ribbon relationship id: {}", report.ui_relationship_id);
        }
        Commands::Plan(args) => {
            let platform = if args.x86 {
                Platform::X86
            } else {
                Platform::current()
            };
            let modules = module_files(&args.module_dir)?;
            println!("📜 {} modules to import", modules.len());
            for module in &modules {
                println!("  {}", module.display());
            }
            println!("🔗 References for Office {}, {platform} Windows", args.host_version);
            for reference in StandardReferences.resolve(args.host_version, platform) {
                println!("  {}: {}", reference.name, reference.path);
            }
        }
        Commands::Inspect(args) => {
            let summary = inspect(&args.filename)?;
            print_info(&summary);
        }
    }

    Ok(())
}
