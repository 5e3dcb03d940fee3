use anyhow::Context;
use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tilescene_level::LevelDescriptor;
use tilescene_transform::{GridTransformer, VariantProfile, scatter_rng};
use tracing_subscriber::EnvFilter;

const USAGE: &str =
    "You need to provide two arguments: the input file name and the output file name.";

#[derive(Parser)]
#[command(
    name = "tilescene",
    version,
    about = "Convert a tile-grid level into a scene JSON document"
)]
struct Cli {
    /// Level descriptor to read (JSON)
    input: PathBuf,

    /// Scene document to write (JSON)
    output: PathBuf,

    /// Built-in converter profile
    #[arg(long, value_enum, default_value_t = Variant::Anchored)]
    variant: Variant,

    /// Custom profile (YAML); overrides --variant
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Seed for grass scattering; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Variant {
    Anchored,
    Widget,
    Room,
}

impl Variant {
    fn profile(self) -> VariantProfile {
        match self {
            Variant::Anchored => VariantProfile::anchored(),
            Variant::Widget => VariantProfile::widget(),
            Variant::Room => VariantProfile::room(),
        }
    }
}

/// What to do with the command line.
enum Invocation {
    Convert(Box<Cli>),
    /// Input or output file missing: print the usage line and exit 1.
    Usage,
    /// Help, version, or a malformed option; clap reports it.
    Clap(clap::Error),
}

impl Invocation {
    fn from_parse(parsed: Result<Cli, clap::Error>) -> Self {
        match parsed {
            Ok(cli) => Invocation::Convert(Box::new(cli)),
            Err(e) if e.kind() == ErrorKind::MissingRequiredArgument => Invocation::Usage,
            Err(e) => Invocation::Clap(e),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = match Invocation::from_parse(Cli::try_parse()) {
        Invocation::Convert(cli) => cli,
        Invocation::Usage => {
            println!("{USAGE}");
            std::process::exit(1);
        }
        Invocation::Clap(e) => e.exit(),
    };

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    run(&cli)?;
    println!("JSON data saved.");
    Ok(())
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let profile = match &cli.profile {
        Some(path) => VariantProfile::load(path)
            .with_context(|| format!("loading profile {}", path.display()))?,
        None => cli.variant.profile(),
    };
    let transformer = GridTransformer::new(profile).context("building transformer")?;

    let level = LevelDescriptor::load(&cli.input)
        .with_context(|| format!("reading level {}", cli.input.display()))?;
    let document = transformer
        .transform(&level, &mut scatter_rng(cli.seed))
        .with_context(|| format!("transforming level {}", level.level))?;

    let bytes = document
        .save(&cli.output)
        .inspect_err(|e| tracing::error!(path = %cli.output.display(), "write failed: {e}"))
        .with_context(|| format!("writing scene {}", cli.output.display()))?;
    tracing::info!(
        path = %cli.output.display(),
        bytes,
        digest = %document.digest()?,
        "scene written"
    );
    Ok(())
}
