use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use stagehand_assets::{JsonTemplateLoader, Manifest, TypeRegistry};
use stagehand_runtime::{RuntimeConfig, Stage};
use stagehand_scene::{DebugTextRenderer, Renderer};
use stagehand_spawn::{Route, SpawnDispatcher};
use stagehand_tools::RegistryInspector;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stagehand-cli", about = "CLI tool for stagehand asset stages")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Check that a type table loads and every manifest type resolves
    Validate {
        /// Asset type table (JSON or YAML)
        #[arg(short, long)]
        types: PathBuf,
        /// Manifest to check against the type table
        #[arg(short, long)]
        manifest: Option<PathBuf>,
    },
    /// Populate a stage from a manifest and run frames headlessly
    Simulate {
        #[command(flatten)]
        stage: StageArgs,
        /// Number of frames to run
        #[arg(short, long, default_value = "120")]
        frames: u64,
        /// Print the scene graph afterwards
        #[arg(long)]
        dump: bool,
    },
    /// Populate a stage and list every registered instance
    Inspect {
        #[command(flatten)]
        stage: StageArgs,
        /// Frames to run before listing
        #[arg(short, long, default_value = "1")]
        frames: u64,
    },
}

#[derive(Args)]
struct StageArgs {
    /// Manifest with system_assets and custom_assets
    manifest: PathBuf,
    /// Asset type table
    #[arg(short, long)]
    types: Option<PathBuf>,
    /// Directory template resource paths are relative to
    #[arg(long, default_value = ".")]
    templates: PathBuf,
    /// Runtime config (YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl StageArgs {
    fn build(&self) -> anyhow::Result<Stage> {
        let config = match &self.config {
            Some(path) => RuntimeConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => RuntimeConfig::default(),
        };
        let mut stage = Stage::with_loader(
            config,
            Box::new(JsonTemplateLoader::new(self.templates.clone())),
        );
        if let Some(types) = &self.types {
            stage
                .load_types(types)
                .with_context(|| format!("loading types {}", types.display()))?;
        }
        let manifest = Manifest::load(&self.manifest)
            .with_context(|| format!("loading manifest {}", self.manifest.display()))?;
        let report = stage.populate(&manifest);
        println!(
            "Populated: spawned={} failed={}",
            report.spawned.len(),
            report.failed.len()
        );
        for id in &report.failed {
            println!("  failed: {id}");
        }
        Ok(stage)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("stagehand-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("scene: {}", stagehand_scene::crate_info());
            println!("assets: {}", stagehand_assets::crate_info());
            println!("kernel: {}", stagehand_kernel::crate_info());
            println!("spawn: {}", stagehand_spawn::crate_info());
            println!("input: {}", stagehand_input::crate_info());
            println!("tools: {}", stagehand_tools::crate_info());
            println!("runtime: {}", stagehand_runtime::crate_info());
        }
        Commands::Validate { types, manifest } => {
            let mut registry = TypeRegistry::new();
            let accepted = registry
                .load_path(&types)
                .with_context(|| format!("loading types {}", types.display()))?;
            println!("Types: {accepted} accepted");
            for d in registry.descriptors() {
                println!(
                    "  {} -> {} (scale={} mass={} restitution={})",
                    d.key, d.resource_path, d.scale, d.mass, d.restitution
                );
            }

            if let Some(path) = manifest {
                let manifest = Manifest::load(&path)
                    .with_context(|| format!("loading manifest {}", path.display()))?;
                let types = manifest
                    .system_assets
                    .iter()
                    .map(|e| (&e.id, &e.asset_type))
                    .chain(manifest.custom_assets.iter().map(|e| (&e.id, &e.asset_type)));
                let mut unresolved = 0;
                for (id, asset_type) in types {
                    match SpawnDispatcher::route(&registry, asset_type) {
                        Some(Route::System(kind)) => println!("  {id}: built-in {}", kind.as_str()),
                        Some(Route::Model(key)) => println!("  {id}: model {key}"),
                        None => {
                            unresolved += 1;
                            println!("  {id}: UNRESOLVED type '{asset_type}'");
                        }
                    }
                }
                println!("Manifest: {} assets, {unresolved} unresolved", manifest.len());
                if unresolved > 0 {
                    anyhow::bail!("{unresolved} manifest assets have unresolvable types");
                }
            }
        }
        Commands::Simulate {
            stage,
            frames,
            dump,
        } => {
            let mut stage = stage.build()?;
            for _ in 0..frames {
                stage.frame();
            }
            let summary = RegistryInspector::summary(
                stage.registry(),
                stage.physics(),
                stage.pending_insertions(),
            );
            println!("After {frames} frames: {summary}");
            if dump {
                print!("{}", DebugTextRenderer::new().render(stage.scene()));
            }
        }
        Commands::Inspect { stage, frames } => {
            let mut stage = stage.build()?;
            for _ in 0..frames {
                stage.frame();
            }
            for info in
                RegistryInspector::list_instances(stage.registry(), stage.scene(), stage.physics())
            {
                println!("{info}");
            }
        }
    }

    Ok(())
}
