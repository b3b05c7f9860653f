//! CLI definitions and command dispatch.

use std::{
    fs::{read_to_string, remove_dir_all},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use fontfall_core::{EngineOptions, FallbackEngine, SelectionConfig, Strategy};

#[derive(Parser)]
#[command(name = "fontfall")]
#[command(about = "Inspect the Fontfall font and script fallback engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, clap::Args)]
pub struct EngineArgs {
    /// Cache directory for catalogs, the index and font files.
    #[arg(long, default_value = ".fontfall-cache")]
    pub cache_dir: PathBuf,
    /// Local copy of the Unicode class definitions.
    #[arg(long)]
    pub classes_seed: Option<PathBuf>,
    /// Local copy of the font coverage catalog.
    #[arg(long)]
    pub catalog_seed: Option<PathBuf>,
    /// Declarative font index overriding the built-in catalog lookup.
    #[arg(long)]
    pub font_index: Option<PathBuf>,
    /// Skip checking locally installed fonts.
    #[arg(long)]
    pub no_local_fonts: bool,
}

impl EngineArgs {
    fn engine(&self) -> Result<FallbackEngine> {
        let mut options = EngineOptions::new(&self.cache_dir);
        options.classes_seed = self.classes_seed.clone();
        options.catalog_seed = self.catalog_seed.clone();
        options.font_index = self.font_index.clone();
        options.skip_local_fonts = self.no_local_fonts;
        FallbackEngine::new(options)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan text and print the fallback plan as JSON.
    Scan {
        /// Text to scan; use --file to read from disk instead.
        text: Option<String>,
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
        #[arg(long, default_value = "by_class")]
        strategy: String,
        #[command(flatten)]
        args: EngineArgs,
    },
    /// Segment text into script runs and print them as JSON.
    Segment { text: String },
    /// Resolve the font selection for a profile and print it as JSON.
    Resolve {
        #[arg(long, default_value = "default")]
        profile: String,
        #[arg(long)]
        family: Option<String>,
        #[arg(long)]
        main: Option<String>,
        #[arg(long)]
        sans: Option<String>,
        #[arg(long)]
        mono: Option<String>,
        #[arg(long)]
        math: Option<String>,
    },
    /// Remove the cache directory.
    CleanCache {
        #[arg(long, default_value = ".fontfall-cache")]
        cache_dir: PathBuf,
    },
}

impl Commands {
    pub fn run(self) -> Result<()> {
        match self {
            Commands::Scan { text, file, strategy, args } => {
                let strategy: Strategy = strategy.parse()?;
                let text = match (text, file) {
                    (Some(text), _) => text,
                    (None, Some(path)) => read_to_string(&path)
                        .with_context(|| format!("Failed to read {}", path.display()))?,
                    (None, None) => anyhow::bail!("pass TEXT or --file"),
                };
                let engine = args.engine()?;
                let plan = engine.scan_text(&text, strategy);
                println!("{}", serde_json::to_string_pretty(&plan)?);
            }
            Commands::Segment { text } => {
                let runs = fontfall_core::segment(&text);
                println!("{}", serde_json::to_string_pretty(&runs)?);
            }
            Commands::Resolve { profile, family, main, sans, mono, math } => {
                let config = SelectionConfig {
                    profile: profile.parse()?,
                    family,
                    main,
                    sans,
                    mono,
                    math,
                    small_caps: None,
                };
                let selection = fontfall_core::resolve_selection(&config, &[], &[]);
                println!("{}", serde_json::to_string_pretty(&selection)?);
            }
            Commands::CleanCache { cache_dir } => {
                if cache_dir.exists() {
                    remove_dir_all(&cache_dir)?;
                    println!("Removed {}", cache_dir.display());
                } else {
                    println!("Skipped {} (not found)", cache_dir.display());
                }
            }
        }
        Ok(())
    }
}
