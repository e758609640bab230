//! CLI argument definitions using Clap v4

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// typsm - type specimens from a folder of fonts
#[derive(Parser, Debug)]
#[command(name = "typsm")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Draw the specimen to a PDF and save the settings back
    #[command(alias = "r")]
    Render(RenderArgs),

    /// Create or extend the settings document without drawing
    Init(InitArgs),

    /// Show the font collection and sections of a specimen
    #[command(alias = "i")]
    Info(InfoArgs),
}

#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Font directory, or a file inside it
    pub path: PathBuf,

    /// Directory for the PDF (default: next to the fonts)
    #[arg(short = 'o', long = "output-dir")]
    pub output_dir: Option<PathBuf>,

    /// Leave the settings document untouched
    #[arg(long)]
    pub no_save: bool,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Font directory, or a file inside it
    pub path: PathBuf,

    /// Append a section of this type unless the document has one
    #[arg(short = 't', long = "template")]
    pub templates: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Font directory, or a file inside it
    pub path: PathBuf,
}
