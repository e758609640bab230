//! Render command implementation

use anyhow::{Context, Result};
use chrono::Local;

use crate::cli::RenderArgs;

pub fn run(args: &RenderArgs) -> Result<()> {
    let director = typsm::open(&args.path)
        .with_context(|| format!("could not load specimen at {}", args.path.display()))?;

    let pdf = typsm::render(&director, args.output_dir.as_deref(), Local::now().naive_local())?;
    if !args.no_save {
        director.persist()?;
    }

    println!("{}", pdf.display());
    Ok(())
}
