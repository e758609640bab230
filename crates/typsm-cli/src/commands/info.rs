//! Info command implementation
//!
//! Prints what a specimen is made of, as the director resolved it.

use anyhow::{Context, Result};
use typsm::section::Section;
use typsm::traits::FontFace;

use crate::cli::InfoArgs;

pub fn run(args: &InfoArgs) -> Result<()> {
    let director = typsm::open(&args.path)?;
    let fonts = director
        .font_collection()
        .context("the specimen has no font collection")?;

    println!("typsm v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Collection: {}", fonts.collection_name());
    println!("Settings:   {}", director.settings_path().display());
    println!();

    println!("Fonts:");
    for font in fonts.fonts() {
        let (width, weight, italic) = font.sort_key();
        println!(
            "  {:<32} width {width}, weight {weight}{}",
            font.full_name(),
            if italic { ", italic" } else { "" }
        );
        println!("    {}", font.path().display());
    }

    let scripts = fonts.script_support();
    if !scripts.is_empty() {
        println!();
        println!("Scripts:");
        for (script, count) in scripts {
            println!("  {script:<24} {count} code points");
        }
    }

    println!();
    println!("Sections:");
    for section in director.sections() {
        let marker = if section.draws_across_all_pages() { " (every page)" } else { "" };
        println!("  {}{marker}", section.name());
    }
    Ok(())
}
