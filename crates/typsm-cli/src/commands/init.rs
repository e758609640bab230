//! Init command implementation
//!
//! Loading a specimen already writes the default document when none
//! exists; this adds requested sections and saves the resolved result.

use anyhow::{bail, Result};
use typsm::codec::SectionRecord;
use typsm::director::Director;
use typsm::fontdb::FontDatabase;
use typsm::tree::SettingsTree;

use crate::cli::InitArgs;

pub fn run(args: &InitArgs) -> Result<()> {
    let provider = FontDatabase::new();
    let mut director = Director::load(&args.path, typsm::default_registry(), &provider)?;

    let mut document = director.settings_document();
    for template in &args.templates {
        if !director.registry().contains(template) {
            let known: Vec<&str> = director.registry().names().collect();
            bail!("unknown section type `{template}` (known: {})", known.join(", "));
        }
        if document.contains_template(template) {
            log::info!("`{template}` is already in the document");
        } else {
            document
                .records
                .push(SectionRecord::new(template.as_str(), SettingsTree::new()));
        }
    }

    director.instantiate_sections(&document, &provider)?;
    director.persist()?;
    println!("{}", director.settings_path().display());
    Ok(())
}
