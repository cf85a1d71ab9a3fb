use std::path::Path;

use anyhow::Context;
use automap_core::{automap, MappingOptions, RegistrationEntry, TypeRegistry};

use crate::fixtures::smoke_types;

pub fn run(config: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let options = load_options(config)?;
    let added = register(&options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&added)?);
    } else {
        println!("Registrations added: {}", added.len());
        for entry in &added {
            println!("  {}", describe(entry));
        }
    }

    Ok(())
}

fn load_options(config: Option<&Path>) -> anyhow::Result<MappingOptions> {
    match config {
        Some(path) => MappingOptions::from_file(path)
            .with_context(|| format!("failed to load options from {}", path.display())),
        None => MappingOptions::from_env().context("failed to load options from environment"),
    }
}

fn register(options: &MappingOptions) -> anyhow::Result<Vec<RegistrationEntry>> {
    let mut registry = TypeRegistry::new();
    Ok(automap(&mut registry, options, &smoke_types())?)
}

fn describe(entry: &RegistrationEntry) -> String {
    let mut line = format!(
        "{} -> {} ({})",
        entry.registered_type, entry.mapped_to, entry.lifetime
    );
    if let Some(name) = &entry.name {
        line.push_str(&format!(" as '{}'", name));
    }
    if entry.is_intercepted() {
        line.push_str(" [intercepted]");
    }
    line
}
