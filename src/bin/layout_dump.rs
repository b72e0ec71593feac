// Prints a layout table, and optionally exports it as an editable JSON file.
// Run with: cargo run --bin layout_dump -- --export layouts/thaana.json
use clap::Parser;
use std::path::PathBuf;
use thaana_core::layout::{load_layout, save_layout};
use thaana_core::CharacterMap;

#[derive(Parser)]
#[command(name = "layout_dump", about = "Show or export a keyboard layout")]
struct Cli {
    /// JSON layout to show instead of the built-in table
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Write the layout as JSON to this path
    #[arg(long)]
    export: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let map = match &cli.layout {
        Some(path) => load_layout(path)?,
        None => CharacterMap::thaana(),
    };

    println!("{} ({} keys)", map.name(), map.len());
    for (latin, glyph) in map.sorted_entries() {
        println!("  {}  =>  {}  (U+{:04X})", latin, glyph, glyph as u32);
    }

    if let Some(path) = &cli.export {
        save_layout(&map, path)?;
        log::info!("layout written to {}", path.display());
    }
    Ok(())
}
