//! Skin bundle validator for skin authors.
//!
//! Loads a bundle exactly the way the dialog subsystem does and prints the
//! region table, or fails with the first load error.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use framepick::{AtlasOptions, Skin, SkinRegion};

#[derive(Parser, Debug)]
#[command(name = "skincheck")]
#[command(about = "Validate a file dialog skin bundle", long_about = None)]
#[command(
    after_help = "The bundle directory must contain FileDialogTexture.png, \
                  FileDialogFont.png and FileDialogSprites.txt."
)]
struct Cli {
    /// Directory containing the skin bundle
    base_path: PathBuf,

    /// Fail on manifest region names outside the fixed set
    #[arg(long)]
    deny_unknown: bool,

    /// Emit extended debug information
    #[arg(long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_default_env()
        .filter_level(if cli.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    let options = AtlasOptions {
        deny_unknown_regions: cli.deny_unknown,
    };
    let skin = Skin::load(&cli.base_path, options).with_context(|| {
        format!(
            "skin bundle at {} failed validation",
            cli.base_path.display()
        )
    })?;

    println!(
        "atlas {}x{}, glyph cells {}x{}",
        skin.width, skin.height, skin.glyphs.cell_width, skin.glyphs.cell_height
    );
    for region in SkinRegion::ALL {
        let rect = skin.atlas.get(region);
        println!(
            "{:<22} {:>4},{:<4} {}x{}",
            region.manifest_name(),
            rect.x,
            rect.y,
            rect.width,
            rect.height
        );
    }

    Ok(())
}
