//! Single-image conversion.
//! Applies the same depth → stereo → anaglyph chain to one still image.

use std::path::Path;

use anyhow::Result;

use relievo_render::{image_loader, process_frame};

pub fn run(input: &Path, output: &Path, max_disparity: u32) -> Result<()> {
    let frame = image_loader::load_image(input)?;
    let anaglyph = process_frame(&frame, max_disparity)?;
    image_loader::save_image(&anaglyph, output)?;

    println!(
        "🖼  Saved anaglyph to {} ({}x{})",
        output.display(),
        anaglyph.width,
        anaglyph.height
    );
    Ok(())
}
