//! Example: Render a watercolor trail from a scripted pointer orbit.
//!
//! Drives the effect headlessly on the CPU raster surface and writes the
//! final frame as a PNG.
//!
//! Run with:
//!     RUST_LOG=debug cargo run --example render_trail -- [output.png]

use anyhow::Context;
use std::path::PathBuf;
use watercolor_trail::{
    EffectHost, FieldConfig, ManualScheduler, ParticleField, Playback, PointerPath, RasterSurface,
};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let output = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("watercolor_trail.png"));

    println!("Watercolor Trail - Orbit Example");
    println!("================================\n");

    let (width, height) = (800, 600);
    let config = FieldConfig::default();
    println!("Config:\n{}\n", config.to_json()?);

    let field = ParticleField::new(config).context("building particle field")?;
    let mut host = EffectHost::new(field, ManualScheduler::new());
    host.mount(RasterSurface::white(width, height)?);

    // Two laps while the pointer moves, then let the trail settle a little.
    let playback = Playback::new(
        PointerPath::Orbit {
            center: [width as f32 / 2.0, height as f32 / 2.0],
            radius: 180.0,
            period: 240,
        },
        480,
        540,
    );

    println!("Rendering {} frames at {}x{}...", playback.total_frames, width, height);
    let progress: &dyn Fn(f32) = &|p: f32| {
        let frame = (p * playback.total_frames as f32).round() as u32;
        if frame % 60 == 0 {
            println!("  Progress: {:.0}%", p * 100.0);
        }
    };
    let stats = playback.run(&mut host, Some(progress));

    println!("\nStats:\n{}", serde_json::to_string_pretty(&stats)?);

    let surface = host
        .field()
        .surface()
        .context("surface missing after playback")?;
    surface
        .save_png(&output)
        .with_context(|| format!("writing {}", output.display()))?;

    println!("\nDone! Output: {}", output.display());
    Ok(())
}
