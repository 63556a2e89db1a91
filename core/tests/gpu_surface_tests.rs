//! Integration tests for the GPU drawing surface.
//!
//! Every test skips when no adapter is available.

use rand::rngs::StdRng;
use rand::SeedableRng;
use watercolor_trail::gpu::GpuSurface;
use watercolor_trail::{
    DrawSurface, EffectHost, FieldConfig, ManualScheduler, ParticleField, Playback, PointerPath,
    RasterSurface,
};

async fn create_gpu_surface(width: u32, height: u32) -> Option<GpuSurface> {
    match GpuSurface::white(width, height).await {
        Ok(surface) => Some(surface),
        Err(e) => {
            eprintln!("Skipping test - GPU not available: {}", e);
            None
        }
    }
}

fn tinted_pixels(pixels: &[u8]) -> usize {
    pixels
        .chunks_exact(4)
        .filter(|px| px[0] < 240 || px[1] < 240 || px[2] < 240)
        .count()
}

#[tokio::test]
async fn test_field_renders_on_gpu() {
    let Some(surface) = create_gpu_surface(320, 240).await else {
        return;
    };
    let field =
        ParticleField::with_rng(FieldConfig::default(), StdRng::seed_from_u64(11)).unwrap();
    let mut host = EffectHost::new(field, ManualScheduler::new());
    host.mount(surface);

    Playback::new(PointerPath::Line { from: [40.0, 120.0], to: [280.0, 120.0] }, 40, 40)
        .run(&mut host, None);

    let surface = host.field_mut().surface_mut().unwrap();
    let pixels = surface.read_pixels().unwrap();
    assert_eq!(pixels.len(), 320 * 240 * 4);
    assert!(tinted_pixels(&pixels) > 0, "trail should be visible on the GPU canvas");
}

#[tokio::test]
async fn test_gpu_trail_washes_out() {
    let Some(surface) = create_gpu_surface(128, 128).await else {
        return;
    };
    let field =
        ParticleField::with_rng(FieldConfig::default(), StdRng::seed_from_u64(12)).unwrap();
    let mut host = EffectHost::new(field, ManualScheduler::new());
    host.mount(surface);

    Playback::new(PointerPath::Still { x: 64.0, y: 64.0 }, 10, 10).run(&mut host, None);
    host.pump(400);

    assert!(host.field().particles().is_empty());
    let pixels = host.field_mut().surface_mut().unwrap().read_pixels().unwrap();
    assert_eq!(tinted_pixels(&pixels), 0);
}

#[tokio::test]
async fn test_gpu_and_raster_agree_on_coverage() {
    let Some(mut gpu) = create_gpu_surface(64, 64).await else {
        return;
    };
    let mut raster = RasterSurface::white(64, 64).unwrap();

    let particle = watercolor_trail::Particle::new(
        [32.0, 32.0],
        [0.0, 0.0],
        20.0,
        0.8,
        watercolor_trail::Rgb::new(0x17, 0x81, 0xD9),
    );
    let paint = particle.paint();
    gpu.fill_arc(particle.position, particle.radius, &paint);
    gpu.present();
    raster.fill_arc(particle.position, particle.radius, &paint);

    let gpu_pixels = gpu.read_pixels().unwrap();
    let raster_pixels = raster.as_raw();
    // Center pixel within a small rasterization tolerance.
    let i = (32 * 64 + 32) * 4;
    for c in 0..3 {
        let diff = (gpu_pixels[i + c] as i32 - raster_pixels[i + c] as i32).abs();
        assert!(diff <= 8, "channel {c} differs by {diff}");
    }
    // Outside the circle both stay white.
    assert!(gpu_pixels[..4].iter().all(|&p| p > 250));
    assert!(raster_pixels[..4].iter().all(|&p| p > 250));
}
