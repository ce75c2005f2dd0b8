//! Hero ambience entry point
//!
//! On the web the library's `start` hook does the setup and pages construct
//! `HeroAmbience` themselves. Natively this runs a scripted pointer sweep
//! through one or every strategy and logs what each one leaves behind.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use hero_ambience::engine::{MotionPreference, SurfaceOutput, SurfaceRect, SurfaceSize};
    use hero_ambience::{AmbientField, FieldSettings, StrategyKind};

    env_logger::init();
    log::info!("Hero ambience (native) starting...");

    // Usage: hero-ambience [canvas|blobs|parallax] [seed]
    let args: Vec<String> = std::env::args().skip(1).collect();
    let kinds = match args.first().map(|s| StrategyKind::parse(s)) {
        Some(Some(kind)) => vec![kind],
        Some(None) => {
            log::warn!("Unknown strategy {:?}, running all", args[0]);
            vec![StrategyKind::Canvas, StrategyKind::Blobs, StrategyKind::Parallax]
        }
        None => vec![StrategyKind::Canvas, StrategyKind::Blobs, StrategyKind::Parallax],
    };
    let seed = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(0xC0FFEE);
    log::info!("Sweeping {} strategies with seed: {}", kinds.len(), seed);

    let surface = SurfaceRect::new(0.0, 0.0, 640.0, 360.0);
    for kind in kinds {
        let settings = FieldSettings::from_preset(kind);
        let mut field = AmbientField::new(&settings, MotionPreference::new(false), seed);
        field.resize(SurfaceSize::from_rect(&surface, 1.0));
        field.set_on_stroke(|n| log::debug!("stroke {}", n));

        // Diagonal sweep, one sample per 16ms frame
        let mut now = 0.0;
        for i in 0..=120 {
            let t = i as f32 / 120.0;
            let client = glam::Vec2::new(40.0 + 560.0 * t, 40.0 + 280.0 * t);
            field.pointer_move(client, Some(surface), now);
            field.frame(now);
            now += 16.0;
        }

        let summary = match field.output() {
            SurfaceOutput::Empty => "nothing drawn".to_string(),
            SurfaceOutput::Painted => "painted off-screen".to_string(),
            SurfaceOutput::Raster(raster) => {
                let painted = raster
                    .as_bytes()
                    .chunks_exact(4)
                    .filter(|px| px[..3] != [255, 255, 255])
                    .count();
                format!("{}x{} raster, {} tinted pixels", raster.width(), raster.height(), painted)
            }
            SurfaceOutput::Blobs(blobs) => format!("{} live blobs", blobs.len()),
            SurfaceOutput::Layers(layers) => format!("{} parallax layers", layers.len()),
        };
        println!("{:>8}: {} strokes, {}", kind.as_str(), field.strokes(), summary);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is the library's start hook
}
