use anyhow::{Context, Result};

use bodygraph::rendering::{LineBatch, SurfaceBatch, SurfaceSampler};
use bodygraph::{BodyEditor, EditorConfig};

const FRAMES: usize = 3;
const SAMPLE_RADIUS: f32 = 1.0;

fn main() -> Result<()> {
    pretty_env_logger::init();

    let mut editor =
        BodyEditor::new(EditorConfig::default()).context("Failed to set up the body editor")?;
    editor.resize(1280, 720);

    let mut lines = LineBatch::new();
    let mut surfaces = SurfaceBatch::new();

    for frame in 0..FRAMES {
        let output = editor
            .frame(&mut lines, &mut surfaces)
            .with_context(|| format!("Failed to draw frame {frame}"))?;

        log::info!(
            "Frame {}: {} lines ({} segments), {} surfaces, camera at {}",
            frame,
            output.stats.lines,
            lines.instances().len(),
            output.stats.surfaces,
            output.uniform.camera_position()
        );

        if output.stats.surfaces > 0 {
            let points = SurfaceSampler::new(SAMPLE_RADIUS)
                .sample(&surfaces, &mut rand::thread_rng())
                .context("Failed to sample the body surface")?;
            log::info!("Frame {}: {} surface samples", frame, points.len());
        }

        editor.add_sphere();
        editor.move_camera().context("Failed to move the camera")?;
    }

    Ok(())
}
