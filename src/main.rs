// particle_editor [scene.toml] [editor.toml]
// Builds a scene through the editor thread and logs what ended up in it.

use std::error::Error;
use std::process::ExitCode;

use particle_editor::app;
use particle_editor::config::EditorConfig;
use particle_editor::edit::{EditEventKind, StructureEditor};
use particle_editor::scene::SceneConfig;

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let scene = match args.next() {
        Some(path) => {
            log::info!("loading scene from {}", path);
            SceneConfig::load_from_file(&path)?
        }
        None => SceneConfig::default(),
    };
    let config = match args.next() {
        Some(path) => EditorConfig::load_from_file(&path)?,
        None => EditorConfig::default(),
    };

    let mut editor = StructureEditor::new(scene.boundary(), config);
    editor.subscribe(|event| {
        if event.kind != EditEventKind::Committed {
            log::info!("{:?} '{}'", event.kind, event.label);
        }
    });
    let (handle, join) = app::spawn(editor)?;
    let summary = scene.apply(&handle)?;

    {
        let snapshot = handle.read_snapshot();
        log::info!(
            "{} / {} particles, {} radial bonds, {} angular bonds, {} molecules, {} obstacles, {} ghosts",
            snapshot.particles.len(),
            snapshot.capacity,
            snapshot.radial.len(),
            snapshot.angular.len(),
            snapshot.molecules.len(),
            snapshot.obstacles.len(),
            snapshot.mirrors.particles.len(),
        );
    }
    if summary.skipped > 0 {
        log::warn!("{} scene items could not be placed", summary.skipped);
    }

    handle.shutdown();
    if join.join().is_err() {
        return Err("editor thread panicked".into());
    }

    #[cfg(feature = "profiling")]
    particle_editor::PROFILER.lock().log_and_clear();

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
