mod config;
mod session;

use {
    self::{config::Config, session::MockSession},
    bodyrig::{Bone, Engine, Global3, Local3, Renderable},
    color_eyre::Report,
    std::time::{Duration, Instant},
    tracing_subscriber::{
        fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
        EnvFilter,
    },
};

fn main() -> Result<(), Report> {
    install_tracing();
    color_eyre::install()?;

    tracing::info!("Running at {}", std::env::current_dir()?.display());
    let config = Config::load_default()?;
    tracing::info!("Config loaded: {:?}", config);

    let viewer = config.viewer.clone();
    let mut engine = Engine::new(config.engine.skeleton);
    let mut session = MockSession::new(config.viewer);

    let frame_time = Duration::from_secs_f32(1.0 / viewer.fps.max(1.0));
    let report_every = viewer.report_every.max(1);
    let started = Instant::now();

    for _ in 0..viewer.frames {
        let frame_start = Instant::now();
        let frame = session.next_frame();

        if !frame.removed.is_empty() {
            engine.session_did_remove(&frame.removed);
        }
        if !frame.updated.is_empty() {
            engine.session_did_update(&frame.updated);
        }
        engine.advance();

        if frame.index % report_every == 0 {
            report(&engine, frame.index);
        }

        if viewer.realtime {
            if let Some(left) = frame_time.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(left);
            }
        }
    }

    let elapsed = started.elapsed();
    tracing::info!(
        "Played {} frames in {:.3}s ({:.1} us per frame)",
        viewer.frames,
        elapsed.as_secs_f32(),
        elapsed.as_secs_f32() * 1e6 / viewer.frames.max(1) as f32,
    );

    Ok(())
}

fn install_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(tracing_error::ErrorLayer::default())
        .init();
}

fn report(engine: &Engine, index: u32) {
    let skeleton = match engine.overlay.skeleton() {
        Some(skeleton) => skeleton,
        None => {
            tracing::info!("Frame {}: no body tracked", index);
            return;
        }
    };

    let mut primitives = 0;
    let mut visible = 0;
    let mut triangles = 0;
    for (_, renderable) in engine.world.query::<&Renderable>().iter() {
        primitives += 1;
        if renderable.visible {
            visible += 1;
            triangles += renderable.mesh.triangle_count();
        }
    }

    let hips = skeleton
        .joint("hips_joint")
        .and_then(|entity| engine.world.get::<Global3>(entity).ok())
        .map(|global| global.position());

    let upper_arm = skeleton
        .bone(Bone::LeftArmToLeftForearm)
        .and_then(|entity| engine.world.get::<Local3>(entity).ok())
        .map(|local| local.scale.z);

    tracing::info!(
        "Frame {}: body {:?}, {} primitives ({} visible, {} triangles), \
         hips at {:?}, left upper arm {:?}m",
        index,
        skeleton.anchor(),
        primitives,
        visible,
        triangles,
        hips.map(|p| [p.x, p.y, p.z]),
        upper_arm,
    );
}
