//! Headless rendering tasks for VOID ENGINE
//!
//! Usage:
//!   cargo run -p xtask -- snapshot --scene showcase --mode solid --frames 90
//!   cargo run -p xtask -- dump-frame --out frame.bin
//!   cargo run -p xtask -- write-config --out engine.ron

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use void_engine::display::{save_png, FrameCapture};
use void_engine::input::NoInput;
use void_engine::rasterizer::{ByteOrder, RenderMode};
use void_engine::{create_scene, Engine, EngineConfig, SceneKind};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Headless rendering tasks for VOID ENGINE")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by the rendering commands
#[derive(Args)]
struct RenderArgs {
    /// RON config file (defaults are used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Scene to load, overriding the config
    #[arg(long)]
    scene: Option<SceneKind>,
    /// Render mode, overriding the config
    #[arg(long)]
    mode: Option<RenderMode>,
    /// Fixed-dt frames to simulate before capturing
    #[arg(long, default_value_t = 60)]
    frames: u32,
}

#[derive(Subcommand)]
enum Commands {
    /// Render headlessly and save the final frame as PNG
    Snapshot {
        #[command(flatten)]
        render: RenderArgs,
        #[arg(long, default_value = "target/snapshot.png")]
        out: PathBuf,
    },
    /// Render headlessly and write the final frame's RGB565 bus payload
    DumpFrame {
        #[command(flatten)]
        render: RenderArgs,
        #[arg(long, default_value = "target/frame.bin")]
        out: PathBuf,
        /// Write little-endian pixels instead of the config's byte order
        #[arg(long)]
        little_endian: bool,
    },
    /// Write the default config as RON
    WriteConfig {
        #[arg(long, default_value = "engine.ron")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Snapshot { render, out } => snapshot(&render, &out),
        Commands::DumpFrame { render, out, little_endian } => dump_frame(&render, &out, little_endian),
        Commands::WriteConfig { out } => write_config(&out),
    }
}

fn load_config(args: &RenderArgs) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(scene) = args.scene {
        config.scene = scene;
    }
    if let Some(mode) = args.mode {
        config.start_mode = mode;
    }
    Ok(config)
}

/// Build an engine on a frame capture and run it for `args.frames`
fn render(args: &RenderArgs, order: Option<ByteOrder>) -> Result<Engine<FrameCapture, NoInput>> {
    let config = load_config(args)?;
    let capture = FrameCapture::new(config.width, config.height, order.unwrap_or(config.byte_order));
    let scene = create_scene(config.scene);

    let mut engine = Engine::init(config, scene, capture, NoInput).context("Failed to start engine")?;
    // At least one frame so there is something to save
    let stats = engine.run_fixed(args.frames.max(1));

    println!(
        "Rendered {} frames of '{}' ({}): {} entities, {} faces, {} culled, {} edges",
        engine.frames_drawn(),
        engine.scene_name(),
        engine.mode().label(),
        stats.entities_drawn,
        stats.faces_drawn,
        stats.faces_culled,
        stats.edges_drawn,
    );
    if engine.dropped_frames() > 0 {
        anyhow::bail!("{} frames were dropped", engine.dropped_frames());
    }
    Ok(engine)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Ok(())
}

fn snapshot(args: &RenderArgs, out: &Path) -> Result<()> {
    let engine = render(args, None)?;
    ensure_parent(out)?;
    save_png(engine.framebuffer(), out).with_context(|| format!("Failed to write {}", out.display()))?;
    println!("Saved {}", out.display());
    Ok(())
}

fn dump_frame(args: &RenderArgs, out: &Path, little_endian: bool) -> Result<()> {
    let order = little_endian.then_some(ByteOrder::LittleEndian);
    let engine = render(args, order)?;
    let payload = engine.display().last_frame();
    ensure_parent(out)?;
    std::fs::write(out, payload).with_context(|| format!("Failed to write {}", out.display()))?;
    let capture = engine.display();
    println!(
        "Wrote {} bytes ({} transfers per frame) to {}",
        payload.len(),
        capture.chunks_sent() / capture.frames_presented().max(1),
        out.display()
    );
    Ok(())
}

fn write_config(out: &Path) -> Result<()> {
    let text = EngineConfig::default().to_ron_string()?;
    ensure_parent(out)?;
    std::fs::write(out, text).with_context(|| format!("Failed to write {}", out.display()))?;
    println!("Wrote {}", out.display());
    Ok(())
}
