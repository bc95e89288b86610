//! # SnapAura
//!
//! Command-line entry point.

use aura_core::presets::{browser_frames, GRADIENT_PRESETS, SHADOW_PRESETS, TEXT_SHADOW_PRESETS};
use aura_core::search_emoji;
use aura_renderer::ResvgRasterizer;
use clap::Parser;
use snapaura::{CliArgs, Command, RenderConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured tracing with optional JSON format.
///
/// Set `RUST_LOG` to control log levels.
/// Set `RUST_LOG_FORMAT=json` for JSON output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("snapaura=info,aura_core=info,aura_renderer=info,aura_services=info")
    });

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let services = args.service_config();

    match args.command {
        Command::Render(render) => {
            let config = RenderConfig::from(render);
            let rasterizer = ResvgRasterizer::new();
            let exported = tokio::task::spawn_blocking(move || {
                snapaura::render(&config, &rasterizer)
                    .map(|image| image.map(|image| (config.output_dir.join(&image.file_name), image)))
            })
            .await??;
            match exported {
                Some((path, image)) => {
                    println!("{} ({}x{})", path.display(), image.width, image.height);
                }
                None => tracing::warn!("Nothing to export"),
            }
        }
        Command::Search(search) => {
            for result in snapaura::search(&services, &search).await? {
                println!("{}\t{}", result.id, result.full_url);
            }
        }
        Command::Emoji { query } => {
            for entry in search_emoji(query.as_deref().unwrap_or_default()) {
                println!("{}\t{}", entry.emoji, entry.name);
            }
        }
        Command::Presets => print_presets(),
        Command::Account(account) => {
            println!("{}", snapaura::account(&services, account).await?);
        }
    }

    Ok(())
}

fn print_presets() {
    println!("Gradients:");
    for preset in &GRADIENT_PRESETS {
        println!("  {}\t{} -> {}", preset.name, preset.start, preset.end);
    }
    println!("Shadows:");
    for preset in &SHADOW_PRESETS {
        println!("  {}\t{}", preset.name, preset.value);
    }
    println!("Text shadows:");
    for preset in &TEXT_SHADOW_PRESETS {
        println!("  {}\t{}", preset.name, preset.value);
    }
    println!("Frames:");
    for frame in browser_frames() {
        println!("  {}\t{}", frame.kind, frame.name);
    }
}
