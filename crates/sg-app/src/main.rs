use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use sg_core::cancel::CancelToken;
use sg_core::charset::Method;
use sg_core::config::AppConfig;
use sg_core::frame::SourceImage;
use sg_core::geometry::SizeRequest;
use sg_render::animate::AnimationSettings;
use sg_render::output::{save_frame, write_frame};

pub mod cli;
pub mod menu;
pub mod pipeline;

use cli::{Cli, Mode};
use menu::{Menu, Stage, TerminalStage};

/// Largeur par défaut de `--animate`.
const ANIMATE_WIDTH: u32 = 120;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config, puis les overrides CLI
    let config = resolve_config(&cli)?;

    // 4. Charger l'image une seule fois, avant tout menu
    let source = sg_source::image::load_image(&cli.image)
        .with_context(|| format!("❌ Image not found: {}", cli.image.display()))?;

    // 5. Ctrl+C : annule l'animation en cours, sinon quitte
    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || {
        if !handler_token.cancel_if_armed() {
            std::process::exit(130);
        }
    })
    .context("Impossible d'installer le handler Ctrl+C")?;

    match cli.mode() {
        Mode::OneShot => one_shot(&cli, &source, &config),
        Mode::AllProfiles => {
            let written = pipeline::write_profiles(&source, &config, &config.output_dir)?;
            for path in written {
                println!("✅ Saved as {}", path.display());
            }
            Ok(())
        }
        Mode::Animate => {
            let method = cli.method.as_deref().map_or(Method::Balanced, Method::lenient);
            let request = SizeRequest::width(cli.width().unwrap_or(ANIMATE_WIDTH));
            let conversion = pipeline::convert(&source, request, method, &config)?;
            let settings = AnimationSettings::from(&config.animation);
            let summary = TerminalStage::new(cancel).perform(&conversion.frame, &settings)?;
            println!("🎵 Performance ended after {} frames 🎵", summary.frames);
            Ok(())
        }
        Mode::Menu => {
            let (w, h) = source.dimensions();
            println!("🎨 Optimized ASCII Art Generator 🎨");
            println!("Loaded image: {w}x{h} ({})", source.color_mode());
            let stdin = io::stdin();
            let stdout = io::stdout();
            Menu::new(
                &source,
                &config,
                stdin.lock(),
                stdout.lock(),
                TerminalStage::new(cancel),
            )
            .run()
        }
    }
}

/// `--width` / `--method` / `--output` : une conversion, sans menu.
fn one_shot(cli: &Cli, source: &SourceImage, config: &AppConfig) -> Result<()> {
    let method = cli.method.as_deref().map_or(Method::Balanced, Method::lenient);
    let request = cli.width().map(SizeRequest::width).unwrap_or_default();
    let conversion = pipeline::convert(source, request, method, config)?;

    if let Some(ref path) = cli.output {
        save_frame(path, &conversion.frame)?;
        println!("✅ Saved as {}", path.display());
    } else {
        let mut stdout = io::stdout().lock();
        write_frame(&mut stdout, &conversion.frame)?;
        stdout.flush()?;
    }
    Ok(())
}

/// Config file, or defaults when it is missing, then CLI overrides.
fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = if cli.config.exists() {
        sg_core::config::load_config(&cli.config)?
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        AppConfig::default()
    };

    if let Some(fps) = cli.fps {
        config.animation.fps = fps;
    }
    if let Some(duration) = cli.duration {
        config.animation.duration_secs = duration;
    }
    config.clamp_all();
    Ok(config)
}
