use std::path::PathBuf;

use clap::Parser;
use sg_core::config::WIDTH_LIMIT;

/// stagescii — Image → ASCII art, avec une scène animée dans le terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Image source (PNG, JPEG, BMP, GIF).
    pub image: PathBuf,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Largeur cible en caractères (conversion directe, sans menu).
    #[arg(long)]
    pub width: Option<u32>,

    /// Méthode de conversion : balanced ou simple.
    #[arg(long)]
    pub method: Option<String>,

    /// Fichier de sortie de la conversion directe. Sans lui, l'art va sur stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Générer tous les profils de qualité puis quitter.
    #[arg(long, default_value_t = false)]
    pub all_profiles: bool,

    /// Lancer directement la performance animée.
    #[arg(long, default_value_t = false)]
    pub animate: bool,

    /// Durée de l'animation en secondes.
    #[arg(long)]
    pub duration: Option<u64>,

    /// FPS de l'animation.
    #[arg(long)]
    pub fps: Option<u32>,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// Ce que l'invocation demande.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// `--width`, `--method` ou `--output`.
    OneShot,
    /// `--all-profiles`.
    AllProfiles,
    /// `--animate`.
    Animate,
    /// Aucun des précédents.
    Menu,
}

impl Cli {
    /// `--width`, capped at [`WIDTH_LIMIT`] like the configured profiles.
    /// Zero is kept so the conversion reports it as an invalid dimension.
    #[must_use]
    pub fn width(&self) -> Option<u32> {
        self.width.map(|w| w.min(WIDTH_LIMIT))
    }

    /// Resolve the run mode. `--all-profiles` wins over `--animate`, which
    /// wins over a one-shot conversion.
    #[must_use]
    pub fn mode(&self) -> Mode {
        if self.all_profiles {
            Mode::AllProfiles
        } else if self.animate {
            Mode::Animate
        } else if self.width.is_some() || self.method.is_some() || self.output.is_some() {
            Mode::OneShot
        } else {
            Mode::Menu
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("stagescii").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn image_only_opens_menu() {
        let cli = parse(&["photo.jpg"]);
        assert_eq!(cli.mode(), Mode::Menu);
        assert_eq!(cli.config, PathBuf::from("config/default.toml"));
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn width_triggers_one_shot() {
        let cli = parse(&["photo.jpg", "--width", "80", "--method", "simple"]);
        assert_eq!(cli.mode(), Mode::OneShot);
        assert_eq!(cli.width, Some(80));
        assert_eq!(cli.method.as_deref(), Some("simple"));
    }

    #[test]
    fn all_profiles_takes_precedence() {
        let cli = parse(&["photo.jpg", "--all-profiles", "--animate", "--width", "80"]);
        assert_eq!(cli.mode(), Mode::AllProfiles);
        assert_eq!(parse(&["photo.jpg", "--animate", "-o", "x.txt"]).mode(), Mode::Animate);
    }

    #[test]
    fn width_is_capped() {
        assert_eq!(parse(&["photo.jpg", "--width", "4000000000"]).width(), Some(WIDTH_LIMIT));
        assert_eq!(parse(&["photo.jpg", "--width", "90"]).width(), Some(90));
        assert_eq!(parse(&["photo.jpg", "--width", "0"]).width(), Some(0));
        assert_eq!(parse(&["photo.jpg"]).width(), None);
    }

    #[test]
    fn image_is_required() {
        assert!(Cli::try_parse_from(["stagescii"]).is_err());
    }
}
