use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::charset::Method;
use crate::error::CoreError;
use crate::geometry::GeometryConfig;

/// Largeur maximale acceptée pour un profil ou une demande explicite.
pub const WIDTH_LIMIT: u32 = 1000;

/// Preset nommé `{name, width, method}`.
///
/// Le fichier produit pour un profil s'appelle `ascii_<name>.txt`.
///
/// # Example
/// ```
/// use sg_core::config::QualityProfile;
/// use sg_core::charset::Method;
/// let p = QualityProfile { name: "fast_preview".into(), width: 80, method: Method::Simple };
/// assert_eq!(p.file_name(), "ascii_fast_preview.txt");
/// assert_eq!(p.label(), "Fast Preview");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QualityProfile {
    /// Identifiant snake_case, utilisé pour le nom de fichier.
    pub name: String,
    /// Largeur cible en caractères.
    pub width: u32,
    /// Méthode de quantification (choisit aussi la palette).
    #[serde(default)]
    pub method: Method,
}

impl QualityProfile {
    /// Check that the name is usable as a bare file name: non-empty, ASCII
    /// letters, digits, `_` or `-` only.
    ///
    /// # Errors
    /// Returns `CoreError::Config` naming the offending profile.
    ///
    /// # Example
    /// ```
    /// use sg_core::config::QualityProfile;
    /// use sg_core::charset::Method;
    /// let p = QualityProfile { name: "../etc".into(), width: 80, method: Method::Simple };
    /// assert!(p.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), CoreError> {
        let valid = !self.name.is_empty()
            && self
                .name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if valid {
            Ok(())
        } else {
            Err(CoreError::Config(format!(
                "nom de profil invalide '{}' (lettres, chiffres, '_' ou '-')",
                self.name
            )))
        }
    }

    /// Output file name for this profile.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("ascii_{}.txt", self.name.to_lowercase())
    }

    /// Human-readable title: `balanced_quality` → `Balanced Quality`.
    #[must_use]
    pub fn label(&self) -> String {
        self.name
            .split('_')
            .filter(|w| !w.is_empty())
            .map(|w| {
                let mut chars = w.chars();
                chars.next().map_or_else(String::new, |first| {
                    first.to_uppercase().chain(chars).collect()
                })
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Table des profils par défaut.
#[must_use]
pub fn default_profiles() -> Vec<QualityProfile> {
    vec![
        QualityProfile {
            name: "balanced_quality".into(),
            width: 120,
            method: Method::Balanced,
        },
        QualityProfile {
            name: "fast_preview".into(),
            width: 80,
            method: Method::Simple,
        },
    ]
}

/// Paramètres de l'animation "scène".
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AnimationConfig {
    /// Images par seconde.
    pub fps: u32,
    /// Durée totale en secondes.
    pub duration_secs: u64,
    /// Pause avant la première image, en millisecondes.
    pub intro_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            fps: 10,
            duration_secs: 20,
            intro_ms: 2000,
        }
    }
}

/// Étapes optionnelles du pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Seuillage adaptatif après redimensionnement.
    pub adaptive_threshold: bool,
    /// Côté de la fenêtre locale du seuillage (impair).
    pub threshold_block: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            adaptive_threshold: false,
            threshold_block: 11,
        }
    }
}

/// Configuration complète de l'application.
///
/// # Example
/// ```
/// use sg_core::config::AppConfig;
/// let config = AppConfig::default();
/// assert_eq!(config.animation.fps, 10);
/// assert_eq!(config.profiles.len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppConfig {
    /// Bornes de taille par défaut.
    pub geometry: GeometryConfig,
    /// Animation.
    pub animation: AnimationConfig,
    /// Étapes optionnelles.
    pub pipeline: PipelineConfig,
    /// Dossier où écrire les fichiers texte.
    pub output_dir: PathBuf,
    /// Profils de qualité.
    pub profiles: Vec<QualityProfile>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            geometry: GeometryConfig::default(),
            animation: AnimationConfig::default(),
            pipeline: PipelineConfig::default(),
            output_dir: PathBuf::from("."),
            profiles: default_profiles(),
        }
    }
}

impl AppConfig {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization and CLI overrides.
    pub fn clamp_all(&mut self) {
        self.geometry.max_width = self.geometry.max_width.clamp(1, WIDTH_LIMIT);
        self.geometry.max_height = self.geometry.max_height.clamp(1, 1000);
        self.animation.fps = self.animation.fps.clamp(1, 60);
        self.animation.duration_secs = self.animation.duration_secs.clamp(1, 3600);
        self.animation.intro_ms = self.animation.intro_ms.min(10_000);
        self.pipeline.threshold_block = self.pipeline.threshold_block.clamp(3, 51) | 1;
        for p in &mut self.profiles {
            p.width = p.width.clamp(1, WIDTH_LIMIT);
        }
        if self.profiles.is_empty() {
            self.profiles = default_profiles();
        }
    }

    /// Find a profile by name (case-insensitive).
    #[must_use]
    pub fn profile(&self, name: &str) -> Option<&QualityProfile> {
        self.profiles
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

/// Structure TOML intermédiaire, toutes sections optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    geometry: Option<GeometrySection>,
    animation: Option<AnimationSection>,
    pipeline: Option<PipelineSection>,
    output: Option<OutputSection>,
    profiles: Option<Vec<QualityProfile>>,
}

#[derive(Deserialize)]
struct GeometrySection {
    max_width: Option<u32>,
    max_height: Option<u32>,
}

#[derive(Deserialize)]
struct AnimationSection {
    fps: Option<u32>,
    duration_secs: Option<u64>,
    intro_ms: Option<u64>,
}

#[derive(Deserialize)]
struct PipelineSection {
    adaptive_threshold: Option<bool>,
    threshold_block: Option<u32>,
}

#[derive(Deserialize)]
struct OutputSection {
    directory: Option<PathBuf>,
}

/// Parse une configuration TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the TOML is malformed.
///
/// # Example
/// ```
/// use sg_core::config::parse_config;
/// let config = parse_config("[animation]\nfps = 24\n").unwrap();
/// assert_eq!(config.animation.fps, 24);
/// assert_eq!(config.animation.duration_secs, 20);
/// ```
pub fn parse_config(content: &str) -> Result<AppConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;
    let mut config = AppConfig::default();

    if let Some(g) = file.geometry {
        if let Some(v) = g.max_width {
            config.geometry.max_width = v;
        }
        if let Some(v) = g.max_height {
            config.geometry.max_height = v;
        }
    }
    if let Some(a) = file.animation {
        if let Some(v) = a.fps {
            config.animation.fps = v;
        }
        if let Some(v) = a.duration_secs {
            config.animation.duration_secs = v;
        }
        if let Some(v) = a.intro_ms {
            config.animation.intro_ms = v;
        }
    }
    if let Some(p) = file.pipeline {
        if let Some(v) = p.adaptive_threshold {
            config.pipeline.adaptive_threshold = v;
        }
        if let Some(v) = p.threshold_block {
            config.pipeline.threshold_block = v;
        }
    }
    if let Some(v) = file.output.and_then(|o| o.directory) {
        config.output_dir = v;
    }
    if let Some(v) = file.profiles {
        for profile in &v {
            profile.validate()?;
        }
        config.profiles = v;
    }

    config.clamp_all();
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content)
        .with_context(|| format!("Configuration invalide dans {}", path.display()))
}
