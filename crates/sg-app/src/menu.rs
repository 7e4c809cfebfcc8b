//! Menu interactif bloquant sur n'importe quelle paire `BufRead` / `Write`.
//!
//! L'animation passe par le trait [`Stage`] : le terminal réel en production,
//! un enregistreur dans les tests.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::Result;
use sg_core::cancel::CancelToken;
use sg_core::charset::Method;
use sg_core::config::{AppConfig, QualityProfile};
use sg_core::frame::{AsciiFrame, SourceImage};
use sg_core::geometry::SizeRequest;
use sg_render::animate::{AnimationSettings, AnimationSummary, StopReason, play};
use sg_render::output::{clear_screen, save_frame, write_frame};

use crate::pipeline::Converter;

/// Bornes de la largeur personnalisée.
const CUSTOM_WIDTH_MIN: i64 = 50;
const CUSTOM_WIDTH_MAX: i64 = 150;

/// Largeur de la performance animée.
const ANIMATION_WIDTH: u32 = 120;

/// Nom de fichier quand l'utilisateur n'en donne pas.
const DEFAULT_CUSTOM_NAME: &str = "ascii_custom";

/// Où se joue la performance animée.
pub trait Stage {
    /// Play `art` until the duration elapses or the user cancels.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be driven.
    fn perform(
        &mut self,
        art: &AsciiFrame,
        settings: &AnimationSettings,
    ) -> Result<AnimationSummary>;
}

impl<S: Stage + ?Sized> Stage for &mut S {
    fn perform(
        &mut self,
        art: &AsciiFrame,
        settings: &AnimationSettings,
    ) -> Result<AnimationSummary> {
        (**self).perform(art, settings)
    }
}

/// Scène réelle : écran alternatif ratatui, annulable par Ctrl+C.
pub struct TerminalStage {
    cancel: CancelToken,
}

impl TerminalStage {
    /// Stage sharing `cancel` with the Ctrl+C handler.
    #[must_use]
    pub fn new(cancel: CancelToken) -> Self {
        Self { cancel }
    }
}

impl Stage for TerminalStage {
    fn perform(
        &mut self,
        art: &AsciiFrame,
        settings: &AnimationSettings,
    ) -> Result<AnimationSummary> {
        play(art, settings, &self.cancel)
    }
}

/// Entrée du menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Choice {
    /// `1`
    AllProfiles,
    /// `2`
    Balanced,
    /// `3`
    Preview,
    /// `4`
    Animate,
    /// `5`
    Custom,
    /// `6`
    Compare,
    /// `q`
    Quit,
}

impl Choice {
    /// Parse a menu answer, case-insensitive, surrounding spaces ignored.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "1" => Some(Self::AllProfiles),
            "2" => Some(Self::Balanced),
            "3" => Some(Self::Preview),
            "4" => Some(Self::Animate),
            "5" => Some(Self::Custom),
            "6" => Some(Self::Compare),
            "q" => Some(Self::Quit),
            _ => None,
        }
    }
}

enum Flow {
    Continue,
    Quit,
}

/// Menu de qualité.
pub struct Menu<'a, R, W, S> {
    converter: Converter<'a>,
    config: &'a AppConfig,
    input: R,
    output: W,
    stage: S,
}

impl<'a, R: BufRead, W: Write, S: Stage> Menu<'a, R, W, S> {
    /// Build a menu over an already loaded image.
    pub fn new(
        source: &SourceImage,
        config: &'a AppConfig,
        input: R,
        output: W,
        stage: S,
    ) -> Self {
        Self {
            converter: Converter::new(source, config),
            config,
            input,
            output,
            stage,
        }
    }

    /// Boucle jusqu'à `q` ou la fin de l'entrée.
    ///
    /// # Errors
    /// Returns an error if reading the input or writing the output fails.
    pub fn run(&mut self) -> Result<()> {
        loop {
            clear_screen(&mut self.output)?;
            self.banner()?;
            let Some(answer) = self.prompt("\nChoose option: ")? else {
                break;
            };
            let flow = match Choice::parse(&answer) {
                Some(Choice::Quit) => Flow::Quit,
                Some(Choice::AllProfiles) => {
                    self.generate_all()?;
                    self.pause("\n✅ All versions created! Press Enter to continue...")?
                }
                Some(Choice::Balanced) => self.show_profile("balanced_quality")?,
                Some(Choice::Preview) => self.show_profile("fast_preview")?,
                Some(Choice::Animate) => {
                    self.animate()?;
                    self.pause("\nPress Enter to continue...")?
                }
                Some(Choice::Custom) => self.custom()?,
                Some(Choice::Compare) => {
                    writeln!(self.output, "Generating comparison versions...")?;
                    let count = self.generate_all()?;
                    writeln!(self.output, "✅ Created {count} versions for comparison")?;
                    self.pause("Press Enter to continue...")?
                }
                None => {
                    log::debug!("Choix de menu ignoré : {answer:?}");
                    Flow::Continue
                }
            };
            if matches!(flow, Flow::Quit) {
                break;
            }
        }
        Ok(())
    }

    fn banner(&mut self) -> Result<()> {
        writeln!(self.output, "🎨 Optimized ASCII Art Generator 🎨")?;
        writeln!(self.output, "{}", "=".repeat(50))?;
        writeln!(self.output, "1. Generate All Quality Versions")?;
        for (i, name) in ["balanced_quality", "fast_preview"].iter().enumerate() {
            let profile = self.profile(name);
            let (label, width) = (profile.label(), profile.width);
            writeln!(self.output, "{}. {label} ({width} chars wide)", i + 2)?;
        }
        writeln!(self.output, "4. Animated Performance ({ANIMATION_WIDTH} chars)")?;
        writeln!(self.output, "5. Custom Settings")?;
        writeln!(self.output, "6. Compare Side by Side")?;
        writeln!(self.output, "q. Quit")?;
        Ok(())
    }

    /// Writes `text`, then reads one line. `None` at end of input.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    fn pause(&mut self, text: &str) -> Result<Flow> {
        Ok(match self.prompt(text)? {
            Some(_) => Flow::Continue,
            None => Flow::Quit,
        })
    }

    /// Configured profile, or the built-in one of the same name.
    fn profile(&self, name: &str) -> QualityProfile {
        self.config.profile(name).cloned().unwrap_or_else(|| {
            let (width, method) = if name == "fast_preview" {
                (80, Method::Simple)
            } else {
                (120, Method::Balanced)
            };
            QualityProfile {
                name: name.to_string(),
                width,
                method,
            }
        })
    }

    fn convert(&mut self, width: u32, method: Method) -> AsciiFrame {
        self.converter.convert_or_empty(SizeRequest::width(width), method)
    }

    /// Saves `frame`; a failure is reported and the menu carries on.
    fn save(&mut self, path: &Path, frame: &AsciiFrame) -> Result<bool> {
        match save_frame(path, frame) {
            Ok(()) => {
                writeln!(self.output, "✅ Saved as {}", path.display())?;
                Ok(true)
            }
            Err(e) => {
                log::error!("Sauvegarde : {e:#}");
                writeln!(self.output, "❌ Error: {e}")?;
                Ok(false)
            }
        }
    }

    /// Generates and saves every profile. Returns how many were written.
    fn generate_all(&mut self) -> Result<usize> {
        let config = self.config;
        let mut written = 0;
        for profile in &config.profiles {
            writeln!(self.output, "\n🎨 Creating {}...", profile.label())?;
            let frame = self.convert(profile.width, profile.method);
            if frame.is_empty() {
                continue;
            }
            let path = config.output_dir.join(profile.file_name());
            if self.save(&path, &frame)? {
                written += 1;
            }
        }
        Ok(written)
    }

    fn show_profile(&mut self, name: &str) -> Result<Flow> {
        let profile = self.profile(name);
        let frame = self.convert(profile.width, profile.method);
        if frame.is_empty() {
            return Ok(Flow::Continue);
        }
        clear_screen(&mut self.output)?;
        write_frame(&mut self.output, &frame)?;
        self.pause("\nPress Enter to continue...")
    }

    fn animate(&mut self) -> Result<()> {
        writeln!(self.output, "🎤 Creating clean animated ASCII singer...")?;
        let frame = self.convert(ANIMATION_WIDTH, Method::Balanced);
        if frame.is_empty() {
            writeln!(self.output, "❌ Failed to generate ASCII art")?;
            return Ok(());
        }
        writeln!(
            self.output,
            "✅ Generated clean ASCII art: {}x{}",
            frame.width(),
            frame.height()
        )?;
        writeln!(self.output, "🎵 Starting smooth performance...")?;
        self.output.flush()?;

        let settings = AnimationSettings::from(&self.config.animation);
        match self.stage.perform(&frame, &settings) {
            Ok(summary) if summary.stop == StopReason::Cancelled => {
                let frames = summary.frames;
                writeln!(self.output, "\n🎵 Performance interrupted after {frames} frames")?;
            }
            Ok(_) => writeln!(self.output, "🎵 Performance ended! Clean ASCII art rocks! 🎵")?,
            Err(e) => {
                log::error!("Animation : {e:#}");
                writeln!(self.output, "❌ Error: {e}")?;
            }
        }
        Ok(())
    }

    fn custom(&mut self) -> Result<Flow> {
        let width = loop {
            let Some(answer) = self.prompt("Enter width (50-150): ")? else {
                return Ok(Flow::Quit);
            };
            match answer.trim().parse::<i64>() {
                Ok(w) => break w.clamp(CUSTOM_WIDTH_MIN, CUSTOM_WIDTH_MAX) as u32,
                Err(_) => writeln!(self.output, "Invalid input! Please enter a number.")?,
            }
        };
        let Some(answer) = self.prompt("Method (balanced/simple) [balanced]: ")? else {
            return Ok(Flow::Quit);
        };
        let method = Method::lenient(&answer);

        let frame = self.convert(width, method);
        if frame.is_empty() {
            return Ok(Flow::Continue);
        }
        clear_screen(&mut self.output)?;
        write_frame(&mut self.output, &frame)?;

        let Some(save) = self.prompt("\nSave this version? (y/n): ")? else {
            return Ok(Flow::Quit);
        };
        if save.trim().eq_ignore_ascii_case("y") {
            let Some(name) = self.prompt("Enter filename (without .txt): ")? else {
                return Ok(Flow::Quit);
            };
            let name = match name.trim() {
                "" => DEFAULT_CUSTOM_NAME,
                other => other,
            };
            let path = self.config.output_dir.join(format!("{name}.txt"));
            self.save(&path, &frame)?;
        }
        self.pause("Press Enter to continue...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sg_core::frame::LumaFrame;
    use sg_render::output::load_frame;

    use crate::pipeline::convert;

    #[derive(Default)]
    struct Recorder {
        shows: Vec<(usize, usize)>,
    }

    impl Stage for Recorder {
        fn perform(&mut self, art: &AsciiFrame, _: &AnimationSettings) -> Result<AnimationSummary> {
            self.shows.push((art.width(), art.height()));
            Ok(AnimationSummary {
                frames: 3,
                stop: StopReason::Finished,
            })
        }
    }

    fn source() -> SourceImage {
        let data = (0..200u32 * 100).map(|i| (i % 200) as u8).collect();
        SourceImage::Luma(LumaFrame::from_raw(200, 100, data).unwrap())
    }

    fn config_in(dir: &std::path::Path) -> AppConfig {
        AppConfig {
            output_dir: dir.to_path_buf(),
            ..AppConfig::default()
        }
    }

    /// Runs the menu on `input`, returns what it printed and what it played.
    fn run(config: &AppConfig, input: &str) -> (String, Vec<(usize, usize)>) {
        let source = source();
        let mut out = Vec::new();
        let mut stage = Recorder::default();
        Menu::new(&source, config, input.as_bytes(), &mut out, &mut stage)
            .run()
            .unwrap();
        (String::from_utf8(out).unwrap(), stage.shows)
    }

    #[test]
    fn choices_parse() {
        assert_eq!(Choice::parse(" Q "), Some(Choice::Quit));
        assert_eq!(Choice::parse("6"), Some(Choice::Compare));
        assert_eq!(Choice::parse("7"), None);
        assert_eq!(Choice::parse(""), None);
    }

    #[test]
    fn quit_and_eof_both_end_the_loop() {
        let (out, _) = run(&AppConfig::default(), "q\n");
        assert!(out.contains("🎨 Optimized ASCII Art Generator 🎨"));
        assert!(out.contains("2. Balanced Quality (120 chars wide)"));
        assert!(out.contains("3. Fast Preview (80 chars wide)"));
        let (out, _) = run(&AppConfig::default(), "");
        assert!(out.ends_with("Choose option: "));
    }

    #[test]
    fn unknown_choice_redraws_menu() {
        let (out, _) = run(&AppConfig::default(), "9\nq\n");
        assert_eq!(out.matches("Choose option: ").count(), 2);
    }

    #[test]
    fn balanced_choice_prints_the_art() {
        let config = AppConfig::default();
        let (out, _) = run(&config, "2\n\nq\n");
        let request = SizeRequest::width(120);
        let expected = convert(&source(), request, Method::Balanced, &config).unwrap();
        assert_eq!(expected.frame.height(), 27);
        assert!(out.contains(&expected.frame.to_text()));
    }

    #[test]
    fn animation_goes_through_the_stage() {
        let (out, shows) = run(&AppConfig::default(), "4\n\nq\n");
        assert_eq!(shows, vec![(120, 27)]);
        assert!(out.contains("✅ Generated clean ASCII art: 120x27"));
        assert!(out.contains("Performance ended!"));
    }

    #[test]
    fn all_profiles_are_saved() {
        let dir = tempfile::tempdir().unwrap();
        let (out, _) = run(&config_in(dir.path()), "1\n\nq\n");
        assert!(out.contains("🎨 Creating Balanced Quality..."));
        assert!(dir.path().join("ascii_balanced_quality.txt").exists());
        assert!(dir.path().join("ascii_fast_preview.txt").exists());
    }

    #[test]
    fn compare_reports_count() {
        let dir = tempfile::tempdir().unwrap();
        let (out, _) = run(&config_in(dir.path()), "6\n\nq\n");
        assert!(out.contains("✅ Created 2 versions for comparison"));
    }

    #[test]
    fn custom_reprompts_on_bad_width_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let (out, _) = run(&config_in(dir.path()), "5\nabc\n60\nsimple\ny\nmine\n\nq\n");
        assert!(out.contains("Invalid input!"));
        let saved = load_frame(&dir.path().join("mine.txt")).unwrap();
        assert_eq!(saved.width(), 60);
        assert_eq!(saved.height(), 13);
        let palette = Method::Simple.palette();
        assert!(saved.rows().iter().flat_map(|r| r.chars()).all(|c| palette.contains(c)));
    }

    #[test]
    fn failed_save_returns_to_menu() {
        let dir = tempfile::tempdir().unwrap();
        let (out, _) = run(&config_in(dir.path()), "5\n60\n\ny\nmissing/sub/name\n\nq\n");
        assert!(out.contains("❌ Error:"));
        assert!(!out.contains("✅ Saved as"));
        assert_eq!(out.matches("Choose option: ").count(), 2);
    }

    #[test]
    fn failed_profile_save_is_not_counted() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir.path().join("absent"));
        let (out, _) = run(&config, "6\n\nq\n");
        assert!(out.contains("✅ Created 0 versions for comparison"));
        assert_eq!(out.matches("❌ Error:").count(), 2);
        assert_eq!(out.matches("Choose option: ").count(), 2);
    }

    #[test]
    fn custom_width_is_clamped_and_default_name_used() {
        let dir = tempfile::tempdir().unwrap();
        run(&config_in(dir.path()), "5\n400\n\ny\n\n\nq\n");
        let saved = load_frame(&dir.path().join("ascii_custom.txt")).unwrap();
        assert_eq!(saved.width(), 150);

        let dir = tempfile::tempdir().unwrap();
        run(&config_in(dir.path()), "5\n-3\nbogus\nn\n\nq\n");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn eof_inside_custom_quits() {
        let (out, _) = run(&AppConfig::default(), "5\n");
        assert_eq!(out.matches("Choose option: ").count(), 1);
        assert!(out.ends_with("Enter width (50-150): "));
    }
}
