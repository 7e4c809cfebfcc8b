use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::text::{Line, Text};
use ratatui::widgets::Paragraph;
use sg_core::cancel::CancelToken;
use sg_core::config::AnimationConfig;
use sg_core::frame::AsciiFrame;

use crate::stage;

/// Granularité max d'une attente ; borne la latence de réaction à l'annulation.
const POLL_SLICE: Duration = Duration::from_millis(50);

/// Paramètres d'une représentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationSettings {
    /// Images par seconde.
    pub fps: u32,
    /// Durée totale.
    pub duration: Duration,
    /// Pause avant l'entrée dans l'écran alternatif.
    pub intro: Duration,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self::from(&AnimationConfig::default())
    }
}

impl From<&AnimationConfig> for AnimationSettings {
    fn from(config: &AnimationConfig) -> Self {
        Self {
            fps: config.fps.max(1),
            duration: Duration::from_secs(config.duration_secs),
            intro: Duration::from_millis(config.intro_ms),
        }
    }
}

impl AnimationSettings {
    /// Budget d'une frame.
    #[must_use]
    pub fn frame_budget(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps.max(1)))
    }
}

/// État local d'une représentation : compteur de frames et instant de départ.
#[derive(Clone, Copy, Debug)]
pub struct AnimationState {
    /// Frames déjà affichées.
    pub frame: u64,
    /// Début de la représentation.
    pub started: Instant,
}

impl AnimationState {
    /// Start counting now.
    #[must_use]
    pub fn start() -> Self {
        Self {
            frame: 0,
            started: Instant::now(),
        }
    }

    /// Wall-clock time since [`AnimationState::start`].
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Pourquoi la boucle s'est arrêtée.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// Durée écoulée.
    Finished,
    /// Ctrl+C, `q` ou `Esc`.
    Cancelled,
}

/// Bilan d'une représentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationSummary {
    /// Nombre de frames dessinées.
    pub frames: u64,
    /// Cause de l'arrêt.
    pub stop: StopReason,
}

/// Lignes complètes d'une frame : scène + ligne d'état.
#[must_use]
pub fn frame_lines(art: &AsciiFrame, state: &AnimationState, total: Duration) -> Vec<String> {
    let elapsed = state.elapsed().as_secs();
    let remaining = total.as_secs().saturating_sub(elapsed);
    let mut lines = stage::compose(art, state.frame);
    lines.push(String::new());
    lines.push(stage::status_line(elapsed, remaining, state.frame));
    lines
}

/// Boucle d'animation à cadence fixe. L'intro n'en fait pas partie, voir [`play`].
///
/// `poll_input` attend au plus la durée donnée et renvoie `true` si
/// l'utilisateur demande l'arrêt. Le jeton est vérifié à chaque frame et
/// pendant les attentes.
///
/// # Errors
/// Returns an error if drawing fails or `poll_input` fails.
pub fn run_animation<B, F>(
    terminal: &mut Terminal<B>,
    art: &AsciiFrame,
    settings: &AnimationSettings,
    cancel: &CancelToken,
    mut poll_input: F,
) -> Result<AnimationSummary>
where
    B: Backend,
    F: FnMut(Duration) -> Result<bool>,
{
    if art.is_empty() {
        return Err(anyhow!("Rien à animer : frame ASCII vide"));
    }

    let budget = settings.frame_budget();
    let mut state = AnimationState::start();
    let mut stop = StopReason::Finished;

    while state.elapsed() < settings.duration {
        if cancel.is_cancelled() {
            stop = StopReason::Cancelled;
            break;
        }
        let tick = Instant::now();

        let lines = frame_lines(art, &state, settings.duration);
        let text = Text::from(lines.into_iter().map(Line::from).collect::<Vec<_>>());
        terminal
            .draw(|frame| frame.render_widget(Paragraph::new(text), frame.area()))
            .map_err(|e| anyhow!("Échec du rendu : {e}"))?;
        state.frame += 1;

        if wait_until(tick + budget, cancel, &mut poll_input)? {
            stop = StopReason::Cancelled;
            break;
        }
    }

    log::info!("Animation terminée : {} frames ({stop:?})", state.frame);
    Ok(AnimationSummary {
        frames: state.frame,
        stop,
    })
}

/// Attend jusqu'à `deadline` en restant réactif. `true` si annulé.
fn wait_until<F>(deadline: Instant, cancel: &CancelToken, poll_input: &mut F) -> Result<bool>
where
    F: FnMut(Duration) -> Result<bool>,
{
    loop {
        if cancel.is_cancelled() {
            return Ok(true);
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(false);
        }
        if poll_input((deadline - now).min(POLL_SLICE))? {
            cancel.cancel();
            return Ok(true);
        }
    }
}

/// `q`, `Esc` ou `Ctrl+C` (le mode raw ne génère pas de SIGINT).
#[must_use]
pub fn is_quit_key(key: &KeyEvent) -> bool {
    key.kind == KeyEventKind::Press
        && (matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)))
}

/// Lit les événements clavier crossterm pendant au plus `timeout`.
///
/// # Errors
/// Returns an error if the terminal event queue cannot be read.
pub fn poll_quit_key(timeout: Duration) -> Result<bool> {
    if !event::poll(timeout)? {
        return Ok(false);
    }
    Ok(matches!(event::read()?, Event::Key(key) if is_quit_key(&key)))
}

/// Pause d'intro sur l'écran normal. `true` si Ctrl+C l'a interrompue.
///
/// # Errors
/// Only errors from the shared wait loop; sleeping itself cannot fail.
pub fn intro_wait(intro: Duration, cancel: &CancelToken) -> Result<bool> {
    wait_until(Instant::now() + intro, cancel, &mut |d| {
        std::thread::sleep(d);
        Ok(false)
    })
}

/// Intro sur l'écran normal, puis animation dans l'écran alternatif.
///
/// Le terminal est restauré même si la boucle échoue.
///
/// # Errors
/// Returns the loop's error after restoring the terminal.
pub fn play(
    art: &AsciiFrame,
    settings: &AnimationSettings,
    cancel: &CancelToken,
) -> Result<AnimationSummary> {
    let _armed = cancel.arm();
    if intro_wait(settings.intro, cancel)? {
        return Ok(AnimationSummary {
            frames: 0,
            stop: StopReason::Cancelled,
        });
    }
    let mut terminal = ratatui::init();
    let result = run_animation(&mut terminal, art, settings, cancel, poll_quit_key);
    ratatui::restore();
    result
}
