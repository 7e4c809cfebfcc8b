//! Décor de scène autour de l'art ASCII : en-tête, projecteurs, plancher
//! rythmé et ligne de notes. Fonctions pures du numéro de frame.

use sg_core::frame::AsciiFrame;

/// Notes qui défilent, indexées par `frame % 4`.
pub const MUSIC_NOTES: [&str; 4] = ["♪", "♫", "♬", "🎵"];

/// Texte central du plancher.
const FLOOR_LABEL: &str = " ♪ LIVE ♪ ";

/// `🎤═══…═══🎤`.
///
/// # Example
/// ```
/// use sg_render::stage::header;
/// assert_eq!(header(8), "🎤════🎤");
/// ```
#[must_use]
pub fn header(width: usize) -> String {
    format!("🎤{}🎤", "═".repeat(width.saturating_sub(4)))
}

/// Projecteurs : quatre phases qui se resserrent vers le centre.
#[must_use]
pub fn stage_lights(frame: u64, width: usize) -> String {
    match frame % 4 {
        0 => format!("✨{}✨", " ".repeat(width.saturating_sub(4))),
        1 => format!(" ⭐{}⭐ ", " ".repeat(width.saturating_sub(6))),
        2 => format!("  ✦{}✦  ", " ".repeat(width.saturating_sub(8))),
        _ => format!("   ✧{}✧   ", " ".repeat(width.saturating_sub(10))),
    }
}

/// Largeur des barres du plancher : `⌊3 + 2·|sin(0.3·frame)|⌋`, entre 3 et 5.
#[must_use]
pub fn beat_width(frame: u64) -> usize {
    (3.0 + 2.0 * (frame as f64 * 0.3).sin().abs()) as usize
}

/// Plancher `═══ ♪ LIVE ♪ ═══`, centré ou tronqué à `width` caractères.
///
/// # Example
/// ```
/// use sg_render::stage::stage_floor;
/// assert_eq!(stage_floor(0, 16), "═══ ♪ LIVE ♪ ═══");
/// assert_eq!(stage_floor(0, 20), "  ═══ ♪ LIVE ♪ ═══  ");
/// ```
#[must_use]
pub fn stage_floor(frame: u64, width: usize) -> String {
    let bar = "═".repeat(beat_width(frame));
    let floor = format!("{bar}{FLOOR_LABEL}{bar}");
    let len = floor.chars().count();
    if len > width {
        floor.chars().take(width).collect()
    } else {
        let pad = " ".repeat((width - len) / 2);
        format!("{pad}{floor}{pad}")
    }
}

/// Ligne de notes : une note toutes les 4 cases de 6, qui glisse d'une case par frame.
#[must_use]
pub fn music_notes(frame: u64, width: usize) -> String {
    let note = MUSIC_NOTES[(frame % 4) as usize];
    let mut line = String::new();
    for i in 0..(width / 6) as u64 {
        if (i + frame) % 4 == 0 {
            line.push_str(note);
            line.push_str("     ");
        } else {
            line.push_str("      ");
        }
    }
    line.chars().take(width).collect()
}

/// Ligne d'état sous la scène.
#[must_use]
pub fn status_line(elapsed_secs: u64, remaining_secs: u64, frame: u64) -> String {
    format!("⏱️  Performance: {elapsed_secs}s | Remaining: {remaining_secs}s | Frame: {frame}")
}

/// Assemble une frame complète : en-tête, projecteurs, art, plancher, notes.
///
/// # Example
/// ```
/// use sg_core::frame::AsciiFrame;
/// use sg_render::stage::compose;
/// let art = AsciiFrame::from_rows(vec!["@@@@@@@@@@@@".into(); 3]).unwrap();
/// let lines = compose(&art, 0);
/// assert_eq!(lines.len(), 3 + 4);
/// assert_eq!(lines[2], "@@@@@@@@@@@@");
/// ```
#[must_use]
pub fn compose(art: &AsciiFrame, frame: u64) -> Vec<String> {
    let width = art.width();
    let mut lines = Vec::with_capacity(art.height() + 4);
    lines.push(header(width));
    lines.push(stage_lights(frame, width));
    lines.extend(art.rows().iter().cloned());
    lines.push(stage_floor(frame, width));
    lines.push(music_notes(frame, width));
    lines
}
