use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use crossterm::cursor::MoveTo;
use crossterm::terminal::{Clear, ClearType};
use sg_core::frame::AsciiFrame;

/// Écrit chaque ligne suivie d'un saut de ligne.
///
/// # Errors
/// Propagates I/O errors from `out`.
///
/// # Example
/// ```
/// use sg_core::frame::AsciiFrame;
/// use sg_render::output::write_frame;
/// let frame = AsciiFrame::from_rows(vec!["@@".to_string(), "..".to_string()]).unwrap();
/// let mut out = Vec::new();
/// write_frame(&mut out, &frame).unwrap();
/// assert_eq!(out, b"@@\n..\n");
/// ```
pub fn write_frame<W: Write>(out: &mut W, frame: &AsciiFrame) -> io::Result<()> {
    for row in frame.rows() {
        writeln!(out, "{row}")?;
    }
    out.flush()
}

/// Efface l'écran et replace le curseur en haut à gauche.
///
/// # Errors
/// Propagates I/O errors from `out`.
pub fn clear_screen<W: Write>(out: &mut W) -> io::Result<()> {
    crossterm::execute!(out, Clear(ClearType::All), MoveTo(0, 0))
}

/// Sauvegarde en UTF-8, lignes jointes par `\n`, sans métadonnées ni saut final.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn save_frame(path: &Path, frame: &AsciiFrame) -> Result<()> {
    std::fs::write(path, frame.to_text())
        .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
    log::info!("Frame sauvegardée : {}", path.display());
    Ok(())
}

/// Relit un fichier produit par [`save_frame`].
///
/// # Errors
/// Returns an error if the file cannot be read or its rows differ in length.
pub fn load_frame(path: &Path) -> Result<AsciiFrame> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    if text.is_empty() {
        return Ok(AsciiFrame::empty());
    }
    let rows = text.split('\n').map(String::from).collect();
    AsciiFrame::from_rows(rows).with_context(|| format!("Frame invalide dans {}", path.display()))
}
