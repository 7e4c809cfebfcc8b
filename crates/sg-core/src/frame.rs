use crate::error::CoreError;

/// Buffer de pixels RGBA, row-major, 4 bytes par pixel.
///
/// # Example
/// ```
/// use sg_core::frame::FrameBuffer;
/// let fb = FrameBuffer::new(10, 10);
/// assert_eq!(fb.data.len(), 400);
/// ```
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    /// Pixels RGBA, row-major, 4 bytes par pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameBuffer {
    /// Crée un buffer noir transparent aux dimensions données.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; width as usize * height as usize * 4],
            width,
            height,
        }
    }
}

/// Image mono-canal (luminance 0–255), row-major.
///
/// # Example
/// ```
/// use sg_core::frame::LumaFrame;
/// let f = LumaFrame::filled(4, 2, 128);
/// assert!(f.data.iter().all(|&p| p == 128));
/// assert_eq!(f.data.len(), 8);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LumaFrame {
    /// One byte per pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl LumaFrame {
    /// Black frame of the given size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, 0)
    }

    /// Frame where every pixel holds `value`.
    #[must_use]
    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        Self {
            data: vec![value; width as usize * height as usize],
            width,
            height,
        }
    }

    /// Wrap an existing buffer.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidDimension` if `data.len() != width * height`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, CoreError> {
        if data.len() != width as usize * height as usize {
            return Err(CoreError::InvalidDimension { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// `(width, height)`.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Image telle que décodée, avant conversion en luminance.
#[derive(Clone, Debug)]
pub enum SourceImage {
    /// Déjà mono-canal.
    Luma(LumaFrame),
    /// Couleur, normalisée en RGBA.
    Rgba(FrameBuffer),
}

impl SourceImage {
    /// `(width, height)` of the decoded image.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Luma(f) => (f.width, f.height),
            Self::Rgba(f) => (f.width, f.height),
        }
    }

    /// Short color-mode label for status output ("L" or "RGBA").
    #[must_use]
    pub fn color_mode(&self) -> &'static str {
        match self {
            Self::Luma(_) => "L",
            Self::Rgba(_) => "RGBA",
        }
    }
}

/// Frame ASCII : lignes de longueur identique, une par ligne de pixels.
///
/// # Example
/// ```
/// use sg_core::frame::AsciiFrame;
/// let frame = AsciiFrame::from_chars("@@..##", 2).unwrap();
/// assert_eq!(frame.height(), 3);
/// assert_eq!(frame.rows()[1], "..");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AsciiFrame {
    rows: Vec<String>,
    width: usize,
}

impl AsciiFrame {
    /// Frame without rows; what a failed conversion yields.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Split a row-major character sequence into rows of `width` characters.
    ///
    /// # Errors
    /// `InvalidDimension` if `width` is zero, `Processing` if the sequence
    /// length is not a multiple of `width`.
    pub fn from_chars(chars: &str, width: usize) -> Result<Self, CoreError> {
        if width == 0 {
            return Err(CoreError::InvalidDimension {
                width: 0,
                height: 0,
            });
        }
        let all: Vec<char> = chars.chars().collect();
        if all.len() % width != 0 {
            return Err(CoreError::Processing(format!(
                "{} caractères ne se découpent pas en lignes de {width}",
                all.len()
            )));
        }
        let rows = all
            .chunks(width)
            .map(|chunk| chunk.iter().collect::<String>())
            .collect();
        Ok(Self { rows, width })
    }

    /// Build from pre-split rows.
    ///
    /// # Errors
    /// Returns `CoreError::Processing` if rows differ in character count.
    pub fn from_rows(rows: Vec<String>) -> Result<Self, CoreError> {
        let width = rows.first().map_or(0, |r| r.chars().count());
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.chars().count() != width)
        {
            return Err(CoreError::Processing(format!(
                "ligne {i} : {} caractères au lieu de {width}",
                row.chars().count()
            )));
        }
        Ok(Self { rows, width })
    }

    /// Rows, top to bottom.
    #[must_use]
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Characters per row.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// `true` if the frame has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows joined by `\n`, no trailing newline.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.rows.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luma_from_raw_checks_length() {
        assert!(LumaFrame::from_raw(2, 2, vec![0; 4]).is_ok());
        assert!(matches!(
            LumaFrame::from_raw(2, 2, vec![0; 3]),
            Err(CoreError::InvalidDimension { width: 2, height: 2 })
        ));
    }

    #[test]
    fn from_chars_splits_rows_evenly() {
        let frame = AsciiFrame::from_chars("abcdef", 3).unwrap();
        assert_eq!(frame.rows(), ["abc", "def"]);
        assert_eq!(frame.width(), 3);
    }

    #[test]
    fn from_chars_counts_characters_not_bytes() {
        let frame = AsciiFrame::from_chars("é@é@", 2).unwrap();
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.rows()[0], "é@");
    }

    #[test]
    fn from_chars_rejects_ragged_input() {
        assert!(AsciiFrame::from_chars("abcde", 3).is_err());
        assert!(AsciiFrame::from_chars("abc", 0).is_err());
    }

    #[test]
    fn from_rows_rejects_unequal_rows() {
        assert!(AsciiFrame::from_rows(vec!["ab".into(), "abc".into()]).is_err());
        let ok = AsciiFrame::from_rows(vec!["ab".into(), "cd".into()]).unwrap();
        assert_eq!(ok.to_text(), "ab\ncd");
    }

    #[test]
    fn empty_frame() {
        let frame = AsciiFrame::empty();
        assert!(frame.is_empty());
        assert_eq!(frame.to_text(), "");
    }
}
