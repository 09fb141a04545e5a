use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("failed to parse SVG: {0}")]
    SvgParse(String),
    #[error("invalid SVG size {width}x{height}")]
    InvalidSize { width: f32, height: f32 },
    #[error("failed to allocate {width}x{height} pixmap")]
    PixmapAlloc { width: u32, height: u32 },
    #[error("invalid background color '{0}'")]
    Background(String),
    #[error("failed to encode PNG: {0}")]
    PngEncode(String),
    #[error("failed to write {path}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Default)]
pub struct RasterOptions {
    /// Flatten transparency against this color; `None` keeps the alpha channel.
    pub background: Option<String>,
}

impl RasterOptions {
    pub fn flatten_on(background: &str) -> Self {
        Self {
            background: Some(background.to_string()),
        }
    }
}

pub trait ImageEncoder {
    fn encode(&self, svg: &str, options: &RasterOptions) -> Result<Vec<u8>, RasterError>;
}

/// Rasterizes with `resvg` at 1:1 scale and encodes PNG.
#[cfg(feature = "png")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ResvgEncoder;

#[cfg(feature = "png")]
impl ImageEncoder for ResvgEncoder {
    fn encode(&self, svg: &str, options: &RasterOptions) -> Result<Vec<u8>, RasterError> {
        use resvg::tiny_skia;

        let mut opt = usvg::Options::default();
        opt.fontdb_mut().load_system_fonts();
        opt.font_family = "Arial".to_string();

        let tree = usvg::Tree::from_str(svg, &opt).map_err(|e| RasterError::SvgParse(e.to_string()))?;
        let size = tree.size();
        let int_size = size.to_int_size();
        let (width, height) = (int_size.width(), int_size.height());
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidSize {
                width: size.width(),
                height: size.height(),
            });
        }

        let mut pixmap =
            tiny_skia::Pixmap::new(width, height).ok_or(RasterError::PixmapAlloc { width, height })?;
        if let Some(bg) = options.background.as_deref() {
            let color = parse_color(bg).ok_or_else(|| RasterError::Background(bg.to_string()))?;
            pixmap.fill(tiny_skia::Color::from_rgba8(color[0], color[1], color[2], color[3]));
        }

        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
        let bytes = pixmap
            .encode_png()
            .map_err(|e| RasterError::PngEncode(e.to_string()))?;
        tracing::debug!(width, height, bytes = bytes.len(), "rasterized svg");
        Ok(bytes)
    }
}

/// Parses `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa` and a few keywords into RGBA.
pub fn parse_color(text: &str) -> Option<[u8; 4]> {
    let s = text.trim().to_ascii_lowercase();
    match s.as_str() {
        "transparent" => return Some([0, 0, 0, 0]),
        "white" => return Some([255, 255, 255, 255]),
        "black" => return Some([0, 0, 0, 255]),
        _ => {}
    }

    let hex = s.strip_prefix('#')?;
    fn hex2(b: &[u8]) -> Option<u8> {
        let hi = (*b.first()? as char).to_digit(16)? as u8;
        let lo = (*b.get(1)? as char).to_digit(16)? as u8;
        Some((hi << 4) | lo)
    }
    fn hex1(c: u8) -> Option<u8> {
        let v = (c as char).to_digit(16)? as u8;
        Some((v << 4) | v)
    }

    let bytes = hex.as_bytes();
    match bytes.len() {
        3 => Some([hex1(bytes[0])?, hex1(bytes[1])?, hex1(bytes[2])?, 255]),
        4 => Some([
            hex1(bytes[0])?,
            hex1(bytes[1])?,
            hex1(bytes[2])?,
            hex1(bytes[3])?,
        ]),
        6 => Some([
            hex2(&bytes[0..2])?,
            hex2(&bytes[2..4])?,
            hex2(&bytes[4..6])?,
            255,
        ]),
        8 => Some([
            hex2(&bytes[0..2])?,
            hex2(&bytes[2..4])?,
            hex2(&bytes[4..6])?,
            hex2(&bytes[6..8])?,
        ]),
        _ => None,
    }
}

pub fn write_output_png(
    encoder: &dyn ImageEncoder,
    svg: &str,
    output: &Path,
    options: &RasterOptions,
) -> Result<(), RasterError> {
    let bytes = encoder.encode(svg, options)?;
    std::fs::write(output, &bytes).map_err(|source| RasterError::Write {
        path: output.display().to_string(),
        source,
    })?;
    tracing::info!(path = %output.display(), bytes = bytes.len(), "wrote png");
    Ok(())
}
