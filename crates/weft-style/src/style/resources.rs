//! Resources referenced from style values and the loader that provides them.

use serde::Serialize;
use weft_common::warning::warn_once;

/// How a texture is sampled when drawn at a non-native size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterMode {
    /// Nearest neighbour.
    #[default]
    Point,
    /// Linear interpolation.
    Bilinear,
}

/// A loaded texture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Texture {
    /// Path the texture was loaded from.
    pub path: String,
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
    /// Texels per logical pixel: 2 for `@2x` variants.
    pub pixels_per_point: f32,
    /// Sampling mode.
    pub filter_mode: FilterMode,
}

impl Texture {
    /// Path of the substitute drawn for missing textures.
    pub const PLACEHOLDER_PATH: &'static str = "builtin:missing-texture";

    /// A texture with no data, scale 1 and point filtering.
    #[must_use]
    pub fn new(path: &str, width: u32, height: u32) -> Self {
        Self {
            path: path.to_string(),
            width,
            height,
            pixels_per_point: 1.0,
            filter_mode: FilterMode::Point,
        }
    }

    /// The substitute for a texture that could not be loaded.
    #[must_use]
    pub fn placeholder() -> Self {
        Self::new(Self::PLACEHOLDER_PATH, 1, 1)
    }

    /// Whether this is the missing-texture substitute.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.path == Self::PLACEHOLDER_PATH
    }
}

/// A loaded font.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Font {
    /// Path the font was loaded from.
    pub path: String,
    /// Family name reported by the font.
    pub family: String,
}

/// A loaded vector image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VectorImage {
    /// Path the image was loaded from.
    pub path: String,
    /// Intrinsic width.
    pub width: f32,
    /// Intrinsic height.
    pub height: f32,
}

/// `background-image`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Background {
    /// No image.
    #[default]
    None,
    /// A raster image.
    Texture(Texture),
    /// A vector image.
    VectorImage(VectorImage),
}

/// `cursor`: a built-in shape or a texture with a hotspot.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Cursor {
    /// Custom image, `None` for built-in shapes.
    pub texture: Option<Texture>,
    /// Hotspot in texture pixels.
    pub hotspot: (f32, f32),
    /// Built-in shape used when there is no texture.
    pub default_cursor: super::CursorKind,
}

/// Loads resources named by style values.
///
/// The engine never performs I/O itself. Returning `None` means "not found";
/// the caller decides whether that is worth a warning.
pub trait ResourceLoader {
    /// Load a texture.
    fn load_texture(&self, path: &str) -> Option<Texture>;
    /// Load a font.
    fn load_font(&self, path: &str) -> Option<Font>;
    /// Load a vector image.
    fn load_vector_image(&self, path: &str) -> Option<VectorImage>;
}

/// A loader that finds nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullResourceLoader;

impl ResourceLoader for NullResourceLoader {
    fn load_texture(&self, _path: &str) -> Option<Texture> {
        None
    }

    fn load_font(&self, _path: &str) -> Option<Font> {
        None
    }

    fn load_vector_image(&self, _path: &str) -> Option<VectorImage> {
        None
    }
}

/// `image.png` → `image@2x.png`.
fn high_density_path(path: &str) -> String {
    let file_start = path.rfind('/').map_or(0, |i| i + 1);
    match path[file_start..].rfind('.') {
        Some(dot) => {
            let dot = file_start + dot;
            format!("{}@2x{}", &path[..dot], &path[dot..])
        }
        None => format!("{path}@2x"),
    }
}

/// Load a texture for a display scale.
///
/// Above scale 1 an `@2x` variant is preferred when the loader has one.
/// Scales that are not whole numbers sample bilinearly.
pub fn load_texture_for_scale(
    loader: &dyn ResourceLoader,
    path: &str,
    dpi_scaling: f32,
) -> Option<Texture> {
    let mut texture = None;
    if dpi_scaling > 1.0 {
        texture = loader.load_texture(&high_density_path(path)).map(|mut t| {
            t.pixels_per_point = 2.0;
            t
        });
    }
    let mut texture = texture.or_else(|| loader.load_texture(path))?;
    if dpi_scaling.fract().abs() > f32::EPSILON {
        texture.filter_mode = FilterMode::Bilinear;
    }
    Some(texture)
}

/// Like [`load_texture_for_scale`], substituting [`Texture::placeholder`]
/// and logging once when nothing was found.
pub fn load_texture_or_placeholder(
    loader: &dyn ResourceLoader,
    path: &str,
    dpi_scaling: f32,
) -> Texture {
    load_texture_for_scale(loader, path, dpi_scaling).unwrap_or_else(|| {
        warn_once("Style", &format!("texture '{path}' not found"));
        Texture::placeholder()
    })
}
