//! Skin atlas loading for the file dialog.
//!
//! A skin bundle is three files under one base path: a sprite-sheet image
//! (`FileDialogTexture.png`), a monospace glyph-grid image
//! (`FileDialogFont.png`), and a plain-text manifest
//! (`FileDialogSprites.txt`) whose lines are `name:x,y,width,height`.
//!
//! Loading composes the two images into a single RGBA pixel buffer (font
//! sheet appended below the skin) so every dialog session needs exactly one
//! texture upload through the rendering bridge. Any malformed manifest line,
//! missing region, or undecodable image fails the whole load; no partial
//! table is ever observable.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::font::GlyphSheet;

/// Skin sprite-sheet filename inside a bundle.
pub const TEXTURE_FILE: &str = "FileDialogTexture.png";

/// Glyph-grid filename inside a bundle.
pub const FONT_FILE: &str = "FileDialogFont.png";

/// Region manifest filename inside a bundle.
pub const MANIFEST_FILE: &str = "FileDialogSprites.txt";

// ============================================================================
// Regions
// ============================================================================

/// Number of required skin regions.
pub const REGION_COUNT: usize = 11;

/// The fixed, closed set of named skin regions.
///
/// Every region must be present in the manifest before a dialog may open.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum SkinRegion {
    /// Dialog panel fill.
    OuterBackground = 0,
    /// Dialog panel corner (mirrored for the other three corners).
    OuterBorderCorner = 1,
    /// Dialog panel edge (stretched along each side).
    OuterBorderEdge = 2,
    /// Listing panel fill.
    InnerBackground = 3,
    /// Listing panel corner.
    InnerBorderCorner = 4,
    /// Listing panel edge.
    InnerBorderEdge = 5,
    /// Header icon returning to the start directory.
    HomeIcon = 6,
    /// Listing row icon for files.
    FileIcon = 7,
    /// Listing row icon for directories.
    FolderIcon = 8,
    /// Footer cancel button.
    CancelIcon = 9,
    /// Footer confirm button.
    SelectIcon = 10,
}

impl SkinRegion {
    /// All regions, in table order.
    pub const ALL: [SkinRegion; REGION_COUNT] = [
        SkinRegion::OuterBackground,
        SkinRegion::OuterBorderCorner,
        SkinRegion::OuterBorderEdge,
        SkinRegion::InnerBackground,
        SkinRegion::InnerBorderCorner,
        SkinRegion::InnerBorderEdge,
        SkinRegion::HomeIcon,
        SkinRegion::FileIcon,
        SkinRegion::FolderIcon,
        SkinRegion::CancelIcon,
        SkinRegion::SelectIcon,
    ];

    /// Name used for this region in the manifest.
    pub fn manifest_name(self) -> &'static str {
        match self {
            SkinRegion::OuterBackground => "outer_background",
            SkinRegion::OuterBorderCorner => "outer_border_corner",
            SkinRegion::OuterBorderEdge => "outer_border_edge",
            SkinRegion::InnerBackground => "inner_background",
            SkinRegion::InnerBorderCorner => "inner_border_corner",
            SkinRegion::InnerBorderEdge => "inner_border_edge",
            SkinRegion::HomeIcon => "home_icon",
            SkinRegion::FileIcon => "file_icon",
            SkinRegion::FolderIcon => "folder_icon",
            SkinRegion::CancelIcon => "cancel_icon",
            SkinRegion::SelectIcon => "select_icon",
        }
    }

    /// Look up a region by its manifest name.
    pub fn from_manifest_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|region| region.manifest_name() == name)
    }
}

/// Rectangle region within the skin sprite-sheet, in pixels.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct SkinRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

// ============================================================================
// Errors and options
// ============================================================================

/// Skin bundle load failure. Fatal to the load; aborts subsystem startup.
#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("malformed manifest line {line}: {text:?}")]
    MalformedLine { line: usize, text: String },

    #[error("unknown region {name:?} on manifest line {line}")]
    UnknownRegion { line: usize, name: String },

    #[error("duplicate region {name:?} on manifest line {line}")]
    DuplicateRegion { line: usize, name: String },

    #[error("required region {0:?} missing from manifest")]
    MissingRegion(SkinRegion),

    #[error("region {region:?} exceeds the {width}x{height} skin image")]
    OutOfBounds {
        region: SkinRegion,
        width: u32,
        height: u32,
    },
}

/// Skin load configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct AtlasOptions {
    /// Fail the load on manifest names outside the fixed region set.
    /// Off by default; unknown names are skipped.
    pub deny_unknown_regions: bool,
}

// ============================================================================
// Atlas table
// ============================================================================

/// Mapping from the fixed region set to sprite-sheet rectangles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AtlasTable {
    rects: [SkinRect; REGION_COUNT],
}

impl AtlasTable {
    /// Get the rectangle for a region.
    pub fn get(&self, region: SkinRegion) -> SkinRect {
        self.rects[region as usize]
    }

    fn from_entries(entries: [Option<SkinRect>; REGION_COUNT]) -> Result<Self, AtlasError> {
        let mut rects = [SkinRect::default(); REGION_COUNT];
        for region in SkinRegion::ALL {
            match entries[region as usize] {
                Some(rect) => rects[region as usize] = rect,
                None => return Err(AtlasError::MissingRegion(region)),
            }
        }
        Ok(Self { rects })
    }

    /// Check that every region lies fully inside a `width` x `height` image.
    pub fn validate_bounds(&self, width: u32, height: u32) -> Result<(), AtlasError> {
        for region in SkinRegion::ALL {
            let rect = self.get(region);
            let in_x = rect.x.checked_add(rect.width).is_some_and(|r| r <= width);
            let in_y = rect.y.checked_add(rect.height).is_some_and(|b| b <= height);
            if !in_x || !in_y {
                return Err(AtlasError::OutOfBounds {
                    region,
                    width,
                    height,
                });
            }
        }
        Ok(())
    }
}

/// Parse a region manifest into an atlas table.
///
/// Line grammar is `<name>:<x>,<y>,<width>,<height>` with ASCII integers and
/// no whitespace tolerance. A trailing `\r` is stripped and empty lines are
/// skipped. Duplicate names always fail; unknown names fail only under
/// [`AtlasOptions::deny_unknown_regions`].
pub fn parse_manifest(text: &str, options: AtlasOptions) -> Result<AtlasTable, AtlasError> {
    let mut entries: [Option<SkinRect>; REGION_COUNT] = [None; REGION_COUNT];

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.strip_suffix('\r').unwrap_or(raw);
        if trimmed.is_empty() {
            continue;
        }

        let malformed = || AtlasError::MalformedLine {
            line,
            text: trimmed.to_string(),
        };

        let (name, fields) = trimmed.split_once(':').ok_or_else(malformed)?;
        let mut numbers = [0u32; 4];
        let mut count = 0;
        for field in fields.split(',') {
            if count == 4 {
                return Err(malformed());
            }
            numbers[count] = field.parse().map_err(|_| malformed())?;
            count += 1;
        }
        if count != 4 {
            return Err(malformed());
        }

        let rect = SkinRect {
            x: numbers[0],
            y: numbers[1],
            width: numbers[2],
            height: numbers[3],
        };

        match SkinRegion::from_manifest_name(name) {
            Some(region) => {
                if entries[region as usize].is_some() {
                    return Err(AtlasError::DuplicateRegion {
                        line,
                        name: name.to_string(),
                    });
                }
                entries[region as usize] = Some(rect);
            }
            None if options.deny_unknown_regions => {
                return Err(AtlasError::UnknownRegion {
                    line,
                    name: name.to_string(),
                });
            }
            None => {
                log::debug!("skipping unknown skin region {name:?} on manifest line {line}");
            }
        }
    }

    AtlasTable::from_entries(entries)
}

// ============================================================================
// Skin
// ============================================================================

/// A decoded skin bundle: the region table, glyph metrics, and one composed
/// RGBA pixel buffer ready for a single texture upload.
///
/// Shared read-only across dialog sessions; outlives every dialog instance.
pub struct Skin {
    /// Region lookup table.
    pub atlas: AtlasTable,
    /// Glyph metrics into the composed atlas.
    pub glyphs: GlyphSheet,
    /// Composed RGBA8 pixels, skin image on top, font sheet below.
    pub pixels: Vec<u8>,
    /// Composed atlas width in pixels.
    pub width: u32,
    /// Composed atlas height in pixels.
    pub height: u32,
}

impl Skin {
    /// Load a skin bundle from `base_path`.
    pub fn load(base_path: &Path, options: AtlasOptions) -> Result<Self, AtlasError> {
        let skin_image = decode_rgba(&base_path.join(TEXTURE_FILE))?;
        let font_image = decode_font(&base_path.join(FONT_FILE))?;

        let manifest_path = base_path.join(MANIFEST_FILE);
        let manifest = fs::read_to_string(&manifest_path).map_err(|source| AtlasError::Io {
            path: manifest_path,
            source,
        })?;
        let atlas = parse_manifest(&manifest, options)?;
        atlas.validate_bounds(skin_image.width(), skin_image.height())?;

        let (skin_w, skin_h) = skin_image.dimensions();
        let (font_w, font_h) = font_image.dimensions();
        let width = skin_w.max(font_w);
        let height = skin_h + font_h;
        let mut pixels = vec![0u8; composed_len(width, height)];
        blit(&mut pixels, width, &skin_image, 0);
        blit(&mut pixels, width, &font_image, skin_h);

        let glyphs = GlyphSheet::from_dimensions(font_w, font_h, skin_h);

        log::info!(
            "loaded dialog skin from {} ({width}x{height} atlas, {}x{} glyph cells)",
            base_path.display(),
            glyphs.cell_width,
            glyphs.cell_height,
        );

        Ok(Self {
            atlas,
            glyphs,
            pixels,
            width,
            height,
        })
    }
}

/// Byte length of a `width` x `height` RGBA8 buffer, computed in `usize`
/// so large image dimensions cannot wrap 32-bit arithmetic.
fn composed_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}

/// Copy an RGBA image into the composed buffer at a vertical offset.
fn blit(pixels: &mut [u8], atlas_width: u32, src: &image::RgbaImage, offset_y: u32) {
    let row_bytes = src.width() as usize * 4;
    let stride = atlas_width as usize * 4;
    for (row, data) in src.rows().enumerate() {
        let start = (offset_y as usize + row) * stride;
        let dest = &mut pixels[start..start + row_bytes];
        for (pixel, out) in data.zip(dest.chunks_exact_mut(4)) {
            out.copy_from_slice(&pixel.0);
        }
    }
}

fn decode_rgba(path: &Path) -> Result<image::RgbaImage, AtlasError> {
    let bytes = fs::read(path).map_err(|source| AtlasError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = image::load_from_memory(&bytes).map_err(|source| AtlasError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decoded.to_rgba8())
}

/// Decode the glyph sheet, expanding single-channel alpha sheets to white
/// RGBA so text can be tinted by vertex color.
fn decode_font(path: &Path) -> Result<image::RgbaImage, AtlasError> {
    let bytes = fs::read(path).map_err(|source| AtlasError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = image::load_from_memory(&bytes).map_err(|source| AtlasError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(match decoded {
        image::DynamicImage::ImageLuma8(gray) => {
            let mut rgba = image::RgbaImage::new(gray.width(), gray.height());
            for (src, dst) in gray.pixels().zip(rgba.pixels_mut()) {
                *dst = image::Rgba([255, 255, 255, src.0[0]]);
            }
            rgba
        }
        image::DynamicImage::ImageLumaA8(gray) => {
            let mut rgba = image::RgbaImage::new(gray.width(), gray.height());
            for (src, dst) in gray.pixels().zip(rgba.pixels_mut()) {
                *dst = image::Rgba([255, 255, 255, src.0[1]]);
            }
            rgba
        }
        other => other.to_rgba8(),
    })
}

// ============================================================================
// Tests
// ============================================================================
