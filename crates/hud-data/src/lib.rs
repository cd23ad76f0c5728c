use anyhow::{bail, Context, Result};
use image::{GrayImage, RgbImage, RgbaImage};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Character metadata from the roster manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterData {
    pub id: String,
    pub name: String,
    pub icon: String,
}

/// Raw characters.json file format
#[derive(Debug, Deserialize)]
struct CharactersFile {
    #[allow(dead_code)]
    version: String,
    characters: Vec<CharacterData>,
}

/// A reference character icon paired with its per-pixel opacity mask.
///
/// The icon is stored at full opacity; the mask says how each pixel blends
/// against whatever panel color is behind it on the real HUD. Both images
/// always have identical dimensions.
pub struct ReferenceIcon {
    pub name: String,
    pub icon: RgbImage,
    pub mask: GrayImage,
}

impl ReferenceIcon {
    /// Pair an icon with its mask, rejecting malformed entries up front so
    /// the matching pipeline never sees one.
    pub fn new(name: impl Into<String>, icon: RgbImage, mask: GrayImage) -> Result<Self> {
        let name = name.into();
        if icon.dimensions() != mask.dimensions() {
            bail!(
                "icon '{}': mask dimensions {}x{} do not match icon {}x{}",
                name,
                mask.width(),
                mask.height(),
                icon.width(),
                icon.height()
            );
        }
        if icon.width() == 0 || icon.height() == 0 {
            bail!("icon '{}' has zero area", name);
        }
        Ok(Self { name, icon, mask })
    }

    /// Split an RGBA image into an RGB icon and its alpha mask.
    pub fn from_rgba(name: impl Into<String>, rgba: &RgbaImage) -> Result<Self> {
        let (w, h) = rgba.dimensions();
        let mut icon = RgbImage::new(w, h);
        let mut mask = GrayImage::new(w, h);
        for (x, y, px) in rgba.enumerate_pixels() {
            let [r, g, b, a] = px.0;
            icon.put_pixel(x, y, image::Rgb([r, g, b]));
            mask.put_pixel(x, y, image::Luma([a]));
        }
        Self::new(name, icon, mask)
    }

    pub fn width(&self) -> u32 {
        self.icon.width()
    }

    pub fn height(&self) -> u32 {
        self.icon.height()
    }
}

/// Ordered collection of reference icons.
///
/// Iteration order is meaningful: when two candidates score identically for
/// a slot, the earlier entry wins.
#[derive(Default)]
pub struct Roster {
    icons: Vec<ReferenceIcon>,
}

impl Roster {
    pub fn new(icons: Vec<ReferenceIcon>) -> Self {
        Self { icons }
    }

    /// Load a roster from a data directory.
    /// Expects:
    ///   - data_dir/characters.json (character metadata)
    ///   - data_dir/icons/{icon} (RGBA PNGs, alpha = opacity mask)
    pub fn load(data_dir: &Path) -> Result<Self> {
        let manifest_path = data_dir.join("characters.json");
        if !manifest_path.exists() {
            tracing::warn!(
                "No characters.json found at {}",
                manifest_path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&manifest_path)
            .context("Failed to read characters.json")?;
        let file: CharactersFile =
            serde_json::from_str(&content).context("Failed to parse characters.json")?;

        let icons_dir = data_dir.join("icons");
        let mut icons = Vec::new();

        for character in file.characters {
            let icon_path = icons_dir.join(&character.icon);
            if !icon_path.exists() {
                tracing::debug!(
                    "Missing icon for {}: {}",
                    character.id,
                    icon_path.display()
                );
                continue;
            }

            match load_icon(&icon_path, &character.name) {
                Ok(icon) => icons.push(icon),
                Err(e) => tracing::warn!("Failed to load icon for {}: {}", character.id, e),
            }
        }

        tracing::info!(
            "Roster loaded {} reference icons from {}",
            icons.len(),
            data_dir.display()
        );

        Ok(Self { icons })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReferenceIcon> {
        self.icons.iter()
    }

    pub fn get(&self, index: usize) -> Option<&ReferenceIcon> {
        self.icons.get(index)
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

fn load_icon(path: &Path, name: &str) -> Result<ReferenceIcon> {
    let img = image::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    ReferenceIcon::from_rgba(name, &img.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_nonexistent() {
        let roster = Roster::load(Path::new("/nonexistent")).unwrap();
        assert!(roster.is_empty());
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let icon = RgbImage::new(32, 25);
        let mask = GrayImage::new(32, 24);
        assert!(ReferenceIcon::new("bad", icon, mask).is_err());
    }

    #[test]
    fn test_zero_area_rejected() {
        let icon = RgbImage::new(0, 0);
        let mask = GrayImage::new(0, 0);
        assert!(ReferenceIcon::new("empty", icon, mask).is_err());
    }

    #[test]
    fn test_from_rgba_splits_channels() {
        let rgba = RgbaImage::from_fn(4, 3, |x, y| {
            image::Rgba([x as u8, y as u8, 7, (x * 10) as u8])
        });
        let icon = ReferenceIcon::from_rgba("split", &rgba).unwrap();
        assert_eq!(icon.icon.get_pixel(2, 1).0, [2, 1, 7]);
        assert_eq!(icon.mask.get_pixel(3, 0).0, [30]);
    }

    #[test]
    fn test_roster_order_preserved() {
        let make = |name: &str| {
            ReferenceIcon::new(name, RgbImage::new(2, 2), GrayImage::new(2, 2)).unwrap()
        };
        let roster = Roster::new(vec![make("first"), make("second")]);
        let names: Vec<&str> = roster.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
    }
}
