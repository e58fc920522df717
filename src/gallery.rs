//! Column layout for the plot image gallery.
//!
//! Images are placed round-robin: the image at index `i` goes to column
//! `i % columns`. Every image is decoded on its own, so a corrupt file only
//! marks its own slot as failed.

use std::path::Path;

use image::ImageReader;
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};
use crate::listing::list_images;

/// Number of columns the gallery is laid out in.
pub const GALLERY_COLUMNS: usize = 2;

/// Column index for each of `len` items.
pub fn assign_columns(len: usize, columns: usize) -> Vec<usize> {
    let columns = columns.max(1);
    (0..len).map(|i| i % columns).collect()
}

/// Distribute `items` over `columns` columns, keeping their relative order.
pub fn arrange<T>(items: impl IntoIterator<Item = T>, columns: usize) -> Vec<Vec<T>> {
    let columns = columns.max(1);
    let mut out: Vec<Vec<T>> = (0..columns).map(|_| Vec::new()).collect();
    for (i, item) in items.into_iter().enumerate() {
        out[i % columns].push(item);
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImageStatus {
    Ready { width: u32, height: u32 },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryItem {
    /// File name, also used as the caption.
    pub name: String,
    pub column: usize,
    #[serde(flatten)]
    pub status: ImageStatus,
}

impl GalleryItem {
    pub fn is_ready(&self) -> bool {
        matches!(self.status, ImageStatus::Ready { .. })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Gallery {
    pub columns: Vec<Vec<GalleryItem>>,
}

impl Gallery {
    pub fn items(&self) -> impl Iterator<Item = &GalleryItem> {
        self.columns.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &GalleryItem> {
        self.items().filter(|item| !item.is_ready())
    }
}

/// Decode the image at `path` and report its dimensions.
///
/// The format is sniffed from the file's leading bytes; the extension is
/// only a fallback when the bytes are not recognised.
pub fn probe_image(path: &Path) -> Result<(u32, u32)> {
    let image = ImageReader::open(path)
        .map_err(|e| DashboardError::render(path, e))?
        .with_guessed_format()
        .map_err(|e| DashboardError::render(path, e))?
        .decode()
        .map_err(|e| DashboardError::render(path, e))?;
    Ok((image.width(), image.height()))
}

/// Enumerate the images in `dir`, probe each one, and lay them out.
///
/// Only a failure to read the directory itself is returned as an error.
pub fn load_gallery(dir: &Path, columns: usize) -> Result<Gallery> {
    let names = list_images(dir)?;
    let placements = assign_columns(names.len(), columns);

    let items = names
        .into_iter()
        .zip(placements)
        .map(|(name, column)| {
            let status = match probe_image(&dir.join(&name)) {
                Ok((width, height)) => ImageStatus::Ready { width, height },
                Err(e) => {
                    tracing::warn!("Skipping image: {}", e);
                    ImageStatus::Failed {
                        error: e.to_string(),
                    }
                }
            };
            GalleryItem {
                name,
                column,
                status,
            }
        });

    Ok(Gallery {
        columns: arrange(items, columns),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigns_columns_round_robin() {
        assert_eq!(assign_columns(5, 2), vec![0, 1, 0, 1, 0]);
        assert_eq!(assign_columns(4, 3), vec![0, 1, 2, 0]);
    }

    #[test]
    fn empty_input_yields_empty_columns() {
        assert!(assign_columns(0, 2).is_empty());
        let columns: Vec<Vec<&str>> = arrange(Vec::new(), 2);
        assert_eq!(columns, vec![Vec::<&str>::new(), Vec::new()]);
    }

    #[test]
    fn arrange_keeps_relative_order() {
        let columns = arrange(["p1.png", "p2.png", "p3.png"], GALLERY_COLUMNS);
        assert_eq!(columns, vec![vec!["p1.png", "p3.png"], vec!["p2.png"]]);
    }

    #[test]
    fn zero_columns_is_treated_as_one() {
        assert_eq!(arrange([1, 2], 0), vec![vec![1, 2]]);
    }

    #[test]
    fn status_serializes_inline() {
        let item = GalleryItem {
            name: "p1.png".to_string(),
            column: 0,
            status: ImageStatus::Ready {
                width: 4,
                height: 3,
            },
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["status"], "ready");
        assert_eq!(json["width"], 4);
        assert_eq!(json["name"], "p1.png");
    }

    #[test]
    fn decodes_by_content_when_extension_is_wrong() {
        let dir = tempfile::tempdir().unwrap();
        image::RgbImage::new(3, 2)
            .save_with_format(dir.path().join("plot.jpg"), image::ImageFormat::Png)
            .unwrap();

        assert_eq!(probe_image(&dir.path().join("plot.jpg")).unwrap(), (3, 2));

        let gallery = load_gallery(dir.path(), GALLERY_COLUMNS).unwrap();
        let item = gallery.items().next().unwrap();
        assert_eq!(item.name, "plot.jpg");
        assert_eq!(
            item.status,
            ImageStatus::Ready {
                width: 3,
                height: 2
            }
        );
    }

    #[test]
    fn undecodable_bytes_fail_only_their_slot() {
        let dir = tempfile::tempdir().unwrap();
        image::RgbImage::new(1, 1)
            .save(dir.path().join("good.png"))
            .unwrap();
        std::fs::write(dir.path().join("plot.png"), b"not an image").unwrap();

        let gallery = load_gallery(dir.path(), GALLERY_COLUMNS).unwrap();
        assert_eq!(gallery.len(), 2);
        let failed: Vec<_> = gallery.failures().map(|i| i.name.as_str()).collect();
        assert_eq!(failed, vec!["plot.png"]);
    }
}
