use crate::error::StoreError;
use crate::store::family::has_accepted_extension;
use crate::store::paths::PHOTO_PREFIX;
use crate::store::{FamilyStore, warn};
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::ImageFormat;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

fn random_stem() -> String {
    format!("{:08x}", rand::random::<u32>())
}

/// Encode and flush explicitly: a flush left to `Drop` would discard the
/// I/O error and commit a truncated file as if the write succeeded.
fn encode_jpeg<W: Write>(img: &DynamicImage, mut out: W, quality: u8) -> image::ImageResult<()> {
    JpegEncoder::new_with_quality(&mut out, quality).encode_image(&img.to_rgb8())?;
    out.flush()?;
    Ok(())
}

fn write_jpeg(img: &DynamicImage, dest: &Path, quality: u8) -> image::ImageResult<()> {
    let file = fs::File::create(dest)?;
    encode_jpeg(img, BufWriter::new(file), quality)
}

impl FamilyStore {
    /// Bring a photo under management: validate it, store it under a fresh
    /// random name, re-encode it bounded to the configured maximum dimension,
    /// and derive a thumbnail. Returns the stored path relative to the data
    /// root with forward slashes.
    ///
    /// The source file name is never reused; an 8-hex token prevents
    /// collisions and keeps user-chosen names out of the image directory.
    pub(crate) fn ingest_photo(&self, source: &Path) -> Result<String, StoreError> {
        if !source.is_file() {
            return Err(StoreError::InvalidPhoto(format!(
                "{} is not a readable file",
                source.display()
            )));
        }
        if !has_accepted_extension(source) {
            return Err(StoreError::InvalidPhoto(format!(
                "{} does not have an accepted extension (png, jpg, jpeg)",
                source.display()
            )));
        }

        let ext = source
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("jpg")
            .to_ascii_lowercase();
        let images_dir = self.locations.images_dir();
        fs::create_dir_all(&images_dir)?;

        let mut file_name = format!("{}.{ext}", random_stem());
        while images_dir.join(&file_name).exists() {
            file_name = format!("{}.{ext}", random_stem());
        }
        let dest = images_dir.join(&file_name);

        self.store_optimized(source, &dest, &ext)?;
        self.write_thumbnail(&dest);

        Ok(format!("{PHOTO_PREFIX}{file_name}"))
    }

    /// Re-encode `source` into `dest`: downscale to fit the configured square
    /// bound when oversized, JPEG for jpg/jpeg targets, lossless PNG
    /// otherwise. A source the codec cannot handle degrades to a byte
    /// for byte copy rather than failing the registration.
    fn store_optimized(&self, source: &Path, dest: &Path, ext: &str) -> Result<(), StoreError> {
        let decoded = match image::open(source) {
            Ok(decoded) => decoded,
            Err(err) => {
                warn::emit(
                    "PHOTO_DECODE_FAILED",
                    "ingest",
                    &source.display().to_string(),
                    &err.to_string(),
                );
                fs::copy(source, dest)?;
                return Ok(());
            }
        };

        let max = self.config.image.max_dimension;
        let bounded = if decoded.width() > max || decoded.height() > max {
            decoded.resize(max, max, FilterType::Lanczos3)
        } else {
            decoded
        };

        let written = if ext == "png" {
            bounded.save_with_format(dest, ImageFormat::Png)
        } else {
            write_jpeg(&bounded, dest, self.config.image.jpeg_quality)
        };
        if let Err(err) = written {
            warn::emit(
                "PHOTO_ENCODE_FAILED",
                "ingest",
                &dest.display().to_string(),
                &err.to_string(),
            );
            let _ = fs::remove_file(dest);
            fs::copy(source, dest)?;
        }
        Ok(())
    }

    /// Derive `imagens/thumbs/<stem>_thumb.jpg` from an already-stored photo.
    /// The thumbnail is a disposable cache: failures are warned and
    /// swallowed, and the file is regenerable at any time.
    pub(crate) fn write_thumbnail(&self, stored: &Path) {
        let Some(file_name) = stored.file_name().and_then(|n| n.to_str()) else {
            return;
        };
        let thumb_path = self.locations.thumbnail_path(file_name);
        if let Some(parent) = thumb_path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                warn::emit(
                    "THUMB_DIR_FAILED",
                    "thumbnail",
                    &parent.display().to_string(),
                    &err.to_string(),
                );
                return;
            }
        }

        let size = self.config.image.thumb_size;
        let result = image::open(stored).and_then(|img| {
            let thumb = img.resize(size, size, FilterType::Lanczos3);
            write_jpeg(&thumb, &thumb_path, self.config.image.thumb_quality)
        });
        if let Err(err) = result {
            warn::emit(
                "THUMB_WRITE_FAILED",
                "thumbnail",
                &thumb_path.display().to_string(),
                &err.to_string(),
            );
        }
    }

    /// Delete a stored photo and its thumbnail unless some family still
    /// references the same path. Deletion is reference-counted against the
    /// roster, not unconditional: photos may be shared by path.
    pub(crate) fn cleanup_unreferenced_photo(&mut self, foto: &str) {
        if foto.is_empty() {
            return;
        }
        let still_referenced = self.load_families(false).iter().any(|f| f.foto == foto);
        if still_referenced {
            return;
        }
        self.discard_stored_photo(foto);
    }

    /// Unconditional best-effort removal of a stored photo and its thumbnail.
    pub(crate) fn discard_stored_photo(&self, foto: &str) {
        if foto.is_empty() {
            return;
        }
        let Some(file_name) = Path::new(foto).file_name().and_then(|n| n.to_str()) else {
            return;
        };

        let targets: [PathBuf; 2] = [
            self.locations.images_dir().join(file_name),
            self.locations.thumbnail_path(file_name),
        ];
        for target in targets {
            if !target.exists() {
                continue;
            }
            if let Err(err) = fs::remove_file(&target) {
                warn::emit(
                    "PHOTO_REMOVE_FAILED",
                    "cleanup",
                    &target.display().to_string(),
                    &err.to_string(),
                );
            }
        }
    }
}
