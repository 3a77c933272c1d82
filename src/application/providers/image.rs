use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;

use ::image::{DynamicImage, ImageFormat, ImageReader};
use async_trait::async_trait;
use tracing::debug;

use super::{FileProvider, MediaProvider, ProviderError, ThumbnailFormat};
use crate::domain::entities::Media;
use crate::infrastructure::storage::FileStorage;

/// File handling plus image dimensions and per-context thumbnails
pub struct ImageProvider {
    file: FileProvider,
    formats: HashMap<String, Vec<ThumbnailFormat>>,
}

impl ImageProvider {
    pub fn new(storage: Arc<dyn FileStorage>) -> Self {
        Self { file: FileProvider::with_name("image", storage), formats: HashMap::new() }
    }

    /// Thumbnail formats generated for media in `context`
    #[must_use]
    pub fn with_formats(
        mut self,
        context: impl Into<String>,
        formats: Vec<ThumbnailFormat>,
    ) -> Self {
        self.formats.insert(context.into(), formats);
        self
    }

    pub fn formats(&self, context: &str) -> &[ThumbnailFormat] {
        self.formats.get(context).map(Vec::as_slice).unwrap_or_default()
    }

    /// Thumbnail location: next to the main file, `thumb_<id>_<format>.<ext>`
    pub fn thumbnail_path(media: &Media, format: &ThumbnailFormat) -> Option<String> {
        let reference = FileProvider::reference_path(media)?;
        let (dir, file) = reference.rsplit_once('/')?;
        let ext = file.rsplit_once('.').map_or("png", |(_, ext)| ext);
        Some(format!("{dir}/thumb_{}_{}.{ext}", media.id, format.name))
    }

    fn thumbnail_paths(&self, media: &Media) -> Vec<String> {
        self.formats(&media.context)
            .iter()
            .filter_map(|format| Self::thumbnail_path(media, format))
            .collect()
    }

    async fn generate_thumbnails(
        &self,
        media: &Media,
        source: &[u8],
    ) -> Result<usize, ProviderError> {
        let formats = self.formats(&media.context);
        if formats.is_empty() {
            return Ok(0);
        }

        let image = ::image::load_from_memory(source)?;
        let mut written = 0;

        for format in formats {
            let Some(path) = Self::thumbnail_path(media, format) else {
                continue;
            };

            let encoding = ImageFormat::from_path(&path).unwrap_or(ImageFormat::Png);
            let thumbnail = image.thumbnail(format.width, format.height);
            let thumbnail = match encoding {
                ImageFormat::Jpeg => DynamicImage::ImageRgb8(thumbnail.to_rgb8()),
                _ => thumbnail,
            };

            let mut buffer = Cursor::new(Vec::new());
            thumbnail.write_to(&mut buffer, encoding)?;
            self.file.storage().store(&path, buffer.get_ref()).await?;
            written += 1;
        }

        Ok(written)
    }
}

impl std::fmt::Debug for ImageProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageProvider").field("formats", &self.formats).finish_non_exhaustive()
    }
}

#[async_trait]
impl MediaProvider for ImageProvider {
    fn name(&self) -> &str {
        self.file.name()
    }

    async fn transform(&self, media: &mut Media) -> Result<(), ProviderError> {
        let Some(content) = media.binary_content.as_ref() else {
            return self.file.transform(media).await;
        };

        let format = ::image::guess_format(&content.bytes).map_err(|_| {
            ProviderError::InvalidContent {
                message: format!("uploaded file `{}` is not a supported image", content.filename),
            }
        })?;
        let (width, height) =
            ImageReader::with_format(Cursor::new(content.bytes.as_slice()), format)
                .into_dimensions()?;

        let previous_reference = media.provider_reference.clone();
        let previous_thumbnails = self.thumbnail_paths(media);

        self.file.transform(media).await?;

        if media.id.is_assigned() && media.provider_reference != previous_reference {
            self.file.retire(media.id, previous_thumbnails).await;
        }

        media.width = Some(width);
        media.height = Some(height);
        media.content_type = Some(format.to_mime_type().to_string());

        Ok(())
    }

    async fn pre_persist(&self, media: &mut Media) -> Result<(), ProviderError> {
        self.file.pre_persist(media).await
    }

    async fn post_persist(&self, media: &mut Media) -> Result<(), ProviderError> {
        let source = media.binary_content.as_ref().map(|content| content.bytes.clone());
        self.file.post_persist(media).await?;

        if let Some(source) = source {
            let count = self.generate_thumbnails(media, &source).await?;
            debug!(media_id = %media.id, count, "Generated thumbnails");
        }
        Ok(())
    }

    async fn pre_update(&self, media: &mut Media) -> Result<(), ProviderError> {
        self.file.pre_update(media).await
    }

    async fn post_update(&self, media: &mut Media) -> Result<(), ProviderError> {
        let source = media.binary_content.as_ref().map(|content| content.bytes.clone());
        // Retired thumbnails may share a path with the new ones; delete first
        self.file.post_update(media).await?;

        if let Some(source) = source {
            let count = self.generate_thumbnails(media, &source).await?;
            debug!(media_id = %media.id, count, "Regenerated thumbnails");
        }
        Ok(())
    }

    async fn pre_remove(&self, media: &mut Media) -> Result<(), ProviderError> {
        self.file.pre_remove(media).await?;
        self.file.retire(media.id, self.thumbnail_paths(media)).await;
        Ok(())
    }

    async fn post_remove(&self, media: &mut Media) -> Result<(), ProviderError> {
        self.file.post_remove(media).await
    }
}
