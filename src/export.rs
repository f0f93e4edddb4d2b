use anyhow::Result;
use log::{debug, info};

use crate::convert::{convert_image, ConvertedImage};
use crate::model::Document;
use crate::service::StickerService;

/// Downloads a sticker document and converts it to PNG. Nothing is written to disk.
pub async fn export_img<S>(service: &S, document: &Document) -> Result<ConvertedImage>
where
    S: StickerService,
{
    info!(
        "downloading document `{}` ({})",
        document.id, document.mime_type
    );
    let data = service.download_document(document).await?;
    let converted = convert_image(&data)?;
    debug!(
        "converted document `{}` ({} -> {} bytes, {}x{})",
        document.id,
        data.len(),
        converted.data.len(),
        converted.width,
        converted.height
    );
    Ok(converted)
}
