use anyhow::Result;
use bytes::Bytes;

use crate::model::{Document, SetSummary, StickerSet};
use crate::pack_ref::ShortName;

/// Remote side of the exporter. Calls are made strictly one after another.
#[allow(async_fn_in_trait)]
pub trait StickerService {
    /// All sticker packs saved by the logged-in account
    async fn saved_sets(&self) -> Result<Vec<SetSummary>>;
    async fn sticker_set(&self, short_name: &ShortName) -> Result<StickerSet>;
    async fn download_document(&self, document: &Document) -> Result<Bytes>;
}
