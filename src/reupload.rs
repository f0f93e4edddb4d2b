use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use sha2::{Digest, Sha256};

use crate::convert::ConvertedImage;
use crate::export::export_img;
use crate::meta::StickerInfo;
use crate::model::StickerSet;
use crate::service::StickerService;

#[derive(Debug)]
pub struct SavedSticker {
    pub path: PathBuf,
    pub info: StickerInfo,
}

#[derive(Debug)]
pub enum ReuploadOutcome {
    /// The output directory already existed, nothing was touched
    Skipped,
    Exported(Vec<SavedSticker>),
}

fn progress_bar(len: usize) -> ProgressBar {
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}") {
        bar.set_style(style);
    }
    bar
}

/// Downloads every sticker of `pack` and writes one PNG per distinct image to
/// `<output_dir>/<short name>/<emoticon>[_<n>].png`.
///
/// An existing pack directory counts as a finished export, even if an earlier run
/// was interrupted while filling it.
pub async fn reupload_pack<S>(
    service: &S,
    pack: &StickerSet,
    output_dir: &Path,
) -> Result<ReuploadOutcome>
where
    S: StickerService,
{
    let short_name = &pack.set.short_name;
    let out_dir = output_dir.join(short_name);
    if crate::fs::exists(&out_dir).await? {
        info!("skipping `{short_name}`, `{}` already exists", out_dir.display());
        return Ok(ReuploadOutcome::Skipped);
    }
    crate::fs::assert_dir(&out_dir).await?;

    info!(
        "downloading `{}` with {} stickers and writing output to `{}`",
        pack.set.title,
        pack.set.count,
        out_dir.display()
    );

    let bar = progress_bar(pack.documents.len());
    let mut images: HashMap<i64, (ConvertedImage, usize)> = HashMap::new();
    for (index, document) in pack.documents.iter().enumerate() {
        bar.set_message(format!("downloading {}", document.id));
        images.insert(document.id, (export_img(service, document).await?, index));
        bar.inc(1);
    }
    bar.finish_and_clear();

    let mut written = HashSet::new();
    let mut saved = Vec::new();
    for sticker in &pack.packs {
        for document_id in &sticker.documents {
            let Some((image, index)) = images.get(document_id) else {
                continue;
            };
            let path = crate::fs::unique_path(&out_dir, &sticker.emoticon, "png").await?;

            let hash: [u8; 32] = Sha256::digest(&image.data).into();
            if !written.insert(hash) {
                debug!(
                    "document `{document_id}` ({}) was already saved",
                    hex::encode(&hash[..8])
                );
                continue;
            }

            info!("saving {} to `{}`", sticker.emoticon, path.display());
            tokio::fs::write(&path, &image.data).await?;

            let info = StickerInfo::new(&pack.documents[*index], &pack.set);
            saved.push(SavedSticker { path, info });
        }
    }

    info!("saved {} stickers of `{short_name}`", saved.len());
    Ok(ReuploadOutcome::Exported(saved))
}
