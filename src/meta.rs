use serde::Serialize;

use crate::model::{Document, SetSummary};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackSource {
    pub id: String,
    pub short_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TelegramSource {
    pub pack: PackSource,
    pub id: String,
    pub emoticons: Vec<String>,
}

/// Metadata of one exported sticker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StickerInfo {
    /// Sticker alias; absent when the document has no sticker attribute
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub id: String,
    #[serde(rename = "net.maunium.telegram.sticker")]
    pub telegram: TelegramSource,
}

impl StickerInfo {
    pub fn new(document: &Document, pack: &SetSummary) -> StickerInfo {
        StickerInfo {
            body: document.sticker_alt().map(str::to_string),
            id: format!("tg-{}", document.id),
            telegram: TelegramSource {
                pack: PackSource {
                    id: pack.id.to_string(),
                    short_name: pack.short_name.clone(),
                },
                id: document.id.to_string(),
                emoticons: Vec::new(),
            },
        }
    }
}
