/// Summary of a saved sticker pack, as returned by the pack listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetSummary {
    pub id: i64,
    pub short_name: String,
    pub title: String,
    pub count: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentAttribute {
    /// Pack-internal display alias of a sticker
    Sticker { alt: String },
    Other,
}

/// Whatever the remote needs to fetch the media payload again
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileLocation {
    pub access_hash: i64,
    pub file_reference: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: i64,
    pub mime_type: String,
    pub attributes: Vec<DocumentAttribute>,
    pub location: FileLocation,
}

impl Document {
    pub fn sticker_alt(&self) -> Option<&str> {
        self.attributes.iter().find_map(|attr| match attr {
            DocumentAttribute::Sticker { alt } => Some(alt.as_str()),
            _ => None,
        })
    }
}

/// One emoticon and the documents it is associated with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmoticonPack {
    pub emoticon: String,
    pub documents: Vec<i64>,
}

/// Full snapshot of a sticker pack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StickerSet {
    pub set: SetSummary,
    pub packs: Vec<EmoticonPack>,
    pub documents: Vec<Document>,
}
