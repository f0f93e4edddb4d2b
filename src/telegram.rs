use std::path::PathBuf;

use anyhow::Result;
use bytes::{Bytes, BytesMut};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password};
use grammers_client::{Client, Config as ClientConfig, InitParams, InvocationError, SignInError};
use grammers_session::Session;
use grammers_tl_types as tl;
use log::{debug, info, warn};
use simple_error::simple_error;

use crate::config::TelegramConfig;
use crate::model::{Document, DocumentAttribute, EmoticonPack, FileLocation, SetSummary, StickerSet};
use crate::pack_ref::ShortName;
use crate::service::StickerService;

/// `upload.getFile` accepts at most 512 KiB per request
const CHUNK_SIZE: i32 = 512 * 1024;

async fn prompt(text: &'static str) -> Result<String> {
    let input = tokio::task::spawn_blocking(move || {
        Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(text)
            .interact_text()
    })
    .await??;
    Ok(input.trim().to_string())
}

async fn prompt_password(hint: Option<String>) -> Result<String> {
    let text = match hint {
        Some(hint) => format!("Password (hint: {hint})"),
        None => "Password".to_string(),
    };
    Ok(tokio::task::spawn_blocking(move || {
        Password::with_theme(&ColorfulTheme::default())
            .with_prompt(text)
            .interact()
    })
    .await??)
}

/// Authenticated Telegram session. The session file is saved when it is closed or dropped.
pub struct TelegramSession {
    client: Client,
    session_file: PathBuf,
    closed: bool,
}

impl TelegramSession {
    /// Connects using the stored session, signing in interactively if it isn't authorized.
    pub async fn start(config: &TelegramConfig) -> Result<TelegramSession> {
        let session = Session::load_file_or_create(&config.session_file)?;
        let client = Client::connect(ClientConfig {
            session,
            api_id: config.api_id,
            api_hash: config.api_hash.clone(),
            params: InitParams::default(),
        })
        .await?;
        info!("connected to telegram");

        let session = TelegramSession {
            client,
            session_file: config.session_file.clone(),
            closed: false,
        };
        if !session.client.is_authorized().await? {
            session.sign_in().await?;
        }
        Ok(session)
    }

    async fn sign_in(&self) -> Result<()> {
        let phone = prompt("Phone number").await?;
        let token = self.client.request_login_code(&phone).await?;
        let code = prompt("Login code").await?;

        match self.client.sign_in(&token, &code).await {
            Ok(_) => {}
            Err(SignInError::PasswordRequired(password_token)) => {
                let hint = password_token.hint().map(|hint| hint.to_string());
                let password = prompt_password(hint).await?;
                self.client
                    .check_password(password_token, password.trim())
                    .await?;
            }
            Err(err) => return Err(err.into()),
        }

        self.save()?;
        info!("signed in, session saved to `{}`", self.session_file.display());
        Ok(())
    }

    fn save(&self) -> Result<()> {
        self.client.session().save_to_file(&self.session_file)?;
        Ok(())
    }

    pub fn close(mut self) -> Result<()> {
        self.closed = true;
        self.save()?;
        debug!("closed telegram session");
        Ok(())
    }
}

impl Drop for TelegramSession {
    fn drop(&mut self) {
        if !self.closed {
            if let Err(err) = self.save() {
                warn!("couldn't save session `{}`: {err}", self.session_file.display());
            }
        }
    }
}

fn set_summary(set: tl::enums::StickerSet) -> SetSummary {
    let tl::enums::StickerSet::Set(set) = set;
    SetSummary {
        id: set.id,
        short_name: set.short_name,
        title: set.title,
        count: set.count,
    }
}

fn document(document: tl::enums::Document) -> Option<Document> {
    match document {
        tl::enums::Document::Document(doc) => Some(Document {
            id: doc.id,
            mime_type: doc.mime_type,
            attributes: doc
                .attributes
                .into_iter()
                .map(|attr| match attr {
                    tl::enums::DocumentAttribute::Sticker(sticker) => {
                        DocumentAttribute::Sticker { alt: sticker.alt }
                    }
                    _ => DocumentAttribute::Other,
                })
                .collect(),
            location: FileLocation {
                access_hash: doc.access_hash,
                file_reference: doc.file_reference,
            },
        }),
        tl::enums::Document::Empty(empty) => {
            warn!("document `{}` is empty", empty.id);
            None
        }
    }
}

fn emoticon_pack(pack: tl::enums::StickerPack) -> EmoticonPack {
    let tl::enums::StickerPack::Pack(pack) = pack;
    EmoticonPack {
        emoticon: pack.emoticon,
        documents: pack.documents,
    }
}

impl StickerService for TelegramSession {
    async fn saved_sets(&self) -> Result<Vec<SetSummary>> {
        let request = tl::functions::messages::GetAllStickers { hash: 0 };
        match self.client.invoke(&request).await? {
            tl::enums::messages::AllStickers::Stickers(all) => {
                Ok(all.sets.into_iter().map(set_summary).collect())
            }
            tl::enums::messages::AllStickers::NotModified => {
                Err(simple_error!("saved sticker sets were reported as not modified").into())
            }
        }
    }

    async fn sticker_set(&self, short_name: &ShortName) -> Result<StickerSet> {
        let request = tl::functions::messages::GetStickerSet {
            stickerset: tl::enums::InputStickerSet::ShortName(
                tl::types::InputStickerSetShortName {
                    short_name: short_name.as_str().to_string(),
                },
            ),
            hash: 0,
        };
        match self.client.invoke(&request).await? {
            tl::enums::messages::StickerSet::Set(full) => {
                info!("fetched sticker set `{short_name}`");
                Ok(StickerSet {
                    set: set_summary(full.set),
                    packs: full.packs.into_iter().map(emoticon_pack).collect(),
                    documents: full.documents.into_iter().filter_map(document).collect(),
                })
            }
            tl::enums::messages::StickerSet::NotModified => {
                Err(simple_error!("sticker set `{}` was reported as not modified", short_name).into())
            }
        }
    }

    async fn download_document(&self, document: &Document) -> Result<Bytes> {
        let location = tl::enums::InputFileLocation::InputDocumentFileLocation(
            tl::types::InputDocumentFileLocation {
                id: document.id,
                access_hash: document.location.access_hash,
                file_reference: document.location.file_reference.clone(),
                thumb_size: String::new(),
            },
        );

        let mut data = BytesMut::new();
        let mut dc_id = None;
        loop {
            let request = tl::functions::upload::GetFile {
                precise: false,
                cdn_supported: false,
                location: location.clone(),
                offset: data.len() as i64,
                limit: CHUNK_SIZE,
            };
            let response = match dc_id {
                Some(dc_id) => self.client.invoke_in_dc(&request, dc_id).await,
                None => self.client.invoke(&request).await,
            };
            let file = match response {
                Ok(tl::enums::upload::File::File(file)) => file,
                Ok(tl::enums::upload::File::CdnRedirect(_)) => {
                    return Err(simple_error!("document `{}` is served from a CDN", document.id).into());
                }
                Err(InvocationError::Rpc(err))
                    if err.name == "FILE_MIGRATE" && dc_id.is_none() && err.value.is_some() =>
                {
                    dc_id = err.value.map(|dc| dc as i32);
                    debug!("document `{}` lives in dc {dc_id:?}", document.id);
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            let last = file.bytes.len() < CHUNK_SIZE as usize;
            data.extend_from_slice(&file.bytes);
            if last {
                break;
            }
        }

        Ok(data.freeze())
    }
}
