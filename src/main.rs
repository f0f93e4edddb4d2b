mod config;
mod convert;
mod export;
mod fs;
mod logging;
mod meta;
mod model;
mod opt;
mod pack_ref;
mod reupload;
mod service;
mod telegram;

use std::path::Path;

use anyhow::Result;
use log::{debug, error};
use structopt::StructOpt;

use config::{Config, TelegramConfig};
use model::SetSummary;
use opt::Opt;
use pack_ref::ShortName;
use reupload::{reupload_pack, ReuploadOutcome};
use service::StickerService;
use telegram::TelegramSession;

/// `{index}. {title} (t.me/addstickers/{short_name})`, indices right-aligned
fn format_saved_sets(sets: &[SetSummary]) -> Vec<String> {
    let width = sets.len().to_string().len();
    sets.iter()
        .enumerate()
        .map(|(index, set)| {
            format!(
                "{:>width$}. {} (t.me/addstickers/{})",
                index + 1,
                set.title,
                set.short_name
            )
        })
        .collect()
}

/// Fetches and exports each pack in order, stopping at the first failure.
async fn import_packs<S>(
    service: &S,
    short_names: &[ShortName],
    output_dir: &Path,
) -> Result<Vec<ReuploadOutcome>>
where
    S: StickerService,
{
    let mut outcomes = Vec::with_capacity(short_names.len());
    for short_name in short_names {
        let pack = service.sticker_set(short_name).await?;
        outcomes.push(reupload_pack(service, &pack, output_dir).await?);
    }
    Ok(outcomes)
}

async fn dispatch<S>(service: &S, opt: &Opt, short_names: &[ShortName]) -> Result<()>
where
    S: StickerService,
{
    if opt.list {
        let sets = service.saved_sets().await?;
        println!("Your saved sticker packs:");
        for line in format_saved_sets(&sets) {
            println!("{line}");
        }
    } else {
        for outcome in import_packs(service, short_names, &opt.output_dir).await? {
            let ReuploadOutcome::Exported(saved) = outcome else {
                continue;
            };
            for sticker in saved {
                let info = serde_json::to_string(&sticker.info)?;
                debug!("`{}`: {info}", sticker.path.display());
            }
        }
    }
    Ok(())
}

async fn run(opt: Opt) -> Result<()> {
    // a single bad reference aborts the whole batch before anything remote happens
    let short_names = pack_ref::parse_all(&opt.packs)?;
    if !opt.list && short_names.is_empty() {
        Opt::clap().print_help()?;
        println!();
        return Ok(());
    }

    let config = Config::load(&opt.config).await?;
    debug!("using homeserver `{}`", config.homeserver);

    let session = TelegramSession::start(&TelegramConfig::from_env(&opt.session)?).await?;
    let result = dispatch(&session, &opt, &short_names).await;
    let closed = session.close();
    result.and(closed)
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let opt = Opt::from_args();

    if let Err(err) = logging::init(opt.verbose) {
        eprintln!("couldn't initialize logging: {err}");
        std::process::exit(1);
    }

    if let Err(err) = run(opt).await {
        error!("{err:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reupload::tests::{document, png, sticker_set, MockService};

    fn summary(index: usize) -> SetSummary {
        SetSummary {
            id: index as i64,
            short_name: format!("pack{index}"),
            title: format!("Pack {index}"),
            count: 1,
        }
    }

    #[test]
    fn saved_sets_are_aligned() {
        let sets = (1..=10).map(summary).collect::<Vec<_>>();
        let lines = format_saved_sets(&sets);
        assert_eq!(lines[0], " 1. Pack 1 (t.me/addstickers/pack1)");
        assert_eq!(lines[9], "10. Pack 10 (t.me/addstickers/pack10)");

        let lines = format_saved_sets(&sets[..3]);
        assert_eq!(lines[2], "3. Pack 3 (t.me/addstickers/pack3)");
        assert!(format_saved_sets(&[]).is_empty());
    }

    #[tokio::test]
    async fn imports_link_end_to_end() {
        let root = tempfile::tempdir().unwrap();
        let pack = sticker_set(
            "testpack",
            &[("😀", &[1]), ("😀", &[2])],
            vec![document(1, "😀"), document(2, "😀")],
        );
        let same = png([200, 100, 50, 255]);
        let service = MockService::new(vec![pack], vec![(1, same.clone()), (2, same)]);

        let short_names = pack_ref::parse_all(["https://t.me/addstickers/testpack"]).unwrap();
        let outcomes = import_packs(&service, &short_names, root.path())
            .await
            .unwrap();
        assert_eq!(outcomes.len(), 1);

        let files = std::fs::read_dir(root.path().join("testpack"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        assert_eq!(files, vec!["😀.png"]);
    }

    #[tokio::test]
    async fn unknown_pack_stops_the_batch() {
        let root = tempfile::tempdir().unwrap();
        let pack = sticker_set("known", &[("😀", &[1])], vec![document(1, "😀")]);
        let service = MockService::new(vec![pack], vec![(1, png([1, 1, 1, 255]))]);

        let short_names = pack_ref::parse_all(["missing", "known"]).unwrap();
        assert!(import_packs(&service, &short_names, root.path()).await.is_err());
        assert!(!root.path().join("known").exists());
    }

    #[tokio::test]
    async fn list_mode_downloads_nothing() {
        let root = tempfile::tempdir().unwrap();
        let pack = sticker_set("listed", &[("😀", &[1])], vec![document(1, "😀")]);
        let service = MockService::new(vec![pack], vec![(1, png([1, 1, 1, 255]))]);
        let opt = Opt::from_iter([
            "sticker-export",
            "--list",
            "--output-dir",
            root.path().to_str().unwrap(),
            "listed",
        ]);

        dispatch(&service, &opt, &pack_ref::parse_all(&opt.packs).unwrap())
            .await
            .unwrap();
        assert_eq!(service.downloads.get(), 0);
        assert!(!root.path().join("listed").exists());
    }
}
