use std::path::PathBuf;

use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "sticker-export",
    about = "Export Telegram sticker packs for the sticker picker widget."
)]
pub struct Opt {
    /// List your saved sticker packs
    #[structopt(long)]
    pub list: bool,

    /// Telegram session file name
    #[structopt(long, default_value = "sticker-import")]
    pub session: String,

    /// Path to JSON file with Matrix homeserver and access_token
    #[structopt(long, default_value = "config.json", parse(from_os_str))]
    pub config: PathBuf,

    /// Directory to write packs to
    #[structopt(long, default_value = "web/packs/", parse(from_os_str))]
    pub output_dir: PathBuf,

    /// Log debug output
    #[structopt(short, long)]
    pub verbose: bool,

    /// Sticker pack URLs to import
    #[structopt(name = "PACK")]
    pub packs: Vec<String>,
}
