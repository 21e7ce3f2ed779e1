//! Media gallery command handlers.

use bytesize::ByteSize;
use dealdesk_core::{Backoffice, Command as CoreCommand, EntityId, MediaItem};
use tabled::Tabled;

use crate::cli::{GalleryArgs, GalleryCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct MediaRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Type")]
    mime: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&MediaItem> for MediaRow {
    fn from(m: &MediaItem) -> Self {
        Self {
            id: m.id.to_string(),
            name: m.display_name().to_string(),
            size: m
                .size_bytes
                .map_or_else(|| "-".into(), |s| ByteSize(s).to_string()),
            mime: m.mime_type.clone().unwrap_or_default(),
            created: m
                .created_at
                .map_or_else(String::new, |t| t.format("%Y-%m-%d %H:%M").to_string()),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    backoffice: &Backoffice,
    args: GalleryArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        GalleryCommand::List(list) => {
            let media = util::fetch_paged(&list, backoffice.default_take(), |take, skip| async move {
                backoffice.fetch_media(take, skip).await
            })
            .await?;
            let out =
                output::render_list(&global.output, &media, |m| MediaRow::from(m), |m| m.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GalleryCommand::Upload { files } => {
            let uploads = files
                .iter()
                .map(|path| util::read_media(path))
                .collect::<Result<Vec<_>, _>>()?;
            let count = uploads.len();
            backoffice
                .execute(CoreCommand::UploadMedia { files: uploads })
                .await?;
            if !global.quiet {
                eprintln!(
                    "{} Uploaded {count} file{}",
                    output::check_mark(&global.color),
                    if count == 1 { "" } else { "s" }
                );
            }
            Ok(())
        }

        GalleryCommand::Delete { media } => {
            if !util::confirm(&format!("Delete media {media}?"), global.yes)? {
                return Ok(());
            }
            backoffice
                .execute(CoreCommand::DeleteMedia {
                    id: EntityId::from(media),
                })
                .await?;
            if !global.quiet {
                eprintln!("{} Media deleted", output::check_mark(&global.color));
            }
            Ok(())
        }
    }
}
