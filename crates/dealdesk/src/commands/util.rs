//! Shared helpers for command handlers.

use std::future::Future;
use std::path::Path;

use dealdesk_core::{Backoffice, DeskError, EntityId, MediaUpload};
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::ListArgs;
use crate::error::CliError;

/// Resolve a category identifier (ID or name) via the reference-data
/// cache loaded at connect.
pub fn resolve_category_id(
    backoffice: &Backoffice,
    identifier: &str,
) -> Result<EntityId, CliError> {
    let categories = backoffice.categories();
    for category in categories.iter() {
        if category.id.to_string() == identifier
            || category.name.eq_ignore_ascii_case(identifier)
        {
            return Ok(category.id.clone());
        }
    }
    Err(CliError::NotFound {
        resource_type: "category".into(),
        identifier: identifier.into(),
        list_command: "categories list".into(),
    })
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Fetch one page, or every page under `--all`, from a paged endpoint.
///
/// `--all` keeps requesting until a short page comes back. A spinner on
/// stderr shows progress during the multi-page walk; indicatif hides it
/// automatically when stderr is not a terminal.
pub async fn fetch_paged<T, F, Fut>(
    list: &ListArgs,
    default_take: usize,
    fetch: F,
) -> Result<Vec<T>, CliError>
where
    F: Fn(usize, usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>, DeskError>>,
{
    let take = list.take.unwrap_or(default_take).max(1);

    if !list.all {
        return Ok(fetch(take, list.page * take).await?);
    }

    let spinner = page_spinner();
    let mut collected = Vec::new();
    let mut skip = 0;
    loop {
        spinner.set_message(format!("fetched {}...", collected.len()));
        let page = fetch(take, skip).await?;
        let exhausted = page.len() < take;
        collected.extend(page);
        if exhausted {
            break;
        }
        skip += take;
    }
    spinner.finish_and_clear();
    Ok(collected)
}

fn page_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner
}

/// Read a local file into the multipart upload shape, inferring the
/// content type from the extension.
pub fn read_media(path: &Path) -> Result<MediaUpload, CliError> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map_or_else(|| "upload.bin".to_string(), ToString::to_string);
    Ok(MediaUpload {
        content_type: content_type_for(&file_name).into(),
        file_name,
        bytes: bytes.into(),
    })
}

fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name.rsplit('.').next().unwrap_or_default();
    match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Parse positional IDs into the `(id, position)` pairs an order
/// persist expects, positions assigned first-to-last.
pub fn order_from_ids(ids: &[String]) -> Vec<(EntityId, u32)> {
    ids.iter()
        .enumerate()
        .map(|(index, id)| {
            #[allow(clippy::cast_possible_truncation)]
            let position = index as u32;
            (EntityId::from(id.as_str()), position)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_types_cover_the_common_image_formats() {
        assert_eq!(content_type_for("hero.PNG"), "image/png");
        assert_eq!(content_type_for("photo.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("archive.zip"), "application/octet-stream");
        assert_eq!(content_type_for("no_extension"), "application/octet-stream");
    }

    #[test]
    fn order_positions_follow_listing_order() {
        let order = order_from_ids(&["c".into(), "a".into(), "b".into()]);
        assert_eq!(order[0], (EntityId::from("c"), 0));
        assert_eq!(order[2], (EntityId::from("b"), 2));
    }
}
