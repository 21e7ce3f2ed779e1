//! Category command handlers.

use dealdesk_core::{
    Backoffice, Category, CategoryDraft, Command as CoreCommand, CommandResult, OrderedList,
};
use tabled::Tabled;

use crate::cli::{CategoriesArgs, CategoriesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Pos")]
    position: u32,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Parent")]
    parent: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl CategoryRow {
    /// Parent names come from the same snapshot the row does.
    fn new(category: &Category, all: &[Category]) -> Self {
        let parent = category
            .parent_id
            .as_ref()
            .map(|pid| {
                all.iter()
                    .find(|c| &c.id == pid)
                    .map_or_else(|| pid.to_string(), |c| c.name.clone())
            })
            .unwrap_or_default();
        Self {
            position: category.position,
            id: category.id.to_string(),
            name: category.name.clone(),
            parent,
            description: category.description.clone(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    backoffice: &Backoffice,
    args: CategoriesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        CategoriesCommand::List => {
            let categories = backoffice.categories();
            let out = output::render_list(
                &global.output,
                &categories,
                |c| CategoryRow::new(c, &categories),
                |c| c.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CategoriesCommand::Create {
            name,
            description,
            parent,
            image,
        } => {
            let parent_id = parent
                .map(|p| util::resolve_category_id(backoffice, &p))
                .transpose()?;
            let image = image.map(|path| util::read_media(&path)).transpose()?;

            // Append within the target sibling scope.
            let categories = backoffice.categories();
            let siblings = categories
                .iter()
                .filter(|c| c.parent_id == parent_id)
                .count();
            #[allow(clippy::cast_possible_truncation)]
            let position = siblings as u32;

            let draft = CategoryDraft {
                name: name.clone(),
                description,
                position,
                parent_id,
                image,
            };
            let result = backoffice
                .execute(CoreCommand::CreateCategory(draft))
                .await?;
            if !global.quiet {
                let id = match result {
                    CommandResult::Category(category) => category.id.to_string(),
                    _ => "-".into(),
                };
                eprintln!(
                    "{} Category '{name}' created ({id})",
                    output::check_mark(&global.color)
                );
            }
            Ok(())
        }

        CategoriesCommand::Update {
            category,
            name,
            description,
            parent,
            image,
        } => {
            let id = util::resolve_category_id(backoffice, &category)?;
            let existing = backoffice
                .category_by_id(&id)
                .ok_or_else(|| not_found(&category))?;

            let parent_id = match parent {
                Some(p) => Some(util::resolve_category_id(backoffice, &p)?),
                None => existing.parent_id.clone(),
            };
            let image = image.map(|path| util::read_media(&path)).transpose()?;

            // The endpoint replaces the whole record, so unset flags keep
            // their current values.
            let draft = CategoryDraft {
                name: name.unwrap_or_else(|| existing.name.clone()),
                description: description.unwrap_or_else(|| existing.description.clone()),
                position: existing.position,
                parent_id,
                image,
            };
            backoffice
                .execute(CoreCommand::UpdateCategory { id, draft })
                .await?;
            if !global.quiet {
                eprintln!("{} Category updated", output::check_mark(&global.color));
            }
            Ok(())
        }

        CategoriesCommand::Delete { category } => {
            let id = util::resolve_category_id(backoffice, &category)?;
            if !util::confirm(&format!("Delete category '{category}'?"), global.yes)? {
                return Ok(());
            }
            backoffice
                .execute(CoreCommand::DeleteCategory { id })
                .await?;
            if !global.quiet {
                eprintln!("{} Category deleted", output::check_mark(&global.color));
            }
            Ok(())
        }

        CategoriesCommand::Move { from, to } => {
            let mut list = OrderedList::new(backoffice.categories().as_ref().clone());
            if !list.move_item(from, to) {
                return Err(CliError::Validation {
                    field: "from/to".into(),
                    reason: format!(
                        "positions must be distinct and below {}",
                        list.len()
                    ),
                });
            }
            backoffice
                .execute(CoreCommand::SaveCategoryOrder { order: list.order() })
                .await?;
            if !global.quiet {
                eprintln!(
                    "{} Moved position {from} to {to}",
                    output::check_mark(&global.color)
                );
            }
            Ok(())
        }

        CategoriesCommand::SaveOrder { ids } => {
            for id in &ids {
                util::resolve_category_id(backoffice, id)?;
            }
            let order = util::order_from_ids(&ids);
            let total = order.len();
            backoffice
                .execute(CoreCommand::SaveCategoryOrder { order })
                .await?;
            if !global.quiet {
                eprintln!(
                    "{} Order saved ({total} categories)",
                    output::check_mark(&global.color)
                );
            }
            Ok(())
        }
    }
}

fn not_found(identifier: &str) -> CliError {
    CliError::NotFound {
        resource_type: "category".into(),
        identifier: identifier.into(),
        list_command: "categories list".into(),
    }
}
