//! Product command handlers.

use dealdesk_core::{
    Backoffice, Command as CoreCommand, CommandResult, EntityId, OrderedList, Product,
    ProductDraft, ProductFilter, ProductPatch, ProductState, Variant,
};
use tabled::Tabled;

use crate::cli::{GlobalOpts, ProductFilterArgs, ProductsArgs, ProductsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "Pos")]
    position: u32,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Vendor")]
    vendor: String,
}

impl From<&Product> for ProductRow {
    fn from(p: &Product) -> Self {
        Self {
            position: p.position,
            id: p.id.to_string(),
            title: p.title.clone(),
            price: format!("{:.2}", p.price),
            state: p.state.to_string(),
            category: p.category_name.clone().unwrap_or_default(),
            vendor: p.vendor_name.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct VariantRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "SKU")]
    sku: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Stock")]
    stock: String,
}

impl From<&Variant> for VariantRow {
    fn from(v: &Variant) -> Self {
        Self {
            id: v.id.to_string(),
            name: v.name.clone(),
            sku: v.sku.clone().unwrap_or_default(),
            price: v.price.map_or_else(|| "-".into(), |p| format!("{p:.2}")),
            stock: v.stock.map_or_else(|| "-".into(), |s| s.to_string()),
        }
    }
}

fn detail(p: &Product) -> String {
    let mut lines = vec![
        format!("ID:          {}", p.id),
        format!("Title:       {}", p.title),
        format!("Price:       {:.2}", p.price),
        format!("State:       {}", p.state),
        format!("Position:    {}", p.position),
        format!("Category:    {}", p.category_name.as_deref().unwrap_or("-")),
        format!("Vendor:      {}", p.vendor_name.as_deref().unwrap_or("-")),
        format!(
            "Created:     {}",
            p.created_at
                .map_or_else(|| "-".into(), |t| t.to_rfc3339())
        ),
        format!("Description: {}", p.description),
    ];
    if !p.images.is_empty() {
        lines.push(format!("Images:      {}", p.images.join(", ")));
    }
    lines.join("\n")
}

// ── Filter & state parsing ──────────────────────────────────────────

/// `ACTIVE`/`INACTIVE`/`DRAFT` parsed case-insensitively, with any other
/// spelling rejected up front rather than bounced off the API.
fn parse_state(value: &str) -> Result<ProductState, CliError> {
    match value.parse() {
        Ok(ProductState::Unknown(other)) => Err(CliError::Validation {
            field: "state".into(),
            reason: format!("unknown state '{other}' (expected active, inactive, or draft)"),
        }),
        Ok(state) => Ok(state),
        Err(_) => Err(CliError::Validation {
            field: "state".into(),
            reason: format!("unknown state '{value}'"),
        }),
    }
}

fn build_filter(
    backoffice: &Backoffice,
    args: ProductFilterArgs,
) -> Result<ProductFilter, CliError> {
    let category_id = args
        .category
        .map(|c| util::resolve_category_id(backoffice, &c))
        .transpose()?;
    let state = args.state.map(|s| parse_state(&s)).transpose()?;
    Ok(ProductFilter {
        query: args.query,
        category_id,
        state,
    })
}

/// The whole filtered listing, walking pages until exhaustion. Reorders
/// need every row because positions are listing-wide.
async fn fetch_whole_listing(
    backoffice: &Backoffice,
    filter: &ProductFilter,
) -> Result<Vec<Product>, CliError> {
    let take = backoffice.default_take().max(1);
    let mut products = Vec::new();
    let mut skip = 0;
    loop {
        let page = backoffice.fetch_products(filter, take, skip).await?;
        let exhausted = page.len() < take;
        products.extend(page);
        if exhausted {
            break;
        }
        skip += take;
    }
    Ok(products)
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    backoffice: &Backoffice,
    args: ProductsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ProductsCommand::List { filter, list } => {
            let filter = build_filter(backoffice, filter)?;
            let products = util::fetch_paged(&list, backoffice.default_take(), |take, skip| {
                let filter = filter.clone();
                async move { backoffice.fetch_products(&filter, take, skip).await }
            })
            .await?;
            let out = output::render_list(
                &global.output,
                &products,
                |p| ProductRow::from(p),
                |p| p.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProductsCommand::Show { product } => {
            let found = backoffice.fetch_product(&EntityId::from(product)).await?;
            let out = output::render_single(&global.output, &found, detail, |p| p.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProductsCommand::Create {
            title,
            price,
            category,
            description,
            state,
            image,
        } => {
            let draft = ProductDraft {
                title: title.clone(),
                description,
                price,
                state: parse_state(&state)?,
                category_id: util::resolve_category_id(backoffice, &category)?,
                images: image,
            };
            let result = backoffice
                .execute(CoreCommand::CreateProduct(draft))
                .await?;
            if !global.quiet {
                let id = match result {
                    CommandResult::Product(product) => product.id.to_string(),
                    _ => "-".into(),
                };
                eprintln!(
                    "{} Product '{title}' created ({id})",
                    output::check_mark(&global.color)
                );
            }
            Ok(())
        }

        ProductsCommand::Update {
            product,
            title,
            description,
            price,
            state,
            category,
        } => {
            let update = ProductPatch {
                title,
                description,
                price,
                state: state.map(|s| parse_state(&s)).transpose()?,
                category_id: category
                    .map(|c| util::resolve_category_id(backoffice, &c))
                    .transpose()?,
            };
            if update.is_empty() {
                return Err(CliError::Validation {
                    field: "product".into(),
                    reason: "nothing to update; pass at least one field flag".into(),
                });
            }
            backoffice
                .execute(CoreCommand::UpdateProduct {
                    id: EntityId::from(product),
                    update,
                })
                .await?;
            if !global.quiet {
                eprintln!("{} Product updated", output::check_mark(&global.color));
            }
            Ok(())
        }

        ProductsCommand::Delete { product } => {
            if !util::confirm(&format!("Delete product {product}?"), global.yes)? {
                return Ok(());
            }
            backoffice
                .execute(CoreCommand::DeleteProduct {
                    id: EntityId::from(product),
                })
                .await?;
            if !global.quiet {
                eprintln!("{} Product deleted", output::check_mark(&global.color));
            }
            Ok(())
        }

        ProductsCommand::Reorder { filter, from, to } => {
            let filter = build_filter(backoffice, filter)?;
            let products = fetch_whole_listing(backoffice, &filter).await?;
            let mut list = OrderedList::new(products);
            if !list.move_item(from, to) {
                return Err(CliError::Validation {
                    field: "from/to".into(),
                    reason: format!("positions must be distinct and below {}", list.len()),
                });
            }
            backoffice
                .execute(CoreCommand::SaveProductOrder { order: list.order() })
                .await?;
            if !global.quiet {
                eprintln!(
                    "{} Moved position {from} to {to}",
                    output::check_mark(&global.color)
                );
            }
            Ok(())
        }

        ProductsCommand::SaveOrder { ids } => {
            let order = util::order_from_ids(&ids);
            let total = order.len();
            backoffice
                .execute(CoreCommand::SaveProductOrder { order })
                .await?;
            if !global.quiet {
                eprintln!(
                    "{} Order saved ({total} products)",
                    output::check_mark(&global.color)
                );
            }
            Ok(())
        }

        ProductsCommand::Variants { product } => {
            let variants = backoffice
                .fetch_variants(&EntityId::from(product))
                .await?;
            let out = output::render_list(
                &global.output,
                &variants,
                |v| VariantRow::from(v),
                |v| v.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProductsCommand::RemoveVariant { variant } => {
            if !util::confirm(&format!("Remove variant {variant}?"), global.yes)? {
                return Ok(());
            }
            backoffice
                .execute(CoreCommand::RemoveVariant {
                    variant_id: EntityId::from(variant),
                })
                .await?;
            if !global.quiet {
                eprintln!("{} Variant removed", output::check_mark(&global.color));
            }
            Ok(())
        }
    }
}
