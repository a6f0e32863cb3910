use std::path::PathBuf;

use autobiz_core::catalog::TemplateQuery;
use autobiz_core::domain::template::TemplateCategory;
use serde::Serialize;

use crate::commands::{load_catalog, CommandResult, EXIT_INVALID_ARGUMENT};

#[derive(Debug, Serialize)]
struct TemplateRow {
    id: String,
    name: String,
    category: TemplateCategory,
    price: u32,
    estimated_roi: u32,
}

pub fn run(
    query: Option<String>,
    category: Option<String>,
    catalog_path: Option<PathBuf>,
) -> CommandResult {
    let category = match category.as_deref().map(str::parse::<TemplateCategory>).transpose() {
        Ok(category) => category,
        Err(error) => {
            return CommandResult::failure(
                "catalog",
                "invalid_argument",
                error.to_string(),
                EXIT_INVALID_ARGUMENT,
            );
        }
    };

    let catalog = match load_catalog("catalog", catalog_path) {
        Ok(catalog) => catalog,
        Err(result) => return result,
    };

    let rows = catalog
        .search(&TemplateQuery { text: query, category, ..TemplateQuery::default() })
        .iter()
        .map(|template| TemplateRow {
            id: template.id.to_string(),
            name: template.name.clone(),
            category: template.category,
            price: template.price,
            estimated_roi: template.estimated_roi,
        })
        .collect::<Vec<_>>();

    CommandResult::success_with_data(
        "catalog",
        format!("{} of {} templates matched", rows.len(), catalog.len()),
        &rows,
    )
}
