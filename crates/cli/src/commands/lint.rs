use std::path::PathBuf;

use serde::Serialize;
use storefront_core::validation::ProductDraft;
use storefront_core::DomainError;

use crate::commands::{load_config, read_catalog, CommandResult, EXIT_INPUT};

const COMMAND: &str = "lint";

#[derive(Debug, Serialize)]
struct LintFinding<'a> {
    id: &'a str,
    issues: Vec<String>,
}

/// Runs the admin product-form checks over every entry of a catalog file.
pub fn run(catalog: PathBuf) -> CommandResult {
    if let Err(failure) = load_config(COMMAND) {
        return failure;
    }

    let products = match read_catalog(&catalog) {
        Ok(products) => products,
        Err(error) => return CommandResult::from_error(COMMAND, &error),
    };

    let findings: Vec<LintFinding<'_>> = products
        .iter()
        .filter_map(|product| match ProductDraft::from(product).validate() {
            Err(DomainError::Validation { issues, .. }) => {
                Some(LintFinding { id: &product.id.0, issues })
            }
            _ => None,
        })
        .collect();

    if findings.is_empty() {
        return CommandResult::success(
            COMMAND,
            format!("{} products passed validation", products.len()),
        );
    }

    let message = format!("{} of {} products failed validation", findings.len(), products.len());
    CommandResult::failure_with_data(
        COMMAND,
        "validation",
        message,
        EXIT_INPUT,
        serde_json::to_value(&findings).ok(),
    )
}
