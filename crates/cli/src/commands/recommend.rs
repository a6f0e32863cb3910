use std::path::PathBuf;

use autobiz_core::domain::profile::BusinessProfile;
use autobiz_core::domain::recommendation::Recommendation;
use autobiz_core::extract::extract_profile;
use autobiz_core::recommend::recommend;
use serde::Serialize;

use crate::commands::{load_catalog, CommandResult, EXIT_INVALID_ARGUMENT};

#[derive(Debug, Serialize)]
struct RecommendOutput {
    profile: BusinessProfile,
    recommendations: Vec<Recommendation>,
}

pub fn run(messages: &[String], catalog_path: Option<PathBuf>) -> CommandResult {
    if messages.iter().all(|message| message.trim().is_empty()) {
        return CommandResult::failure(
            "recommend",
            "invalid_argument",
            "at least one non-empty --message is required",
            EXIT_INVALID_ARGUMENT,
        );
    }

    let catalog = match load_catalog("recommend", catalog_path) {
        Ok(catalog) => catalog,
        Err(result) => return result,
    };

    let profile = extract_profile(messages);
    let recommendations = recommend(&profile, &catalog);
    let message = if recommendations.is_empty() {
        "no template cleared the recommendation threshold".to_string()
    } else {
        format!("{} recommendation(s) from {} templates", recommendations.len(), catalog.len())
    };

    CommandResult::success_with_data(
        "recommend",
        message,
        &RecommendOutput { profile, recommendations },
    )
}
