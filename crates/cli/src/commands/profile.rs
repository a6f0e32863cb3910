use autobiz_core::extract::extract_profile;

use crate::commands::{CommandResult, EXIT_INVALID_ARGUMENT};

pub fn run(messages: &[String]) -> CommandResult {
    if messages.iter().all(|message| message.trim().is_empty()) {
        return CommandResult::failure(
            "profile",
            "invalid_argument",
            "at least one non-empty --message is required",
            EXIT_INVALID_ARGUMENT,
        );
    }

    let profile = extract_profile(messages);
    CommandResult::success_with_data(
        "profile",
        format!("extracted profile for industry `{}`", profile.industry),
        &profile,
    )
}
