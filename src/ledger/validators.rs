// src/ledger/validators.rs

use super::models::SubmitClipRequest;
use crate::common::{ValidationResult, Validator};
use regex::Regex;
use std::collections::HashSet;

// ============================================================================
// Clip Submission Validators
// ============================================================================

pub struct ClipValidator;

impl Validator<SubmitClipRequest> for ClipValidator {
    fn validate(&self, data: &SubmitClipRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        let valid_platforms = HashSet::from(["tiktok", "instagram", "youtube"]);
        let platform = data.platform.to_lowercase();
        if !valid_platforms.contains(platform.as_str()) {
            result.add_error(
                "platform",
                "Invalid platform. Valid options: tiktok, instagram, youtube",
            );
        }

        if data.video_url.trim().is_empty() {
            result.add_error("video_url", "Video URL is required");
        } else if data.video_url.len() > 500 {
            result.add_error("video_url", "Video URL must be less than 500 characters");
        } else if valid_platforms.contains(platform.as_str())
            && !url_matches_platform(&data.video_url, &platform)
        {
            result.add_error(
                "video_url",
                &format!("URL does not look like a {} link", platform),
            );
        }

        if data.views <= 0 {
            result.add_error("views", "Views must be a positive number");
        }

        result
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn url_matches_platform(url: &str, platform: &str) -> bool {
    let pattern = match platform {
        "tiktok" => r"^https?://((www|vm|vt)\.)?tiktok\.com/.+",
        "instagram" => r"^https?://(www\.)?instagram\.com/.+",
        "youtube" => r"^https?://((www\.)?youtube\.com|youtu\.be)/.+",
        _ => return false,
    };
    Regex::new(pattern)
        .map(|re| re.is_match(url))
        .unwrap_or(false)
}
