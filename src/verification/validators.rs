// src/verification/validators.rs

use super::models::VerifyRequest;
use crate::common::{ValidationResult, Validator};
use std::collections::HashSet;

pub struct VerifyRequestValidator;

impl Validator<VerifyRequest> for VerifyRequestValidator {
    fn validate(&self, data: &VerifyRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        let valid_platforms = HashSet::from(["tiktok", "instagram", "youtube"]);
        if !valid_platforms.contains(data.platform.to_lowercase().as_str()) {
            result.add_error(
                "platform",
                "Invalid platform. Valid options: tiktok, instagram, youtube",
            );
        }

        if data.username.trim().is_empty() {
            result.add_error("username", "Username is required");
        } else if data.username.len() > 100 {
            result.add_error("username", "Username must be less than 100 characters");
        }

        result
    }
}
