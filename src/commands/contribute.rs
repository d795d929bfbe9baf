//! `kp contribute`: submit a knowledge unit from a JSON file.

use std::path::Path;

use owo_colors::OwoColorize;

use crate::client::KpClient;
use crate::config::KpConfig;
use crate::unit::{KnowledgeUnit, Visibility};

use super::report_failure;

/// Run the contribute command, returning the process exit code.
pub async fn contribute(
    config: &KpConfig,
    file: &Path,
    visibility: Option<Visibility>,
    json: bool,
) -> i32 {
    let raw = match std::fs::read_to_string(file) {
        Ok(raw) => raw,
        Err(err) => {
            eprintln!("{} cannot read {}: {err}", "error:".red().bold(), file.display());
            return 2;
        }
    };
    let unit: KnowledgeUnit = match serde_json::from_str(&raw) {
        Ok(unit) => unit,
        Err(err) => {
            eprintln!("{} invalid unit JSON: {err}", "error:".red().bold());
            return 2;
        }
    };

    let client = KpClient::new(config);
    let result = client.contribute_knowledge(&unit, visibility).await;

    if json {
        println!("{}", result.to_json());
        return i32::from(!result.is_success());
    }

    match result.data() {
        Some(entries) => {
            let id = entries.first().map_or(unit.id.as_str(), |e| e.id.as_str());
            println!("{} {id}", "Contributed".green().bold());
            0
        }
        None => report_failure(&result),
    }
}
