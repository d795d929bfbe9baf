//! `kp search`: query the registry for skills or knowledge units.

use owo_colors::OwoColorize;

use crate::client::KpClient;
use crate::config::KpConfig;
use crate::query::SearchQuery;
use crate::result::KpResult;

use super::report_failure;

/// Options for the search command.
#[derive(Debug, Clone)]
pub struct SearchOpts {
    /// Free-text search query.
    pub query: String,
    /// Search knowledge units instead of skills.
    pub knowledge: bool,
    /// Filter by task domain.
    pub domain: Option<String>,
    /// Comma-separated tag filter.
    pub tags: Option<String>,
    /// Filter by unit kind.
    pub unit_type: Option<String>,
    /// Minimum quality score.
    pub min_quality: Option<f64>,
    /// Maximum results.
    pub limit: u32,
    /// Emit raw JSON instead of human-readable output.
    pub json: bool,
}

impl SearchOpts {
    fn to_query(&self) -> SearchQuery {
        let mut query = SearchQuery::new(&self.query).with_limit(self.limit);
        if let Some(domain) = &self.domain {
            query = query.with_domain(domain.clone());
        }
        if let Some(tags) = &self.tags {
            query = query.with_tags(
                tags.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(String::from)
                    .collect(),
            );
        }
        if let Some(unit_type) = &self.unit_type {
            query = query.with_types(vec![unit_type.clone()]);
        }
        if let Some(min_quality) = self.min_quality {
            query = query.with_min_quality(min_quality);
        }
        query
    }
}

/// Run the search command, returning the process exit code.
pub async fn search(config: &KpConfig, opts: &SearchOpts) -> i32 {
    let client = KpClient::new(config);
    let query = opts.to_query();

    if opts.knowledge {
        let result = client.search_knowledge(&query).await;
        render(&result, opts.json, |unit| {
            println!("  [{}] {}", unit.kind.to_string().cyan(), unit.id.bold());
            if let Some(domain) = unit
                .metadata
                .as_ref()
                .and_then(|m| m.task_domain.as_deref())
            {
                println!("    Domain: {domain}");
            }
        })
    } else {
        let result = client.search_skills(&query).await;
        render(&result, opts.json, |skill| {
            println!("  {} ({})", skill.name.bold(), skill.id.dimmed());
            if !skill.description.is_empty() {
                println!("    {}", skill.description);
            }
            let quality = skill
                .quality_score
                .map_or_else(|| "-".to_string(), |score| format!("{score:.2}"));
            let tags = if skill.tags.is_empty() {
                "none".to_string()
            } else {
                skill.tags.join(", ")
            };
            println!("    Quality: {quality} | Tags: {tags}");
        })
    }
}

fn render<T: serde::Serialize>(
    result: &KpResult<T>,
    json: bool,
    mut print_item: impl FnMut(&T),
) -> i32 {
    if json {
        println!("{}", result.to_json());
        return i32::from(!result.is_success());
    }

    match result.data() {
        Some([]) => {
            println!("No results found.");
            0
        }
        Some(items) => {
            println!("Found {} result(s):\n", items.len());
            for item in items {
                print_item(item);
                println!();
            }
            0
        }
        None => report_failure(result),
    }
}
