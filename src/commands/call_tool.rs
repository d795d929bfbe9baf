//! `kp call-tool`: invoke an MCP tool directly.

use owo_colors::OwoColorize;

use crate::client::KpClient;
use crate::config::KpConfig;

use super::report_failure;

/// Run the call-tool command, returning the process exit code.
pub async fn call_tool(config: &KpConfig, name: &str, args: &str) -> i32 {
    let arguments: serde_json::Value = match serde_json::from_str(args) {
        Ok(arguments) => arguments,
        Err(err) => {
            eprintln!("{} invalid arguments JSON: {err}", "error:".red().bold());
            return 2;
        }
    };

    let client = KpClient::new(config);
    let result = client.call_tool(name, arguments).await;

    match result.data() {
        Some(values) => {
            for value in values {
                match serde_json::to_string_pretty(value) {
                    Ok(pretty) => println!("{pretty}"),
                    Err(_) => println!("{value}"),
                }
            }
            0
        }
        None => report_failure(&result),
    }
}
