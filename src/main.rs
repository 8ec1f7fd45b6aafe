use clap::{Parser, Subcommand};
use firecrawl_bridge::operations::catalog;
use firecrawl_bridge::pipeline::transport::HttpTransport;
use firecrawl_bridge::services::logger::{LogLevel, Logger};
use firecrawl_bridge::services::response_classifier::default_file_name;
use firecrawl_bridge::{BridgeConfig, BridgeError, Executor, Operation};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "firecrawl-bridge", version, about = "Call the Firecrawl API from the command line")]
struct Cli {
    /// error, warn, info or debug (overrides FIRECRAWL_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the supported operations.
    Operations,
    /// Run one operation and print its output items as JSON.
    Run {
        operation: String,
        /// Operation parameters as a JSON object.
        #[arg(long, default_value = "{}")]
        params: String,
        /// JSON object merged over the generated body; hides generated fields.
        #[arg(long)]
        custom_body: Option<String>,
        /// Directory for binary attachments.
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Embed attachment bytes (base64) in the printed items.
        #[arg(long)]
        include_data: bool,
        /// Print the prepared request instead of sending it.
        #[arg(long)]
        dry_run: bool,
    },
    /// Confirm the API key and base URL against the credit-usage endpoint.
    Check,
    /// Show how a content-type header would be classified.
    Classify { content_type: String },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run(Cli::parse()).await {
        eprintln!("firecrawl-bridge: {}", err);
        if let Some(hint) = &err.hint {
            eprintln!("hint: {}", hint);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), BridgeError> {
    let config = BridgeConfig::from_env()?;
    let mut logger = Logger::new("firecrawl-bridge").with_secrets(config.secrets());
    if let Some(raw) = &cli.log_level {
        let level = LogLevel::parse(raw)
            .ok_or_else(|| BridgeError::invalid_params(format!("Unknown log level: {}", raw)))?;
        logger.set_level(level);
    }

    match cli.command {
        Command::Operations => {
            for spec in catalog() {
                println!(
                    "{:<18} {:<5} {:<16} {}",
                    spec.name,
                    spec.method.as_str(),
                    spec.path,
                    spec.action
                );
            }
            Ok(())
        }
        Command::Check => {
            let base_url = config.base_url.to_string();
            let transport = Arc::new(HttpTransport::new(&config)?);
            let executor = Executor::new(config, transport, logger);
            let usage = executor.check_credentials().await?;
            print_json(&serde_json::json!({
                "ok": true,
                "baseUrl": base_url,
                "creditUsage": usage,
            }))
        }
        Command::Classify { content_type } => {
            let classification = config.classifier().classify(&content_type);
            print_json(&serde_json::json!({
                "isBinary": classification.is_binary,
                "mimeType": classification.mime_type,
                "topLevelType": classification.top_level_type,
                "extension": classification.extension,
                "defaultFileName": default_file_name(&classification.extension),
                "mode": format!("{:?}", config.match_mode).to_lowercase(),
            }))
        }
        Command::Run {
            operation,
            params,
            custom_body,
            out_dir,
            include_data,
            dry_run,
        } => {
            let operation: Operation = operation.parse()?;
            let params = build_params(&params, custom_body)?;
            let transport = Arc::new(HttpTransport::new(&config)?);
            let executor = Executor::new(config, transport, logger.clone());

            if dry_run {
                let request = executor.prepare(operation, &params)?;
                return print_json(&serde_json::json!({
                    "method": request.method.as_str(),
                    "url": request.url.as_str(),
                    "body": request.body,
                }));
            }

            let items = executor.execute(operation, &params).await?;
            if let Some(dir) = &out_dir {
                for item in &items {
                    if let Some(binary) = &item.binary {
                        let path = attachment_path(dir, binary.file_name.as_deref());
                        tokio::fs::create_dir_all(dir).await?;
                        tokio::fs::write(&path, &binary.data).await?;
                        logger.info(
                            "Wrote attachment",
                            Some(&serde_json::json!({ "path": path.display().to_string() })),
                        );
                    }
                }
            }
            let rendered: Vec<Value> = items.iter().map(|item| item.to_json(include_data)).collect();
            print_json(&Value::Array(rendered))
        }
    }
}

fn build_params(raw: &str, custom_body: Option<String>) -> Result<Value, BridgeError> {
    let mut params: Value = serde_json::from_str(raw)
        .map_err(|err| BridgeError::invalid_json(format!("--params is not valid JSON: {}", err)))?;
    let Value::Object(map) = &mut params else {
        return Err(BridgeError::invalid_json("--params must be a JSON object"));
    };
    if let Some(body) = custom_body {
        map.insert("useCustomBody".to_string(), Value::Bool(true));
        map.insert("customBody".to_string(), Value::String(body));
    }
    Ok(params)
}

/// Keeps only the final path component of the attachment name.
fn attachment_path(dir: &Path, file_name: Option<&str>) -> PathBuf {
    let name = file_name
        .and_then(|name| Path::new(name).file_name())
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "data.bin".into());
    dir.join(name)
}

fn print_json(value: &Value) -> Result<(), BridgeError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{attachment_path, build_params};
    use serde_json::json;
    use std::path::Path;

    #[test]
    fn custom_body_flag_enables_override() {
        let params = build_params("{\"url\": \"https://a.com\"}", Some("{\"limit\": 1}".to_string()))
            .expect("params");
        assert_eq!(
            params,
            json!({"url": "https://a.com", "useCustomBody": true, "customBody": "{\"limit\": 1}"})
        );
    }

    #[test]
    fn params_must_be_an_object() {
        assert!(build_params("[1]", None).is_err());
        assert!(build_params("{", None).is_err());
    }

    #[test]
    fn attachment_path_strips_directories() {
        let dir = Path::new("out");
        assert_eq!(attachment_path(dir, Some("../../etc/data.png")), dir.join("data.png"));
        assert_eq!(attachment_path(dir, None), dir.join("data.bin"));
    }
}
