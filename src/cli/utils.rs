use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::ui::ToastKind;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(object)) = (data, response.as_object_mut()) {
                object.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str, error_code: Option<&str>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Toasts from the view models: successes to stdout, errors to stderr
pub fn output_toast(output_format: &OutputFormat, kind: ToastKind, message: &str) -> anyhow::Result<()> {
    match kind {
        ToastKind::Error => output_error(output_format, message, None),
        ToastKind::Success => output_success(output_format, message, None),
    }
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(output_format: &OutputFormat, collection_name: &str, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    collection_name: []
                }))?
            );
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// JSON mode prints `value` verbatim; text mode prints one line per row from `rows`
pub fn output_rows<T: Serialize>(output_format: &OutputFormat, value: &T, rows: Vec<String>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => {
            for row in rows {
                println!("{}", row);
            }
        }
    }
    Ok(())
}

/// Password from the flag, else from `GALLERY_PASSWORD`
pub fn resolve_password(provided: Option<String>) -> anyhow::Result<String> {
    match provided.or_else(|| std::env::var("GALLERY_PASSWORD").ok()) {
        Some(password) => Ok(password),
        None => Err(anyhow::anyhow!("Password required: pass --password or set GALLERY_PASSWORD")),
    }
}
