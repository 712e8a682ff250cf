//! Preview command - builds a Bedrock request locally and prints it.

use anyhow::Result;
use clap::Args;
use recipe_core::TextVariant;
use recipe_providers::InvocationBuilder;
use serde::Serialize;
use std::collections::BTreeMap;
use std::process::ExitCode;

use super::input::InputArgs;
use crate::output::{self, CommandResult, OutputFormat};

/// Arguments for the preview command.
#[derive(Args, Debug)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Text payload schema (message, legacy)
    #[arg(long, env = "BEDROCK_TEXT_VARIANT", default_value = "message")]
    pub text_variant: TextVariant,
}

/// Built request for output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewOutput {
    pub variant: String,
    pub model_id: String,
    pub method: String,
    pub resource_path: String,
    pub headers: BTreeMap<String, String>,
    pub body: serde_json::Value,
}

/// Execute the preview command.
pub fn execute(args: &PreviewArgs, json: bool) -> Result<ExitCode> {
    let format = OutputFormat::from_json_flag(json);

    let preview = match build_preview(args) {
        Ok(preview) => preview,
        Err(e) => {
            CommandResult::<PreviewOutput>::failure(format!("{e:#}")).print(format)?;
            return Ok(ExitCode::FAILURE);
        }
    };

    match format {
        OutputFormat::Json => CommandResult::success(preview).print(format)?,
        OutputFormat::Text => {
            output::section("Bedrock request");
            output::key_value("Variant", &preview.variant);
            output::key_value("Model", &preview.model_id);
            output::key_value("Request", &format!("{} {}", preview.method, preview.resource_path));
            for (name, value) in &preview.headers {
                output::key_value(name, value);
            }
            output::section("Body");
            println!("{}", serde_json::to_string_pretty(&preview.body)?);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn build_preview(args: &PreviewArgs) -> Result<PreviewOutput> {
    let invocation = args.input.to_arguments()?;
    let builder = InvocationBuilder::new().with_text_variant(args.text_variant);
    let variant = builder.select(&invocation);
    let request = builder.build_variant(&invocation, variant)?;

    Ok(PreviewOutput {
        variant: variant.to_string(),
        body: request.body_json()?,
        model_id: request.model_id,
        method: request.method.to_string(),
        resource_path: request.resource_path,
        headers: request.headers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preview_args(ingredients: &str, text_variant: TextVariant) -> PreviewArgs {
        PreviewArgs {
            input: InputArgs {
                ingredients: Some(ingredients.to_string()),
                ..Default::default()
            },
            text_variant,
        }
    }

    #[test]
    fn test_message_preview() {
        let preview = build_preview(&preview_args("egg, flour", TextVariant::Message)).unwrap();
        assert_eq!(preview.variant, "message_text");
        assert_eq!(preview.method, "POST");
        assert_eq!(
            preview.resource_path,
            "/model/anthropic.claude-3-sonnet-20240229-v1:0/invoke"
        );
        assert_eq!(
            preview.body["messages"][0]["content"][0]["text"],
            "Suggest a recipe idea using these ingredients: egg, flour."
        );
    }

    #[test]
    fn test_legacy_preview() {
        let preview = build_preview(&preview_args("rice", TextVariant::Legacy)).unwrap();
        assert_eq!(preview.variant, "legacy_text");
        assert_eq!(preview.model_id, "anthropic.claude-v2");
        assert_eq!(preview.body["max_tokens_to_sample"], 300);
    }

    #[test]
    fn test_image_preview() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"raw").unwrap();

        let args = PreviewArgs {
            input: InputArgs {
                image: Some(file.path().to_path_buf()),
                ..Default::default()
            },
            text_variant: TextVariant::Message,
        };
        let preview = build_preview(&args).unwrap();
        assert_eq!(preview.variant, "vision");
        assert_eq!(preview.body["max_tokens"], 1000);
    }
}
