//! Invocation inputs shared by `ask` and `preview`.

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::Args;
use recipe_core::{parse_ingredient_list, InvocationArguments};
use std::path::PathBuf;

/// What to ask about.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Comma-separated ingredients, e.g. "eggs, spinach, feta"
    #[arg(short, long)]
    pub ingredients: Option<String>,

    /// Free-text question; replaces the recipe prompt
    #[arg(short, long)]
    pub question: Option<String>,

    /// JPEG photo to ask about
    #[arg(long)]
    pub image: Option<PathBuf>,
}

impl InputArgs {
    /// Turn command-line input into invocation arguments.
    ///
    /// Fails when there is nothing to ask about.
    pub fn to_arguments(&self) -> Result<InvocationArguments> {
        let mut args = InvocationArguments::new();

        if let Some(ingredients) = &self.ingredients {
            args = args.with_ingredients(parse_ingredient_list(ingredients));
        }
        if let Some(question) = &self.question {
            args = args.with_question(question.clone());
        }
        if let Some(path) = &self.image {
            let bytes = std::fs::read(path)
                .with_context(|| format!("Failed to read image {}", path.display()))?;
            args = args.with_image_data(STANDARD.encode(bytes));
        }

        if args.is_empty() {
            bail!("Nothing to ask: provide --ingredients, --question, or --image");
        }
        Ok(args)
    }
}
