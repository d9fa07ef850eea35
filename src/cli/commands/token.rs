use anyhow::Context;
use clap::Args;
use serde_json::json;

use crate::auth::shared_secret::sign_token;
use crate::cli::{output::output_success, OutputFormat};

#[derive(Args, Debug)]
pub struct TokenArgs {
    #[arg(long, help = "User id to place in the token subject")]
    pub subject: String,

    #[arg(long, help = "Optional email claim")]
    pub email: Option<String>,

    #[arg(long, default_value_t = 24, help = "Token lifetime in hours")]
    pub hours: i64,
}

pub async fn handle(args: TokenArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let secret = std::env::var("AUTH_HMAC_SECRET")
        .context("AUTH_HMAC_SECRET must be set to mint development tokens")?;

    let token = sign_token(
        &secret,
        &args.subject,
        args.email.clone(),
        chrono::Duration::hours(args.hours),
    )?;

    match output_format {
        OutputFormat::Json => output_success(
            &output_format,
            "Token issued",
            Some(json!({
                "token": token,
                "subject": args.subject,
                "expires_in_hours": args.hours
            })),
        ),
        // Bare token so it can be captured by a shell
        OutputFormat::Text => {
            println!("{}", token);
            Ok(())
        }
    }
}
