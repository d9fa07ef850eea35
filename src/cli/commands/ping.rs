use std::time::{Duration, Instant};

use clap::Args;
use serde_json::{json, Value};

use crate::cli::{
    output::{output_error, output_success},
    OutputFormat,
};

#[derive(Args, Debug)]
pub struct PingArgs {
    #[arg(long, default_value = "http://localhost:3000", help = "Server base URL")]
    pub url: String,
}

pub async fn handle(args: PingArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let base = url::Url::parse(&args.url)?;
    let health_url = base.join("/health")?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    let started = Instant::now();
    let response = client.get(health_url.clone()).send().await?;
    let elapsed_ms = started.elapsed().as_millis() as u64;
    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);

    if status.is_success() {
        output_success(
            &output_format,
            &format!("{} is healthy ({} ms)", health_url, elapsed_ms),
            Some(json!({
                "url": health_url.as_str(),
                "status": status.as_u16(),
                "elapsed_ms": elapsed_ms,
                "health": body
            })),
        )
    } else {
        output_error(
            &output_format,
            &format!("{} answered {}", health_url, status),
        )?;
        anyhow::bail!("server unhealthy")
    }
}
