use crate::commands::common::build_synchronizer;
use crate::error::CliError;

pub async fn run_metrics(
    api_url: Option<&str>,
    tenant: Option<&str>,
    as_json: bool,
) -> Result<(), CliError> {
    let (sync, _notices) = build_synchronizer(api_url, tenant)?;

    sync.ensure_summary().await?;
    let metrics = sync.metrics();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    } else {
        println!("total:       {}", metrics.total);
        println!("active:      {}", metrics.active);
        println!("expired:     {}", metrics.expired);
        println!("total usage: {}", metrics.total_usage);
    }

    Ok(())
}
