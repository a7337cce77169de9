use bendahara::{
    client::Client,
    config::{self, AppConfig, Command, FormatArg},
    error::Result,
    render,
    session::ReportSession,
};
use chrono::Utc;
use engine::{ExportOptions, FinancialReportState, Period, export, monthly_flows};

#[tokio::main]
async fn main() -> Result<()> {
    let (config, command) = config::load()?;

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        format!(
            "bendahara={level},engine={level}",
            level = config.log_level
        )
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let client = Client::from_config(&config)?;
    match command {
        Command::Periods => {
            let mut session = ReportSession::new(client, Period::All);
            let state = session.refresh().await?;
            print!("{}", render::periods(&state.periods()));
        }
        Command::Summary {
            period,
            monthly,
            json,
        } => {
            let mut session = ReportSession::new(client, period);
            let state = session.refresh().await?;
            print_summary(state, monthly, json)?;
        }
        Command::Export {
            period,
            format,
            out,
        } => {
            let mut session = ReportSession::new(client, period);
            let state = session.refresh().await?;
            print_summary(state, false, false)?;
            write_exports(state, &config, format, out)?;
        }
    }

    Ok(())
}

fn print_summary(state: &FinancialReportState, monthly: bool, json: bool) -> Result<()> {
    let issues = state.sources().issues.len();
    if json {
        let mut value = serde_json::json!({
            "summary": state.summary(),
            "issues": state.sources().issues,
        });
        if monthly {
            value["monthly"] = serde_json::to_value(monthly_flows(state.sources()))?;
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    print!("{}", render::summary(state.summary(), issues));
    if monthly {
        println!();
        print!("{}", render::monthly(&monthly_flows(state.sources())));
    }
    Ok(())
}

/// Writes every requested artifact. A failed artifact is reported and the
/// remaining ones are still written; the first failure is returned.
fn write_exports(
    state: &FinancialReportState,
    config: &AppConfig,
    format: FormatArg,
    out: Option<std::path::PathBuf>,
) -> Result<()> {
    let export_date = Utc::now().with_timezone(&config.tz()?).date_naive();
    let mut options = ExportOptions::new(export_date, config.letterhead.clone());
    options.delimiter = config.delimiter()?;
    let dir = out.unwrap_or_else(|| config.output_dir.clone());
    let view = state.view();

    let mut first_failure = None;
    for format in format.formats() {
        match export(&view, format, &options).and_then(|artifact| artifact.write_to(&dir)) {
            Ok(path) => println!("{}", path.display()),
            Err(err) => {
                tracing::error!("failed to export {format}: {err}");
                if first_failure.is_none() {
                    first_failure = Some(err);
                }
            }
        }
    }

    match first_failure {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}
