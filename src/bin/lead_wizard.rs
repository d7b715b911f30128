//! Lead Wizard CLI
//!
//! Drives a wizard non-interactively from a JSON answers file: every answer is
//! entered up front, then the wizard steps forward until it can submit.
//! Useful for checking a submission endpoint end to end.
//!
//! Usage:
//!   cargo run --features cli --bin lead_wizard -- \
//!     --form contact \
//!     --answers answers.json \
//!     --locale en
//!
//! Examples:
//!   # Validate and print each step, never call the endpoint
//!   cargo run --features cli --bin lead_wizard -- --form application --answers app.json --dry-run
//!
//!   # Submit to LEAD_SUBMIT_URL and dump the emitted events
//!   LEAD_SUBMIT_URL=https://leads.example.com/api/leads \
//!     cargo run --features cli --bin lead_wizard -- --form inquiry --answers inq.json --events

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};

use lead_wizard::events::ChannelSink;
use lead_wizard::form::FormRecord;
use lead_wizard::wizard::NextOutcome;
use lead_wizard::{
    FnSubmitter, FormType, Locale, SubmissionError, SubmitOutcome, WizardConfig, WizardEngine,
};

#[derive(Parser, Debug)]
#[command(name = "lead_wizard")]
#[command(about = "Run a lead-capture wizard from a JSON answers file")]
struct Args {
    /// Form type: application, contact, complaint or inquiry
    #[arg(long, short = 'f')]
    form: String,

    /// JSON object of field values keyed by field name (e.g. "fullName")
    #[arg(long, short = 'a')]
    answers: PathBuf,

    /// Display locale (defaults to LEAD_DEFAULT_LOCALE)
    #[arg(long, short = 'l')]
    locale: Option<String>,

    /// Log the payload instead of calling the submission endpoint
    #[arg(long)]
    dry_run: bool,

    /// Print emitted funnel/conversion events as JSON when done
    #[arg(long)]
    events: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let config = WizardConfig::from_env()?;

    let form_type =
        FormType::parse(&args.form).ok_or_else(|| anyhow!("unknown form type '{}'", args.form))?;
    let locale = match &args.locale {
        Some(tag) => Locale::parse(tag).ok_or_else(|| anyhow!("unsupported locale '{}'", tag))?,
        None => config.default_locale,
    };

    let raw = std::fs::read_to_string(&args.answers)
        .with_context(|| format!("reading {}", args.answers.display()))?;
    let answers: FormRecord = serde_json::from_str(&raw).context("parsing answers file")?;

    let (sink, drain) = ChannelSink::new(config.event_buffer_size);
    let sink = Arc::new(sink);

    let engine = if args.dry_run {
        let submitter = FnSubmitter::new(|payload| {
            let body = serde_json::to_string_pretty(payload)
                .map_err(|e| SubmissionError::handler(format!("payload not serializable: {}", e)))?;
            info!("dry run payload:\n{}", body);
            Ok(())
        });
        WizardEngine::new(Arc::new(submitter), sink.clone(), &config)?
    } else {
        WizardEngine::with_http(&config, sink.clone())?
    };

    let mut wizard = engine.start_with(form_type, locale, FormRecord::new());
    for (key, value) in answers.iter() {
        wizard.edit_field(key, value.clone());
    }

    while !wizard.state().is_last_step() {
        let view = wizard.view();
        println!("{}", serde_json::to_string_pretty(&view)?);
        match wizard.next() {
            NextOutcome::Completed { .. } => {}
            NextOutcome::Blocked { .. } => {
                let view = wizard.view();
                for error in &view.form_errors {
                    eprintln!("  - {}", error);
                }
                bail!("step '{}' has {} error(s)", view.step.id, view.form_errors.len());
            }
            NextOutcome::Ignored => bail!("wizard stopped accepting input"),
        }
    }

    println!("{}", serde_json::to_string_pretty(&wizard.view())?);
    let outcome = wizard.submit().await;

    if args.events {
        for event in drain.drain() {
            println!("{}", serde_json::to_string(&event)?);
        }
    }
    if sink.dropped() > 0 {
        warn!(dropped = sink.dropped(), "event buffer overflowed; raise LEAD_EVENT_BUFFER");
    }

    match outcome {
        SubmitOutcome::Succeeded(reference) => {
            println!("Reference number: {}", reference);
            Ok(())
        }
        SubmitOutcome::Invalid(errors) => {
            for (key, message) in &errors {
                eprintln!("  - {}: {}", key, message);
            }
            bail!("last step has {} error(s)", errors.len())
        }
        SubmitOutcome::Failed(notice) => bail!("{}", notice),
        other => bail!("submit not accepted: {:?}", other),
    }
}
