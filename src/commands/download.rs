use exn::ResultExt;
use futures::{StreamExt, pin_mut};
use indicatif::{ProgressBar, ProgressStyle};
use tmd_bundle::{Attempt, Bundle, BundleEvent, BundleOptions, Bundler};
use tmd_config::Config;

use crate::error::{ErrorKind, Result};

pub async fn run(config: &Config, url: &str) -> Result<()> {
    let relay = super::relay(config)?;
    let mods = super::search::listing(relay.as_ref(), url).await?;
    let options = BundleOptions {
        timeout: config.download.timeout(),
        concurrency: config.download.concurrency,
        method: config.download.method,
        extension: config.download.extension.clone(),
    };
    let bundler = Bundler::new(relay).with_options(options);

    let bar = progress_bar(mods.len());
    let events = bundler.run(mods);
    pin_mut!(events);
    let mut bundle = None;
    while let Some(event) = events.next().await {
        match event.or_raise(|| ErrorKind::Bundle)? {
            BundleEvent::Started { total } => bar.set_length(total as u64),
            BundleEvent::Attempted(attempt) => {
                let message = match &attempt {
                    Attempt::Fetched { title, .. } | Attempt::Skipped { title } => title.clone(),
                    Attempt::Failed(error) => format!("{} (failed)", error.title),
                };
                bar.set_message(message);
                bar.inc(1);
            },
            BundleEvent::Complete(complete) => bundle = Some(complete),
        }
    }
    bar.finish_and_clear();

    let Some(bundle) = bundle else {
        println!("The modpack lists no mods, nothing to download.");
        return Ok(());
    };
    let output = &config.download.output;
    tokio::fs::write(output, &bundle.bytes)
        .await
        .or_raise(|| ErrorKind::Output(output.display().to_string()))?;
    report(&bundle, &output.display().to_string());
    Ok(())
}

fn progress_bar(total: usize) -> ProgressBar {
    let style = ProgressStyle::with_template("[{bar:40.cyan/blue}] {pos}/{len} {percent}% {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    let bar = ProgressBar::new(total as u64);
    bar.set_style(style);
    bar
}

fn report(bundle: &Bundle, output: &str) {
    println!("Wrote {} mod(s) to {output}", bundle.entries);
    if bundle.errors.is_empty() {
        return;
    }
    println!("Failed to download {} mod(s):", bundle.errors.len());
    for error in &bundle.errors {
        println!("  {error}");
    }
}
