//! Health command implementation

use crate::cli::HealthArgs;
use crate::output::OutputWriter;
use crate::output_types::HealthOutput;
use crate::progress;
use crate::service;
use anyhow::{bail, Result};
use footprint_core::config::LayeredConfig;
use footprint_view::HealthMonitor;
use std::path::Path;
use std::time::Duration;

pub async fn execute(
    args: HealthArgs,
    config: &LayeredConfig,
    fixture: Option<&Path>,
    output: &OutputWriter,
) -> Result<()> {
    let service = service::connect(config, fixture)?;
    let monitor = HealthMonitor::new(config.health_interval());
    let service_name = match fixture {
        Some(path) => path.display().to_string(),
        None => config.service_url.value.clone(),
    };

    let (data_ready, overture_release, attempts) = if args.wait {
        let spinner = progress::create_spinner(output, "Waiting for building data...");
        let wait = monitor.wait_until_ready(service.as_ref());
        let report = match args.timeout {
            Some(secs) => match tokio::time::timeout(Duration::from_secs(secs), wait).await {
                Ok(report) => report,
                Err(_) => {
                    progress::finish_error(&spinner, "Timed out");
                    bail!("Building data not ready after {}s", secs);
                }
            },
            None => wait.await,
        };
        progress::finish_success(&spinner, "Building data ready");
        (true, report.overture_release, report.attempts)
    } else {
        match monitor.poll_once(service.as_ref()).await {
            Some(status) => (true, status.overture_release, 1),
            None => (false, None, 1),
        }
    };

    if output.is_json() {
        output.result(HealthOutput { service: service_name, data_ready, overture_release, attempts })?;
    } else {
        output.section("Building Service");
        output.kv("Service", &service_name);
        if data_ready {
            output.success("Building data ready");
        } else {
            output.warning("Loading building data...");
        }
        if let Some(release) = &overture_release {
            output.kv("Overture release", release);
        }
        if args.wait {
            output.kv("Attempts", attempts);
        }
    }

    Ok(())
}
