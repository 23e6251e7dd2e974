use std::path::Path;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::Context;
use tracing::info;

use fancontrol_common::RuntimeConfig;

use crate::actuator::{Actuator, CeilingFan, FurnaceBlower};
use crate::device::{shared_client, HttpDevice};
use crate::monitor::ThermostatMonitor;
use crate::Cli;

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = load_config(cli.config.as_deref())?;

    let client = shared_client(config.devices.http_timeout_ms)
        .context("failed to build http client")?;

    let thermostat_device = HttpDevice::new(client.clone(), &config.devices.thermostat_url);
    let mut monitor = ThermostatMonitor::new(
        thermostat_device.clone(),
        &config.monitor,
        monotonic_ms(),
    );

    let mut actuators: Vec<Actuator<HttpDevice>> = config
        .devices
        .fan_urls
        .iter()
        .map(|url| {
            Actuator::Ceiling(CeilingFan::new(
                HttpDevice::new(client.clone(), url),
                config.fan.clone(),
            ))
        })
        .collect();
    actuators.push(Actuator::Blower(FurnaceBlower::new(
        thermostat_device,
        config.blower.clone(),
    )));

    if cli.debug {
        println!("Fetching debug data");
        for actuator in &actuators {
            actuator.debug().await;
        }
        return Ok(());
    }

    if cli.reboot_fans {
        for actuator in &actuators {
            if let Actuator::Ceiling(fan) = actuator {
                fan.reboot().await;
            }
        }
        return Ok(());
    }

    info!(
        "fancontrol started: thermostat {}, {} fan(s), polling every {}s",
        config.devices.thermostat_url,
        config.devices.fan_urls.len(),
        config.monitor.poll_interval_ms / 1_000
    );

    let poll_interval = Duration::from_millis(config.monitor.poll_interval_ms);

    loop {
        let cycle_start = Instant::now();

        if monitor.poll(monotonic_ms()).await {
            let snapshot = monitor.snapshot(monotonic_ms());
            for actuator in &mut actuators {
                actuator.update(&snapshot).await;
            }

            if let Some(reading) = monitor.reading() {
                info!(
                    "temp {:.1} target {:.1} heat {} blower {} transition {}s ago",
                    reading.temperature,
                    reading.target_temperature,
                    if reading.heat_active { "on" } else { "off" },
                    reading.blower_mode.as_str(),
                    monitor.time_since_transition_ms(monotonic_ms()) / 1_000
                );
            }
        }

        // An overrunning cycle starts the next one immediately.
        if let Some(remaining) = poll_interval.checked_sub(cycle_start.elapsed()) {
            tokio::time::sleep(remaining).await;
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<RuntimeConfig> {
    let mut config = match path {
        Some(path) => {
            let raw = std::fs::read(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            serde_json::from_slice::<RuntimeConfig>(&raw)
                .with_context(|| format!("failed to parse config file {}", path.display()))?
        }
        None => RuntimeConfig::default(),
    };

    if let Ok(url) = std::env::var("FANCONTROL_TSTAT_URL") {
        config.devices.thermostat_url = url;
    }
    if let Ok(urls) = std::env::var("FANCONTROL_FAN_URLS") {
        config.devices.fan_urls = urls
            .split(',')
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .collect();
    }

    Ok(config)
}

fn monotonic_ms() -> u64 {
    static START: OnceLock<Instant> = OnceLock::new();
    START
        .get_or_init(Instant::now)
        .elapsed()
        .as_millis()
        .try_into()
        .unwrap_or(u64::MAX)
}
