use chrono::Utc;
use glucose_glance::timeline::DEFAULT_REFRESH_MINUTES;
use glucose_glance::{
    Config, FileLooperStore, GlanceEntry, ReplayDataSource, Timeline, TimelineProvider,
};
use std::process::ExitCode;
use std::sync::Arc;

fn render(entry: &GlanceEntry) {
    if entry.needs_reconfiguration() {
        println!("Looper not found, please reconfigure");
        return;
    }

    let name = entry.looper.as_ref().map(|l| l.name.as_str()).unwrap_or_default();
    match entry.glucose_value_text() {
        Some(value) => {
            let change = entry.glucose_change_text().unwrap_or_default();
            let arrow = entry.trend_arrow().unwrap_or_default();
            let age = entry.minutes_since_sample().unwrap_or_default();
            let stale = if entry.is_sample_stale() { " (stale)" } else { "" };
            println!(
                "{}: {} {} {} {} · {} min ago{}",
                name,
                value,
                entry.glucose_display_units.label(),
                arrow,
                change,
                age,
                stale
            );
        }
        None => println!("{}: no recent glucose", name),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let provider = TimelineProvider::new(
        Arc::new(FileLooperStore::new(&config.loopers_path)),
        Arc::new(ReplayDataSource::new(&config.samples_dir)),
    );

    for recommendation in provider.recommendations() {
        log::info!("Available looper: {} ({})", recommendation.name, recommendation.looper_id);
    }

    let configuration = config.widget_configuration();
    let mut current: Option<Timeline> = None;

    'cycles: loop {
        // Dropping the cycle future on ctrl-c abandons the fetch without output
        let cycle = tokio::select! {
            result = provider.timeline(&configuration) => result,
            _ = tokio::signal::ctrl_c() => {
                log::info!("Interrupted, abandoning refresh");
                break 'cycles;
            }
        };

        let refresh_at = match cycle {
            Ok(timeline) => {
                let refresh_at = timeline.policy.refresh_date();
                current = Some(timeline);
                refresh_at
            }
            Err(e) => {
                log::error!("{}", e);
                if !config.follow {
                    return ExitCode::FAILURE;
                }
                // Keep the previous timeline until a refresh succeeds
                Utc::now() + chrono::Duration::minutes(DEFAULT_REFRESH_MINUTES)
            }
        };

        // Step through the timeline's entries until the refresh comes due
        loop {
            let now = Utc::now();
            if let Some(entry) = current.as_ref().and_then(|t| t.entry_at(now)) {
                render(entry);
            }

            if !config.follow {
                break 'cycles;
            }
            if now >= refresh_at {
                break;
            }

            let next_tick = current
                .as_ref()
                .and_then(|t| t.next_entry_date_after(now))
                .map_or(refresh_at, |date| date.min(refresh_at));
            let wait = (next_tick - now).to_std().unwrap_or_default();
            log::debug!("Next redraw in {}s", wait.as_secs());

            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = tokio::signal::ctrl_c() => {
                    log::info!("Interrupted, shutting down");
                    break 'cycles;
                }
            }
        }
    }

    ExitCode::SUCCESS
}
