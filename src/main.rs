use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use tickboard::utils::time_utils::{epoch_sec_to_utc, now_unix_secs};
use tickboard::{
    ChartSession, Cli, HeadlessRenderer, Legend, Market, TickerSummary, run_realtime,
};

#[derive(Serialize)]
struct Report<'a> {
    legend: &'a Legend,
    cursor_time: Option<i64>,
    indicator_count: usize,
    realtime: Option<TickerSummary>,
}

fn main() -> Result<()> {
    // A. Init Logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    // B. Parse Args
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);

    // C. Single-threaded runtime: the session has exactly one writer
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;

    rt.block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    let market = Market::new(args.symbol.clone(), args.timeframe);
    let mut session = ChartSession::new(HeadlessRenderer::new(), market, args.seed)
        .with_bar_count(args.bars)
        .with_live_indicators(args.live_indicators);

    session
        .switch_view(args.view, now_unix_secs())
        .with_context(|| format!("Failed to load the {} view", args.view))?;

    // A rejected indicator is reported and skipped; the chart stays usable.
    for spec in &args.indicators {
        if let Err(err) = session.add_indicator(spec.clone()) {
            log::warn!("Could not add {spec}: {err}");
        }
    }

    let realtime = if args.realtime_ticks > 0 {
        session.start_realtime();
        let shutdown = async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                log::error!("Cannot listen for Ctrl-C: {err}");
                std::future::pending::<()>().await;
            }
        };
        Some(run_realtime(&mut session, now_unix_secs, Some(args.realtime_ticks), shutdown).await)
    } else {
        None
    };

    let cursor = match args.cursor_bar {
        Some(idx) => {
            let time = session
                .snapshot()
                .time_at(idx)
                .with_context(|| format!("Bar {idx} is outside the loaded series"))?;
            Some(session.renderer().crosshair_at(time))
        }
        None => None,
    };
    let legend = session.legend(cursor.as_ref());
    let cursor_time = cursor.as_ref().and_then(|c| c.time);

    if args.json {
        let report = Report {
            legend: &legend,
            cursor_time,
            indicator_count: session.indicator_count(),
            realtime,
        };
        let json = serde_json::to_string_pretty(&report).context("Failed to encode report")?;
        println!("{json}");
        return Ok(());
    }

    match cursor_time {
        Some(time) => println!("{} @ {}", legend.header, epoch_sec_to_utc(time)),
        None => println!("{}", legend.header),
    }
    for row in &legend.rows {
        println!("  {row}");
    }
    println!("{} indicator(s) active", session.indicator_count());
    if let Some(summary) = realtime {
        println!(
            "realtime: {} tick(s), {} accepted, {} skipped",
            summary.ticks, summary.accepted, summary.skipped
        );
    }
    Ok(())
}
