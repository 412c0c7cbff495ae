//! Main entry point for the fetchmux CLI

use clap::Parser;
use fetchmux::cli::args::{Args, CliCommand, FetchArgs, MergeArgs};
use fetchmux::cli::output::OutputFormatter;
use fetchmux::fetch::YtDlpFetcher;
use fetchmux::merge::Merger;
use fetchmux::utils::cookies::{resolve_cookie_file, CookieResolution};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    init_logging();

    let args = Args::parse();
    let formatter = Arc::new(OutputFormatter::new(args.verbosity_level()));

    // All failures stop here: converted to a message, never an unwound panic.
    let exit_code = match args.command {
        CliCommand::Fetch(ref fetch) => run_fetch(fetch, args.verbose, formatter.clone()).await,
        CliCommand::Merge(ref merge) => run_merge(merge, formatter.clone()).await,
    };

    std::process::exit(exit_code);
}

/// Download a video or playlist
async fn run_fetch(args: &FetchArgs, verbose: bool, formatter: Arc<OutputFormatter>) -> i32 {
    let start_time = Instant::now();
    let request = args.to_media_request();

    formatter.print_fetch_start(&request.source_locator);
    formatter.debug(&format!(
        "Format query: {}",
        fetchmux::policy::build_format_query(&request)
    ));
    info!("Starting fetch for {}", request.source_locator);

    // Surface the cookie warning before the collaborator runs; the fetcher
    // re-resolves and proceeds unauthenticated on its own.
    if let CookieResolution::Unreadable(path) = resolve_cookie_file(args.cookies.as_deref()) {
        formatter.warning(&format!(
            "Cookies file not found at '{}'. Proceeding without authentication.",
            path.display()
        ));
    }

    let mut fetcher = YtDlpFetcher::new()
        .with_binary(&args.ytdlp_bin)
        .with_timeout(args.timeout_duration())
        .with_limit(args.limit)
        .with_verbose(verbose);
    if let Some(dir) = &args.output {
        fetcher = fetcher.with_output_dir(dir);
    }
    if !args.no_progress {
        let formatter_clone = formatter.clone();
        fetcher = fetcher.with_progress(move |progress| {
            formatter_clone.update_progress(&progress);
        });
    }

    match fetcher.fetch(&request).await {
        Ok(report) => {
            formatter.finish_progress();
            formatter.print_batch_summary(&report);
            info!(
                "Fetch finished in {:.1}s: {} ok, {} failed",
                start_time.elapsed().as_secs_f64(),
                report.succeeded(),
                report.failed()
            );
            report.status().exit_code()
        }
        Err(e) => {
            formatter.finish_progress();
            formatter.error(&e.to_string());
            1
        }
    }
}

/// Replace a video's audio track
async fn run_merge(args: &MergeArgs, formatter: Arc<OutputFormatter>) -> i32 {
    formatter.print_merge_start(
        &args.video.display().to_string(),
        &args.audio.display().to_string(),
    );

    let merger = Merger::new()
        .with_ffmpeg_binary(&args.ffmpeg_bin)
        .with_ffprobe_binary(&args.ffprobe_bin)
        .with_timeout(args.timeout_duration());

    match merger.merge(&args.video, &args.audio, &args.output).await {
        Ok(decision) => {
            formatter.print_alignment(decision);
            formatter.print_merge_complete(&args.output.display().to_string());
            0
        }
        Err(e) => {
            formatter.error(&e.to_string());
            1
        }
    }
}

/// Initialize logging system
fn init_logging() {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}
