mod feed;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;

use feed::{NetworkConditions, SimulatedFeed};
use pose_buffer::{
    BufferState, DEFAULT_BUFFER_TIME_SECS, InterpolationBuffer, InterpolationMode, Pose,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Lerp,
    Hermite,
}

impl From<ModeArg> for InterpolationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Lerp => InterpolationMode::Lerp,
            ModeArg::Hermite => InterpolationMode::Hermite,
        }
    }
}

#[derive(Parser)]
#[command(name = "pose-buffer-demo")]
#[command(about = "Smooths a simulated jittery pose feed through an interpolation buffer")]
struct Args {
    #[arg(short, long, value_enum, default_value_t = ModeArg::Lerp)]
    mode: ModeArg,

    #[arg(short, long, default_value_t = DEFAULT_BUFFER_TIME_SECS, help = "Buffer latency in seconds")]
    buffer_time: f64,

    #[arg(long, default_value_t = 20, help = "Samples sent per second")]
    send_rate: u32,

    #[arg(long, default_value_t = 60, help = "Render frames per second")]
    frame_rate: u32,

    #[arg(short, long, default_value_t = 3.0, help = "Simulated duration in seconds")]
    duration: f64,

    #[arg(long, default_value_t = 0.0, help = "Packet loss percentage (0-100)")]
    loss_percent: f32,

    #[arg(long, default_value_t = 0, help = "Minimum latency in ms")]
    min_latency: u32,

    #[arg(long, default_value_t = 0, help = "Maximum latency in ms")]
    max_latency: u32,

    #[arg(long, default_value_t = 0, help = "Jitter in ms")]
    jitter: u32,

    #[arg(long, default_value_t = 1)]
    seed: u64,

    #[arg(long, help = "Print one JSON object per frame")]
    json: bool,
}

#[derive(Serialize)]
struct FrameReport {
    frame: u64,
    time_ms: f64,
    state: BufferState,
    pending: usize,
    pose: Pose,
    error: f32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut buffer = InterpolationBuffer::create(args.mode.into(), args.buffer_time)
        .context("invalid buffer configuration")?;

    let conditions = NetworkConditions {
        loss_percent: args.loss_percent,
        min_latency_ms: args.min_latency,
        max_latency_ms: args.max_latency.max(args.min_latency),
        jitter_ms: args.jitter,
    };
    let mut feed = SimulatedFeed::new(args.send_rate, conditions, args.seed);

    let frame_ms = 1000.0 / args.frame_rate.max(1) as f64;
    let total_frames = (args.duration * 1000.0 / frame_ms).ceil() as u64;

    log::info!(
        "Running {} frames in {:?} mode with {} ms buffer",
        total_frames,
        buffer.mode(),
        buffer.buffer_time_ms()
    );

    let mut now_ms = 0.0;
    let mut error_sum = 0.0f64;
    let mut error_samples = 0u64;

    for frame in 0..total_frames {
        for sample in feed.poll(now_ms) {
            buffer.append_sample(sample);
        }
        buffer.advance(frame_ms);
        now_ms += frame_ms;

        let error = if buffer.is_playing() {
            let truth = feed.truth(sender_time_ms(&buffer, now_ms));
            truth
                .position
                .map_or(0.0, |p| (p - *buffer.position()).length())
        } else {
            0.0
        };
        if buffer.is_playing() {
            error_sum += error as f64;
            error_samples += 1;
        }

        let stats = buffer.stats();
        if args.json {
            let report = FrameReport {
                frame,
                time_ms: now_ms,
                state: stats.state,
                pending: stats.pending_frames,
                pose: buffer.pose(),
                error,
            };
            println!("{}", serde_json::to_string(&report)?);
        } else {
            let p = buffer.position();
            println!(
                "{:>5} {:>9.1}ms {:<12} pending={:<2} pos=({:>7.3}, {:>7.3}, {:>7.3}) err={:.4}",
                frame,
                now_ms,
                format!("{:?}", stats.state),
                stats.pending_frames,
                p.x,
                p.y,
                p.z,
                error
            );
        }
    }

    let mean_error = if error_samples > 0 {
        error_sum / error_samples as f64
    } else {
        0.0
    };
    log::info!(
        "Sent {} samples, dropped {}, mean playback error {:.4}",
        feed.sent(),
        feed.dropped(),
        mean_error
    );

    Ok(())
}

/// Maps the buffer's read time onto the sender's timeline. The buffer clock
/// starts when the first sample arrives; transport latency is not subtracted.
fn sender_time_ms(buffer: &InterpolationBuffer, now_ms: f64) -> f64 {
    let clock_lag = now_ms - buffer.clock_ms();
    buffer.read_time_ms() + clock_lag
}
