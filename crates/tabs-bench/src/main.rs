use std::io;
use std::time::{Duration, Instant};

use clap::Parser;
use ratatui::{buffer::Buffer, layout::Rect};

use term_tabs::tabs::{TabContainer, TabEntry, TabId};
use term_tabs::ui::UiFrame;

#[derive(Parser, Debug)]
#[command(
    name = "tabs-bench",
    version = env!("CARGO_PKG_VERSION"),
    about = "Headless benchmark for tab layout and chrome rendering"
)]
struct BenchCli {
    /// How long to run the benchmark.
    #[arg(
        short = 'd',
        long = "duration",
        value_name = "SECONDS",
        default_value_t = 3.0
    )]
    duration_seconds: f64,

    /// Number of tabs in the container.
    #[arg(short = 't', long = "tabs", value_name = "COUNT", default_value_t = 40)]
    tabs: usize,

    /// Width of the rendered area in cells.
    #[arg(long = "width", default_value_t = 160)]
    width: u16,

    /// Height of the rendered area in cells.
    #[arg(long = "height", default_value_t = 48)]
    height: u16,

    /// Use the table layout instead of a single row.
    #[arg(long)]
    table: bool,
}

struct BenchConfig {
    duration: Duration,
    tabs: usize,
    area: Rect,
    table: bool,
}

impl TryFrom<&BenchCli> for BenchConfig {
    type Error = String;

    fn try_from(cli: &BenchCli) -> Result<Self, Self::Error> {
        if !(0.1..=600.0).contains(&cli.duration_seconds) {
            return Err("duration must be between 0.1 and 600 seconds".to_string());
        }
        if !(1..=10_000).contains(&cli.tabs) {
            return Err("tabs must be between 1 and 10000".to_string());
        }
        if cli.width < 8 || cli.height < 4 {
            return Err("area must be at least 8x4 cells".to_string());
        }
        Ok(Self {
            duration: Duration::from_secs_f64(cli.duration_seconds),
            tabs: cli.tabs,
            area: Rect::new(0, 0, cli.width, cli.height),
            table: cli.table,
        })
    }
}

fn main() -> io::Result<()> {
    let args = BenchCli::parse();
    let config = BenchConfig::try_from(&args)
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;

    let stats = run_benchmark(&config);
    println!("{}", stats.final_report(&config));
    Ok(())
}

fn build_container(config: &BenchConfig) -> (TabContainer, Vec<TabId>) {
    let mut tabs = TabContainer::default();
    tabs.set_single_row(!config.table);
    let ids = (0..config.tabs)
        .map(|n| {
            let label = if n % 4 == 0 {
                format!("document-{n}.rs")
            } else {
                format!("t{n}")
            };
            let mut entry = TabEntry::new(label);
            if n % 7 == 0 {
                entry.fire_attraction();
            }
            tabs.add_tab(entry)
        })
        .collect();
    (tabs, ids)
}

fn run_benchmark(config: &BenchConfig) -> BenchStats {
    let (mut tabs, ids) = build_container(config);
    let mut buffer = Buffer::empty(config.area);
    let mut stats = BenchStats::new();
    let mut step: usize = 0;

    loop {
        let frame_start = Instant::now();
        let id = ids[step % ids.len()];
        tabs.select(id, false);
        tabs.tick(frame_start);
        let layout_start = Instant::now();
        let overflow = tabs.do_layout(config.area).overflow.len();
        let layout_time = layout_start.elapsed();

        buffer.reset();
        let mut frame = UiFrame::from_parts(config.area, &mut buffer);
        tabs.render(&mut frame, config.area);
        stats.record_frame(layout_time, frame_start.elapsed(), overflow);

        if stats.elapsed() >= config.duration {
            break;
        }
        step = step.wrapping_add(1);
    }

    stats.mark_completed();
    stats
}

struct BenchStats {
    start: Instant,
    completed_at: Option<Instant>,
    frame_count: u64,
    total_layout_time: Duration,
    total_frame_time: Duration,
    fastest_frame: Duration,
    slowest_frame: Duration,
    overflowed_frames: u64,
}

impl BenchStats {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            completed_at: None,
            frame_count: 0,
            total_layout_time: Duration::ZERO,
            total_frame_time: Duration::ZERO,
            fastest_frame: Duration::MAX,
            slowest_frame: Duration::ZERO,
            overflowed_frames: 0,
        }
    }

    fn elapsed(&self) -> Duration {
        match self.completed_at {
            Some(done) => done.duration_since(self.start),
            None => self.start.elapsed(),
        }
    }

    fn mark_completed(&mut self) {
        self.completed_at = Some(Instant::now());
    }

    fn record_frame(&mut self, layout_time: Duration, frame_time: Duration, overflow: usize) {
        self.frame_count = self.frame_count.saturating_add(1);
        self.total_layout_time += layout_time;
        self.total_frame_time += frame_time;
        if frame_time < self.fastest_frame {
            self.fastest_frame = frame_time;
        }
        if frame_time > self.slowest_frame {
            self.slowest_frame = frame_time;
        }
        if overflow > 0 {
            self.overflowed_frames = self.overflowed_frames.saturating_add(1);
        }
    }

    fn average_ms(&self, total: Duration) -> f64 {
        if self.frame_count == 0 {
            return 0.0;
        }
        (total.as_secs_f64() / self.frame_count as f64) * 1_000.0
    }

    fn fastest_frame_ms(&self) -> f64 {
        if self.frame_count == 0 {
            return 0.0;
        }
        self.fastest_frame.as_secs_f64() * 1_000.0
    }

    fn final_report(&self, config: &BenchConfig) -> String {
        let elapsed = self.elapsed().as_secs_f64();
        let frames_per_second = if elapsed > 0.0 {
            self.frame_count as f64 / elapsed
        } else {
            0.0
        };

        indoc::formatdoc!(
            r#"
            Tabs bench completed.
            Setup: {tabs} tabs, {width}x{height} cells, {mode} layout
            Duration: {elapsed:.2}s (target {target:.2}s)
            Frames: {frames} (~{fps:.0}/s), {overflowed} with overflow
            Avg layout: {layout:.3} ms | Avg frame: {avg:.3} ms
            Best: {best:.3} ms | Worst: {worst:.3} ms
            "#,
            tabs = config.tabs,
            width = config.area.width,
            height = config.area.height,
            mode = if config.table { "table" } else { "single-row" },
            elapsed = elapsed,
            target = config.duration.as_secs_f64(),
            frames = self.frame_count,
            fps = frames_per_second,
            overflowed = self.overflowed_frames,
            layout = self.average_ms(self.total_layout_time),
            avg = self.average_ms(self.total_frame_time),
            best = self.fastest_frame_ms(),
            worst = self.slowest_frame.as_secs_f64() * 1_000.0,
        )
    }
}
