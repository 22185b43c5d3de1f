// SPDX-License-Identifier: MIT
//
// multispin: scripted demonstration of a spinner group.
//
// Wires the two crates together:
//
//   multispin-term → escape encoding, stderr sink, probes, Ctrl-C restore
//   multispin-core → status registry, layout, the group engine
//
// The script adds, updates, fails, succeeds and removes a handful of rows
// on a timeline, the same way a build tool would drive them from its own
// work. Logs go to a file only when asked for: stderr belongs to the block.

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use multispin_core::{FramesSpec, GroupConfig, SpinnerGroup, SpinnerOptions};
use multispin_term::color::Color;

/// Many spinners, one terminal.
#[derive(Parser)]
#[command(name = "multispin")]
#[command(version)]
#[command(about = "Animate several named spinners together on stderr")]
struct Cli {
    /// Frame set to start with (dots, dots3, dashes, line, star, arrow)
    #[arg(long)]
    frames: Option<String>,

    /// Print each change once instead of animating
    #[arg(long)]
    plain: bool,

    /// Do not emit colour escapes (also honoured via NO_COLOR)
    #[arg(long)]
    no_color: bool,

    /// Drive rows through per-spinner handles instead of the group
    #[arg(long)]
    handles: bool,

    /// Time scale for the script (2.0 runs twice as fast)
    #[arg(long, default_value_t = 1.0)]
    speed: f64,

    /// Write tracing output to this file (filtered by RUST_LOG)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("cannot create log file {}", path.display()))?;
        tracing_subscriber::registry()
            .with(EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()))
            .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
            .init();
    }
    tracing::info!(plain = cli.plain, handles = cli.handles, "demo starting");

    let config = GroupConfig {
        color: Color::Blue,
        spinner_color: Color::BlueBright,
        frames: cli.frames.clone().map(FramesSpec::Named),
        animate: cli.plain.then_some(false),
        color_output: !cli.no_color && std::env::var_os("NO_COLOR").is_none(),
        ..GroupConfig::default()
    };
    let spinners = SpinnerGroup::new(config);
    let pace = Pace::new(cli.speed);

    run_script(&spinners, &pace, cli.handles)?;

    spinners.log(&mut io::stderr()).context("cannot flush buffered log lines")?;
    tracing::info!("demo finished");
    Ok(())
}

// ─── Timeline ───────────────────────────────────────────────────────────────

/// Sleeps scaled by the `--speed` factor.
struct Pace {
    factor: f64,
}

impl Pace {
    fn new(speed: f64) -> Self {
        let factor = if speed.is_finite() && speed > 0.0 { 1.0 / speed } else { 1.0 };
        Self { factor }
    }

    fn wait(&self, ms: u64) {
        #[allow(clippy::cast_precision_loss)]
        let scaled = Duration::from_secs_f64(ms as f64 / 1000.0 * self.factor);
        thread::sleep(scaled);
    }
}

fn opts() -> SpinnerOptions {
    SpinnerOptions::new()
}

const LONG_TEXT: &str = "I am another spinner that would love to make some friends! \
    Also I am very long, but I break into two or more lines if needed, I can break \
    break break and break all day long, using word-wrap so words won't get torn up";

fn run_script(spinners: &SpinnerGroup, pace: &Pace, handles: bool) -> Result<()> {
    spinners.add(
        "first-spinner",
        &opts().text("Lorem Ipsum is simply dummy text").color(Color::White),
    )?;

    pace.wait(3000);
    spinners.add("second-spinner", &opts().text("I'm line 2"))?;

    pace.wait(2000);
    spinners.add(
        "third-spinner",
        &opts().text("And I'm ironman").color(Color::YellowBright),
    )?;

    pace.wait(2000);
    spinners.add(
        "indented",
        &opts()
            .text("I'm an indented line with 2 spaces")
            .color(Color::Magenta)
            .indent(2),
    )?;

    pace.wait(1000);
    spinners.add(
        "non-spinnable",
        &opts().text("I'm a non-spinnable line").status("non-spinnable"),
    )?;

    pace.wait(1000);
    let failed = opts().text("And I failed :\\");
    if handles {
        spinners.get("second-spinner")?.fail(&failed)?;
    } else {
        spinners.fail("second-spinner", &failed)?;
    }
    spinners.buffer_log("second-spinner failed on purpose");

    pace.wait(500);
    let reindent = opts()
        .indent(4)
        .text("I'm an indented line, I used to have 2 spaces but now I have 4!");
    if handles {
        spinners.get("indented")?.update(&reindent)?;
    } else {
        spinners.update("indented", &reindent)?;
    }

    pace.wait(500);
    spinners.succeed(
        "first-spinner",
        &opts()
            .text("I'm the updated (and optional) success message")
            .color(Color::Magenta),
    )?;

    pace.wait(1000);
    spinners.set_animation_frames(&FramesSpec::Named("star".into()));

    pace.wait(500);
    if handles {
        spinners.get("indented")?.succeed(&opts())?;
    } else {
        spinners.succeed("indented", &opts())?;
    }

    pace.wait(500);
    spinners.add("spinner-that-changes", &opts().text(LONG_TEXT))?;

    pace.wait(500);
    spinners.update(
        "third-spinner",
        &opts()
            .text("I have been updated :D")
            .color(Color::Yellow)
            .spinner_color(Color::Blue),
    )?;

    pace.wait(1500);
    spinners.update(
        "third-spinner",
        &opts().text("I have been updated again :D").color(Color::Cyan),
    )?;
    spinners.update(
        "spinner-that-changes",
        &opts()
            .indent(4)
            .text(format!("I can be indented too! {LONG_TEXT}")),
    )?;

    pace.wait(2000);
    spinners.set_animation_frames(&FramesSpec::Named("arrow".into()));

    pace.wait(1000);
    spinners.update(
        "third-spinner",
        &opts().text("Again, with fancy colors!").color(Color::Magenta),
    )?;

    pace.wait(3000);
    spinners.succeed("third-spinner", &opts())?;

    pace.wait(1000);
    spinners.update(
        "third-spinner",
        &opts().text("I'm going to be removed").color(Color::Red),
    )?;

    pace.wait(1000);
    spinners.remove("third-spinner")?;
    spinners.buffer_log("third-spinner removed before the end");

    pace.wait(4000);
    spinners.succeed(
        "spinner-that-changes",
        &opts().text("Bye!").succeed_color(Color::Blue),
    )?;
    Ok(())
}
