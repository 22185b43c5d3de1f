// SPDX-License-Identifier: MIT

//! The spinner group: ordered entries, the animation clock, and the
//! in-place multi-row redraw.
//!
//! # Lifecycle
//!
//! ```text
//!   Idle ──(an active entry appears)──▶ Animating ──(no active entry left)──▶ Idle
//!                                         │
//!                                   final static paint,
//!                                   cursor shown, entries cleared
//! ```
//!
//! While animating the cursor is hidden, stdin echo is off, an interrupt
//! hook is registered for this group, and a ticker thread calls
//! [`SpinnerGroup::tick`] once per frame interval. Mutations only change
//! data and mark the group dirty; the next tick draws them, so a burst of
//! updates costs one redraw.
//!
//! # Redraw
//!
//! The block is redrawn from its first row. Every row is written in full
//! first, then the rows that got shorter than last frame are cleared past
//! their new end, and rows left over from a taller previous block are
//! erased. The cursor goes back to the first row for the next frame.
//!
//! # Plain mode
//!
//! When animation is off (no TTY, CI, or `animate: Some(false)`) nothing
//! moves the cursor: each change prints the affected entry once.

use std::fmt;
use std::io::{self, Write};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::thread;

use multispin_term::ansi;
use multispin_term::color::{AnsiStyler, PlainStyler, Styler};
use multispin_term::interrupt::{self, HookId};
use multispin_term::output::OutputBuffer;
use multispin_term::sink::{RenderSink, StderrSink};
use multispin_term::terminal::{self, EchoGuard};

use crate::error::{Result, SpinnerError};
use crate::frames::{Frames, FramesSpec};
use crate::options::{GroupConfig, SpinnerOptions};
use crate::spinner::{ColorRoles, Spinner};
use crate::status::{self, Prefix, StatusAttributes, StatusDefinition, StatusRegistry};

/// Prefix for animated entries in plain mode, unless the status has its
/// own plain renderer.
const PLAIN_GLYPH: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Animating,
}

// ─── Engine ──────────────────────────────────────────────────────────────────

struct Engine {
    this: Weak<Mutex<Engine>>,
    entries: Vec<Spinner>,
    registry: StatusRegistry,
    frames: Frames,
    frame_index: usize,
    unicode: bool,
    defaults: ColorRoles,
    sink: Box<dyn RenderSink>,
    styler: Box<dyn Styler>,
    out: OutputBuffer,
    animate: bool,
    auto_tick: bool,
    suppress_echo: bool,
    fallback_columns: u16,
    phase: Phase,
    dirty: bool,
    /// Visible width of every row currently on screen, top to bottom.
    last_lengths: Vec<usize>,
    /// Bumped whenever a ticker is retired; a ticker from an older epoch
    /// exits without painting.
    epoch: u64,
    ticker: Option<Sender<()>>,
    hook: Option<HookId>,
    echo: Option<EchoGuard>,
    logs: Vec<String>,
}

fn lock(engine: &Mutex<Engine>) -> MutexGuard<'_, Engine> {
    engine.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Engine {
    fn position(&self, name: &str) -> Result<usize> {
        if name.is_empty() {
            return Err(SpinnerError::MissingName);
        }
        self.entries
            .iter()
            .position(|entry| entry.name() == name)
            .ok_or_else(|| SpinnerError::NotFound(name.to_owned()))
    }

    fn has_active(&self) -> bool {
        self.entries.iter().any(|entry| entry.is_active(&self.registry))
    }

    fn columns(&self) -> u16 {
        self.sink.columns().unwrap_or(self.fallback_columns)
    }

    // ── Mutations ───────────────────────────────────────────────────

    fn add(&mut self, name: &str, options: &SpinnerOptions) -> Result<Spinner> {
        if name.is_empty() {
            return Err(SpinnerError::MissingName);
        }
        if self.entries.iter().any(|entry| entry.name() == name) {
            return Err(SpinnerError::AlreadyExists(name.to_owned()));
        }
        let mut spinner = Spinner::new(name, self.defaults, &self.registry);
        spinner.update(options, &self.registry);
        self.entries.push(spinner.clone());
        tracing::debug!(spinner = name, status = spinner.status(), "spinner added");
        self.changed(&[self.entries.len() - 1]);
        Ok(spinner)
    }

    fn modify(
        &mut self,
        name: &str,
        apply: impl FnOnce(&mut Spinner, &StatusRegistry),
    ) -> Result<Spinner> {
        let index = self.position(name)?;
        apply(&mut self.entries[index], &self.registry);
        let snapshot = self.entries[index].clone();
        self.changed(&[index]);
        Ok(snapshot)
    }

    fn remove(&mut self, name: &str) -> Result<Spinner> {
        let index = self.position(name)?;
        let removed = self.entries.remove(index);
        tracing::debug!(spinner = name, "spinner removed");
        self.changed(&[]);
        Ok(removed)
    }

    fn stop_all(&mut self, target: Option<&str>) -> Vec<Spinner> {
        // Only a static target settles the group.
        let target = target
            .and_then(|status| self.registry.lookup(status))
            .filter(|def| def.is_static)
            .map_or(status::STOPPED, |def| def.name.as_str())
            .to_owned();
        let mut stopped = Vec::new();
        for (index, entry) in self.entries.iter_mut().enumerate() {
            if entry.is_active(&self.registry) {
                entry.stop(&target, &self.registry);
                stopped.push(index);
            }
        }
        tracing::debug!(status = %target, count = stopped.len(), "stopping all spinners");
        let snapshot = self.entries.clone();
        self.changed(&stopped);
        snapshot
    }

    fn configure_status(&mut self, name: &str, attrs: StatusAttributes) -> StatusDefinition {
        let def = self.registry.configure(name, attrs).clone();
        if self.animate {
            self.dirty = true;
            self.settle();
        }
        def
    }

    fn set_frames(&mut self, spec: &FramesSpec) {
        self.frames = spec.resolve(&Frames::platform_default(self.unicode));
        self.frame_index = 0;
        self.dirty = true;
        tracing::debug!(
            frames = self.frames.len(),
            interval_ms = self.frames.interval.as_millis(),
            "animation frames changed"
        );
        if self.phase == Phase::Animating && self.auto_tick {
            self.spawn_ticker();
        }
    }

    /// Entries at `touched` changed (or the set itself did).
    fn changed(&mut self, touched: &[usize]) {
        if self.animate {
            self.dirty = true;
            self.settle();
        } else {
            for &index in touched {
                self.print_plain(index);
            }
        }
    }

    fn settle(&mut self) {
        if self.has_active() {
            self.start();
        } else if self.phase == Phase::Animating || !self.entries.is_empty() {
            self.drain();
        }
    }

    // ── Lifecycle ───────────────────────────────────────────────────

    fn start(&mut self) {
        if self.phase == Phase::Animating {
            return;
        }
        self.phase = Phase::Animating;
        ansi::cursor_hide(&mut self.out).ok();
        self.flush();

        if self.suppress_echo {
            self.echo = EchoGuard::engage();
        }
        let this = self.this.clone();
        self.hook = Some(interrupt::register(move || {
            if let Some(shared) = this.upgrade() {
                lock(&shared).restore();
            }
        }));
        if self.auto_tick {
            self.spawn_ticker();
        }
        tracing::debug!(entries = self.entries.len(), "animation started");
    }

    /// Final static paint, then back to idle with the cursor below the block.
    fn drain(&mut self) {
        self.paint(true);
        self.release();
        self.entries.clear();
        self.last_lengths.clear();
        self.dirty = false;
        tracing::debug!("spinner group drained");
    }

    /// Leave the terminal usable mid-animation: cursor below the block and
    /// visible, echo back on.
    fn restore(&mut self) {
        if self.phase != Phase::Animating {
            return;
        }
        ansi::cursor_down(&mut self.out, self.last_lengths.len()).ok();
        ansi::carriage_return(&mut self.out).ok();
        self.release();
        self.last_lengths.clear();
        tracing::debug!("terminal restored");
    }

    fn release(&mut self) {
        if self.phase != Phase::Animating {
            self.flush();
            return;
        }
        self.phase = Phase::Idle;
        self.stop_ticker();
        ansi::cursor_show(&mut self.out).ok();
        self.flush();
        if let Some(mut echo) = self.echo.take() {
            echo.restore();
        }
        if let Some(hook) = self.hook.take() {
            interrupt::deregister(hook);
        }
    }

    fn spawn_ticker(&mut self) {
        self.stop_ticker();
        let epoch = self.epoch;
        let interval = self.frames.interval;
        let this = self.this.clone();
        let (tx, rx) = mpsc::channel::<()>();

        let spawned = thread::Builder::new()
            .name("multispin-ticker".into())
            .spawn(move || {
                while let Err(RecvTimeoutError::Timeout) = rx.recv_timeout(interval) {
                    let Some(shared) = this.upgrade() else { break };
                    let mut engine = lock(&shared);
                    if engine.epoch != epoch {
                        break;
                    }
                    engine.tick();
                }
            });
        match spawned {
            Ok(_) => self.ticker = Some(tx),
            Err(err) => tracing::warn!(%err, "could not start the ticker thread"),
        }
    }

    fn stop_ticker(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        // Dropping the sender wakes the thread with `Disconnected`.
        self.ticker = None;
    }

    // ── Drawing ─────────────────────────────────────────────────────

    fn tick(&mut self) {
        if self.phase != Phase::Animating {
            return;
        }
        self.frame_index = (self.frame_index + 1) % self.frames.len().max(1);
        let animated_visible = self
            .entries
            .iter()
            .any(|entry| !entry.is_hidden() && entry.is_active(&self.registry));
        if self.dirty || animated_visible {
            self.paint(false);
            self.dirty = false;
        }
    }

    /// Draw every visible entry from the top of the block.
    ///
    /// Leaves the cursor on the first row, or below the block when `below`.
    fn paint(&mut self, below: bool) {
        let columns = self.columns();
        let glyph = self.frames.glyph(self.frame_index);
        let mut lengths = Vec::with_capacity(self.last_lengths.len());

        for entry in self.entries.iter().filter(|entry| !entry.is_hidden()) {
            let rendered = entry.render(glyph, &self.registry, self.styler.as_ref(), columns);
            for row in rendered.rows() {
                self.out.push_str(row);
                self.out.newline();
            }
            lengths.extend(rendered.row_lengths);
        }

        let rows = lengths.len();
        let stale: Vec<(usize, usize)> = lengths
            .iter()
            .enumerate()
            .filter(|&(row, len)| self.last_lengths.get(row).is_some_and(|old| old > len))
            .map(|(row, len)| (row, *len))
            .collect();

        if !stale.is_empty() {
            ansi::cursor_up(&mut self.out, rows).ok();
            let mut at = 0;
            for (row, len) in stale {
                ansi::cursor_down(&mut self.out, row - at).ok();
                at = row;
                ansi::cursor_to_column(&mut self.out, len).ok();
                ansi::erase_line_right(&mut self.out).ok();
            }
            ansi::cursor_down(&mut self.out, rows - at).ok();
        }
        ansi::carriage_return(&mut self.out).ok();
        if self.last_lengths.len() > rows {
            ansi::erase_down(&mut self.out).ok();
        }
        if !below {
            ansi::cursor_up(&mut self.out, rows).ok();
        }

        self.last_lengths = lengths;
        self.flush();
        tracing::trace!(frame = self.frame_index, rows, "frame painted");
    }

    fn print_plain(&mut self, index: usize) {
        let Some(entry) = self.entries.get(index).filter(|entry| !entry.is_hidden()) else {
            return;
        };
        let line = entry.render_plain(PLAIN_GLYPH, &self.registry, self.styler.as_ref(), self.columns());
        for row in line.split('\n') {
            self.out.push_str(row);
            self.out.newline();
        }
        self.flush();
    }

    fn flush(&mut self) {
        if let Err(err) = self.out.flush_to(&mut *self.sink) {
            tracing::trace!(%err, "terminal write failed");
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.restore();
    }
}

// ─── SpinnerGroup ────────────────────────────────────────────────────────────

/// Many named spinners animating together on one stream.
///
/// Every operation that names an entry fails with a [`SpinnerError`] when
/// the name is empty, duplicated (on add) or unknown. Option fields that
/// fail validation are dropped silently.
pub struct SpinnerGroup {
    engine: Arc<Mutex<Engine>>,
}

impl SpinnerGroup {
    /// A group drawing to stderr.
    #[must_use]
    pub fn new(config: GroupConfig) -> Self {
        Self::with_sink(config, StderrSink)
    }

    /// A group drawing to `sink`.
    #[must_use]
    pub fn with_sink(config: GroupConfig, sink: impl RenderSink + 'static) -> Self {
        let unicode = config.unicode.unwrap_or_else(terminal::supports_unicode);
        let animate = config.animate.unwrap_or_else(terminal::is_interactive);
        let platform = Frames::platform_default(unicode);
        let frames = config
            .frames
            .as_ref()
            .map_or_else(|| platform.clone(), |spec| spec.resolve(&platform));

        let glyph = |fancy: &str, plain: &str| Prefix::Glyph(if unicode { fancy } else { plain }.to_owned());
        let registry = StatusRegistry::with_builtins(
            config.succeed_prefix.clone().unwrap_or_else(|| glyph("✓", "√")),
            config.succeed_color,
            config.fail_prefix.clone().unwrap_or_else(|| glyph("✖", "×")),
            config.fail_color,
        );
        let styler: Box<dyn Styler> = if config.color_output {
            Box::new(AnsiStyler)
        } else {
            Box::new(PlainStyler)
        };

        tracing::debug!(animate, unicode, "spinner group created");
        let engine = Arc::new_cyclic(|this| {
            Mutex::new(Engine {
                this: this.clone(),
                entries: Vec::new(),
                registry,
                frames,
                frame_index: 0,
                unicode,
                defaults: ColorRoles {
                    text: config.color,
                    spinner: config.spinner_color,
                    succeed: config.succeed_color,
                    fail: config.fail_color,
                },
                sink: Box::new(sink),
                styler,
                out: OutputBuffer::new(),
                animate,
                auto_tick: config.auto_tick,
                suppress_echo: config.suppress_echo,
                fallback_columns: config.fallback_columns,
                phase: Phase::Idle,
                dirty: false,
                last_lengths: Vec::new(),
                epoch: 0,
                ticker: None,
                hook: None,
                echo: None,
                logs: Vec::new(),
            })
        });
        Self { engine }
    }

    fn engine(&self) -> MutexGuard<'_, Engine> {
        lock(&self.engine)
    }

    /// Add a spinning entry. Its text defaults to its name.
    ///
    /// # Errors
    ///
    /// [`SpinnerError::MissingName`] for an empty name,
    /// [`SpinnerError::AlreadyExists`] if the name is taken.
    pub fn add(&self, name: &str, options: &SpinnerOptions) -> Result<Spinner> {
        self.engine().add(name, options)
    }

    /// Merge `options` into an entry.
    ///
    /// # Errors
    ///
    /// [`SpinnerError::NotFound`] for unknown names.
    pub fn update(&self, name: &str, options: &SpinnerOptions) -> Result<Spinner> {
        self.engine()
            .modify(name, |spinner, registry| spinner.update(options, registry))
    }

    /// Update and switch to `succeed`.
    ///
    /// # Errors
    ///
    /// [`SpinnerError::NotFound`] for unknown names.
    pub fn succeed(&self, name: &str, options: &SpinnerOptions) -> Result<Spinner> {
        self.finish(name, options, status::SUCCEED)
    }

    /// Update and switch to `fail`.
    ///
    /// # Errors
    ///
    /// [`SpinnerError::NotFound`] for unknown names.
    pub fn fail(&self, name: &str, options: &SpinnerOptions) -> Result<Spinner> {
        self.finish(name, options, status::FAIL)
    }

    fn finish(&self, name: &str, options: &SpinnerOptions, status: &str) -> Result<Spinner> {
        self.engine().modify(name, |spinner, registry| {
            spinner.update(options, registry);
            spinner.set_status(status, registry);
        })
    }

    /// Switch an entry to `status` (name or alias); unknown ones are ignored.
    ///
    /// # Errors
    ///
    /// [`SpinnerError::NotFound`] for unknown names.
    pub fn set_status(&self, name: &str, status: &str) -> Result<Spinner> {
        self.engine()
            .modify(name, |spinner, registry| spinner.set_status(status, registry))
    }

    /// Detach an entry. It is not drawn again.
    ///
    /// # Errors
    ///
    /// [`SpinnerError::NotFound`] for unknown names.
    pub fn remove(&self, name: &str) -> Result<Spinner> {
        self.engine().remove(name)
    }

    /// Move every still-animating entry to `status` and recolour it. An
    /// unknown or animated `status` means `stopped`. Returns every entry as
    /// it was before the group drained.
    pub fn stop_all(&self, status: Option<&str>) -> Vec<Spinner> {
        self.engine().stop_all(status)
    }

    /// A handle bound to one entry.
    ///
    /// # Errors
    ///
    /// [`SpinnerError::NotFound`] for unknown names.
    pub fn get(&self, name: &str) -> Result<SpinnerHandle> {
        self.engine().position(name)?;
        Ok(SpinnerHandle {
            name: name.to_owned(),
            engine: Arc::clone(&self.engine),
        })
    }

    /// A snapshot of one entry, if it exists.
    #[must_use]
    pub fn pick(&self, name: &str) -> Option<Spinner> {
        let engine = self.engine();
        engine.entries.iter().find(|entry| entry.name() == name).cloned()
    }

    /// Snapshots of every entry in render order.
    #[must_use]
    pub fn entries(&self) -> Vec<Spinner> {
        self.engine().entries.clone()
    }

    /// Whether any entry is still animating.
    #[must_use]
    pub fn has_active(&self) -> bool {
        self.engine().has_active()
    }

    /// Whether the block currently owns the terminal.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.engine().phase == Phase::Animating
    }

    /// Merge attributes into a status of this group's registry.
    pub fn configure_status(&self, name: &str, attrs: StatusAttributes) -> StatusDefinition {
        self.engine().configure_status(name, attrs)
    }

    /// Swap the animation frames; restarts the ticker at the new interval.
    pub fn set_animation_frames(&self, spec: &FramesSpec) {
        self.engine().set_frames(spec);
    }

    /// The frames currently in use.
    #[must_use]
    pub fn frames(&self) -> Frames {
        self.engine().frames.clone()
    }

    /// Advance one frame and redraw. The ticker calls this; with
    /// `auto_tick: false` it is up to the caller.
    pub fn tick(&self) {
        self.engine().tick();
    }

    /// Queue a message for [`log`](Self::log).
    pub fn buffer_log(&self, message: impl Into<String>) {
        self.engine().logs.push(message.into());
    }

    /// Write and forget every queued message, one per line.
    ///
    /// # Errors
    ///
    /// Propagates write errors from `sink`; messages are dropped either way.
    pub fn log(&self, sink: &mut impl Write) -> io::Result<()> {
        let messages = std::mem::take(&mut self.engine().logs);
        for message in messages {
            writeln!(sink, "{message}")?;
        }
        sink.flush()
    }
}

impl Drop for SpinnerGroup {
    fn drop(&mut self) {
        // Restore on the owner's thread: a ticker may briefly hold the last
        // reference to the engine.
        self.engine().restore();
    }
}

impl Default for SpinnerGroup {
    fn default() -> Self {
        Self::new(GroupConfig::default())
    }
}

impl fmt::Debug for SpinnerGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let engine = self.engine();
        f.debug_struct("SpinnerGroup")
            .field("entries", &engine.entries.len())
            .field("phase", &engine.phase)
            .finish_non_exhaustive()
    }
}

// ─── SpinnerHandle ───────────────────────────────────────────────────────────

/// One entry of a group, addressed by name.
///
/// The handle keeps the entries alive, but dropping the [`SpinnerGroup`]
/// still restores the terminal; a later change through the handle starts a
/// fresh block. Operations fail with [`SpinnerError::NotFound`] once the
/// entry is removed or drained.
#[derive(Clone)]
pub struct SpinnerHandle {
    name: String,
    engine: Arc<Mutex<Engine>>,
}

impl SpinnerHandle {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn engine(&self) -> MutexGuard<'_, Engine> {
        lock(&self.engine)
    }

    /// # Errors
    ///
    /// [`SpinnerError::NotFound`] once the entry is gone.
    pub fn update(&self, options: &SpinnerOptions) -> Result<Spinner> {
        self.engine()
            .modify(&self.name, |spinner, registry| spinner.update(options, registry))
    }

    /// # Errors
    ///
    /// [`SpinnerError::NotFound`] once the entry is gone.
    pub fn succeed(&self, options: &SpinnerOptions) -> Result<Spinner> {
        self.finish(options, status::SUCCEED)
    }

    /// # Errors
    ///
    /// [`SpinnerError::NotFound`] once the entry is gone.
    pub fn fail(&self, options: &SpinnerOptions) -> Result<Spinner> {
        self.finish(options, status::FAIL)
    }

    fn finish(&self, options: &SpinnerOptions, status: &str) -> Result<Spinner> {
        self.engine().modify(&self.name, |spinner, registry| {
            spinner.update(options, registry);
            spinner.set_status(status, registry);
        })
    }

    /// # Errors
    ///
    /// [`SpinnerError::NotFound`] once the entry is gone.
    pub fn status(&self, status: &str) -> Result<Spinner> {
        self.engine()
            .modify(&self.name, |spinner, registry| spinner.set_status(status, registry))
    }

    /// # Errors
    ///
    /// [`SpinnerError::NotFound`] once the entry is gone.
    pub fn remove(&self) -> Result<Spinner> {
        self.engine().remove(&self.name)
    }

    /// Current state of the entry.
    ///
    /// # Errors
    ///
    /// [`SpinnerError::NotFound`] once the entry is gone.
    pub fn snapshot(&self) -> Result<Spinner> {
        let engine = self.engine();
        let index = engine.position(&self.name)?;
        Ok(engine.entries[index].clone())
    }
}

impl fmt::Debug for SpinnerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpinnerHandle")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use multispin_term::color::Color;
    use multispin_term::sink::MemorySink;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn config(animate: bool) -> GroupConfig {
        GroupConfig {
            animate: Some(animate),
            unicode: Some(true),
            suppress_echo: false,
            auto_tick: false,
            color_output: false,
            ..GroupConfig::default()
        }
        .with_frames(Duration::from_millis(80), &["a", "b"])
    }

    fn group(columns: u16) -> (SpinnerGroup, MemorySink) {
        let sink = MemorySink::new(Some(columns));
        (SpinnerGroup::with_sink(config(true), sink.clone()), sink)
    }

    fn opts() -> SpinnerOptions {
        SpinnerOptions::new()
    }

    // ── Usage errors ────────────────────────────────────────────────

    #[test]
    fn add_twice_fails() {
        let (group, _) = group(40);
        group.add("spinner", &opts()).unwrap();
        assert_eq!(
            group.add("spinner", &opts()).unwrap_err(),
            SpinnerError::AlreadyExists("spinner".into())
        );
    }

    #[test]
    fn empty_name_fails() {
        let (group, _) = group(40);
        assert_eq!(group.add("", &opts()).unwrap_err(), SpinnerError::MissingName);
        assert_eq!(group.update("", &opts()).unwrap_err(), SpinnerError::MissingName);
    }

    #[test]
    fn unknown_name_fails() {
        let (group, _) = group(40);
        for err in [
            group.update("ghost", &opts()).unwrap_err(),
            group.succeed("ghost", &opts()).unwrap_err(),
            group.fail("ghost", &opts()).unwrap_err(),
            group.remove("ghost").unwrap_err(),
            group.get("ghost").unwrap_err(),
        ] {
            assert_eq!(err, SpinnerError::NotFound("ghost".into()));
        }
    }

    #[test]
    fn add_defaults_text_to_name() {
        let (group, _) = group(40);
        assert_eq!(group.add("spinner", &opts()).unwrap().text(), "spinner");
        assert_eq!(group.pick("spinner").unwrap().text(), "spinner");
    }

    // ── Lifecycle ───────────────────────────────────────────────────

    #[test]
    fn first_active_entry_hides_cursor() {
        let (group, sink) = group(40);
        assert!(!group.is_animating());
        group.add("one", &opts()).unwrap();
        assert!(group.is_animating());
        assert_eq!(sink.take(), "\x1b[?25l");
    }

    #[test]
    fn last_settled_entry_drains() {
        let (group, sink) = group(40);
        group.add("a", &opts()).unwrap();
        group.add("b", &opts().status("succeed")).unwrap();
        assert!(group.has_active());

        sink.take();
        group.succeed("a", &opts()).unwrap();
        assert!(!group.has_active());
        assert!(!group.is_animating());
        assert!(group.entries().is_empty());
        assert_eq!(sink.take(), "✓ a\n✓ b\n\r\x1b[?25h");
    }

    #[test]
    fn removing_last_entry_drains() {
        let (group, sink) = group(40);
        group.add("a", &opts()).unwrap();
        group.tick();
        sink.take();
        group.remove("a").unwrap();
        assert!(!group.is_animating());
        assert_eq!(sink.take(), "\r\x1b[J\x1b[?25h");
    }

    #[test]
    fn static_only_add_paints_once() {
        let (group, sink) = group(40);
        group.add("done", &opts().status("non-spinnable")).unwrap();
        assert!(!group.is_animating());
        assert_eq!(sink.take(), "done\n\r");
    }

    // ── Frame tick ──────────────────────────────────────────────────

    #[test]
    fn tick_writes_block_and_returns_to_top() {
        let (group, sink) = group(40);
        group.add("one", &opts()).unwrap();
        sink.take();
        group.tick();
        assert_eq!(sink.take(), "b one\n\r\x1b[1A");
    }

    #[test]
    fn tick_clears_shrunken_rows() {
        let (group, sink) = group(40);
        group.add("one", &opts()).unwrap();
        group.tick();
        group.update("one", &opts().text("on")).unwrap();
        sink.take();
        group.tick();
        assert_eq!(sink.take(), "a on\n\x1b[1A\x1b[5G\x1b[K\x1b[1B\r\x1b[1A");
    }

    #[test]
    fn tick_erases_rows_below_shorter_block() {
        let (group, sink) = group(40);
        group.add("x", &opts()).unwrap();
        group.add("y", &opts()).unwrap();
        group.tick();
        group.remove("y").unwrap();
        sink.take();
        group.tick();
        assert_eq!(sink.take(), "a x\n\r\x1b[J\x1b[1A");
    }

    #[test]
    fn frame_index_wraps() {
        let (group, sink) = group(40);
        group.add("x", &opts()).unwrap();
        sink.take();
        group.tick();
        group.tick();
        group.tick();
        assert_eq!(sink.take(), "b x\n\r\x1b[1Aa x\n\r\x1b[1Ab x\n\r\x1b[1A");
    }

    #[test]
    fn hidden_entries_are_skipped() {
        let (group, sink) = group(40);
        group.add("shown", &opts()).unwrap();
        group.add("secret", &opts().hidden(true)).unwrap();
        sink.take();
        group.tick();
        let frame = sink.take();
        assert!(frame.contains("shown"));
        assert!(!frame.contains("secret"));
    }

    #[test]
    fn wrapped_entries_record_every_row() {
        let (group, sink) = group(15);
        group
            .add("s", &opts().text("im a very long sentence yay yay yay yay"))
            .unwrap();
        sink.take();
        group.tick();
        let frame = sink.take();
        assert_eq!(frame.matches('\n').count(), 4);
        assert!(frame.ends_with("\r\x1b[4A"));
    }

    #[test]
    fn oversized_indent_stays_inside_the_terminal() {
        let (group, sink) = group(40);
        group.add("a", &opts().text("short words only").indent(60)).unwrap();
        group
            .update("a", &SpinnerOptions::from_value(&serde_json::json!({ "indent": u64::MAX })))
            .unwrap();
        sink.take();
        group.tick();
        let frame = sink.take();
        let rows = frame.matches('\n').count();
        assert!(frame.ends_with(&format!("\r\x1b[{rows}A")));
        for row in frame.split('\n').filter(|row| !row.contains('\x1b')) {
            assert!(crate::layout::visible_length(row) <= 39, "{row:?}");
        }
        let engine = group.engine();
        assert_eq!(engine.last_lengths.len(), rows);
        assert!(engine.last_lengths.iter().all(|len| *len <= 39));
    }

    #[test]
    fn burst_of_updates_is_one_redraw() {
        let (group, sink) = group(40);
        group.add("x", &opts()).unwrap();
        sink.take();
        for n in 0..10 {
            group.update("x", &opts().text(format!("step {n}"))).unwrap();
        }
        assert_eq!(sink.take(), "");
        group.tick();
        assert_eq!(sink.take().matches("step").count(), 1);
    }

    // ── stop_all ────────────────────────────────────────────────────

    #[test]
    fn stop_all_only_touches_spinning_entries() {
        let (group, _) = group(40);
        group.add("spin", &opts()).unwrap();
        group.add("ok", &opts().status("succeed")).unwrap();
        group.add("bad", &opts().status("fail")).unwrap();

        let entries = group.stop_all(None);
        let by_name = |name: &str| entries.iter().find(|e| e.name() == name).unwrap().clone();
        assert_eq!(by_name("spin").status(), status::STOPPED);
        assert_eq!(by_name("spin").colors().text, Color::Gray);
        assert_eq!(by_name("ok").status(), status::SUCCEED);
        assert_eq!(by_name("ok").colors().text, Color::White);
        assert_eq!(by_name("bad").status(), status::FAIL);
        assert!(!group.is_animating());
    }

    #[test]
    fn stop_all_with_animated_target_stops() {
        let (group, _) = group(40);
        group.add("spin", &opts()).unwrap();
        let entries = group.stop_all(Some("spinning"));
        assert_eq!(entries[0].status(), status::STOPPED);
        assert_eq!(entries[0].colors().text, Color::Gray);
        assert!(!group.is_animating());
        assert!(group.entries().is_empty());
    }

    #[test]
    fn stop_all_with_unknown_target_stops() {
        let (group, _) = group(40);
        group.add("spin", &opts()).unwrap();
        assert_eq!(group.stop_all(Some("nope"))[0].status(), status::STOPPED);
    }

    #[test]
    fn stop_all_with_custom_status() {
        let (group, _) = group(40);
        group.add("spin", &opts()).unwrap();
        let entries = group.stop_all(Some("error"));
        assert_eq!(entries[0].status(), status::FAIL);
        assert_eq!(entries[0].colors().text, Color::Red);
    }

    // ── Registry and frames ─────────────────────────────────────────

    #[test]
    fn configure_status_restyles_on_next_frame() {
        let (group, sink) = group(40);
        group.add("x", &opts()).unwrap();
        group.add("y", &opts().status("stopped")).unwrap();
        group.configure_status(
            "stopped",
            StatusAttributes {
                prefix: Some(Prefix::Glyph("#".into())),
                ..StatusAttributes::default()
            },
        );
        sink.take();
        group.tick();
        assert!(sink.take().contains("# y\n"));
    }

    #[test]
    fn making_the_default_static_drains() {
        let (group, _) = group(40);
        group.add("x", &opts()).unwrap();
        group.configure_status(
            status::SPINNING,
            StatusAttributes {
                is_static: Some(true),
                ..StatusAttributes::default()
            },
        );
        assert!(!group.is_animating());
    }

    #[test]
    fn set_frames_resets_index() {
        let (group, sink) = group(40);
        group.add("x", &opts()).unwrap();
        group.tick();
        group.set_animation_frames(&FramesSpec::Named("line".into()));
        assert_eq!(group.frames(), Frames::named("line").unwrap());
        sink.take();
        group.tick();
        assert!(sink.take().starts_with("\\ x"));
    }

    // ── Handles ─────────────────────────────────────────────────────

    #[test]
    fn handle_operations() {
        let (group, _) = group(40);
        group.add("a", &opts()).unwrap();
        group.add("b", &opts()).unwrap();
        let a = group.get("a").unwrap();
        assert_eq!(a.update(&opts().text("new")).unwrap().text(), "new");
        assert_eq!(a.status("fail").unwrap().status(), status::FAIL);
        assert_eq!(a.snapshot().unwrap().status(), status::FAIL);
        a.remove().unwrap();
        assert_eq!(a.snapshot().unwrap_err(), SpinnerError::NotFound("a".into()));
        assert!(group.is_animating());
    }

    // ── Plain mode ──────────────────────────────────────────────────

    #[test]
    fn plain_mode_prints_each_change_once() {
        let sink = MemorySink::new(Some(40));
        let group = SpinnerGroup::with_sink(config(false), sink.clone());
        group.add("task", &opts()).unwrap();
        group.update("task", &opts().text("task two")).unwrap();
        group.succeed("task", &opts()).unwrap();
        group.tick();
        assert_eq!(sink.contents(), "- task\n- task two\n✓ task two\n");
        assert!(!group.is_animating());
        assert!(group.pick("task").is_some());
    }

    #[test]
    fn plain_mode_uses_status_renderer() {
        let sink = MemorySink::new(Some(40));
        let group = SpinnerGroup::with_sink(config(false), sink.clone());
        group.configure_status(
            status::SUCCEED,
            StatusAttributes {
                plain_render: Some(status::PlainRender::new(|row| {
                    format!("[{}] {}", row.status.name, row.spinner.text())
                })),
                ..StatusAttributes::default()
            },
        );
        group.add("task", &opts()).unwrap();
        group.succeed("task", &opts().text("done")).unwrap();
        assert_eq!(sink.contents(), "- task\n[succeed] done\n");
    }

    #[test]
    fn plain_mode_stop_all_prints_stopped_entries() {
        let sink = MemorySink::new(Some(40));
        let group = SpinnerGroup::with_sink(config(false), sink.clone());
        group.add("a", &opts()).unwrap();
        group.add("b", &opts().status("succeed")).unwrap();
        sink.take();
        group.stop_all(None);
        assert_eq!(sink.take(), "a\n");
    }

    // ── Restore ─────────────────────────────────────────────────────

    #[test]
    fn drop_while_animating_restores_terminal() {
        let (group, sink) = group(40);
        group.add("x", &opts()).unwrap();
        group.add("y", &opts()).unwrap();
        group.tick();
        sink.take();
        drop(group);
        assert_eq!(sink.take(), "\x1b[2B\r\x1b[?25h");
    }

    #[test]
    fn drop_with_live_handle_restores_terminal() {
        let (group, sink) = group(40);
        group.add("x", &opts()).unwrap();
        let handle = group.get("x").unwrap();
        group.tick();
        sink.take();
        drop(group);
        assert_eq!(sink.take(), "\x1b[1B\r\x1b[?25h");
        assert_eq!(handle.snapshot().unwrap().name(), "x");
    }

    // ── Interrupt hook ──────────────────────────────────────────────

    fn hook_of(group: &SpinnerGroup) -> Option<HookId> {
        group.engine().hook
    }

    #[test]
    fn hook_registered_while_animating_only() {
        let (group, _) = group(40);
        assert_eq!(hook_of(&group), None);

        group.add("x", &opts()).unwrap();
        let hook = hook_of(&group).unwrap();
        assert!(interrupt::is_registered(hook));

        group.succeed("x", &opts()).unwrap();
        assert_eq!(hook_of(&group), None);
        assert!(!interrupt::is_registered(hook));
    }

    #[test]
    fn interrupt_mid_animation_restores_below_block() {
        let (group, sink) = group(40);
        group.add("x", &opts()).unwrap();
        group.add("y", &opts().text("y wraps onto a second row of text here")).unwrap();
        group.tick();
        let rows = group.engine().last_lengths.len();
        assert_eq!(rows, 3);
        sink.take();

        let hook = hook_of(&group).unwrap();
        assert!(interrupt::run(hook));
        assert_eq!(sink.take(), "\x1b[3B\r\x1b[?25h");
        assert!(!group.is_animating());
        assert_eq!(hook_of(&group), None);

        drop(group);
        assert_eq!(sink.take(), "");
    }

    // ── Logs ────────────────────────────────────────────────────────

    #[test]
    fn log_flushes_buffered_messages() {
        let (group, _) = group(40);
        group.buffer_log("first");
        group.buffer_log(String::from("second"));
        let mut out = Vec::new();
        group.log(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "first\nsecond\n");
        let mut again = Vec::new();
        group.log(&mut again).unwrap();
        assert!(again.is_empty());
    }
}
