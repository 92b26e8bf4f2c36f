//! Live progress bar with captured output.
//!
//! Probe completions only touch the counters. A render loop running at
//! [`REFRESH_HZ`] copies the counters into the bar and, when the console has
//! captured text, clears the bar, writes the text and redraws.

use super::console::BufferedConsole;
use super::{lock, Progress};
use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::warn;

/// Render loop frequency.
pub const REFRESH_HZ: u64 = 8;

const KNOWN_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] \
     {pos:.blue}/{len:.blue} {percent:.bold}% {per_sec:.yellow} eta {eta} {msg}";
const UNKNOWN_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {pos:.blue} {per_sec:.yellow} {msg}";

/// Counters shown by the progress bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressState {
    pub completed: u64,
    pub total: u64,
}

struct RenderLoop {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

/// The interactive progress implementation.
///
/// Owns the terminal while active: all other output must go through the
/// shared [`BufferedConsole`].
pub struct Multiplexer {
    console: Arc<BufferedConsole>,
    bar: ProgressBar,
    state: Arc<Mutex<ProgressState>>,
    render: Mutex<Option<RenderLoop>>,
}

impl Multiplexer {
    /// Multiplexer drawing on stderr.
    pub fn new(console: Arc<BufferedConsole>) -> Self {
        Self::with_draw_target(console, ProgressDrawTarget::stderr())
    }

    pub fn with_draw_target(console: Arc<BufferedConsole>, target: ProgressDrawTarget) -> Self {
        Self {
            console,
            bar: ProgressBar::with_draw_target(None, target),
            state: Arc::new(Mutex::new(ProgressState::default())),
            render: Mutex::new(None),
        }
    }

    /// Snapshot of the counters.
    pub fn state(&self) -> ProgressState {
        *lock(&self.state)
    }

    pub fn bar(&self) -> &ProgressBar {
        &self.bar
    }
}

#[async_trait]
impl Progress for Multiplexer {
    fn start(&self, total: Option<u64>) {
        let mut render = lock(&self.render);
        if render.is_some() {
            warn!("progress bar already started");
            return;
        }

        lock(&self.state).total = total.unwrap_or(0);
        let template = if total.is_some() {
            KNOWN_TEMPLATE
        } else {
            UNKNOWN_TEMPLATE
        };
        self.bar.set_style(
            ProgressStyle::with_template(template)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );

        self.console.begin_capture();

        let (stop, mut stopped) = oneshot::channel();
        let bar = self.bar.clone();
        let state = Arc::clone(&self.state);
        let console = Arc::clone(&self.console);
        let handle = tokio::spawn(async move {
            let mut ticker = interval(Duration::from_millis(1000 / REFRESH_HZ));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = &mut stopped => break,
                    _ = ticker.tick() => render_frame(&bar, &state, &console),
                }
            }
        });

        *render = Some(RenderLoop { stop, handle });
    }

    fn add_to_total(&self, delta: u64) {
        lock(&self.state).total += delta;
    }

    fn set_total(&self, total: u64) {
        lock(&self.state).total = total;
    }

    fn increment(&self) {
        lock(&self.state).completed += 1;
    }

    async fn finish(&self) {
        let render = lock(&self.render).take();
        if let Some(RenderLoop { stop, handle }) = render {
            let _ = stop.send(());
            if let Err(e) = handle.await {
                warn!("progress renderer stopped abnormally: {}", e);
            }
        }

        self.bar.suspend(|| self.console.end_capture());

        let state = self.state();
        if state.total == 0 {
            self.bar.abandon_with_message("aborted");
        } else {
            self.bar.set_length(state.total);
            self.bar.set_position(state.completed);
            self.bar.finish();
        }
    }
}

/// One tick: flush captured text around the bar, then repaint it.
fn render_frame(bar: &ProgressBar, state: &Mutex<ProgressState>, console: &BufferedConsole) {
    if let Some((out, err)) = console.take_captured() {
        bar.suspend(|| console.write_through(&out, &err));
    }

    let ProgressState { completed, total } = *lock(state);
    bar.set_length(total);
    bar.set_position(completed);
    bar.tick();
}
