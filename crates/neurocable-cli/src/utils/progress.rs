use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use neurocable::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const TICK: Duration = Duration::from_millis(100);

/// How the shared bar is currently drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Look {
    /// Indeterminate work such as parsing a grid.
    Phase,
    /// Counted work such as comparing strategies.
    Steps,
}

impl Look {
    fn style(self) -> ProgressStyle {
        let template = match self {
            Look::Phase => "{spinner:.cyan} {prefix:.bold} {wide_msg}",
            Look::Steps => "{prefix:.bold} {bar:30.green/white} {pos}/{len} {wide_msg}",
        };
        let fallback = match self {
            Look::Phase => ProgressStyle::default_spinner(),
            Look::Steps => ProgressStyle::default_bar(),
        };
        ProgressStyle::with_template(template)
            .map(|style| style.progress_chars("=> "))
            .unwrap_or(fallback)
    }
}

/// Draws [`Progress`] events from the core workflows on a single indicatif bar.
#[derive(Clone)]
pub struct CliProgressHandler {
    bar: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::drawing_to(ProgressDrawTarget::stderr())
    }

    /// Handler that draws nothing; used with `--quiet`.
    pub fn hidden() -> Self {
        Self::drawing_to(ProgressDrawTarget::hidden())
    }

    fn drawing_to(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), target).with_style(Look::Phase.style());
        bar.finish_and_clear();
        Self {
            bar: Arc::new(Mutex::new(bar)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let bar = Arc::clone(&self.bar);
        Box::new(move |event: Progress| match bar.lock() {
            Ok(bar) => apply(&bar, event),
            Err(_) => warn!("Progress bar lock is poisoned; dropping {:?}.", event),
        })
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn restyle(bar: &ProgressBar, look: Look, length: u64) {
    bar.reset();
    bar.set_length(length);
    bar.set_style(look.style());
}

fn apply(bar: &ProgressBar, event: Progress) {
    match event {
        Progress::PhaseStart { name } => {
            restyle(bar, Look::Phase, 0);
            bar.set_prefix(name);
            bar.set_message("");
            bar.enable_steady_tick(TICK);
        }
        Progress::PhaseFinish => {
            bar.disable_steady_tick();
            bar.finish_with_message("done");
        }
        Progress::TaskStart { total_steps } => {
            bar.disable_steady_tick();
            restyle(bar, Look::Steps, total_steps);
        }
        Progress::TaskIncrement => bar.inc(1),
        Progress::TaskFinish => {
            if let Some(length) = bar.length() {
                bar.set_position(length);
            }
            bar.finish();
        }
        // A running bar keeps its label; notes go above it instead.
        Progress::Message(text) if bar.is_finished() => bar.set_message(text),
        Progress::Message(text) => bar.println(format!("  {}", text)),
    }
}
