//! Console progress reporter backed by indicatif.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::download::ProgressReporter;
use crate::output::console::{print_error, print_success};

/// Reporter that renders one progress bar per active download and keeps
/// terminal outcome counts for the process exit code.
pub struct ConsoleReporter {
    multi: MultiProgress,
    bars: Mutex<HashMap<String, ProgressBar>>,
    show_bars: bool,
    completed: AtomicUsize,
    failed: AtomicUsize,
}

impl ConsoleReporter {
    pub fn new(show_bars: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            bars: Mutex::new(HashMap::new()),
            show_bars,
            completed: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        }
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    fn bar_for(&self, id: &str) -> ProgressBar {
        let mut bars = self.bars.lock().unwrap();
        bars.entry(id.to_string())
            .or_insert_with(|| {
                let bar = self.multi.add(ProgressBar::new(100));
                bar.set_style(
                    ProgressStyle::default_bar()
                        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}% {msg}")
                        .unwrap()
                        .progress_chars("#>-"),
                );
                bar.set_message(id.to_string());
                bar
            })
            .clone()
    }

    fn take_bar(&self, id: &str) -> Option<ProgressBar> {
        self.bars.lock().unwrap().remove(id)
    }
}

#[async_trait]
impl ProgressReporter for ConsoleReporter {
    async fn on_progress(&self, id: &str, percent: u8) {
        if self.show_bars {
            self.bar_for(id).set_position(percent as u64);
        }
    }

    async fn on_complete(&self, id: &str) {
        self.completed.fetch_add(1, Ordering::SeqCst);
        if let Some(bar) = self.take_bar(id) {
            bar.finish_and_clear();
        }
        if self.show_bars {
            print_success(&format!("{}: downloaded", id));
        }
    }

    async fn on_failed(&self, id: &str, reason: &str) {
        self.failed.fetch_add(1, Ordering::SeqCst);
        if let Some(bar) = self.take_bar(id) {
            bar.finish_and_clear();
        }
        print_error(&format!("{}: {}", id, reason));
    }
}
