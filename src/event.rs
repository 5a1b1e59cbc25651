use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent};

use crate::dataset::{Dataset, DatasetError, DatasetSource};

pub enum AppEvent {
    Key(KeyEvent),
    Tick,
    Resize(#[allow(dead_code)] u16, #[allow(dead_code)] u16),
    /// A background dataset load finished.
    DatasetLoaded {
        source: DatasetSource,
        result: Result<Dataset, DatasetError>,
    },
}

/// Single queue for terminal input, ticks and background results.
pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
    tx: mpsc::Sender<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let input_tx = tx.clone();

        thread::spawn(move || {
            loop {
                if event::poll(tick_rate).unwrap_or(false) {
                    let forwarded = match event::read() {
                        Ok(Event::Key(key)) => input_tx.send(AppEvent::Key(key)),
                        Ok(Event::Resize(w, h)) => input_tx.send(AppEvent::Resize(w, h)),
                        _ => Ok(()),
                    };
                    if forwarded.is_err() {
                        return;
                    }
                } else if input_tx.send(AppEvent::Tick).is_err() {
                    return;
                }
            }
        });

        Self { rx, tx }
    }

    /// Handle for background work that reports back through the loop.
    pub fn sender(&self) -> mpsc::Sender<AppEvent> {
        self.tx.clone()
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}

/// Load `source` on a helper thread and post the outcome as an event.
pub fn spawn_dataset_load(source: DatasetSource, tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let result = crate::dataset::load(&source);
        if tx.send(AppEvent::DatasetLoaded { source, result }).is_err() {
            tracing::debug!("event loop gone before dataset load finished");
        }
    });
}
