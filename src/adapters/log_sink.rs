//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (ESP-IDF logger on UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink {
    transport_faults: u32,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport faults seen since boot.
    pub fn transport_faults(&self) -> u32 {
        self.transport_faults
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {} -> {}", from.name(), to.name());
            }
            AppEvent::Press(press) => {
                info!("PRESS | {:?}", press);
            }
            AppEvent::BrightnessChanged { half } => {
                info!("BRIGHT | {}", if *half { "half" } else { "full" });
            }
            AppEvent::LockoutChanged { locked } => {
                info!("LOCK | motion {}", if *locked { "locked out" } else { "armed" });
            }
            AppEvent::TransportFault(e) => {
                self.transport_faults = self.transport_faults.saturating_add(1);
                warn!("FAULT | {} (total {})", e, self.transport_faults);
            }
            AppEvent::Sleeping => {
                info!("POWER | entering light sleep");
            }
            AppEvent::Woke => {
                info!("POWER | woke");
            }
        }
    }
}
