//! Redirect targets.
//!
//! A `Navigator` performs the one-way transition away from the current
//! application instance. Failures of the underlying primitive are handed
//! back unchanged; nothing here retries.

use std::io::{Stdout, Write};
use std::sync::{Arc, Mutex};

use crate::error::{GatewayError, Result};

pub trait Navigator {
    /// Replace the current location with `url`
    fn replace(&self, url: &str) -> Result<()>;
}

impl<T: Navigator + ?Sized> Navigator for &T {
    fn replace(&self, url: &str) -> Result<()> {
        (**self).replace(url)
    }
}

/// Keeps every requested target instead of leaving. Clones share history.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    visits: Arc<Mutex<Vec<String>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<String> {
        self.visits().pop()
    }
}

impl Navigator for RecordingNavigator {
    fn replace(&self, url: &str) -> Result<()> {
        let mut visits = self.visits.lock().map_err(|_| GatewayError::Navigation {
            url: url.to_string(),
            reason: "navigation history lock poisoned".to_string(),
        })?;
        visits.push(url.to_string());
        Ok(())
    }
}

/// Emits a `Location:` line for a wrapping shell or CGI host.
#[derive(Debug, Default)]
pub struct LocationNavigator<W> {
    out: Mutex<W>,
}

/// `LocationNavigator` writing to the process's stdout
pub type StdoutNavigator = LocationNavigator<Stdout>;

impl LocationNavigator<Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> LocationNavigator<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write> Navigator for LocationNavigator<W> {
    fn replace(&self, url: &str) -> Result<()> {
        let failed = |reason: String| GatewayError::Navigation {
            url: url.to_string(),
            reason,
        };
        let mut out = self
            .out
            .lock()
            .map_err(|_| failed("output lock poisoned".to_string()))?;
        writeln!(out, "Location: {}", url).map_err(|e| failed(e.to_string()))?;
        out.flush().map_err(|e| failed(e.to_string()))
    }
}
