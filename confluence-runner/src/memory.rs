//! In-memory provider for tests and embedding.

use std::collections::HashMap;

use confluence_core::domain::{CandleWindow, Timeframe};
use confluence_core::provider::{CandleProvider, ProviderError};

#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    windows: HashMap<(String, Timeframe), CandleWindow>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a window under its own symbol and timeframe.
    pub fn insert(&mut self, window: CandleWindow) {
        let key = (window.symbol().to_string(), window.timeframe());
        self.windows.insert(key, window);
    }

    pub fn with(mut self, window: CandleWindow) -> Self {
        self.insert(window);
        self
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

impl CandleProvider for InMemoryProvider {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        max_bars: usize,
    ) -> Result<CandleWindow, ProviderError> {
        self.windows
            .get(&(symbol.to_string(), timeframe))
            .map(|w| w.clone().truncated(max_bars))
            .ok_or_else(|| ProviderError::NotFound {
                symbol: symbol.to_string(),
                timeframe,
            })
    }
}
