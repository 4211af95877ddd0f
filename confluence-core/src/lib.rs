//! Confluence Core — deterministic, rule-based trading signal engine.
//!
//! This crate contains the whole decision path:
//! - Domain types (candles, windows, timeframes, directions)
//! - Indicators (ATR, SMA, Wilder RSI, volume ratio, percent momentum)
//! - Chart-pattern detectors behind one `PatternDetector` trait
//! - Kill-zone session analysis and multi-timeframe confluence
//! - Scoring, confidence and the hard validation gates
//! - Risk: stops, targets, trailing stops, position sizing
//! - The `SignalEngine` producing either a `Signal` or a suppression reason
//!
//! No I/O happens here. Candles arrive through the `CandleProvider` trait.

pub mod adjust;
pub mod confluence;
pub mod domain;
pub mod engine;
pub mod error;
pub mod features;
pub mod indicators;
pub mod patterns;
pub mod provider;
pub mod risk;
pub mod scoring;
pub mod session;
pub mod signal;

pub use domain::{Candle, CandleWindow, Direction, SignalSide, Timeframe};
pub use engine::{Decision, EngineConfig, MarketSnapshot, SignalEngine, SuppressReason};
pub use signal::Signal;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: all public engine types are Send + Sync.
    ///
    /// The runner shares one engine across rayon workers. If any type fails
    /// this check, the build breaks immediately.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::Candle>();
        require_sync::<domain::Candle>();
        require_send::<domain::CandleWindow>();
        require_sync::<domain::CandleWindow>();
        require_send::<domain::Timeframe>();
        require_sync::<domain::Timeframe>();

        // Patterns
        require_send::<patterns::PatternObservation>();
        require_sync::<patterns::PatternObservation>();
        require_send::<Box<dyn patterns::PatternDetector>>();
        require_sync::<Box<dyn patterns::PatternDetector>>();

        // Analysis results
        require_send::<session::SessionAnalysis>();
        require_sync::<session::SessionAnalysis>();
        require_send::<confluence::TimeframeSet>();
        require_sync::<confluence::TimeframeSet>();
        require_send::<confluence::ConfluenceResult>();
        require_sync::<confluence::ConfluenceResult>();
        require_send::<features::MarketFeatures>();
        require_sync::<features::MarketFeatures>();

        // Risk and output
        require_send::<risk::RiskConfig>();
        require_sync::<risk::RiskConfig>();
        require_send::<risk::OrderParameters>();
        require_sync::<risk::OrderParameters>();
        require_send::<signal::Signal>();
        require_sync::<signal::Signal>();
        require_send::<engine::Decision>();
        require_sync::<engine::Decision>();

        // Engine
        require_send::<engine::EngineConfig>();
        require_sync::<engine::EngineConfig>();
        require_send::<engine::SignalEngine>();
        require_sync::<engine::SignalEngine>();
        require_send::<Box<dyn provider::CandleProvider>>();
        require_sync::<Box<dyn provider::CandleProvider>>();
    }

    /// Architecture contract: detectors see one window and nothing else.
    ///
    /// `detect()` takes only `&CandleWindow`; a detector cannot reach account
    /// state, other timeframes or the clock.
    #[test]
    fn pattern_detector_sees_only_its_window() {
        fn _check_trait_object_builds(
            detector: &dyn patterns::PatternDetector,
            window: &domain::CandleWindow,
        ) -> Vec<patterns::PatternObservation> {
            detector.detect(window)
        }
    }
}
