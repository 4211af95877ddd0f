//! Domain types for the signal engine

pub mod candle;
pub mod direction;
pub mod timeframe;
pub mod window;

pub use candle::Candle;
pub use direction::{Direction, SignalSide};
pub use timeframe::{Timeframe, TimeframeParseError};
pub use window::{CandleWindow, WindowError};

/// Symbol type alias
pub type Symbol = String;
