pub mod calendar;
pub mod error;
pub mod location;
pub mod types;

#[cfg(feature = "pnl")]
pub mod breakdown;

#[cfg(feature = "pnl")]
pub mod format;

#[cfg(feature = "pnl")]
pub mod pnl;

#[cfg(feature = "roi")]
pub mod roi;

#[cfg(feature = "projection")]
pub mod projection;

pub use error::KioskPnlError;
pub use types::*;

/// Standard result type for all kiosk-pnl operations
pub type KioskPnlResult<T> = Result<T, KioskPnlError>;
