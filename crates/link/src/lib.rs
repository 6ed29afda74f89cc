//! FleetGlass Link - streaming session lifecycle for the telemetry dashboard
//!
//! This crate owns the connection to the telemetry stream:
//! - [`TelemetrySession`]: explicit session object and single event reducer
//! - [`ConnectionState`]: `Idle -> Connecting -> Open -> {Closed, Errored} -> Connecting`
//! - [`RetryPolicy`]: pluggable reconnect delay (fixed 5 s by default)
//! - [`Transport`]: seam for the WebSocket transport, faked in tests
//! - [`SessionDriver`]: tokio event loop dispatching transport events, timers
//!   and presentation updates serially
//!
//! # Reconnection
//!
//! Every close schedules exactly one reconnect. Each connection attempt has
//! a generation number; transport events and timers from an older attempt
//! are discarded, so rapid open/close cycling cannot stack reconnects.
//!
//! # Examples
//!
//! ```no_run
//! use fleetglass_core::SessionConfig;
//! use fleetglass_link::{LogPresenter, SessionDriver, TelemetrySession, WsTransport};
//!
//! # async fn run() -> Result<(), fleetglass_link::LinkError> {
//! let session = TelemetrySession::new(SessionConfig::default())?;
//! let driver = SessionDriver::new(session, WsTransport::new(), LogPresenter::default());
//! let handle = driver.handle();
//! tokio::spawn(driver.run());
//!
//! let snapshot = handle.snapshot().await?;
//! println!("{} rows in the normal view", snapshot.counts.normal);
//! handle.dispose().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod driver;
pub mod error;
pub mod presenter;
pub mod retry;
pub mod session;
pub mod state;
pub mod transport;

pub use driver::{DriverMsg, SessionDriver, SessionHandle};
pub use error::LinkError;
pub use presenter::{LogPresenter, Presenter};
pub use retry::{ExponentialBackoff, FixedDelay, RetryPolicy};
pub use session::{SessionSnapshot, TelemetrySession, VehicleDetail};
pub use state::{AttemptId, Command, ConnectionState, LinkEvent, Notification, TransportEvent};
pub use transport::{EventSink, Transport, TransportHandle, WsTransport};
