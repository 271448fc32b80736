//! Parameterized benchmarking harness for an asymmetric cipher.
//!
//! Three sweeps (key strength, payload size, payload category) drive an
//! encrypt/decrypt round trip per parameter value, sample process CPU and
//! memory around it, classify the outcome and collect one [`Trial`] each.
//! Execution is strictly sequential so resource figures belong to a single
//! in-flight operation.

pub mod classify;
pub mod config;
pub mod error;
pub mod executor;
pub mod report;
pub mod sampler;
pub mod samples;
pub mod sweep;
pub mod trial;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use classify::classify;
pub use config::{CategorySpec, HarnessConfig};
pub use error::{ConfigError, TrialError};
pub use executor::{round_trip, RoundTripResult};
pub use report::{ChartSeries, Report};
pub use sampler::{ProcessProbe, ResourceSample, ResourceSampler, SysinfoProbe};
pub use sweep::{run_sweep, Harness, Sweep, SweepKind};
pub use trial::{Measurement, Parameter, Status, Trial};
