//! RouteTrace Environment Abstraction Layer
//!
//! This crate provides the "Sans-IO" seam that lets the RouteTrace animation
//! driver run against either the **wall clock** (tokio) or a **virtual clock**
//! (simulation), without the driver knowing which.
//!
//! # Core Concept: Intercept Time
//!
//! The animation driver has exactly two suspension points: the fixed-tick
//! timer and the per-frame callback. Both are expressed as `sleep()` on a
//! [`TrackerContext`], and elapsed time is always read through `now()`.
//! Teardown of a running animation is a [`Teardown`] signal observed by the
//! driver between steps.
//!
//! # Example
//!
//! ```ignore
//! use routetrace_env::{TrackerContext, TeardownListener};
//!
//! async fn drive<Ctx: TrackerContext>(ctx: &Ctx, mut teardown: TeardownListener) {
//!     loop {
//!         tokio::select! {
//!             biased;
//!             _ = teardown.wait() => break,
//!             _ = ctx.sleep(Duration::from_millis(3000)) => step(),
//!         }
//!     }
//! }
//! ```

mod context;
mod error;
mod teardown;
mod tokio_impl;
mod types;

pub use context::TrackerContext;
pub use error::EnvError;
pub use teardown::{Teardown, TeardownListener};
pub use tokio_impl::TokioContext;
pub use types::RunId;
