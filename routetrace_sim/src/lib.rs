//! RouteTrace Simulator
//!
//! Runs the tracker on a virtual clock so a one-minute journey finishes
//! instantly and every run can be checked step by step.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         RunRunner                           │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │ SimContext (virtual clock, sleep advances time)      │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │                            │                                │
//! │                     ┌──────▼──────┐                         │
//! │                     │   Tracker   │                         │
//! │                     └──────┬──────┘                         │
//! │              ┌─────────────┴─────────────┐                  │
//! │     ┌────────▼────────┐         ┌────────▼────────┐         │
//! │     │ RecordingSurface│         │  Caller surface │         │
//! │     │  (RunChecker)   │         │ (Rerun, log...) │         │
//! │     └─────────────────┘         └─────────────────┘         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use routetrace_sim::{RunRunner, DriveMode};
//!
//! let result = RunRunner::for_mode(DriveMode::FixedTick).run();
//! assert!(result.passed);
//! ```

mod context;
mod exporter;
mod runner;
pub mod scenarios;
mod visualizer;

pub use context::SimContext;
pub use exporter::{ExportError, LineStringGeometry, TrailExport, TrailFrame};
pub use runner::{RunChecker, RunResult, RunRunner, SimTracker};
pub use scenarios::DriveMode;
pub use visualizer::RerunSurface;
