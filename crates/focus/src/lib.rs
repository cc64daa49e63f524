//! Camera targeting and coordinate normalization for the orrery viewer.
//!
//! This crate is headless: it owns no window, renderer, or clock. The host
//! feeds it scene snapshots, selection and reset signals, and frame deltas,
//! and applies the camera pose it produces.
//!
//! # Architecture
//!
//! ```text
//! SceneData ──▶ scale ──▶ SceneScale ──┬──▶ projection ──▶ draw data
//!                                      │
//! highlight / reset ──▶ bridge ──▶ controller ──▶ CameraPose + NavigationSurface
//! ```
//!
//! # Modules
//!
//! - [`scale`]: raw positions to a bounded scale factor
//! - [`projection`]: render-space bodies, orbits, and selection encoding
//! - [`controller`]: per-frame exponential approach to a focus point
//! - [`bridge`]: the `Idle` / `Focusing` / `Homing` state machine
//! - [`navigation`]: camera pose and the optional navigation capability
//! - [`config`]: TOML configuration

pub mod bridge;
pub mod config;
pub mod controller;
pub mod navigation;
pub mod projection;
pub mod scale;

pub use bridge::{EventBridge, FocusState, Transition, TransitionCause};
pub use config::{
    default_config_toml, CameraConfig, ConfigError, FocusConfig, ScaleConfig, StyleConfig,
};
pub use controller::{CameraTargetController, FocusTarget};
pub use navigation::{CameraPose, NavigationSurface};
pub use projection::{
    body_radius, project_asteroid, project_point, project_scene, render_position, BodyEncoding,
    OrbitEncoding, ProjectedBody,
};
pub use scale::{compute_scale, SceneScale};
