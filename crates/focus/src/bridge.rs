//! Event bridge: edge-triggered selection and reset signals to focus changes.
//!
//! # States
//!
//! ```text
//!            select(resolvable)                 reset
//!   ┌──────┐ ─────────────────▶ ┌──────────┐ ─────────▶ ┌────────┐
//!   │ Idle │                    │ Focusing │            │ Homing │
//!   └──────┘ ◀───────────────── └──────────┘ ◀───────── └────────┘
//!      ▲      deselect/unknown                 select        │
//!      └─────────────────────────────────────────────────────┘
//!                         homing window elapsed
//! ```
//!
//! A reset always wins over an in-progress focus. A selection that arrives
//! during the homing window re-enters `Focusing` and cancels the window, so
//! the camera is never recentered mid-focus.
//!
//! The homing window is the expiry of the focus target itself. Replacing the
//! target (new reset, new selection, teardown) cancels the old window, so a
//! stale window can never fire.

use bevy_math::Vec3;
use scene_data::SceneData;
use std::time::Duration;

use crate::config::CameraConfig;
use crate::controller::{CameraTargetController, FocusTarget};
use crate::navigation::{CameraPose, NavigationSurface};
use crate::projection::render_position;
use crate::scale::SceneScale;

/// Camera focus state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FocusState {
    /// No active focus; the user owns the camera.
    #[default]
    Idle,
    /// Following a selected asteroid.
    Focusing {
        /// Id of the focused asteroid.
        entity_id: String,
    },
    /// Holding the home view after a reset.
    Homing,
}

/// Why a transition happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionCause {
    /// The selection changed to a resolvable asteroid.
    Selected,
    /// The selection was cleared or named an unknown asteroid.
    Deselected,
    /// The reset signal changed.
    Reset,
    /// The homing window ran out.
    HomingElapsed,
    /// The scene was replaced and the focus had to be re-resolved.
    SceneReplaced,
    /// The bridge was torn down.
    Teardown,
}

/// A state change reported by the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: FocusState,
    pub to: FocusState,
    pub cause: TransitionCause,
}

/// Translates external signals into focus updates for a
/// [`CameraTargetController`].
#[derive(Debug, Clone)]
pub struct EventBridge {
    state: FocusState,
    controller: CameraTargetController,
    /// Last highlight value seen, resolvable or not.
    highlight: Option<String>,
    /// Last reset counter value seen.
    reset_signal: u64,
    home_offset: Vec3,
    homing_duration: Duration,
}

impl EventBridge {
    /// Creates an idle bridge.
    ///
    /// `reset_baseline` is the reset counter's current value; only later
    /// changes trigger a reset.
    pub fn new(config: &CameraConfig, reset_baseline: u64) -> Self {
        Self {
            state: FocusState::Idle,
            controller: CameraTargetController::new(config),
            highlight: None,
            reset_signal: reset_baseline,
            home_offset: config.home_offset(),
            homing_duration: config.homing_duration(),
        }
    }

    /// Current state.
    pub fn state(&self) -> &FocusState {
        &self.state
    }

    /// The wrapped controller.
    pub fn controller(&self) -> &CameraTargetController {
        &self.controller
    }

    /// The active focus point, if any.
    pub fn focus_point(&self) -> Option<Vec3> {
        self.controller.focus_point()
    }

    /// Last highlight value seen.
    pub fn highlight(&self) -> Option<&str> {
        self.highlight.as_deref()
    }

    /// Camera position used for the home view at this scale.
    pub fn home_position(&self, scale: SceneScale) -> Vec3 {
        self.home_offset * scale.get().max(1.0)
    }

    /// Handles a highlight value. Repeats of the last value are ignored.
    ///
    /// An id that names no asteroid in `scene` counts as "no selection".
    pub fn on_highlight(
        &mut self,
        highlight: Option<&str>,
        scene: &SceneData,
        scale: SceneScale,
    ) -> Option<Transition> {
        if highlight == self.highlight.as_deref() {
            return None;
        }
        self.highlight = highlight.map(str::to_owned);

        let resolved = highlight.and_then(|id| Some((id, render_position(scene, id, scale)?)));
        match resolved {
            Some((id, point)) => {
                self.controller.set_focus(FocusTarget::persistent(point));
                self.transition(
                    FocusState::Focusing {
                        entity_id: id.to_owned(),
                    },
                    TransitionCause::Selected,
                )
            }
            None => {
                if let Some(id) = highlight {
                    tracing::debug!(id, "highlight names no asteroid, treating as no selection");
                }
                self.release_focus(TransitionCause::Deselected)
            }
        }
    }

    /// Handles a reset counter value. Any change triggers a reset, including
    /// a change back to an earlier value.
    ///
    /// Snaps the camera to the home position immediately, focuses the origin,
    /// re-enables the navigation surface, and opens the homing window.
    pub fn on_reset(
        &mut self,
        signal: u64,
        scale: SceneScale,
        camera: &mut CameraPose,
        controls: Option<&mut dyn NavigationSurface>,
    ) -> Option<Transition> {
        if signal == self.reset_signal {
            return None;
        }
        self.reset_signal = signal;

        camera.translation = self.home_position(scale);
        self.controller
            .set_focus(FocusTarget::expiring(Vec3::ZERO, self.homing_duration));

        if let Some(controls) = controls {
            controls.set_enabled(true);
            controls.set_enable_rotate(true);
            controls.update();
        }

        self.transition(FocusState::Homing, TransitionCause::Reset)
    }

    /// Advances the homing window by `delta`.
    pub fn advance(&mut self, delta: Duration) -> Option<Transition> {
        if self.controller.advance(delta) && self.state == FocusState::Homing {
            return self.transition(FocusState::Idle, TransitionCause::HomingElapsed);
        }
        None
    }

    /// Runs one frame of camera animation. Returns false if the camera was
    /// left under user control.
    pub fn frame(
        &self,
        scale: SceneScale,
        camera: &mut CameraPose,
        controls: Option<&mut dyn NavigationSurface>,
    ) -> bool {
        self.controller.step(scale, camera, controls)
    }

    /// Re-resolves the current selection against a replacement scene.
    ///
    /// A focused asteroid that moved is followed to its new render position;
    /// one that disappeared releases the focus. A highlight that was
    /// unresolvable before but exists now starts focusing, unless a reset is
    /// holding the home view.
    pub fn on_scene_replaced(&mut self, scene: &SceneData, scale: SceneScale) -> Option<Transition> {
        if self.state == FocusState::Homing {
            return None;
        }

        let resolved = self
            .highlight
            .as_deref()
            .and_then(|id| Some((id.to_owned(), render_position(scene, id, scale)?)));

        match resolved {
            Some((id, point)) => {
                self.controller.set_focus(FocusTarget::persistent(point));
                if self.state == FocusState::Idle {
                    self.transition(
                        FocusState::Focusing { entity_id: id },
                        TransitionCause::SceneReplaced,
                    )
                } else {
                    None
                }
            }
            None => self.release_focus(TransitionCause::SceneReplaced),
        }
    }

    /// Cancels any pending homing window and drops the focus.
    pub fn teardown(&mut self) -> Option<Transition> {
        self.controller.clear();
        if self.state == FocusState::Idle {
            return None;
        }
        self.transition(FocusState::Idle, TransitionCause::Teardown)
    }

    /// Clears the focus if it belongs to a selection. Homing is left alone.
    fn release_focus(&mut self, cause: TransitionCause) -> Option<Transition> {
        if !matches!(self.state, FocusState::Focusing { .. }) {
            return None;
        }
        self.controller.clear();
        self.transition(FocusState::Idle, cause)
    }

    fn transition(&mut self, to: FocusState, cause: TransitionCause) -> Option<Transition> {
        let from = std::mem::replace(&mut self.state, to.clone());
        tracing::debug!(?from, ?to, ?cause, "focus transition");
        Some(Transition { from, to, cause })
    }
}
