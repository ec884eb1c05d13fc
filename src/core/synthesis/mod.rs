//! # Synthesis Orchestrator
//!
//! Ties the speech synthesizer, the [`PlaybackManager`](crate::core::playback::PlaybackManager)
//! and the [`VisemeScheduler`](crate::core::viseme::VisemeScheduler) together
//! into one speaking session at a time.
//!
//! ## Session epochs
//!
//! Every request advances a [`SessionEpoch`]. Adapter responses and scheduler
//! notifications carry the epoch they belong to and are dropped when it is no
//! longer current, so a slow response to an old request can never start
//! playing over a newer one.
//!
//! ```text
//!   synthesize_speech("a")  ──► epoch 1 ──► adapter ......... response ──► dropped
//!   synthesize_speech("b")  ──► epoch 2 ──► adapter ─► response ─► play + schedule
//! ```
//!
//! ## Frame loop
//!
//! ```rust,ignore
//! let snapshot = orchestrator.tick(frame_delta);
//! let weights = animator.apply(&snapshot, frame_delta.as_secs_f32());
//! renderer.set_blendshapes(&weights);
//! ```

pub mod epoch;
pub mod errors;
pub mod orchestrator;


pub use epoch::SessionEpoch;
pub use errors::{SynthesisError, SynthesisResult};
pub use orchestrator::{SessionInfo, SynthesisOrchestrator};
