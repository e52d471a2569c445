//! Signal collectors
//!
//! One module per signal. Each collector reads through an
//! [`Environment`](crate::environment::Environment) and never fails: an
//! unavailable capability becomes a typed [`Reading`](crate::record::Reading),
//! a sentinel, or a `false` flag, and collection carries on.
//!
//! | Collector | Output | Suspends |
//! |---|---|---|
//! | `navigator` | UA/locale and hardware records | no |
//! | `screen` | screen geometry | no |
//! | `features` | capability flags | no |
//! | `canvas` | bitmap data URL | no |
//! | `webgl` | context availability, vendor, renderer | no |
//! | `audio` | offline-render sample sum | yes |
//! | `fonts` | detected installed fonts | no |

pub mod audio;
pub mod canvas;
pub mod features;
pub mod fonts;
pub mod navigator;
pub mod screen;
pub mod webgl;

pub use audio::AudioSignal;
pub use canvas::{CanvasArtifact, DrawOp};
pub use features::FeatureFlags;
pub use navigator::{HardwareInfo, UserAgentInfo};
pub use screen::ScreenInfo;
pub use webgl::WebglInfo;
