//! View composition, layout and event routing for native UI backends.
//!
//! Views live in a [`ViewTree`] arena. Containers delegate layout, enumeration and drawing to an
//! [`Adapter`]; the [`Tab`] control is a composite built that way. Everything platform-specific
//! sits behind the [`Backend`] trait.

pub mod backend;
mod capture;
pub mod color;
pub mod config;
mod container;
mod dispatch;
mod error;
pub mod events;
mod focus;
pub mod font;
pub mod headless;
mod host;
mod memo;
pub mod painter;
pub mod raw_events;
pub mod rect;
mod tab;
mod tree;
mod view;
mod window;

pub use backend::{Backend, SurfaceId, SurfaceKind};
pub use capture::CaptureCoordinator;
pub use container::{Adapter, BoxLayout, Orientation};
pub use error::{Error, Result};
pub use host::Host;
pub use memo::Memo;
pub use raw_events::RawEvent;
pub use tab::{Tab, TabAdapter, TabItem};
pub use tree::ViewTree;
pub use view::{ControlState, HitTestKind, ViewHandlers, ViewId, ViewImpl, Widget};
pub use window::{WindowId, WindowImpl};
