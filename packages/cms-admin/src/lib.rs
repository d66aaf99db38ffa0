//! Admin dashboard state for the student-loan site's CMS.
//!
//! Everything here is view-agnostic: a UI binds to the state these types
//! expose and calls their operations from its event handlers.
//!
//! - [`ResourceManager`]: one generic list/dialog controller per entity
//! - [`FormSchema`]: required-field validation run before every submit
//! - [`ListFilter`]: client-side search over a loaded list
//! - [`apply_optimistic`]: local change first, compensating undo on failure
//! - [`Notifications`]: transient success/error toasts
//! - [`PublicDisplay`] and [`Carousel`]: read-only public site views

pub mod carousel;
pub mod display;
pub mod filter;
pub mod form;
pub mod image;
pub mod manager;
pub mod notification;
pub mod optimistic;

pub use carousel::{run_carousel, Carousel, MIN_INTERVAL};
pub use display::{HomeView, PublicDisplay};
pub use filter::{ListFilter, Searchable};
pub use form::{FormSchema, ValidationError};
pub use image::ImageSelection;
pub use manager::{AfterCreate, DialogMode, DialogState, LoadState, ManagerError, ResourceManager};
pub use notification::{Notifications, Toast, ToastKind};
pub use optimistic::{apply_optimistic, remove_by_id, restore, Removed};
