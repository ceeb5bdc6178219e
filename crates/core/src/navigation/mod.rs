//! Navigation history and its breadcrumb rendering.
//!
//! The module is split into:
//! - [`stack`]: the fixed-capacity record of pushed screens
//! - [`breadcrumb`]: turns the stack into a `Root › A › B` line and writes it
//!   to a [`TextSurface`](crate::surface::TextSurface)
//!
//! Both are driven by the host, one call at a time, from its update tick:
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use crumbs_core::navigation::{BreadcrumbRenderer, NavigationStack, RenderOutcome};
//! use crumbs_core::surface::{SurfaceHandle, TextBuffer};
//!
//! let lcd = Rc::new(RefCell::new(TextBuffer::new()));
//! let handle: SurfaceHandle = lcd.clone();
//!
//! let mut stack = NavigationStack::default();
//! let mut renderer = BreadcrumbRenderer::default();
//! renderer.set_default_target(Some(&handle));
//!
//! stack.push(1, Some("Nav"));
//! stack.push(2, None);
//!
//! assert_eq!(renderer.render(&stack, None), Ok(RenderOutcome::Written));
//! assert_eq!(lcd.borrow().text(), "Root › Nav › #2");
//! ```

pub mod breadcrumb;
pub mod stack;

pub use breadcrumb::{BreadcrumbRenderer, RenderOutcome};
pub use stack::{NavigationError, NavigationStack, ScreenEntry};
