//! Type aliases for commonly used complex types.
//!
//! Sessions are single-threaded, so shared state is an `Rc<RefCell<T>>`.

use std::cell::RefCell;
use std::rc::Rc;

/// A reference-counted, interior-mutable wrapper for single-threaded sharing.
///
/// # Example
/// ```rust,ignore
/// let tool: Shared<PolyPen> = shared(PolyPen::default());
/// let name = tool.borrow().name().to_string();
/// ```
pub type Shared<T> = Rc<RefCell<T>>;

/// Wrap a value in a [`Shared`] handle.
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// Index of a source mesh within a session's source set
pub type SourceId = usize;
