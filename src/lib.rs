//! A recursive quadtree over axis-aligned rectangles for broad-phase queries.
//!
//! ```
//! use quadrect::{Quadtree, Rect};
//!
//! let mut tree = Quadtree::new(Rect::new(0.0, 0.0, 15.0, 15.0));
//! let a = Rect::new(2.0, 1.0, 1.0, 1.0);
//! let b = Rect::new(6.0, 1.0, 1.0, 1.0);
//! tree.insert(a);
//! tree.insert(b);
//!
//! // The query rectangle itself is never part of its own result.
//! assert_eq!(tree.retrieve(&b), vec![a]);
//!
//! tree.clear();
//! assert!(tree.is_empty());
//! ```

mod config;
mod error;
mod quadtree;
mod rect;

pub trait QuadtreeVisitor<T> {
    fn rect(&mut self, level: u32, rect: &Rect<T>);
    fn leaf(&mut self, level: u32, bounds: &Rect<T>);
    fn branch(&mut self, level: u32, bounds: &Rect<T>);
}

pub use config::*;
pub use error::*;
pub use quadtree::*;
pub use rect::*;
