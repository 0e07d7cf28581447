use tracing::{debug, trace};

use crate::config::QuadtreeConfig;
use crate::rect::{Rect, Scalar};
use crate::QuadtreeVisitor;

/// Set of child indices a rectangle touches.
///
/// 0 = top-right, 1 = top-left, 2 = bottom-left, 3 = bottom-right.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Quadrants(u8);

impl Quadrants {
    pub const TOP_RIGHT: usize = 0;
    pub const TOP_LEFT: usize = 1;
    pub const BOTTOM_LEFT: usize = 2;
    pub const BOTTOM_RIGHT: usize = 3;

    fn with(self, index: usize, present: bool) -> Self {
        if present {
            Self(self.0 | (1u8 << index))
        } else {
            self
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        index < 4 && self.0 & (1u8 << index) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Indices in ascending order.
    pub fn iter(&self) -> QuadrantsIter {
        QuadrantsIter(self.0)
    }
}

impl IntoIterator for Quadrants {
    type Item = usize;
    type IntoIter = QuadrantsIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct QuadrantsIter(u8);

impl Iterator for QuadrantsIter {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.0 == 0 {
            return None;
        }
        let index = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Some(index)
    }
}

impl From<Quadrants> for Vec<usize> {
    fn from(quadrants: Quadrants) -> Self {
        quadrants.iter().collect()
    }
}

/// A quadtree node. The root is the whole tree.
///
/// A node is either a leaf holding rectangles or a branch owning exactly four
/// children and no rectangles. A rectangle that straddles a midpoint is stored in
/// every child it touches. Not safe for concurrent mutation; callers that share a
/// tree across threads must serialize access themselves.
#[derive(Clone, Debug)]
pub struct Quadtree<T> {
    bounds: Rect<T>,
    level: u32,
    config: QuadtreeConfig,
    objects: Vec<Rect<T>>,
    children: Option<Box<[Quadtree<T>; 4]>>,
}

impl<T: Scalar> Quadtree<T> {
    pub fn new(bounds: Rect<T>) -> Self {
        Self::with_config_and_level(bounds, QuadtreeConfig::default(), 0)
    }

    pub fn with_level(bounds: Rect<T>, level: u32) -> Self {
        Self::with_config_and_level(bounds, QuadtreeConfig::default(), level)
    }

    pub fn with_config(bounds: Rect<T>, config: QuadtreeConfig) -> Self {
        Self::with_config_and_level(bounds, config, 0)
    }

    pub fn with_config_and_level(bounds: Rect<T>, config: QuadtreeConfig, level: u32) -> Self {
        Self {
            bounds,
            level,
            config,
            objects: Vec::new(),
            children: None,
        }
    }

    pub fn bounds(&self) -> &Rect<T> {
        &self.bounds
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn config(&self) -> &QuadtreeConfig {
        &self.config
    }

    /// Rectangles held directly by this node. Empty on a branch.
    pub fn objects(&self) -> &[Rect<T>] {
        &self.objects
    }

    pub fn children(&self) -> Option<&[Quadtree<T>; 4]> {
        self.children.as_deref()
    }

    pub fn is_split(&self) -> bool {
        self.children.is_some()
    }

    /// Number of stored entries in this subtree. A rectangle kept in several
    /// leaves counts once per leaf.
    pub fn len(&self) -> usize {
        match self.children.as_deref() {
            Some(children) => self.objects.len() + children.iter().map(Self::len).sum::<usize>(),
            None => self.objects.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deepest level present below (and including) this node.
    pub fn depth(&self) -> u32 {
        match self.children.as_deref() {
            Some(children) => children.iter().map(Self::depth).max().unwrap_or(self.level),
            None => self.level,
        }
    }

    /// Creates four empty children one level down, each a quarter of the bounds.
    ///
    /// Stored rectangles are left where they are; `insert` moves them. On a node
    /// that is already split the old children are dropped.
    pub fn split(&mut self) {
        let next_level = self.level + 1;
        let sub_width = self.bounds.width.half();
        let sub_height = self.bounds.height.half();
        let x = self.bounds.x;
        let y = self.bounds.y;
        let config = self.config;
        let child = |x, y| {
            let bounds = Rect::new(x, y, sub_width, sub_height);
            Quadtree::with_config_and_level(bounds, config, next_level)
        };

        trace!(level = self.level, bounds = ?self.bounds, "splitting node");
        self.children = Some(Box::new([
            child(x + sub_width, y),
            child(x, y),
            child(x, y + sub_height),
            child(x + sub_width, y + sub_height),
        ]));
    }

    /// Which children of this node `rect` belongs to.
    ///
    /// Midpoints are floored. A rectangle must start strictly before a midpoint to
    /// reach the top/left side and end strictly after it to reach the
    /// bottom/right side, so an edge lying exactly on a midpoint does not count.
    pub fn get_quadrants(&self, rect: &Rect<T>) -> Quadrants {
        let vertical_mid = (self.bounds.x + self.bounds.width.half()).floor();
        let horizontal_mid = (self.bounds.y + self.bounds.height.half()).floor();

        let starts_on_top = rect.y < horizontal_mid;
        let starts_on_left = rect.x < vertical_mid;
        let ends_on_right = rect.right() > vertical_mid;
        let ends_on_bottom = rect.bottom() > horizontal_mid;

        Quadrants::default()
            .with(Quadrants::TOP_RIGHT, starts_on_top && ends_on_right)
            .with(Quadrants::TOP_LEFT, starts_on_left && starts_on_top)
            .with(Quadrants::BOTTOM_LEFT, starts_on_left && ends_on_bottom)
            .with(Quadrants::BOTTOM_RIGHT, ends_on_bottom && ends_on_right)
    }

    pub fn insert(&mut self, rect: Rect<T>) {
        if self.insert_into_children(rect) {
            return;
        }

        self.objects.push(rect);

        if self.objects.len() > self.config.max_objects && self.level < self.config.max_levels {
            if !self.is_split() {
                self.split();
            }

            let objects = std::mem::take(&mut self.objects);
            trace!(level = self.level, count = objects.len(), "redistributing objects");
            for object in objects {
                self.insert_into_children(object);
            }
        }
    }

    /// Forwards `rect` to every matching child. Returns false on a leaf.
    fn insert_into_children(&mut self, rect: Rect<T>) -> bool {
        let quadrants = self.get_quadrants(&rect);
        match self.children.as_deref_mut() {
            Some(children) => {
                for index in quadrants {
                    children[index].insert(rect);
                }
                true
            }
            None => false,
        }
    }

    /// Candidates that may overlap `rect`, excluding entries equal to `rect`.
    ///
    /// Local objects come first, then each matching child in index order. A
    /// rectangle stored in several matching children appears once per child.
    pub fn retrieve(&self, rect: &Rect<T>) -> Vec<Rect<T>> {
        let mut out = Vec::new();
        self.collect(rect, &mut out);
        out.retain(|item| item != rect);
        out
    }

    fn collect(&self, rect: &Rect<T>, out: &mut Vec<Rect<T>>) {
        out.extend_from_slice(&self.objects);
        if let Some(children) = self.children.as_deref() {
            for index in self.get_quadrants(rect) {
                children[index].collect(rect, out);
            }
        }
    }

    /// Empties this node and drops every child.
    pub fn clear(&mut self) {
        if self.is_split() || !self.objects.is_empty() {
            debug!(level = self.level, entries = self.len(), "clearing quadtree");
        }
        self.objects.clear();
        self.children = None;
    }

    /// Walks the tree depth first, children in index order.
    pub fn traverse<V>(&self, visitor: &mut V)
    where
        V: QuadtreeVisitor<T>,
    {
        let mut to_process = vec![self];

        while let Some(node) = to_process.pop() {
            match node.children.as_deref() {
                Some(children) => {
                    visitor.branch(node.level, &node.bounds);
                    to_process.extend(children.iter().rev());
                }
                None => {
                    visitor.leaf(node.level, &node.bounds);
                    for rect in &node.objects {
                        visitor.rect(node.level, rect);
                    }
                }
            }
        }
    }
}
