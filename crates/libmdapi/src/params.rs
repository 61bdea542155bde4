//! Overload enumeration for signatures with optional parameter groups.

use std::{cell::Cell, rc::Rc};

/// A tree of parameter groups.
///
/// Each node holds the parameters declared at its nesting level; each child is an optional
/// group that a caller may either supply or skip. Every node of one tree shares a creation
/// counter, so parameters keep their documentation order when groups are flattened.
#[derive(Debug, Default)]
pub struct ParameterTree {
    /// Counter shared by every node of the tree.
    counter: Rc<Cell<usize>>,
    /// Parameters at this level, stamped with their creation order.
    params: Vec<(usize, String)>,
    /// Optional groups nested below this level.
    children: Vec<Self>,
}

impl ParameterTree {
    /// Create an empty root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a parameter at this level.
    pub fn add_parameter(&mut self, name: impl Into<String>) {
        let stamp = self.counter.get();
        self.counter.set(stamp + 1);
        self.params.push((stamp, name.into()));
    }

    /// Open a nested optional group and return it.
    pub fn add_child(&mut self) -> &mut Self {
        self.children.push(Self {
            counter: Rc::clone(&self.counter),
            params: Vec::new(),
            children: Vec::new(),
        });
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Parameters declared directly at this level, in declaration order.
    pub fn parameters(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|(_, name)| name.as_str())
    }

    /// Nested groups.
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Every valid call shape.
    ///
    /// The first entry is always this level's own parameters with every optional group skipped.
    /// Each further entry extends that batch with one shape of one child group. Within a shape
    /// parameters are ordered by creation, not by nesting.
    pub fn coalesce(&self) -> Vec<Vec<String>> {
        let mut shapes: Vec<Vec<String>> = Vec::new();
        for stamped in self.stamped_shapes() {
            let names: Vec<String> = stamped.into_iter().map(|(_, name)| name).collect();
            if !shapes.contains(&names) {
                shapes.push(names);
            }
        }
        shapes
    }

    /// Call shapes with creation stamps retained, each sorted by stamp.
    fn stamped_shapes(&self) -> Vec<Vec<(usize, String)>> {
        let mut shapes = vec![self.params.clone()];
        for child in &self.children {
            for tail in child.stamped_shapes() {
                let mut shape = self.params.clone();
                shape.extend(tail);
                shape.sort_by_key(|(stamp, _)| *stamp);
                shapes.push(shape);
            }
        }
        shapes
    }
}
