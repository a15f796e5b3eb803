//! Selection traversal.
//!
//! Each selection root is processed in order: its name is parsed into a
//! [`Selector`], then the root and every descendant are visited pre-order and
//! resolved once per (node, kind) pair. Mutations are applied as they are
//! found and are not rolled back if a later root fails.

use tracing::{debug, info};

use crate::diagnostic::{DiagnosticKind, Diagnostics};
use crate::error::RethemeResult;
use crate::node::{Capability, ThemeNode};
use crate::path::ThemeKind;
use crate::registry::StyleRegistry;
use crate::resolver::{Selector, SlotOutcome, ThemeResolver};

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Selection roots processed.
    pub roots: usize,
    /// Nodes visited, roots included.
    pub nodes: usize,
    /// Slots whose style reference was replaced.
    pub replaced: usize,
}

/// Result of a completed run.
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    /// Everything that could not be rethemed, in visitation order.
    pub diagnostics: Diagnostics,
    /// Traversal counters.
    pub stats: WalkStats,
}

/// Drives the resolver over selection roots.
#[derive(Debug)]
pub struct TreeWalker<'r> {
    resolver: ThemeResolver<'r>,
    diagnostics: Diagnostics,
    stats: WalkStats,
}

impl<'r> TreeWalker<'r> {
    /// Creates a walker over `registry`.
    pub fn new(registry: &'r StyleRegistry) -> Self {
        Self {
            resolver: ThemeResolver::new(registry),
            diagnostics: Diagnostics::new(),
            stats: WalkStats::default(),
        }
    }

    /// Rethemes one selection root and its subtree.
    ///
    /// # Errors
    /// Fails if the root's name is not a valid selector. Nothing in the
    /// subtree is touched in that case.
    pub fn apply_root<N: ThemeNode>(&mut self, root: &mut N) -> RethemeResult<()> {
        let selector = Selector::parse(root.node_id(), root.name())?;
        debug!(
            retheme.root = %root.node_id(),
            retheme.selector = %selector.path,
            "Retheming selection root"
        );
        self.stats.roots += 1;
        self.visit(root, &selector);
        Ok(())
    }

    /// Finishes the run.
    pub fn finish(self) -> RunOutcome {
        info!(
            retheme.roots = self.stats.roots,
            retheme.nodes = self.stats.nodes,
            retheme.replaced = self.stats.replaced,
            retheme.diagnostics = self.diagnostics.len(),
            "Retheme finished"
        );
        RunOutcome {
            diagnostics: self.diagnostics,
            stats: self.stats,
        }
    }

    /// Rethemes every root in order, aborting on the first invalid selector.
    ///
    /// # Errors
    /// See [`TreeWalker::apply_root`].
    pub fn run<'n, N, I>(registry: &'r StyleRegistry, roots: I) -> RethemeResult<RunOutcome>
    where
        N: ThemeNode + 'n,
        I: IntoIterator<Item = &'n mut N>,
    {
        let mut walker = Self::new(registry);
        for root in roots {
            walker.apply_root(root)?;
        }
        Ok(walker.finish())
    }

    fn visit<N: ThemeNode>(&mut self, node: &mut N, selector: &Selector) {
        self.stats.nodes += 1;
        let capability = Capability::classify(node.category());

        for token in selector.types() {
            let Some(kind) = ThemeKind::from_token(token) else {
                self.diagnostics.push(
                    node,
                    DiagnosticKind::UnknownKind {
                        token: token.clone(),
                        selector: selector.source.clone(),
                    },
                );
                continue;
            };
            if !capability.allows(kind) {
                continue;
            }
            for &slot in kind.slots() {
                let outcome =
                    self.resolver
                        .resolve_slot(selector, kind, slot, node, &mut self.diagnostics);
                if matches!(outcome, SlotOutcome::Replaced { .. }) {
                    self.stats.replaced += 1;
                }
            }
        }

        if let Some(children) = node.children_mut() {
            for child in children {
                self.visit(child, selector);
            }
        }
    }
}
