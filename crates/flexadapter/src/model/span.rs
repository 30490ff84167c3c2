//! Grid span resolution.

use std::sync::Arc;

use flexadapter_core::logging::targets;
use flexadapter_core::{AdapterError, Result};

use super::collection::ItemCollection;
use super::item::Item;

/// The row and column of an item's first cell in a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub row: usize,
    pub column: usize,
}

/// Resolves item spans against a fixed column count.
///
/// Declared spans are clamped into `1..=columns`: a zero span occupies one
/// column and an oversized span fills a whole row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanResolver {
    columns: usize,
}

impl SpanResolver {
    /// Create a resolver for a grid of `columns` columns (at least one).
    pub fn new(columns: usize) -> Self {
        Self {
            columns: columns.max(1),
        }
    }

    /// The column count.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// The clamped span of `item`.
    pub fn resolve(&self, item: &dyn Item) -> usize {
        let declared = item.span();
        let span = declared.clamp(1, self.columns);
        if span != declared {
            tracing::debug!(
                target: targets::SPAN,
                item = item.type_name(),
                declared,
                span,
                columns = self.columns,
                "clamped item span"
            );
        }
        span
    }

    /// The clamped span of the item at `index`.
    pub fn span_at(&self, items: &ItemCollection, index: usize) -> Result<usize> {
        let item = items
            .get(index)
            .ok_or_else(|| AdapterError::out_of_range(index, items.len()))?;
        Ok(self.resolve(&*item))
    }

    /// The grid cell of the item at `index`.
    ///
    /// Items are placed greedily in order; an item that does not fit in what
    /// is left of the current row starts the next one.
    pub fn cell_of(&self, items: &ItemCollection, index: usize) -> Result<GridCell> {
        self.cells_of(items, index, index).map(|(cell, _)| cell)
    }

    /// The grid cells of the items at `a` and `b`, found in one pass.
    pub fn cells_of(&self, items: &ItemCollection, a: usize, b: usize) -> Result<(GridCell, GridCell)> {
        items.read(|items| {
            AdapterError::check_index(a, items.len())?;
            AdapterError::check_index(b, items.len())?;

            let last = a.max(b);
            let mut found = (GridCell { row: 0, column: 0 }, GridCell { row: 0, column: 0 });
            let mut cell = GridCell { row: 0, column: 0 };
            let mut next_column = 0;
            for (index, item) in items[..=last].iter().enumerate() {
                let span = self.resolve(&**item);
                if next_column + span > self.columns {
                    cell.row += 1;
                    next_column = 0;
                }
                cell.column = next_column;
                next_column += span;

                if index == a {
                    found.0 = cell;
                }
                if index == b {
                    found.1 = cell;
                }
            }
            Ok(found)
        })
    }
}

/// The span-lookup callback handed to a grid layout.
///
/// Bound to the adapter's collection and column count; cheap to clone.
#[derive(Debug, Clone)]
pub struct SpanLookup {
    items: Arc<ItemCollection>,
    resolver: SpanResolver,
}

impl SpanLookup {
    pub(crate) fn new(items: Arc<ItemCollection>, resolver: SpanResolver) -> Self {
        Self { items, resolver }
    }

    /// Number of columns the item at `index` occupies.
    pub fn span_size(&self, index: usize) -> Result<usize> {
        self.resolver.span_at(&self.items, index)
    }

    /// The grid's column count.
    pub fn columns(&self) -> usize {
        self.resolver.columns()
    }
}
