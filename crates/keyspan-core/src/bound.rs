//! Module: bound
//! Responsibility: bound-row vocabulary and per-invocation bound evaluation.
//! Does not own: cursor traversal or residual filtering.
//! Boundary: the scan executor evaluates bounds exactly once at open time;
//! suppliers are pure functions of the execution context.

use crate::{
    context::{ExecutionContext, NullBoundPolicy},
    error::ScanError,
    index::range::{LoweredRange, RawRange, lower_component_range},
    model::IndexModel,
    value::Value,
};
use std::sync::Arc;

///
/// BoundComponent
///
/// One position of a bound row: a concrete key value, an explicit NULL
/// (equality to NULL, unsatisfiable by range comparison), or an explicit
/// unbound marker meaning "no restriction from this point on".
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BoundComponent {
    Value(Value),
    Null,
    Unbounded,
}

///
/// BoundRow
///
/// An ordered tuple of bound components describing one scan boundary.
/// Invariant: prefix-closed — once a component is unbounded, every later
/// component must be unbounded too.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BoundRow {
    components: Vec<BoundComponent>,
}

impl BoundRow {
    /// Build a bound row from explicit components. `Value(Null)` is
    /// normalized to the explicit NULL marker.
    #[must_use]
    pub fn new(components: impl IntoIterator<Item = BoundComponent>) -> Self {
        let components = components
            .into_iter()
            .map(|component| match component {
                BoundComponent::Value(Value::Null) | BoundComponent::Null => BoundComponent::Null,
                other => other,
            })
            .collect();

        Self { components }
    }

    /// The canonical "no restriction" bound.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            components: Vec::new(),
        }
    }

    /// Build an equality probe over a key prefix, padding the remaining
    /// composite width with unbound markers.
    #[must_use]
    pub fn equality(values: impl IntoIterator<Item = Value>, key_width: usize) -> Self {
        let mut components: Vec<BoundComponent> =
            values.into_iter().map(BoundComponent::Value).collect();
        while components.len() < key_width {
            components.push(BoundComponent::Unbounded);
        }

        Self::new(components)
    }

    #[must_use]
    pub fn components(&self) -> &[BoundComponent] {
        &self.components
    }

    /// Validate shape against an index's composite width. An empty row is
    /// the canonical unbounded shorthand and always valid.
    pub(crate) fn validate(&self, key_width: usize, side: &str) -> Result<(), ScanError> {
        if !self.components.is_empty() && self.components.len() != key_width {
            return Err(ScanError::invalid_bound(format!(
                "{side} bound has {} components, index key has {key_width}",
                self.components.len()
            )));
        }

        let mut unbounded_seen = false;
        for (position, component) in self.components.iter().enumerate() {
            match component {
                BoundComponent::Unbounded => unbounded_seen = true,
                BoundComponent::Value(_) | BoundComponent::Null if unbounded_seen => {
                    return Err(ScanError::invalid_bound(format!(
                        "{side} bound is not prefix-closed: bound component at position \
                         {position} follows an unbounded one"
                    )));
                }
                BoundComponent::Value(_) | BoundComponent::Null => {}
            }
        }

        Ok(())
    }

    /// Concrete component prefix for range lowering, or `None` when a NULL
    /// component makes the bound unsatisfiable under the active policy.
    fn prefix(&self, policy: NullBoundPolicy) -> Option<Vec<Value>> {
        let mut prefix = Vec::with_capacity(self.components.len());
        for component in &self.components {
            match component {
                BoundComponent::Unbounded => break,
                BoundComponent::Value(value) => prefix.push(value.clone()),
                BoundComponent::Null => match policy {
                    NullBoundPolicy::MatchNothing => return None,
                    NullBoundPolicy::SortOrder => prefix.push(Value::Null),
                },
            }
        }

        Some(prefix)
    }
}

///
/// BoundSupplier
///
/// Per-invocation source of one bound row. Pure function of the execution
/// context: correlated scans read the current outer row from it and are
/// re-evaluated for every invocation.
///

pub trait BoundSupplier: Send + Sync {
    fn bound_row(&self, ctx: &ExecutionContext) -> Result<BoundRow, ScanError>;
}

impl<F> BoundSupplier for F
where
    F: Fn(&ExecutionContext) -> Result<BoundRow, ScanError> + Send + Sync,
{
    fn bound_row(&self, ctx: &ExecutionContext) -> Result<BoundRow, ScanError> {
        self(ctx)
    }
}

///
/// FixedBound
///
/// Supplier for bounds that do not depend on the execution context.
///

#[derive(Clone, Debug)]
pub struct FixedBound(pub BoundRow);

impl BoundSupplier for FixedBound {
    fn bound_row(&self, _ctx: &ExecutionContext) -> Result<BoundRow, ScanError> {
        Ok(self.0.clone())
    }
}

/// Shared handle to a bound supplier.
pub type BoundSupplierRef = Arc<dyn BoundSupplier>;

///
/// ResolvedBounds
///
/// Outcome of one bound evaluation: a traversable raw envelope, or a
/// statically-empty scan that must not open a cursor. Unsatisfiable bounds
/// never fall back to a full traversal.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ResolvedBounds {
    Unsatisfiable,
    Range(RawRange),
}

/// Evaluate both bound suppliers against the current context and lower the
/// result to a raw key envelope. Performed exactly once per scan invocation,
/// at open time.
pub fn evaluate_search_bounds(
    ctx: &ExecutionContext,
    model: &IndexModel,
    lower: &dyn BoundSupplier,
    upper: &dyn BoundSupplier,
    lower_inclusive: bool,
    upper_inclusive: bool,
) -> Result<ResolvedBounds, ScanError> {
    let key_width = model.key_width();
    let config = ctx.config();

    let lower_row = lower.bound_row(ctx)?;
    lower_row.validate(key_width, "lower")?;
    let upper_row = upper.bound_row(ctx)?;
    upper_row.validate(key_width, "upper")?;

    let (Some(lower_prefix), Some(upper_prefix)) = (
        lower_row.prefix(config.null_bound),
        upper_row.prefix(config.null_bound),
    ) else {
        // SQL `x = NULL` is never true: the affected segment is empty, the
        // scan yields zero rows, and the index is never consulted.
        return Ok(ResolvedBounds::Unsatisfiable);
    };

    let lowered = lower_component_range(
        &lower_prefix,
        lower_inclusive,
        &upper_prefix,
        upper_inclusive,
        config.null_order,
    );

    Ok(match lowered {
        LoweredRange::Empty => ResolvedBounds::Unsatisfiable,
        LoweredRange::Range(range) => ResolvedBounds::Range(range),
    })
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::{BoundComponent, BoundRow, FixedBound, ResolvedBounds, evaluate_search_bounds};
    use crate::{
        colocation::ColocationGroup,
        context::{ExecutionContext, NullBoundPolicy, ScanConfig},
        model::{IndexField, IndexModel},
        value::Value,
    };

    fn single_column_model() -> std::sync::Arc<IndexModel> {
        IndexModel::try_new("t_idx", "t", vec![IndexField::new("i1", 0)])
            .expect("model must build")
    }

    fn ctx() -> ExecutionContext {
        ExecutionContext::new(ColocationGroup::All)
    }

    #[test]
    fn null_equality_bound_is_unsatisfiable_by_default() {
        let model = single_column_model();
        let probe = FixedBound(BoundRow::equality([Value::Null], 1));

        let resolved = evaluate_search_bounds(&ctx(), &model, &probe, &probe, true, true)
            .expect("evaluation must succeed");

        assert_eq!(resolved, ResolvedBounds::Unsatisfiable);
    }

    #[test]
    fn null_bound_ranges_under_sort_order_policy() {
        let model = single_column_model();
        let probe = FixedBound(BoundRow::equality([Value::Null], 1));
        let ctx = ctx().with_config(ScanConfig {
            null_bound: NullBoundPolicy::SortOrder,
            ..ScanConfig::default()
        });

        let resolved = evaluate_search_bounds(&ctx, &model, &probe, &probe, true, true)
            .expect("evaluation must succeed");

        assert!(matches!(resolved, ResolvedBounds::Range(_)));
    }

    #[test]
    fn bound_width_mismatch_is_invalid() {
        let model = single_column_model();
        let wide = FixedBound(BoundRow::equality([Value::Int(1), Value::Int(2)], 2));
        let unbounded = FixedBound(BoundRow::unbounded());

        let err = evaluate_search_bounds(&ctx(), &model, &wide, &unbounded, true, true)
            .expect_err("width mismatch must fail");
        assert!(matches!(
            err,
            crate::error::ScanError::InvalidBoundKind { .. }
        ));
    }

    #[test]
    fn non_prefix_closed_bound_is_invalid() {
        let row = BoundRow::new([
            BoundComponent::Unbounded,
            BoundComponent::Value(Value::Int(1)),
        ]);

        assert!(row.validate(2, "lower").is_err());
    }

    #[test]
    fn value_null_normalizes_to_explicit_null_marker() {
        let row = BoundRow::new([BoundComponent::Value(Value::Null)]);

        assert_eq!(row.components(), &[BoundComponent::Null]);
    }

    #[test]
    fn inverted_range_resolves_unsatisfiable() {
        let model = single_column_model();
        let lower = FixedBound(BoundRow::equality([Value::Int(9)], 1));
        let upper = FixedBound(BoundRow::equality([Value::Int(2)], 1));

        let resolved = evaluate_search_bounds(&ctx(), &model, &lower, &upper, true, true)
            .expect("evaluation must succeed");

        assert_eq!(resolved, ResolvedBounds::Unsatisfiable);
    }
}
