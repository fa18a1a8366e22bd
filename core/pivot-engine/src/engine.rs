//! FILENAME: core/pivot-engine/src/engine.rs
//! Pivot Engine - Turns records and a PivotRequest into a PivotResult.
//!
//! Algorithm:
//! 1. Bail out with an idle result if rows or values are not configured
//! 2. Scan records once: intern row and column key texts, feed accumulators
//! 3. Emit one bucket per row key with one cell per (column key, value field)
//! 4. Emit grand totals per (column key, value field)

use log::debug;
use rustc_hash::FxHashMap;
use serde_json::Value;
use smallvec::SmallVec;

use dataset::{as_number, Record};

use crate::cache::{build_key_text, AggregateAccumulator, GroupKey, KeyCache, KeyId};
use crate::definition::{PivotRequest, TOTAL_COLUMN_KEY};
use crate::view::{AggregateCell, AggregationBucket, PivotResult, PivotStatus};

// ============================================================================
// PIVOT CALCULATOR
// ============================================================================

/// Row bucket state collected during the scan.
struct PendingBucket {
    key_id: KeyId,
    row_values: Vec<(String, Value)>,
    record_indices: Vec<usize>,
}

/// The calculation engine for one aggregation pass.
pub struct PivotCalculator<'a> {
    request: &'a PivotRequest,
    records: &'a [Record],

    row_keys: KeyCache,
    col_keys: KeyCache,

    /// Row buckets in first-seen order.
    buckets: Vec<PendingBucket>,

    /// One accumulator per value field for every (row, column) pair seen.
    aggregates: FxHashMap<GroupKey, Vec<AggregateAccumulator>>,
}

impl<'a> PivotCalculator<'a> {
    pub fn new(request: &'a PivotRequest, records: &'a [Record]) -> Self {
        PivotCalculator {
            request,
            records,
            row_keys: KeyCache::new(),
            col_keys: KeyCache::new(),
            buckets: Vec::new(),
            aggregates: FxHashMap::default(),
        }
    }

    /// Executes the full calculation and returns the result.
    pub fn calculate(mut self) -> PivotResult {
        if !self.request.is_configured() {
            debug!(
                "pivot: insufficient configuration (row_fields={}, value_fields={})",
                self.request.row_fields.len(),
                self.request.value_fields.len()
            );
            return PivotResult::insufficient(self.request);
        }

        if !self.request.is_cross_tab() {
            self.col_keys.intern(TOTAL_COLUMN_KEY.to_string());
        }

        let records = self.records;
        for (index, record) in records.iter().enumerate() {
            self.scan_record(index, record);
        }

        let result = self.generate_result();
        debug!(
            "pivot: {} records -> {} row buckets x {} column buckets",
            records.len(),
            result.buckets.len(),
            result.column_keys.len()
        );
        result
    }

    /// Assigns one record to its row and column bucket and feeds the accumulators.
    fn scan_record(&mut self, index: usize, record: &Record) {
        let row_key = build_key_text(record, &self.request.row_fields);
        let (row_id, is_new_row) = self.row_keys.intern(row_key);
        if is_new_row {
            self.buckets.push(PendingBucket {
                key_id: row_id,
                row_values: self
                    .request
                    .row_fields
                    .iter()
                    .map(|field| {
                        let value = record.get(field.as_str()).cloned().unwrap_or(Value::Null);
                        (field.clone(), value)
                    })
                    .collect(),
                record_indices: Vec::new(),
            });
        }
        self.buckets[row_id as usize].record_indices.push(index);

        let col_id = if self.request.is_cross_tab() {
            self.col_keys
                .intern(build_key_text(record, &self.request.column_fields))
                .0
        } else {
            0
        };

        let value_count = self.request.value_fields.len();
        let numbers: SmallVec<[Option<f64>; 4]> = self
            .request
            .value_fields
            .iter()
            .map(|vf| record.get(vf.field.as_str()).and_then(as_number))
            .collect();

        let accumulators = self
            .aggregates
            .entry(GroupKey::new(row_id, col_id))
            .or_insert_with(|| vec![AggregateAccumulator::new(); value_count]);
        for (acc, number) in accumulators.iter_mut().zip(&numbers) {
            if let Some(n) = number {
                acc.add_number(*n);
            }
        }
    }

    /// Consumes the scan state and lays out buckets, cells and grand totals.
    fn generate_result(self) -> PivotResult {
        let PivotCalculator {
            request,
            row_keys,
            col_keys,
            buckets,
            aggregates,
            ..
        } = self;

        let column_totals = merge_column_totals(request, &row_keys, &col_keys, &aggregates);

        let buckets = buckets
            .into_iter()
            .map(|pending| {
                let row_id = pending.key_id;
                let cells = build_cells(request, &col_keys, |col_id| {
                    aggregates.get(&GroupKey::new(row_id, col_id))
                });
                AggregationBucket {
                    key: row_keys.get(row_id).unwrap_or_default().to_string(),
                    row_values: pending.row_values,
                    record_indices: pending.record_indices,
                    cells,
                }
            })
            .collect();

        let grand_totals = build_cells(request, &col_keys, |col_id| column_totals.get(col_id as usize));

        PivotResult {
            status: PivotStatus::Ready,
            buckets,
            column_keys: col_keys.into_keys(),
            grand_totals,
            request: request.clone(),
        }
    }
}

/// Folds every (row, column) accumulator into per-column totals.
/// Rows are merged in first-seen order so totals are reproducible.
fn merge_column_totals(
    request: &PivotRequest,
    row_keys: &KeyCache,
    col_keys: &KeyCache,
    aggregates: &FxHashMap<GroupKey, Vec<AggregateAccumulator>>,
) -> Vec<Vec<AggregateAccumulator>> {
    let value_count = request.value_fields.len();
    let mut totals = vec![vec![AggregateAccumulator::new(); value_count]; col_keys.len()];

    for row_id in 0..row_keys.len() as KeyId {
        for (col_id, column) in totals.iter_mut().enumerate() {
            if let Some(accumulators) = aggregates.get(&GroupKey::new(row_id, col_id as KeyId)) {
                for (total, acc) in column.iter_mut().zip(accumulators) {
                    total.merge(acc);
                }
            }
        }
    }

    totals
}

/// Produces one cell per (column key, value field) from the accumulators
/// returned by `lookup`. Column keys with no accumulators compute as empty.
fn build_cells<'m, F>(request: &PivotRequest, col_keys: &KeyCache, lookup: F) -> Vec<AggregateCell>
where
    F: Fn(KeyId) -> Option<&'m Vec<AggregateAccumulator>>,
{
    let empty = AggregateAccumulator::new();
    let mut cells = Vec::with_capacity(col_keys.len() * request.value_fields.len());

    for (col_id, column_key) in col_keys.keys().iter().enumerate() {
        let accumulators = lookup(col_id as KeyId);
        for (vf_idx, value_field) in request.value_fields.iter().enumerate() {
            let acc = accumulators.and_then(|accs| accs.get(vf_idx)).unwrap_or(&empty);
            cells.push(AggregateCell {
                key: value_field.cell_key(column_key),
                column_key: column_key.clone(),
                field: value_field.field.clone(),
                aggregation: value_field.aggregation,
                value: acc.compute(value_field.aggregation),
            });
        }
    }

    cells
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Aggregates `records` according to `request`.
///
/// Returns an idle result (status `InsufficientConfiguration`, no buckets)
/// when the request has no row fields or no value fields. This is the main
/// entry point of the engine; it performs no I/O.
pub fn aggregate(records: &[Record], request: &PivotRequest) -> PivotResult {
    PivotCalculator::new(request, records).calculate()
}
