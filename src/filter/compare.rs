use std::{cmp::Ordering, sync::Arc};

use arrow::{
    array::{AsArray, OffsetSizeTrait},
    datatypes::{
        ArrowPrimitiveType, DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type,
        Int8Type, UInt16Type, UInt32Type, UInt64Type, UInt8Type,
    },
};

use super::{select_rows, FilterScratch, VectorFilter};
use crate::{
    context::{ColumnVector, FilterContext, NullLayout},
    error::FilterError,
    selected::Selected,
    value::{compare_int_float, ComparisonOp, ScalarValue},
};

/// Selects rows where `column <op> literal` holds. Null rows never match.
#[derive(Clone, Debug, PartialEq)]
pub struct CompareFilter {
    column: Arc<str>,
    op: ComparisonOp,
    value: ScalarValue,
}

impl CompareFilter {
    /// Builds a comparison against a non-null literal.
    pub fn new<N, V>(column: N, op: ComparisonOp, value: V) -> Result<Self, FilterError>
    where
        N: Into<Arc<str>>,
        V: Into<ScalarValue>,
    {
        let value = value.into();
        if value.is_null() {
            return Err(FilterError::NullLiteral);
        }
        Ok(Self {
            column: column.into(),
            op,
            value,
        })
    }

    /// Name of the compared column.
    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Comparison operator.
    #[must_use]
    pub fn op(&self) -> ComparisonOp {
        self.op
    }

    /// Literal the column is compared with.
    #[must_use]
    pub fn value(&self) -> &ScalarValue {
        &self.value
    }

    fn unsupported(&self, data_type: &DataType) -> FilterError {
        FilterError::UnsupportedComparison {
            column: self.column.to_string(),
            data_type: data_type.clone(),
            op: self.op,
        }
    }

    fn accepts(&self, data_type: &DataType) -> bool {
        match data_type {
            DataType::Null => true,
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64 => self.value.is_numeric(),
            DataType::Utf8 | DataType::LargeUtf8 => self.value.as_str().is_some(),
            DataType::Boolean => self.value.as_bool().is_some(),
            _ => false,
        }
    }

    /// Applies the per-batch null split, then `cmp(slot)` on the surviving rows.
    fn select_matching<F>(
        &self,
        column: &ColumnVector<'_>,
        bound: &Selected,
        selected_in: &Selected,
        selected_out: &mut Selected,
        cmp: F,
    ) where
        F: Fn(usize) -> Option<Ordering>,
    {
        let op = self.op;
        match column.null_layout() {
            NullLayout::NoNulls if column.is_repeating() => {
                if op.test_ordering(cmp(0)) {
                    select_rows(bound, selected_in, selected_out, |_| true);
                } else {
                    selected_out.clear();
                }
            }
            NullLayout::NoNulls => select_rows(bound, selected_in, selected_out, |row| {
                op.test_ordering(cmp(row))
            }),
            NullLayout::Mixed => select_rows(bound, selected_in, selected_out, |row| {
                !column.is_null(row) && op.test_ordering(cmp(row))
            }),
            NullLayout::AllNull => selected_out.clear(),
        }
    }

    fn filter_integer<T>(
        &self,
        column: &ColumnVector<'_>,
        bound: &Selected,
        selected_in: &Selected,
        selected_out: &mut Selected,
    ) -> Result<(), FilterError>
    where
        T: ArrowPrimitiveType,
        T::Native: Into<i128>,
    {
        let array = column.array();
        let values = array.as_primitive::<T>();
        if let Some(literal) = self.value.as_f64() {
            self.select_matching(column, bound, selected_in, selected_out, |slot| {
                compare_int_float(values.value(slot).into(), literal)
            });
            return Ok(());
        }
        let literal = self
            .value
            .as_i128()
            .ok_or_else(|| self.unsupported(array.data_type()))?;
        self.select_matching(column, bound, selected_in, selected_out, |slot| {
            Some(Into::<i128>::into(values.value(slot)).cmp(&literal))
        });
        Ok(())
    }

    fn filter_float<T>(
        &self,
        column: &ColumnVector<'_>,
        bound: &Selected,
        selected_in: &Selected,
        selected_out: &mut Selected,
    ) -> Result<(), FilterError>
    where
        T: ArrowPrimitiveType,
        T::Native: Into<f64>,
    {
        let array = column.array();
        let values = array.as_primitive::<T>();
        if let Some(literal) = self.value.as_i128() {
            self.select_matching(column, bound, selected_in, selected_out, |slot| {
                compare_int_float(literal, values.value(slot).into()).map(Ordering::reverse)
            });
            return Ok(());
        }
        let literal = self
            .value
            .as_f64()
            .ok_or_else(|| self.unsupported(array.data_type()))?;
        self.select_matching(column, bound, selected_in, selected_out, |slot| {
            Into::<f64>::into(values.value(slot)).partial_cmp(&literal)
        });
        Ok(())
    }

    fn filter_string<O>(
        &self,
        column: &ColumnVector<'_>,
        bound: &Selected,
        selected_in: &Selected,
        selected_out: &mut Selected,
    ) -> Result<(), FilterError>
    where
        O: OffsetSizeTrait,
    {
        let array = column.array();
        let literal = self
            .value
            .as_str()
            .ok_or_else(|| self.unsupported(array.data_type()))?;
        let values = array.as_string::<O>();
        self.select_matching(column, bound, selected_in, selected_out, |slot| {
            Some(values.value(slot).cmp(literal))
        });
        Ok(())
    }

    fn filter_boolean(
        &self,
        column: &ColumnVector<'_>,
        bound: &Selected,
        selected_in: &Selected,
        selected_out: &mut Selected,
    ) -> Result<(), FilterError> {
        let array = column.array();
        let literal = self
            .value
            .as_bool()
            .ok_or_else(|| self.unsupported(array.data_type()))?;
        let values = array.as_boolean();
        self.select_matching(column, bound, selected_in, selected_out, |slot| {
            Some(values.value(slot).cmp(&literal))
        });
        Ok(())
    }
}

impl VectorFilter for CompareFilter {
    fn check(&self, ctx: &dyn FilterContext) -> Result<(), FilterError> {
        let column = ctx.find_column(&self.column)?;
        let data_type = column.array().data_type();
        if self.accepts(data_type) {
            Ok(())
        } else {
            Err(self.unsupported(data_type))
        }
    }

    fn filter(
        &self,
        ctx: &dyn FilterContext,
        bound: &Selected,
        selected_in: &Selected,
        selected_out: &mut Selected,
        _scratch: &mut FilterScratch,
    ) -> Result<(), FilterError> {
        let column = ctx.find_column(&self.column)?;
        let column = &column;
        match column.array().data_type() {
            // Null-typed columns hold no values to compare.
            DataType::Null => {
                selected_out.clear();
                Ok(())
            }
            DataType::Int8 => {
                self.filter_integer::<Int8Type>(column, bound, selected_in, selected_out)
            }
            DataType::Int16 => {
                self.filter_integer::<Int16Type>(column, bound, selected_in, selected_out)
            }
            DataType::Int32 => {
                self.filter_integer::<Int32Type>(column, bound, selected_in, selected_out)
            }
            DataType::Int64 => {
                self.filter_integer::<Int64Type>(column, bound, selected_in, selected_out)
            }
            DataType::UInt8 => {
                self.filter_integer::<UInt8Type>(column, bound, selected_in, selected_out)
            }
            DataType::UInt16 => {
                self.filter_integer::<UInt16Type>(column, bound, selected_in, selected_out)
            }
            DataType::UInt32 => {
                self.filter_integer::<UInt32Type>(column, bound, selected_in, selected_out)
            }
            DataType::UInt64 => {
                self.filter_integer::<UInt64Type>(column, bound, selected_in, selected_out)
            }
            DataType::Float32 => {
                self.filter_float::<Float32Type>(column, bound, selected_in, selected_out)
            }
            DataType::Float64 => {
                self.filter_float::<Float64Type>(column, bound, selected_in, selected_out)
            }
            DataType::Utf8 => self.filter_string::<i32>(column, bound, selected_in, selected_out),
            DataType::LargeUtf8 => {
                self.filter_string::<i64>(column, bound, selected_in, selected_out)
            }
            DataType::Boolean => self.filter_boolean(column, bound, selected_in, selected_out),
            other => Err(self.unsupported(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{BooleanArray, Float64Array, Int64Array, StringArray, UInt8Array};

    use super::*;
    use crate::{
        context::RecordBatchContext,
        filter::test_util::{run, sample_batch, single_column},
    };

    #[test]
    fn null_literal_is_rejected() {
        assert_eq!(
            CompareFilter::new("c", ComparisonOp::Equal, ScalarValue::Null),
            Err(FilterError::NullLiteral)
        );
    }

    #[test]
    fn integer_comparison_skips_nulls_and_selected_in() {
        let batch = sample_batch();
        let ctx = RecordBatchContext::new(&batch);
        let filter =
            CompareFilter::new("c", ComparisonOp::GreaterThan, 10_i64).expect("valid filter");
        assert_eq!(
            run(&filter, &ctx, &[0, 1, 2, 3, 4], &[2]).expect("filter"),
            vec![4]
        );
    }

    #[test]
    fn unsigned_literal_compares_with_narrow_columns() {
        let batch = single_column("u", Arc::new(UInt8Array::from(vec![0, 200, 255])));
        let ctx = RecordBatchContext::new(&batch);
        let filter = CompareFilter::new("u", ComparisonOp::GreaterThanOrEqual, 200_u64)
            .expect("valid filter");
        assert_eq!(run(&filter, &ctx, &[0, 1, 2], &[]).expect("filter"), vec![1, 2]);
    }

    #[test]
    fn float_comparison_never_matches_nan() {
        let batch = single_column(
            "f",
            Arc::new(Float64Array::from(vec![1.5, f64::NAN, -2.0])),
        );
        let ctx = RecordBatchContext::new(&batch);
        let filter =
            CompareFilter::new("f", ComparisonOp::NotEqual, 1.5_f64).expect("valid filter");
        assert_eq!(run(&filter, &ctx, &[0, 1, 2], &[]).expect("filter"), vec![2]);
    }

    #[test]
    fn float_literal_against_integer_column() {
        let batch = sample_batch();
        let ctx = RecordBatchContext::new(&batch);
        let filter =
            CompareFilter::new("v", ComparisonOp::GreaterThan, 2.5_f64).expect("valid filter");
        assert_eq!(run(&filter, &ctx, &[0, 1, 2, 3, 4], &[]).expect("filter"), vec![3, 4]);
        let filter = CompareFilter::new("v", ComparisonOp::Equal, 2.0_f64).expect("valid filter");
        assert_eq!(run(&filter, &ctx, &[0, 1, 2, 3, 4], &[]).expect("filter"), vec![2]);
    }

    #[test]
    fn large_integers_do_not_round_through_f64() {
        let big = 1_i64 << 53;
        let batch = single_column("i", Arc::new(Int64Array::from(vec![big, big + 1])));
        let ctx = RecordBatchContext::new(&batch);
        let filter =
            CompareFilter::new("i", ComparisonOp::Equal, big as f64).expect("valid filter");
        assert_eq!(run(&filter, &ctx, &[0, 1], &[]).expect("filter"), vec![0]);

        let batch = single_column("f", Arc::new(Float64Array::from(vec![big as f64])));
        let ctx = RecordBatchContext::new(&batch);
        let filter =
            CompareFilter::new("f", ComparisonOp::LessThan, big + 1).expect("valid filter");
        assert_eq!(run(&filter, &ctx, &[0], &[]).expect("filter"), vec![0]);
    }

    #[test]
    fn check_validates_column_and_literal() {
        let batch = sample_batch();
        let ctx = RecordBatchContext::new(&batch);
        let ok = CompareFilter::new("v", ComparisonOp::Equal, 1.0_f64).expect("filter");
        assert_eq!(ok.check(&ctx), Ok(()));
        let mismatched = CompareFilter::new("v", ComparisonOp::Equal, "x").expect("filter");
        assert!(matches!(
            mismatched.check(&ctx),
            Err(FilterError::UnsupportedComparison { .. })
        ));
        let missing = CompareFilter::new("nope", ComparisonOp::Equal, 1_i64).expect("filter");
        assert_eq!(
            missing.check(&ctx),
            Err(FilterError::ColumnNotFound("nope".to_owned()))
        );
    }

    #[test]
    fn string_and_boolean_columns() {
        let batch = single_column(
            "s",
            Arc::new(StringArray::from(vec![Some("apple"), None, Some("pear")])),
        );
        let ctx = RecordBatchContext::new(&batch);
        let filter = CompareFilter::new("s", ComparisonOp::LessThan, "banana").expect("filter");
        assert_eq!(run(&filter, &ctx, &[0, 1, 2], &[]).expect("filter"), vec![0]);

        let batch = single_column("b", Arc::new(BooleanArray::from(vec![true, false, true])));
        let ctx = RecordBatchContext::new(&batch);
        let filter = CompareFilter::new("b", ComparisonOp::Equal, true).expect("filter");
        assert_eq!(run(&filter, &ctx, &[0, 1, 2], &[2]).expect("filter"), vec![0]);
    }

    #[test]
    fn repeating_value_is_evaluated_once_for_the_batch() {
        let batch = sample_batch();
        let ctx = RecordBatchContext::new(&batch)
            .with_constant("part", Arc::new(Int64Array::from(vec![7])))
            .expect("constant");
        let hit = CompareFilter::new("part", ComparisonOp::Equal, 7_i64).expect("filter");
        assert_eq!(
            run(&hit, &ctx, &[0, 1, 2, 3, 4], &[1]).expect("filter"),
            vec![0, 2, 3, 4]
        );
        let miss = CompareFilter::new("part", ComparisonOp::LessThan, 7_i64).expect("filter");
        assert!(run(&miss, &ctx, &[0, 1, 2], &[]).expect("filter").is_empty());
    }

    #[test]
    fn mismatched_literal_is_unsupported() {
        let batch = sample_batch();
        let ctx = RecordBatchContext::new(&batch);
        let filter = CompareFilter::new("v", ComparisonOp::Equal, "x").expect("filter");
        assert_eq!(
            run(&filter, &ctx, &[0], &[]),
            Err(FilterError::UnsupportedComparison {
                column: "v".to_owned(),
                data_type: DataType::Int64,
                op: ComparisonOp::Equal,
            })
        );
    }
}
