use crate::data::results::{AggregateRow, AggregateTable, FrequencySeries};
use crate::data::table_source::TableSource;
use crate::error::Result;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// One partition of a group-by
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub key: Vec<String>,
    pub rows: Vec<usize>,
}

/// Rows partitioned by one or more categorical columns.
/// Groups iterate in ascending key order; rows inside a group keep scan order.
#[derive(Debug, Clone)]
pub struct GroupBy {
    key_columns: Vec<String>,
    groups: Vec<Group>,
}

impl GroupBy {
    /// Partition `rows` of `source` by the text of `key_columns`
    pub fn new<S: TableSource + ?Sized>(
        source: &S,
        rows: &[usize],
        key_columns: &[&str],
    ) -> Result<Self> {
        let positions = source.column_positions(key_columns)?;

        let mut partitions: BTreeMap<Vec<String>, Vec<usize>> = BTreeMap::new();
        for &row in rows {
            let key = positions
                .iter()
                .map(|&col| source.text(row, col).into_owned())
                .collect();
            partitions.entry(key).or_default().push(row);
        }

        let groups: Vec<Group> = partitions
            .into_iter()
            .map(|(key, rows)| Group { key, rows })
            .collect();

        debug!(
            "Grouped {} rows by {:?} into {} groups",
            rows.len(),
            key_columns,
            groups.len()
        );

        Ok(Self {
            key_columns: key_columns.iter().map(|c| c.to_string()).collect(),
            groups,
        })
    }

    pub fn key_columns(&self) -> &[String] {
        &self.key_columns
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get_group(&self, key: &[&str]) -> Option<&Group> {
        self.groups
            .iter()
            .find(|g| g.key.iter().map(|k| k.as_str()).eq(key.iter().copied()))
    }

    /// Mean of each value column per group, nulls skipped
    pub fn mean<S: TableSource + ?Sized>(
        &self,
        source: &S,
        value_columns: &[&str],
    ) -> Result<AggregateTable> {
        let positions = source.column_positions(value_columns)?;

        let mut rows = Vec::with_capacity(self.groups.len());
        for group in &self.groups {
            let values = positions
                .iter()
                .map(|&col| mean_of(source, &group.rows, col))
                .collect::<Result<Vec<_>>>()?;
            rows.push(AggregateRow {
                key: group.key.clone(),
                values,
            });
        }

        Ok(AggregateTable {
            group_columns: self.key_columns.clone(),
            value_columns: value_columns.iter().map(|c| c.to_string()).collect(),
            rows,
        })
    }
}

/// Mean of a numeric column over the given rows; `None` when every value is null
pub fn mean_of<S: TableSource + ?Sized>(source: &S, rows: &[usize], col: usize) -> Result<Option<f64>> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for &row in rows {
        if let Some(value) = source.number(row, col)? {
            sum += value;
            count += 1;
        }
    }
    Ok(if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    })
}

/// Count occurrences of each value of `column` over the given rows.
/// Ordered by count descending; equal counts keep first-encounter order.
pub fn value_counts<S: TableSource + ?Sized>(
    source: &S,
    rows: &[usize],
    column: &str,
) -> Result<FrequencySeries> {
    let col = source.column_position(column)?;

    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut tallies: Vec<(String, usize)> = Vec::new();
    for &row in rows {
        let value = source.text(row, col);
        match slots.get(&*value) {
            Some(&slot) => tallies[slot].1 += 1,
            None => {
                slots.insert(value.to_string(), tallies.len());
                tallies.push((value.into_owned(), 1));
            }
        }
    }

    // stable: ties stay in encounter order
    tallies.sort_by(|a, b| b.1.cmp(&a.1));

    let (labels, counts) = tallies.into_iter().unzip();
    Ok(FrequencySeries {
        column: column.to_string(),
        labels,
        counts,
    })
}
