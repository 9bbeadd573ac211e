//! Sorted views over the patient collection.

use crate::collection::PatientCollection;
use crate::constants::{SORTABLE_FIELDS, SORT_ORDERS};
use crate::error::RecordError;
use crate::patient::PatientRecord;
use std::cmp::Ordering;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    Age,
    Name,
    Height,
    Weight,
}

impl SortField {
    fn compare(self, a: &PatientRecord, b: &PatientRecord) -> Ordering {
        match self {
            SortField::Age => a.age().cmp(&b.age()),
            SortField::Name => a.name().cmp(b.name()),
            SortField::Height => a.height().total_cmp(&b.height()),
            SortField::Weight => a.weight().total_cmp(&b.weight()),
        }
    }
}

impl FromStr for SortField {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "age" => Ok(SortField::Age),
            "name" => Ok(SortField::Name),
            "height" => Ok(SortField::Height),
            "weight" => Ok(SortField::Weight),
            _ => Err(RecordError::InvalidArgument(format!(
                "Invalid sort field, select from [{}]",
                SORTABLE_FIELDS.join(", ")
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(RecordError::InvalidArgument(format!(
                "Invalid sort order, select from [{}]",
                SORT_ORDERS.join(", ")
            ))),
        }
    }
}

/// Records ordered by `field`.
///
/// The sort is stable in both directions: records that compare equal keep the collection's
/// iteration order (ascending id), including under `desc`.
pub fn sorted_view(
    collection: &PatientCollection,
    field: SortField,
    order: SortOrder,
) -> Vec<&PatientRecord> {
    let mut records: Vec<&PatientRecord> = collection.records().collect();
    records.sort_by(|a, b| {
        let ordering = field.compare(a, b);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
    records
}
