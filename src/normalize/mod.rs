pub mod fields;

use crate::constants::{
    DEFAULT_TWO_DIGIT_YEAR_PIVOT, EMPTY_NAME_REASON, EXPIRATION_DATE_COLUMN, HIDDEN_COLUMN,
    KEYWORDS_COLUMN, NAME_COLUMN, PLACEMENT_COLUMN, QUANTITY_COLUMN,
};
use crate::types::{FieldNotice, NormalizedItem, RawRow, SkippedRow};
use fields::Coerced;
use std::fmt::Display;

/// Outcome of normalizing one raw row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// A complete item plus notices for any field that fell back to its default
    Item {
        item: NormalizedItem,
        notices: Vec<FieldNotice>,
    },
    Skip(SkippedRow),
}

/// Turns [`RawRow`]s into [`NormalizedItem`]s. Never fails: bad cells take
/// their documented defaults and a missing name skips the row.
#[derive(Debug, Clone, Copy)]
pub struct RowNormalizer {
    two_digit_year_pivot: u32,
}

impl Default for RowNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_TWO_DIGIT_YEAR_PIVOT)
    }
}

impl RowNormalizer {
    pub fn new(two_digit_year_pivot: u32) -> Self {
        Self {
            two_digit_year_pivot,
        }
    }

    pub fn normalize(&self, row: &RawRow) -> Normalized {
        let Some(name) = fields::parse_name(row.get(NAME_COLUMN)) else {
            return Normalized::Skip(SkippedRow {
                row: row.index,
                reason: EMPTY_NAME_REASON.to_string(),
            });
        };

        let mut notices = Vec::new();

        let expiration_date = fields::parse_expiration_date(
            row.get(EXPIRATION_DATE_COLUMN),
            self.two_digit_year_pivot,
        );
        note(&mut notices, row.index, EXPIRATION_DATE_COLUMN, &expiration_date, "none");

        let quantity = fields::parse_quantity(row.get(QUANTITY_COLUMN));
        note(&mut notices, row.index, QUANTITY_COLUMN, &quantity, quantity.value());

        let keywords = fields::parse_keywords(row.get(KEYWORDS_COLUMN));
        let placement = fields::parse_placement(row.get(PLACEMENT_COLUMN));

        let hidden = fields::parse_hidden(row.get(HIDDEN_COLUMN));
        note(&mut notices, row.index, HIDDEN_COLUMN, &hidden, hidden.value());

        let item = NormalizedItem {
            name,
            expiration_date: expiration_date.into_value(),
            quantity: quantity.into_value(),
            keywords: keywords.into_value(),
            placement: placement.into_value(),
            hidden: hidden.into_value(),
            image_url: None,
        };

        Normalized::Item { item, notices }
    }
}

fn note<T>(
    notices: &mut Vec<FieldNotice>,
    row: usize,
    field: &'static str,
    coerced: &Coerced<T>,
    fallback: impl Display,
) {
    if let Some(raw) = coerced.rejected() {
        notices.push(FieldNotice {
            row,
            field,
            raw: raw.to_string(),
            fallback: fallback.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn row(index: usize, cells: &[(&str, &str)]) -> RawRow {
        let fields: HashMap<String, String> = cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RawRow::new(index, fields)
    }

    fn item(normalized: Normalized) -> (NormalizedItem, Vec<FieldNotice>) {
        match normalized {
            Normalized::Item { item, notices } => (item, notices),
            Normalized::Skip(skip) => panic!("unexpected skip: {:?}", skip),
        }
    }

    #[test]
    fn test_full_row() {
        let raw = row(
            1,
            &[
                ("name", " Milk "),
                ("expirationDate", "3/5/07"),
                ("quantity", "2.7"),
                ("keywords", "dairy, cold"),
                ("placement", "\"Fridge\""),
                ("hidden", "TRUE"),
            ],
        );

        let (item, notices) = item(RowNormalizer::default().normalize(&raw));
        assert_eq!(
            item,
            NormalizedItem {
                name: "Milk".to_string(),
                expiration_date: NaiveDate::from_ymd_opt(2007, 3, 5),
                quantity: 2,
                keywords: vec!["dairy".to_string(), "cold".to_string()],
                placement: "Fridge".to_string(),
                hidden: true,
                image_url: None,
            }
        );
        assert!(notices.is_empty());
    }

    #[test]
    fn test_name_only_row_gets_defaults() {
        let (item, notices) = item(RowNormalizer::default().normalize(&row(4, &[("name", "Rice")])));
        assert_eq!(item.expiration_date, None);
        assert_eq!(item.quantity, 1);
        assert!(item.keywords.is_empty());
        assert_eq!(item.placement, "Unknown");
        assert!(!item.hidden);
        assert!(item.image_url.is_none());
        assert!(notices.is_empty());
    }

    #[test]
    fn test_blank_name_skips() {
        for name in ["", "   ", "\t"] {
            let result = RowNormalizer::default().normalize(&row(2, &[("name", name), ("quantity", "4")]));
            assert_eq!(
                result,
                Normalized::Skip(SkippedRow {
                    row: 2,
                    reason: "empty name".to_string()
                })
            );
        }
    }

    #[test]
    fn test_missing_name_column_skips() {
        let result = RowNormalizer::default().normalize(&row(7, &[("quantity", "4")]));
        assert!(matches!(result, Normalized::Skip(SkippedRow { row: 7, .. })));
    }

    #[test]
    fn test_bad_fields_produce_notices_not_skips() {
        let raw = row(
            3,
            &[
                ("name", "Beans"),
                ("expirationDate", "soon"),
                ("quantity", "-2"),
                ("hidden", "yes"),
            ],
        );

        let (item, notices) = item(RowNormalizer::default().normalize(&raw));
        assert_eq!(item.expiration_date, None);
        assert_eq!(item.quantity, 1);
        assert!(!item.hidden);

        let fields: Vec<&str> = notices.iter().map(|n| n.field).collect();
        assert_eq!(fields, vec!["expirationDate", "quantity", "hidden"]);
        assert_eq!(notices[0].to_string(), "invalid expirationDate \"soon\", using none");
        assert_eq!(notices[1].fallback, "1");
        assert!(notices.iter().all(|n| n.row == 3));
    }

    #[test]
    fn test_pivot_is_configurable() {
        let raw = row(1, &[("name", "Jam"), ("expirationDate", "1/2/60")]);
        let (item, _) = item(RowNormalizer::new(70).normalize(&raw));
        assert_eq!(item.expiration_date, NaiveDate::from_ymd_opt(2060, 1, 2));
    }
}
