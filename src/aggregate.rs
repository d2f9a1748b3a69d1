//! Pure reporting aggregates over the expense collection. No I/O, no hidden
//! state; recomputed on demand from whatever the repository currently holds.

use crate::api::Expense;

/// `by_category` keeps first-occurrence order so downstream rendering (chart
/// colors, summary rows) stays deterministic for the same collection.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Aggregate {
    pub total_spent: f64,
    pub by_category: Vec<(String, f64)>,
}

/// Groups by exact string equality of the category label. No trimming, no
/// case folding: "Food" and "food" are distinct groups.
pub fn compute_aggregate(expenses: &[Expense]) -> Aggregate {
    let mut aggregate = Aggregate::default();
    for expense in expenses {
        aggregate.total_spent += expense.amount;
        match aggregate
            .by_category
            .iter_mut()
            .find(|(category, _)| *category == expense.category)
        {
            Some((_, sum)) => *sum += expense.amount,
            None => aggregate
                .by_category
                .push((expense.category.clone(), expense.amount)),
        }
    }
    aggregate
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(category: &str, amount: f64) -> Expense {
        Expense {
            id: None,
            category: category.to_string(),
            amount,
            date: "2024-01-01".to_string(),
        }
    }

    #[test]
    fn empty_collection_yields_zero_total_and_no_categories() {
        let aggregate = compute_aggregate(&[]);
        assert_eq!(aggregate.total_spent, 0.0);
        assert!(aggregate.by_category.is_empty());
    }

    #[test]
    fn total_equals_sum_of_amounts() {
        let expenses = vec![
            expense("Food", 10.0),
            expense("Rent", 800.0),
            expense("Food", 2.5),
        ];
        let aggregate = compute_aggregate(&expenses);
        assert_eq!(aggregate.total_spent, 812.5);
    }

    #[test]
    fn category_sums_add_up_to_the_total() {
        let expenses = vec![
            expense("Food", 10.0),
            expense("Transport", 3.5),
            expense("Food", 6.5),
            expense("Rent", 400.0),
        ];
        let aggregate = compute_aggregate(&expenses);
        let category_total: f64 = aggregate.by_category.iter().map(|(_, sum)| sum).sum();
        assert_eq!(category_total, aggregate.total_spent);
    }

    #[test]
    fn grouping_is_case_and_whitespace_sensitive() {
        let expenses = vec![
            expense("Food", 10.0),
            expense("food", 5.0),
            expense("Food ", 1.0),
        ];
        let aggregate = compute_aggregate(&expenses);
        assert_eq!(
            aggregate.by_category,
            vec![
                ("Food".to_string(), 10.0),
                ("food".to_string(), 5.0),
                ("Food ".to_string(), 1.0),
            ]
        );
    }

    #[test]
    fn categories_keep_first_occurrence_order() {
        let expenses = vec![
            expense("Rent", 800.0),
            expense("Food", 10.0),
            expense("Rent", 50.0),
            expense("Transport", 3.0),
        ];
        let aggregate = compute_aggregate(&expenses);
        let order: Vec<&str> = aggregate
            .by_category
            .iter()
            .map(|(category, _)| category.as_str())
            .collect();
        assert_eq!(order, vec!["Rent", "Food", "Transport"]);
    }

    #[test]
    fn single_record_scenario() {
        let expenses = vec![Expense {
            id: Some(1),
            category: "Food".to_string(),
            amount: 12.5,
            date: "2024-01-01".to_string(),
        }];
        let aggregate = compute_aggregate(&expenses);
        assert_eq!(aggregate.total_spent, 12.5);
        assert_eq!(aggregate.by_category, vec![("Food".to_string(), 12.5)]);
    }

    #[test]
    fn same_input_yields_same_aggregate() {
        let expenses = vec![expense("Food", 10.0), expense("Rent", 20.0)];
        assert_eq!(compute_aggregate(&expenses), compute_aggregate(&expenses));
    }
}
