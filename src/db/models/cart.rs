use serde::Serialize;
use sqlx::types::Uuid;
use time::OffsetDateTime;

/// Cart line joined with the current course title and price. Prices are
/// read live at listing time, not snapshotted when the line is added.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct CartLineDetail {
    pub course_id: Uuid,
    pub title: String,
    pub price_cents: i64,
    pub added_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineDetail>,
    pub total_cents: i64,
}

impl CartView {
    pub fn new(lines: Vec<CartLineDetail>) -> Self {
        let total_cents = lines.iter().map(|l| l.price_cents).sum();
        Self { lines, total_cents }
    }
}

#[derive(Debug, Serialize)]
pub struct CheckoutOutcome {
    pub enrollments_created: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(price_cents: i64) -> CartLineDetail {
        CartLineDetail {
            course_id: Uuid::new_v4(),
            title: "course".into(),
            price_cents,
            added_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn cart_total_is_sum_of_current_prices() {
        let view = CartView::new(vec![line(5000), line(3000)]);
        assert_eq!(view.total_cents, 8000);
    }

    #[test]
    fn empty_cart_totals_zero() {
        let view = CartView::new(vec![]);
        assert_eq!(view.total_cents, 0);
    }
}
