use serde::Serialize;

use crate::config::SeatingConfig;
use crate::services::selection::Selection;

/// Стоимость брони: число мест, умноженное на фиксированную цену места.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceCalculator {
    price_per_seat: i64,
}

impl PriceCalculator {
    pub fn new(price_per_seat: i64) -> Self {
        Self { price_per_seat }
    }

    pub fn from_config(seating: &SeatingConfig) -> Self {
        Self::new(seating.price_per_seat)
    }

    pub fn price_per_seat(&self) -> i64 {
        self.price_per_seat
    }

    pub fn total_for(&self, seat_count: usize) -> i64 {
        seat_count as i64 * self.price_per_seat
    }

    pub fn total(&self, selection: &Selection) -> i64 {
        self.total_for(selection.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SeatGrid;
    use proptest::prelude::*;

    #[test]
    fn empty_selection_costs_nothing() {
        let pricing = PriceCalculator::new(200);
        assert_eq!(pricing.total(&Selection::new(3)), 0);
    }

    #[test]
    fn three_seats_cost_six_hundred() {
        let pricing = PriceCalculator::from_config(&SeatingConfig::default());
        let mut selection = Selection::new(3);
        for raw in ["A1", "B2", "C3"] {
            selection.toggle(raw.parse().unwrap()).unwrap();
        }
        assert_eq!(pricing.total(&selection), 600);
    }

    proptest! {
        #[test]
        fn total_tracks_selection_size(indices in proptest::collection::vec(0usize..30, 0..40)) {
            let seats = SeatGrid::new(5, 6).unwrap().seats();
            let pricing = PriceCalculator::new(200);
            let mut selection = Selection::new(3);
            for i in indices {
                let _ = selection.toggle(seats[i]);
                prop_assert_eq!(pricing.total(&selection), selection.len() as i64 * 200);
            }
        }
    }
}
