//! Выбор мест в рамках одной сессии.
//!
//! Выбор хранит места в порядке кликов, без повторов, и никогда не превышает
//! лимит `max_seats`. Повторный клик по выбранному месту снимает выбор.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::SeatId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Max {max} seats allowed!")]
    CapacityReached { max: usize },
    #[error("seat {0} is not part of this showing")]
    UnknownSeat(SeatId),
}

/// Результат успешного переключения места.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "seat", rename_all = "lowercase")]
pub enum Toggle {
    Selected(SeatId),
    Deselected(SeatId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    seats: Vec<SeatId>,
    max_seats: usize,
}

impl Selection {
    pub fn new(max_seats: usize) -> Self {
        Self {
            seats: Vec::with_capacity(max_seats),
            max_seats,
        }
    }

    pub fn toggle(&mut self, seat: SeatId) -> Result<Toggle, SelectionError> {
        if let Some(pos) = self.seats.iter().position(|s| *s == seat) {
            // remove, а не swap_remove: порядок кликов сохраняется
            self.seats.remove(pos);
            return Ok(Toggle::Deselected(seat));
        }
        if self.seats.len() >= self.max_seats {
            return Err(SelectionError::CapacityReached { max: self.max_seats });
        }
        self.seats.push(seat);
        Ok(Toggle::Selected(seat))
    }

    pub fn seats(&self) -> &[SeatId] {
        &self.seats
    }

    pub fn contains(&self, seat: &SeatId) -> bool {
        self.seats.contains(seat)
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn max_seats(&self) -> usize {
        self.max_seats
    }

    pub fn is_full(&self) -> bool {
        self.seats.len() >= self.max_seats
    }

    pub fn clear(&mut self) {
        self.seats.clear();
    }

    /// Места через запятую, как их видит пользователь: "A1, B2".
    pub fn display(&self) -> String {
        self.seats
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SeatGrid;
    use proptest::prelude::*;

    fn seat(raw: &str) -> SeatId {
        raw.parse().unwrap()
    }

    #[test]
    fn fourth_seat_is_rejected_and_selection_unchanged() {
        let mut selection = Selection::new(3);
        for raw in ["A1", "B2", "C3"] {
            assert_eq!(selection.toggle(seat(raw)), Ok(Toggle::Selected(seat(raw))));
        }

        let before = selection.clone();
        assert_eq!(
            selection.toggle(seat("D4")),
            Err(SelectionError::CapacityReached { max: 3 })
        );
        assert_eq!(selection, before);
        assert_eq!(selection.display(), "A1, B2, C3");
    }

    #[test]
    fn toggling_twice_deselects() {
        let mut selection = Selection::new(3);
        selection.toggle(seat("A1")).unwrap();
        assert_eq!(selection.toggle(seat("A1")), Ok(Toggle::Deselected(seat("A1"))));
        assert!(selection.is_empty());
    }

    #[test]
    fn deselect_is_allowed_when_full() {
        let mut selection = Selection::new(2);
        selection.toggle(seat("A1")).unwrap();
        selection.toggle(seat("A2")).unwrap();
        assert!(selection.is_full());

        selection.toggle(seat("A1")).unwrap();
        selection.toggle(seat("E6")).unwrap();
        assert_eq!(selection.seats(), &[seat("A2"), seat("E6")]);
    }

    #[test]
    fn keeps_click_order_not_grid_order() {
        let mut selection = Selection::new(3);
        for raw in ["C3", "A1", "B6"] {
            selection.toggle(seat(raw)).unwrap();
        }
        assert_eq!(selection.display(), "C3, A1, B6");
    }

    fn grid_seat() -> impl Strategy<Value = SeatId> {
        let seats = SeatGrid::new(5, 6).unwrap().seats();
        proptest::sample::select(seats)
    }

    proptest! {
        #[test]
        fn never_exceeds_capacity(max in 1usize..5, clicks in proptest::collection::vec(grid_seat(), 0..64)) {
            let mut selection = Selection::new(max);
            for seat in clicks {
                let _ = selection.toggle(seat);
                prop_assert!(selection.len() <= max);
            }
        }

        #[test]
        fn toggle_is_self_inverse_unless_rejected(
            clicks in proptest::collection::vec(grid_seat(), 0..16),
            probe in grid_seat(),
        ) {
            let mut selection = Selection::new(3);
            for seat in clicks {
                let _ = selection.toggle(seat);
            }
            let before = selection.clone();

            match selection.toggle(probe) {
                Ok(Toggle::Deselected(_)) => {
                    // место было выбрано; второй клик возвращает его в конец
                    prop_assert!(selection.toggle(probe).is_ok());
                    prop_assert_eq!(selection.len(), before.len());
                    prop_assert!(selection.contains(&probe));
                }
                Ok(Toggle::Selected(_)) => {
                    prop_assert!(selection.toggle(probe).is_ok());
                    prop_assert_eq!(&selection, &before);
                }
                Err(_) => {
                    prop_assert_eq!(&selection, &before);
                    prop_assert!(selection.toggle(probe).is_err());
                    prop_assert_eq!(&selection, &before);
                }
            }
        }

        #[test]
        fn never_holds_duplicates(clicks in proptest::collection::vec(grid_seat(), 0..64)) {
            let mut selection = Selection::new(3);
            for seat in clicks {
                let _ = selection.toggle(seat);
            }
            let mut unique = selection.seats().to_vec();
            unique.sort();
            unique.dedup();
            prop_assert_eq!(unique.len(), selection.len());
        }
    }
}
