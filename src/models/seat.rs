use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Максимум рядов: ряды обозначаются буквами A..Z.
pub const MAX_ROWS: u8 = 26;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeatError {
    #[error("grid dimensions must be positive and rows <= {MAX_ROWS}, got {rows}x{columns}")]
    InvalidGrid { rows: u8, columns: u8 },
    #[error("malformed seat identifier {0:?}")]
    Malformed(String),
}

/// Место в зале: буква ряда и номер кресла с единицы, например "B4".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SeatId {
    row: u8,
    column: u8,
}

impl SeatId {
    /// `row_index` с нуля, `column` с единицы.
    pub fn new(row_index: u8, column: u8) -> Result<Self, SeatError> {
        if row_index >= MAX_ROWS || column == 0 {
            return Err(SeatError::Malformed(format!("{row_index}:{column}")));
        }
        Ok(Self { row: row_index, column })
    }

    pub fn row_index(&self) -> u8 {
        self.row
    }

    pub fn row_label(&self) -> char {
        char::from(b'A' + self.row)
    }

    pub fn column(&self) -> u8 {
        self.column
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row_label(), self.column)
    }
}

impl FromStr for SeatId {
    type Err = SeatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || SeatError::Malformed(s.to_string());
        let mut chars = s.chars();
        let letter = chars.next().ok_or_else(malformed)?;
        if !letter.is_ascii_uppercase() {
            return Err(malformed());
        }
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) || digits.starts_with('0') {
            return Err(malformed());
        }
        let column: u8 = digits.parse().map_err(|_| malformed())?;
        SeatId::new(letter as u8 - b'A', column).map_err(|_| malformed())
    }
}

impl TryFrom<String> for SeatId {
    type Error = SeatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SeatId> for String {
    fn from(seat: SeatId) -> Self {
        seat.to_string()
    }
}

/// Неизменяемая сетка мест одного сеанса.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatGrid {
    rows: u8,
    columns: u8,
}

impl SeatGrid {
    pub fn new(rows: u8, columns: u8) -> Result<Self, SeatError> {
        if rows == 0 || columns == 0 || rows > MAX_ROWS {
            return Err(SeatError::InvalidGrid { rows, columns });
        }
        Ok(Self { rows, columns })
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn columns(&self) -> u8 {
        self.columns
    }

    pub fn len(&self) -> usize {
        usize::from(self.rows) * usize::from(self.columns)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, seat: &SeatId) -> bool {
        seat.row < self.rows && seat.column <= self.columns
    }

    /// Все места по рядам: A1, A2, ..., затем B1 и так далее.
    pub fn seats(&self) -> Vec<SeatId> {
        (0..self.rows)
            .flat_map(|row| (1..=self.columns).map(move |column| SeatId { row, column }))
            .collect()
    }
}
