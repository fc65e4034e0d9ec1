pub mod accounts;
pub mod booking;
pub mod history;
pub mod payment;
pub mod pricing;
pub mod seat_session;
pub mod selection;

pub use accounts::{AccountError, AccountService, SignupRequest};
pub use booking::{BookingError, BookingService};
pub use history::{BookingHistory, HistoryReader};
pub use payment::PaymentForm;
pub use pricing::PriceCalculator;
pub use seat_session::{SeatSession, SeatSessionService, SessionError, SessionView};
pub use selection::{Selection, SelectionError, Toggle};
