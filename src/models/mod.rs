pub mod booking;
pub mod movie;
pub mod profile;
pub mod seat;
pub mod showing;
pub mod user;

pub use booking::{Booking, NewBooking};
pub use movie::{Movie, NOW_SHOWING};
pub use profile::Profile;
pub use seat::{SeatError, SeatGrid, SeatId};
pub use showing::Showing;
pub use user::{NewUser, User};
