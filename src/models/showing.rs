use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Сеанс: название фильма и подпись времени показа.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Showing {
    #[validate(custom(function = "not_blank", message = "movie_title must not be empty"))]
    pub movie_title: String,
    #[validate(custom(function = "not_blank", message = "show_time must not be empty"))]
    pub show_time: String,
}

impl Showing {
    pub fn new(movie_title: impl Into<String>, show_time: impl Into<String>) -> Self {
        Self {
            movie_title: movie_title.into(),
            show_time: show_time.into(),
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_fail_validation() {
        assert!(Showing::new("RRR", "Screen 2 - 10:00 AM").validate().is_ok());

        let errors = Showing::new("  ", "").validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("movie_title"));
        assert!(fields.contains_key("show_time"));
    }
}
