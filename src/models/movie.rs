use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Movie {
    pub title: &'static str,
    pub poster: &'static str,
    pub show_times: &'static [&'static str],
}

// Афиша: фиксированный список фильмов и сеансов
pub const NOW_SHOWING: &[Movie] = &[
    Movie {
        title: "RRR",
        poster: "rrr",
        show_times: &["Screen 2 - 10:00 AM", "Screen 1 - 1:00 PM", "Screen 3 - 5:30 PM"],
    },
    Movie {
        title: "Pushpa 2",
        poster: "pushpa2",
        show_times: &["Screen 3 - 11:30 AM", "Screen 2 - 2:30 PM", "Screen 1 - 7:30 PM"],
    },
    Movie {
        title: "Salaar",
        poster: "salaar",
        show_times: &["Screen 1 - 10:45 AM", "Screen 2 - 3:15 PM", "Screen 3 - 8:00 PM"],
    },
    Movie {
        title: "Barbie",
        poster: "barbie",
        show_times: &["Screen 1 - 10:00 AM", "Screen 2 - 1:00 PM", "Screen 3 - 5:00 PM"],
    },
    Movie {
        title: "Dune Part 2",
        poster: "dune2",
        show_times: &["Screen 2 - 9:00 AM", "Screen 1 - 12:00 PM", "Screen 3 - 4:00 PM"],
    },
];
