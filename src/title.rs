use crate::models::{NormalizedMovie, RawMovieRecord};

pub fn normalize(raw: RawMovieRecord) -> NormalizedMovie {
    let year = extract_year(&raw.title);
    let clean_title = clean_title(&raw.title);
    NormalizedMovie { movie_id: raw.movie_id, title: raw.title, genres: raw.genres, year, clean_title }
}

/// First `(YYYY)` group anywhere in the title.
pub fn extract_year(title: &str) -> Option<i32> {
    title
        .as_bytes()
        .windows(6)
        .find(|w| is_year_group(w))
        .and_then(|w| std::str::from_utf8(&w[1..5]).ok()?.parse().ok())
}

/// Drops a trailing `(YYYY)` and the whitespace around it; anything else is only trimmed.
pub fn clean_title(title: &str) -> String {
    let s = title.trim_end();
    let bytes = s.as_bytes();
    if bytes.len() >= 6 && is_year_group(&bytes[bytes.len() - 6..]) {
        s[..s.len() - 6].trim().to_string()
    } else {
        title.trim().to_string()
    }
}

fn is_year_group(w: &[u8]) -> bool {
    w.len() == 6 && w[0] == b'(' && w[5] == b')' && w[1..5].iter().all(u8::is_ascii_digit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_year_is_split_off() {
        assert_eq!(extract_year("Toy Story (1995)"), Some(1995));
        assert_eq!(clean_title("Toy Story (1995)"), "Toy Story");
        assert_eq!(clean_title("  Heat   (1995)  "), "Heat");
    }

    #[test]
    fn only_the_last_parenthetical_is_removed() {
        let title = "City of Lost Children, The (Cité des enfants perdus, La) (1995)";
        assert_eq!(extract_year(title), Some(1995));
        assert_eq!(clean_title(title), "City of Lost Children, The (Cité des enfants perdus, La)");
    }

    #[test]
    fn year_in_the_middle_is_extracted_but_kept() {
        let title = "Movie (1995) Director's Cut";
        assert_eq!(extract_year(title), Some(1995));
        assert_eq!(clean_title(title), title);
    }

    #[test]
    fn first_year_group_wins() {
        assert_eq!(extract_year("Remake (1960) (2001)"), Some(1960));
        assert_eq!(clean_title("Remake (1960) (2001)"), "Remake (1960)");
    }

    #[test]
    fn titles_without_a_year() {
        assert_eq!(extract_year("Babylon 5"), None);
        assert_eq!(clean_title(" Babylon 5 "), "Babylon 5");
        assert_eq!(extract_year("Short (95)"), None);
        assert_eq!(clean_title("Short (95)"), "Short (95)");
        assert_eq!(extract_year("(12345)"), None);
        assert_eq!(extract_year(""), None);
        assert_eq!(clean_title(""), "");
    }

    #[test]
    fn a_bare_year_title_cleans_to_empty() {
        assert_eq!(extract_year("(2004)"), Some(2004));
        assert_eq!(clean_title("(2004)"), "");
    }

    #[test]
    fn normalize_keeps_the_raw_title() {
        let movie = normalize(RawMovieRecord {
            movie_id: 1,
            title: "Toy Story (1995)".to_string(),
            genres: Some("Adventure|Animation".to_string()),
        });
        assert_eq!(movie.title, "Toy Story (1995)");
        assert_eq!(movie.clean_title, "Toy Story");
        assert_eq!(movie.year, Some(1995));
        assert_eq!(movie.genres.as_deref(), Some("Adventure|Animation"));
    }
}
