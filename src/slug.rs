use regex::Regex;

use crate::error::{Error, Result};

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^\w\s-]").unwrap();
    static ref SEPARATORS: Regex = Regex::new(r"[-_\s]+").unwrap();
    // matches both /list/ls012345678/ and ur12345678
    static ref LIST_OR_USER_ID: Regex = Regex::new(r"(?mi)..\d{6,}").unwrap();
}

/// Convert to lowercase ASCII with hyphens instead of underscores or spaces.
///
/// Non-ASCII text is transliterated first, then everything that is not
/// alphanumeric, whitespace or a hyphen is dropped.
pub fn slugify(s: &str) -> String {
    let ascii = deunicode::deunicode(s);
    let stripped = NON_WORD.replace_all(&ascii, "");
    let lowered = stripped.trim().to_lowercase();
    SEPARATORS.replace_all(&lowered, "-").into_owned()
}

/// Turn a list into `{LIST_OR_USER_ID}_{TITLE_SLUG}.csv`.
///
/// Two lists whose id fragment and slug coincide get the same name; nothing
/// here deduplicates them.
pub fn export_filename(path: &str, title: &str) -> Result<String> {
    let id = LIST_OR_USER_ID
        .find(path)
        .ok_or_else(|| Error::IdentityNotFound {
            path: path.to_owned(),
            title: title.to_owned(),
        })?;
    Ok(format!("{}_{}.csv", id.as_str(), slugify(title)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_strips_diacritics_and_punctuation() {
        assert_eq!(slugify("Café Müller!"), "cafe-muller");
        assert_eq!(slugify("  Best of 2019 -- Part_2  "), "best-of-2019-part-2");
        assert_eq!(slugify("Two\nLine"), "two-line");
    }

    #[test]
    fn slugify_transliterates_other_scripts() {
        let slug = slugify("Москва");
        assert!(!slug.is_empty());
        assert!(slug.is_ascii());
    }

    #[test]
    fn slugify_is_idempotent() {
        for s in &[
            "Café Müller!",
            "Sci-Fi",
            "  leading and trailing  ",
            "under_score__and--dash",
            "Twin Peaks: The Return (2017)",
            "東京物語",
            "tail_",
            "",
        ] {
            let once = slugify(s);
            assert_eq!(slugify(&once), once, "input {:?}", s);
        }
    }

    #[test]
    fn export_filename_from_list_path() {
        assert_eq!(
            export_filename("/list/ls123456789/", "Sci-Fi").unwrap(),
            "ls123456789_sci-fi.csv"
        );
    }

    #[test]
    fn export_filename_from_user_id() {
        assert_eq!(
            export_filename("ur12345678", "Ratings").unwrap(),
            "ur12345678_ratings.csv"
        );
    }

    #[test]
    fn export_filename_without_id_fails() {
        match export_filename("short/path", "Title") {
            Err(Error::IdentityNotFound { path, title }) => {
                assert_eq!(path, "short/path");
                assert_eq!(title, "Title");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn export_filename_error_names_path_and_title() {
        let err = export_filename("/list/ls12/", "Tiny").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("/list/ls12/"));
        assert!(msg.contains("Tiny"));
    }

    #[test]
    fn colliding_titles_share_a_filename() {
        let a = export_filename("/list/ls1000001/", "Horror!").unwrap();
        let b = export_filename("/list/ls1000001/", "horror").unwrap();
        assert_eq!(a, b);
    }
}
