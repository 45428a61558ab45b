use crate::error::{CoreError, Result};

/// One bias category on the fact-check site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub id: u8,
    pub url: &'static str,
    pub title: &'static str,
}

/// The nine fixed categories, addressed by the digits 1-9 in a selection
/// string.
pub const CATALOG: [Category; 9] = [
    Category {
        id: 1,
        url: "https://mediabiasfactcheck.com/left/",
        title: "Left Bias",
    },
    Category {
        id: 2,
        url: "https://mediabiasfactcheck.com/leftcenter/",
        title: "Left-Center Bias",
    },
    Category {
        id: 3,
        url: "https://mediabiasfactcheck.com/center/",
        title: "Least Biased",
    },
    Category {
        id: 4,
        url: "https://mediabiasfactcheck.com/right-center/",
        title: "Right-Center Bias",
    },
    Category {
        id: 5,
        url: "https://mediabiasfactcheck.com/right/",
        title: "Right Bias",
    },
    Category {
        id: 6,
        url: "https://mediabiasfactcheck.com/pro-science/",
        title: "Pro-Science",
    },
    Category {
        id: 7,
        url: "https://mediabiasfactcheck.com/conspiracy/",
        title: "Conspiracy-Pseudoscience",
    },
    Category {
        id: 8,
        url: "https://mediabiasfactcheck.com/fake-news/",
        title: "Questionable Sources",
    },
    Category {
        id: 9,
        url: "https://mediabiasfactcheck.com/satire/",
        title: "Satire",
    },
];

pub fn by_id(id: u8) -> Option<&'static Category> {
    CATALOG.iter().find(|c| c.id == id)
}

/// Parse a selection string like "158" into categories, preserving order
/// and dropping repeats. Fails before any network activity on anything
/// that is not a digit 1-9.
pub fn parse_selection(input: &str) -> Result<Vec<&'static Category>> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CoreError::Selection("empty selection".to_string()));
    }

    let mut selected = Vec::new();
    for ch in input.chars() {
        let category = ch
            .to_digit(10)
            .and_then(|d| u8::try_from(d).ok())
            .and_then(by_id)
            .ok_or_else(|| {
                CoreError::Selection(format!("'{}' does not name a category (use 1-9)", ch))
            })?;
        if !selected.iter().any(|c: &&Category| c.id == category.id) {
            selected.push(category);
        }
    }
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_nine_distinct_categories() {
        assert_eq!(CATALOG.len(), 9);
        for (i, c) in CATALOG.iter().enumerate() {
            assert_eq!(c.id as usize, i + 1);
            assert!(c.url.starts_with("https://mediabiasfactcheck.com/"));
        }
    }

    #[test]
    fn test_parse_selection_preserves_order_and_dedupes() {
        let selected = parse_selection("1581").unwrap();
        let ids: Vec<u8> = selected.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 5, 8]);
    }

    #[test]
    fn test_parse_selection_rejects_bad_input() {
        assert!(parse_selection("").is_err());
        assert!(parse_selection("0").is_err());
        assert!(parse_selection("1a5").is_err());
    }
}
