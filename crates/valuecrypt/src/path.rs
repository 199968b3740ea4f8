//! Associated data derived from a value's location in its document.

/// Build the associated data for a value reached through `segments`.
///
/// Every segment is followed by `:`, so `["complex", "value"]` yields
/// `complex:value:` and an empty path yields the empty string. Callers omit
/// array positions.
pub fn additional_data_for<I, P>(segments: I) -> String
where
    I: IntoIterator<Item = P>,
    P: AsRef<str>,
{
    segments.into_iter().fold(String::new(), |mut aad, segment| {
        aad.push_str(segment.as_ref());
        aad.push(':');
        aad
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_level_key() {
        assert_eq!(additional_data_for(["secret"]), "secret:");
    }

    #[test]
    fn nested_keys() {
        assert_eq!(additional_data_for(["complex", "value"]), "complex:value:");
    }

    #[test]
    fn empty_path() {
        assert_eq!(additional_data_for(Vec::<String>::new()), "");
    }

    #[test]
    fn accepts_owned_segments() {
        let path = vec!["db".to_owned(), "password".to_owned()];
        assert_eq!(additional_data_for(&path), "db:password:");
    }
}
