//! Cookie header parsing.

/// Extract the `userId` value from a `Cookie` request header.
///
/// Anything malformed -- missing header, stray pairs, empty value -- is
/// treated as "no session" and yields `None`; this path never errors.
pub fn user_id_from_cookie(header: Option<&str>) -> Option<String> {
    let header = header?;
    header
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name.trim() == "userId").then(|| value.trim().to_string())
        })
        .find(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_user_id_among_other_cookies() {
        let header = "theme=dark; userId=abc-123; lang=en";
        assert_eq!(user_id_from_cookie(Some(header)), Some("abc-123".into()));
    }

    #[test]
    fn missing_header_is_no_session() {
        assert_eq!(user_id_from_cookie(None), None);
    }

    #[test]
    fn malformed_pairs_are_ignored() {
        assert_eq!(user_id_from_cookie(Some("garbage")), None);
        assert_eq!(user_id_from_cookie(Some("userId=")), None);
        assert_eq!(user_id_from_cookie(Some(";;;=;;")), None);
    }

    #[test]
    fn whitespace_is_trimmed() {
        assert_eq!(user_id_from_cookie(Some("  userId = u1 ")), Some("u1".into()));
    }
}
