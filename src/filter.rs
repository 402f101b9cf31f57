//! Recipient filtering.

/// True when `recipient` belongs to `domain`: case-insensitive suffix match
/// against `"@" + domain`. No wildcard or multi-domain support.
pub fn matches_domain(recipient: &str, domain: &str) -> bool {
    recipient
        .to_lowercase()
        .ends_with(&format!("@{}", domain.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_domain_matches() {
        assert!(matches_domain("user@rbios.net", "rbios.net"));
    }

    #[test]
    fn match_is_case_insensitive() {
        assert!(matches_domain("User@RBIOS.NET", "rbios.net"));
        assert!(matches_domain("user@rbios.net", "RBIOS.net"));
    }

    #[test]
    fn other_domain_does_not_match() {
        assert!(!matches_domain("user@other.com", "rbios.net"));
    }

    #[test]
    fn suffix_requires_the_at_sign() {
        // "trbios.net" ends with "rbios.net" but not with "@rbios.net".
        assert!(!matches_domain("user@notrbios.net", "rbios.net"));
    }

    #[test]
    fn subdomain_does_not_match() {
        assert!(!matches_domain("user@mail.rbios.net", "rbios.net"));
    }
}
