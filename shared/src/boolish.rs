/// Recognizes the boolean-like tokens used across the facility's CSV exports.
///
/// Deployments vary in the language of their spreadsheet tooling; `true`,
/// `"TRUE"`, `"有"`, and `"あり"` all mean "yes" in the columns that use this
/// convention (`active`, `night_exempt`, `suction_qualified`, ...). Anything
/// else, including an empty cell, is `false`.
pub fn parse_bool_like(raw: &str) -> bool {
    matches!(raw.trim(), "true" | "TRUE" | "有" | "あり")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_every_documented_token() {
        for token in ["true", "TRUE", "有", "あり"] {
            assert!(parse_bool_like(token), "expected {token:?} to be true");
        }
    }

    #[test]
    fn rejects_anything_else() {
        for token in ["false", "FALSE", "無", "", "1", "yes"] {
            assert!(!parse_bool_like(token), "expected {token:?} to be false");
        }
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert!(parse_bool_like("  true  "));
    }
}
