//! Defensive decoding of `git show` commit metadata

use crate::commit::CommitInfo;
use crate::date::Date;
use crate::error::{Error, Result};

/// Decode one unit of `git show` output into a [`CommitInfo`].
///
/// The expected shape, in order:
///
/// ```text
/// commit <hex id>
/// Merge: <parent> <parent>      (optional)
/// Author: <name> <email>
/// Date:   <weekday> <mon> <day> <hh>:<mm>:<ss> <year> <tz>
/// ```
///
/// The `commit`, `Author:` and `Date:` lines are mandatory; a `Merge:`
/// line, when present, shifts the author line down by one. Any missing
/// mandatory line or undecodable token is a structural failure of the
/// repository's history, not a transient condition, and aborts the
/// enclosing history discovery.
pub fn parse_commit_record(output: &str) -> Result<CommitInfo> {
    let mut lines = output.lines();

    let first = lines
        .next()
        .ok_or_else(|| Error::CommitLogParse("empty commit record".to_string()))?;
    let id = parse_commit_line(first)?;

    let mut line = lines
        .next()
        .ok_or_else(|| Error::CommitLogParse("commit record truncated after id".to_string()))?;
    if line.starts_with("Merge:") {
        line = lines.next().ok_or_else(|| {
            Error::CommitLogParse("commit record truncated after Merge: line".to_string())
        })?;
    }

    let author = line
        .strip_prefix("Author:")
        .ok_or_else(|| Error::CommitLogParse(format!("expected Author: line, got '{}'", line)))?
        .trim()
        .to_string();

    let date_line = lines
        .next()
        .ok_or_else(|| Error::CommitLogParse("commit record missing Date: line".to_string()))?;
    let date = parse_date_line(date_line)?;

    Ok(CommitInfo::new(id, author, date))
}

fn parse_commit_line(line: &str) -> Result<String> {
    let hex = line
        .strip_prefix("commit ")
        .ok_or_else(|| Error::CommitLogParse(format!("expected commit line, got '{}'", line)))?
        .split_whitespace()
        .next()
        .unwrap_or("");
    if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::CommitLogParse(format!(
            "unparsable commit id '{}'",
            hex
        )));
    }
    Ok(hex.to_ascii_lowercase())
}

/// Tokenize a `Date:` line on whitespace and colons:
/// `Date:   Thu Apr 9 18:01:14 2020 +0300` becomes
/// `[Date, Thu, Apr, 9, 18, 01, 14, 2020, +0300]`.
fn parse_date_line(line: &str) -> Result<Date> {
    if !line.starts_with("Date:") {
        return Err(Error::CommitLogParse(format!(
            "expected Date: line, got '{}'",
            line
        )));
    }
    let tokens: Vec<&str> = line
        .split(|c: char| c.is_whitespace() || c == ':')
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.len() < 8 {
        return Err(Error::CommitLogParse(format!(
            "malformed Date: line '{}'",
            line
        )));
    }

    // tokens[1] is the weekday name, which the date does not need
    let month = Date::decode_month(tokens[2])?;
    let day = parse_field(tokens[3], line)?;
    let hour = parse_field(tokens[4], line)?;
    let minute = parse_field(tokens[5], line)?;
    let second = parse_field(tokens[6], line)?;
    let year: i32 = tokens[7]
        .parse()
        .map_err(|_| Error::CommitLogParse(format!("unparsable year in '{}'", line)))?;

    Ok(Date::new(year, month, day, hour, minute, second))
}

fn parse_field(token: &str, line: &str) -> Result<u32> {
    token.parse().map_err(|_| {
        Error::CommitLogParse(format!("unparsable date token '{}' in '{}'", token, line))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const PLAIN: &str = "\
commit 1f9a8c77e4b2d05a3c6e0f4b8d12a9c3e5f7b601
Author: Alice Example <alice@example.com>
Date:   Thu Apr 9 18:01:14 2020 +0300

    Add longitudinal sampling
";

    const MERGE: &str = "\
commit abcdef0123456789abcdef0123456789abcdef01
Merge: 1f9a8c7 77e4b2d
Author: Bob Example <bob@example.com>
Date:   Fri May 1 09:30:00 2020 +0000

    Merge branch 'feature'
";

    #[test]
    fn test_parse_plain_record() {
        let info = parse_commit_record(PLAIN).unwrap();
        assert_eq!(info.id(), "1f9a8c77e4b2d05a3c6e0f4b8d12a9c3e5f7b601");
        assert_eq!(info.author(), "Alice Example <alice@example.com>");
        assert_eq!(info.date(), Date::new(2020, 4, 9, 18, 1, 14));
    }

    #[test]
    fn test_merge_line_shifts_author_line() {
        let info = parse_commit_record(MERGE).unwrap();
        assert_eq!(info.author(), "Bob Example <bob@example.com>");
        assert_eq!(info.date(), Date::new(2020, 5, 1, 9, 30, 0));
    }

    #[test]
    fn test_uppercase_id_is_normalized() {
        let record = PLAIN.replace(
            "1f9a8c77e4b2d05a3c6e0f4b8d12a9c3e5f7b601",
            "1F9A8C77E4B2D05A3C6E0F4B8D12A9C3E5F7B601",
        );
        let info = parse_commit_record(&record).unwrap();
        assert_eq!(info.id(), "1f9a8c77e4b2d05a3c6e0f4b8d12a9c3e5f7b601");
    }

    #[test]
    fn test_missing_author_line_is_fatal() {
        let record = "\
commit 1f9a8c77e4b2d05a3c6e0f4b8d12a9c3e5f7b601
Date:   Thu Apr 9 18:01:14 2020 +0300
";
        let err = parse_commit_record(record).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CommitLogParse);
    }

    #[test]
    fn test_missing_date_line_is_fatal() {
        let record = "\
commit 1f9a8c77e4b2d05a3c6e0f4b8d12a9c3e5f7b601
Author: Alice <alice@example.com>
";
        let err = parse_commit_record(record).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CommitLogParse);
    }

    #[test]
    fn test_non_hex_id_is_fatal() {
        let record = PLAIN.replace(
            "1f9a8c77e4b2d05a3c6e0f4b8d12a9c3e5f7b601",
            "not-a-hash",
        );
        let err = parse_commit_record(&record).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CommitLogParse);
    }

    #[test]
    fn test_bad_month_token_is_fatal() {
        let record = PLAIN.replace("Apr", "Avr");
        let err = parse_commit_record(&record).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CommitLogParse);
        assert!(format!("{}", err).contains("Avr"));
    }

    #[test]
    fn test_truncated_date_line_is_fatal() {
        let record = PLAIN.replace("Thu Apr 9 18:01:14 2020 +0300", "Thu Apr 9");
        let err = parse_commit_record(&record).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CommitLogParse);
    }

    #[test]
    fn test_empty_record_is_fatal() {
        assert!(parse_commit_record("").is_err());
    }
}
