//! Expansion of visit tokens from the specification document.
//!
//! A token is one entry of a block's `visit`/`visits` fields. Three lexical
//! forms:
//! - bare integer: denotes itself
//! - "start..end[:stride]": inclusive range, stride defaults to 1
//! - any other string: an integer if it parses as one, otherwise an opaque id

use crate::visits::Visit;
use anyhow::{Context, bail};
use regex::Regex;
use serde::Deserialize;

/// Raw token shape as it appears in the YAML document.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum VisitToken {
    Id(i64),
    Text(String),
}

/// Expand one token into the ordered sequence of visits it denotes.
///
/// `"12..20:2"` yields `[12, 14, 16, 18, 20]`. A degenerate range with
/// start > end yields the empty sequence. A string containing `..` that does
/// not match the range grammar is an error, never an opaque id.
pub fn expand_token(token: &VisitToken) -> anyhow::Result<Vec<Visit>> {
    let text = match token {
        VisitToken::Id(n) => return Ok(vec![Visit::Id(*n)]),
        VisitToken::Text(s) => s,
    };

    let re = Regex::new(r"^(\d+)\.\.(\d+)(:\d+)?$")?;
    if let Some(caps) = re.captures(text) {
        let start: i64 = caps[1]
            .parse()
            .with_context(|| format!("bad range start in {:?}", text))?;
        let end: i64 = caps[2]
            .parse()
            .with_context(|| format!("bad range end in {:?}", text))?;
        let stride: i64 = match caps.get(3) {
            Some(m) => m.as_str()[1..]
                .parse()
                .with_context(|| format!("bad stride in {:?}", text))?,
            None => 1,
        };
        if stride == 0 {
            bail!("zero stride in visit range {:?}", text);
        }

        let mut out = Vec::new();
        let mut v = start;
        while v <= end {
            out.push(Visit::Id(v));
            match v.checked_add(stride) {
                Some(next) => v = next,
                None => break,
            }
        }
        return Ok(out);
    }

    if let Ok(n) = text.parse::<i64>() {
        return Ok(vec![Visit::Id(n)]);
    }
    if text.contains("..") {
        bail!("malformed visit range: {:?}", text);
    }
    Ok(vec![Visit::Name(text.clone())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ids(ns: &[i64]) -> Vec<Visit> {
        ns.iter().map(|&n| Visit::Id(n)).collect()
    }

    #[test]
    fn expands_strided_range() {
        let got = expand_token(&VisitToken::Text("12..20:2".into())).unwrap();
        assert_eq!(got, ids(&[12, 14, 16, 18, 20]));
    }

    #[test]
    fn expands_unit_stride_range() {
        let got = expand_token(&VisitToken::Text("1..3".into())).unwrap();
        assert_eq!(got, ids(&[1, 2, 3]));
    }

    #[test]
    fn stride_overshoot_stops_at_end() {
        let got = expand_token(&VisitToken::Text("1..6:4".into())).unwrap();
        assert_eq!(got, ids(&[1, 5]));
    }

    #[test]
    fn bare_integer_tokens() {
        assert_eq!(expand_token(&VisitToken::Id(7)).unwrap(), ids(&[7]));
        let got = expand_token(&VisitToken::Text("42".into())).unwrap();
        assert_eq!(got, ids(&[42]));
    }

    #[test]
    fn opaque_string_passes_through() {
        let got = expand_token(&VisitToken::Text("engineering".into())).unwrap();
        assert_eq!(got, vec![Visit::Name("engineering".into())]);
    }

    #[test]
    fn degenerate_range_is_empty() {
        let got = expand_token(&VisitToken::Text("5..3".into())).unwrap();
        assert_eq!(got, Vec::<Visit>::new());
    }

    #[test]
    fn malformed_range_is_rejected() {
        assert!(expand_token(&VisitToken::Text("12..x".into())).is_err());
        assert!(expand_token(&VisitToken::Text("a..5".into())).is_err());
    }

    #[test]
    fn zero_stride_is_rejected() {
        assert!(expand_token(&VisitToken::Text("12..20:0".into())).is_err());
    }

    #[test]
    fn overflowing_bound_is_rejected() {
        let tok = VisitToken::Text("1..99999999999999999999".into());
        assert!(expand_token(&tok).is_err());
    }

    #[test]
    fn range_ending_at_i64_max_does_not_overflow() {
        let tok = VisitToken::Text("9223372036854775806..9223372036854775807".into());
        let got = expand_token(&tok).unwrap();
        assert_eq!(got, ids(&[i64::MAX - 1, i64::MAX]));
    }
}
