//! Compression of a visit list into command-line range notation.
//!
//! The inverse of token expansion: a list like [12, 14, 16, 18, 20, 100]
//! becomes "12..20:2^100", the dataId selection syntax consumed by the
//! downstream construct/ingest tools.

use crate::visits::Visit;

/// Convert a list of visits into a string, merging consecutive values.
///
/// Values are sorted, then grouped into runs using a single stride inferred
/// from the smallest gap near the start of the sorted list. The stride is
/// global: a list mixing two natural strides compresses suboptimally (e.g.
/// [1,2,3,10,12,14] -> "1..3^10^12^14"), which downstream tools expect.
pub fn visits_to_string(visits: &[Visit]) -> String {
    if visits.is_empty() {
        return String::new();
    }

    let mut vals = visits.to_vec();
    vals.sort();

    // Minimum spacing between the leading integer values, interpreted as the
    // stride for every run. Stops shrinking once it hits 1.
    let mut stride = 1i64;
    if let [Visit::Id(first), Visit::Id(second), ..] = vals.as_slice() {
        stride = second - first;
        let mut prev = *second;
        for val in &vals[2..] {
            let Visit::Id(n) = val else { break };
            if n - prev < stride {
                stride = n - prev;
            }
            if stride == 1 {
                break;
            }
            prev = *n;
        }
    }

    let mut parts: Vec<String> = Vec::new();
    let mut run_start = vals[0].clone();
    let mut run_end = run_start.clone();
    for val in &vals[1..] {
        let extends =
            matches!((val, &run_end), (Visit::Id(n), Visit::Id(e)) if *n == e + stride);
        if extends {
            run_end = val.clone();
        } else {
            flush_run(&mut parts, &run_start, &run_end, stride);
            run_start = val.clone();
            run_end = run_start.clone();
        }
    }
    flush_run(&mut parts, &run_start, &run_end, stride);

    parts.join("^")
}

/// Append the rendering of one run to `parts`.
///
/// Equal string endpoints have no usable suffix and contribute nothing;
/// distinct string endpoints are rendered with their common prefix stripped.
fn flush_run(parts: &mut Vec<String>, v0: &Visit, v1: &Visit, stride: i64) {
    let (s0, s1) = match (v0, v1) {
        (Visit::Name(a), Visit::Name(b)) => {
            if a == b {
                return;
            }
            let pre = common_prefix_len(a, b);
            (a[pre..].to_string(), b[pre..].to_string())
        }
        _ => (v0.to_string(), v1.to_string()),
    };

    if s0 == s1 {
        parts.push(v0.to_string());
    } else if matches!((v0, v1), (Visit::Id(a), Visit::Id(b)) if *b == a + stride) {
        parts.push(format!("{}^{}", s0, s1));
    } else {
        let mut part = format!("{}..{}", s0, s1);
        if stride > 1 {
            part.push_str(&format!(":{}", stride));
        }
        parts.push(part);
    }
}

/// Byte length of the longest common prefix, on a char boundary of both.
fn common_prefix_len(a: &str, b: &str) -> usize {
    a.char_indices()
        .zip(b.chars())
        .find(|((_, ca), cb)| ca != cb)
        .map(|((i, _), _)| i)
        .unwrap_or_else(|| a.len().min(b.len()))
}
