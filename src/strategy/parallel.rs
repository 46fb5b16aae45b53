//! Parallel Part Filling
//!
//! Uses Rayon to fill independent document parts (body, headers, footers)
//! at once, sharing one processor and one resolver.

use rayon::prelude::*;

use crate::error::Result;
use crate::replace::{Processor, Replaced, Report};
use crate::resolve::Resolve;

/// One document part to fill
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Name the host knows the part by, such as `word/header1.xml`
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Part {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Part {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Outcome for one part, in input order
#[derive(Debug)]
pub struct PartResult {
    pub name: String,
    pub result: Result<Replaced>,
}

impl PartResult {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Fill parts in parallel
///
/// Each part succeeds or fails on its own; results keep the input order.
pub fn replace_parts<R>(processor: &Processor, parts: &[Part], resolver: &R) -> Vec<PartResult>
where
    R: Resolve + Sync + ?Sized,
{
    parts
        .par_iter()
        .map(|part| PartResult {
            name: part.name.clone(),
            result: processor.replace_part(&part.bytes, resolver),
        })
        .collect()
}

/// Sum of the reports of every successful part
pub fn total_report(results: &[PartResult]) -> Report {
    results
        .iter()
        .filter_map(|r| r.result.as_ref().ok())
        .fold(Report::default(), |mut total, replaced| {
            total += replaced.report;
            total
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::ModelResolver;

    fn part(name: &str, text: &str) -> Part {
        let xml = format!("<w:hdr><w:p><w:r><w:t>{text}</w:t></w:r></w:p></w:hdr>");
        Part::new(name, xml)
    }

    #[test]
    fn test_parallel_fill_keeps_order() {
        let resolver = ModelResolver::new(serde_json::json!({ "n": 7 }));
        let parts: Vec<_> = (0..16).map(|i| part(&format!("header{i}.xml"), "p{{n}}")).collect();

        let results = replace_parts(&Processor::default(), &parts, &resolver);
        assert_eq!(results.len(), 16);
        for (i, r) in results.iter().enumerate() {
            assert_eq!(r.name, format!("header{i}.xml"));
            let bytes = &r.result.as_ref().unwrap().bytes;
            assert_eq!(bytes.as_slice(), b"<w:hdr><w:p><w:r><w:t>p7</w:t></w:r></w:p></w:hdr>");
        }
        assert_eq!(total_report(&results).replaced, 16);
    }

    #[test]
    fn test_failure_is_isolated() {
        let parts = vec![
            part("good.xml", "{{n}}"),
            Part::new("bad.xml", "<w:hdr><!-- no --></w:hdr>"),
            part("open.xml", "{{n"),
        ];
        let resolver = |_: &str| Some("1".to_string());
        let results = replace_parts(&Processor::default(), &parts, &resolver);

        assert!(results[0].is_ok());
        assert!(!results[1].is_ok());
        assert!(!results[2].is_ok());
        assert_eq!(total_report(&results).replaced, 1);
    }
}
