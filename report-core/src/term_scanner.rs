//! Vocabulary annotation of free-form report prose.
//!
//! [`annotate`] splits a text into plain and explainable runs. Terms are
//! applied in vocabulary order against the accumulating result: a region
//! claimed by an earlier term is never searched again, so spans never overlap
//! and the first-registered term wins. Concatenating the spans reproduces the
//! input byte for byte.

use crate::vocabulary::Vocabulary;

/// A contiguous run of report text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotatedSpan {
    Plain(String),
    /// An occurrence of a vocabulary term; the text *is* the term.
    Explainable(String),
}

impl AnnotatedSpan {
    pub fn text(&self) -> &str {
        match self {
            AnnotatedSpan::Plain(s) | AnnotatedSpan::Explainable(s) => s,
        }
    }

    pub fn term(&self) -> Option<&str> {
        match self {
            AnnotatedSpan::Explainable(t) => Some(t),
            AnnotatedSpan::Plain(_) => None,
        }
    }
}

/// Reassembles the original text from its spans.
pub fn concat(spans: &[AnnotatedSpan]) -> String {
    spans.iter().map(AnnotatedSpan::text).collect()
}

#[derive(Debug, Clone, Copy)]
struct Region {
    start: usize,
    end: usize,
    /// Index into the vocabulary once claimed.
    term: Option<usize>,
}

/// Annotates `text` with whole-word, case-sensitive occurrences of `vocabulary`.
///
/// An absent text is the caller's empty string; it yields no spans.
pub fn annotate(text: &str, vocabulary: &Vocabulary) -> Vec<AnnotatedSpan> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut regions = vec![Region {
        start: 0,
        end: text.len(),
        term: None,
    }];

    for (idx, term) in vocabulary.terms().iter().enumerate() {
        let mut next = Vec::with_capacity(regions.len());
        for region in regions {
            if region.term.is_some() {
                next.push(region);
            } else {
                claim_occurrences(text, region, term, idx, &mut next);
            }
        }
        regions = next;
    }

    regions
        .into_iter()
        .map(|r| match r.term {
            Some(idx) => AnnotatedSpan::Explainable(vocabulary.terms()[idx].clone()),
            None => AnnotatedSpan::Plain(text[r.start..r.end].to_string()),
        })
        .collect()
}

/// Splits one unclaimed region around every whole-word occurrence of `term`.
fn claim_occurrences(text: &str, region: Region, term: &str, idx: usize, out: &mut Vec<Region>) {
    let mut plain_from = region.start;
    let mut pos = region.start;

    while pos < region.end {
        let Some(found) = text[pos..region.end].find(term) else {
            break;
        };
        let at = pos + found;
        let until = at + term.len();

        if is_whole_word(text, at, until) {
            if at > plain_from {
                out.push(Region {
                    start: plain_from,
                    end: at,
                    term: None,
                });
            }
            out.push(Region {
                start: at,
                end: until,
                term: Some(idx),
            });
            plain_from = until;
            pos = until;
        } else {
            // Retry one character further; a later overlapping start may still qualify.
            pos = at + text[at..].chars().next().map_or(1, char::len_utf8);
        }
    }

    if plain_from < region.end {
        out.push(Region {
            start: plain_from,
            end: region.end,
            term: None,
        });
    }
}

/// Word boundaries are judged against the full text, not the region.
fn is_whole_word(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn vocab(terms: &[&str]) -> Vocabulary {
        Vocabulary::new(terms.iter().copied()).expect("vocabulary")
    }

    fn terms_of(spans: &[AnnotatedSpan]) -> Vec<&str> {
        spans.iter().filter_map(AnnotatedSpan::term).collect()
    }

    #[test]
    fn marks_korean_terms_between_plain_runs() {
        let spans = annotate("하부 누유 및 판금 흔적", &vocab(&["누유", "판금"]));
        assert_eq!(
            spans,
            vec![
                AnnotatedSpan::Plain("하부 ".into()),
                AnnotatedSpan::Explainable("누유".into()),
                AnnotatedSpan::Plain(" 및 ".into()),
                AnnotatedSpan::Explainable("판금".into()),
                AnnotatedSpan::Plain(" 흔적".into()),
            ]
        );
    }

    #[test]
    fn earlier_term_protects_its_region() {
        let spans = annotate("엔진 미세누유 확인", &Vocabulary::default());
        assert_eq!(terms_of(&spans), vec!["미세누유"]);
        assert_eq!(concat(&spans), "엔진 미세누유 확인");
    }

    #[test]
    fn later_term_does_not_rewrap_inside_claimed_region() {
        // "주요 골격" is claimed first; "골격" must not be annotated inside it.
        let spans = annotate("주요 골격 손상, 골격 수리", &vocab(&["주요 골격", "골격"]));
        assert_eq!(terms_of(&spans), vec!["주요 골격", "골격"]);
        assert_eq!(concat(&spans), "주요 골격 손상, 골격 수리");
    }

    #[test]
    fn requires_whole_words() {
        let v = vocab(&["DPF", "누유"]);
        assert!(terms_of(&annotate("DPFs and XDPF", &v)).is_empty());
        assert!(terms_of(&annotate("누유가 있음", &v)).is_empty());
        assert_eq!(terms_of(&annotate("(DPF), DPF.", &v)), vec!["DPF", "DPF"]);
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert!(terms_of(&annotate("dpf Dpf", &vocab(&["DPF"]))).is_empty());
    }

    #[test]
    fn adjacent_terms_are_both_marked() {
        let spans = annotate("DPF/DCT", &vocab(&["DCT", "DPF"]));
        assert_eq!(
            spans,
            vec![
                AnnotatedSpan::Explainable("DPF".into()),
                AnnotatedSpan::Plain("/".into()),
                AnnotatedSpan::Explainable("DCT".into()),
            ]
        );
    }

    #[test]
    fn overlapping_candidate_after_failed_boundary_is_found() {
        // The candidate at byte 1 is glued to 'x'; the one starting at byte 3 qualifies.
        let spans = annotate("xa a a", &vocab(&["a a"]));
        assert_eq!(
            spans,
            vec![
                AnnotatedSpan::Plain("xa ".into()),
                AnnotatedSpan::Explainable("a a".into()),
            ]
        );
    }

    #[test]
    fn empty_text_yields_no_spans() {
        assert!(annotate("", &Vocabulary::default()).is_empty());
    }

    #[test]
    fn is_deterministic() {
        let v = Vocabulary::default();
        let text = "DCT 교환 이력, 침수 흔적 없음";
        assert_eq!(annotate(text, &v), annotate(text, &v));
    }

    fn prose() -> impl Strategy<Value = String> {
        let piece = prop_oneof![
            prop::sample::select(DEFAULT_PIECES.to_vec()).prop_map(str::to_string),
            "[a-zA-Z0-9 ,./()_-]{0,4}",
        ];
        prop::collection::vec(piece, 0..16).prop_map(|parts| parts.concat())
    }

    const DEFAULT_PIECES: [&str; 14] = [
        "미세누유", "누유", "판금", "용접", "주요 골격", "골격", "DPF", "DCT", "MDPS", " ", "하부",
        "및", "세", "가",
    ];

    proptest! {
        #[test]
        fn spans_reassemble_the_input(text in prose()) {
            let spans = annotate(&text, &Vocabulary::default());
            prop_assert_eq!(concat(&spans), text);
        }

        #[test]
        fn arbitrary_unicode_is_lossless(text in ".{0,64}") {
            let spans = annotate(&text, &Vocabulary::default());
            prop_assert_eq!(concat(&spans), text);
        }

        #[test]
        fn spans_are_non_empty_and_terms_come_from_vocabulary(text in prose()) {
            let v = Vocabulary::default();
            let spans = annotate(&text, &v);
            for span in &spans {
                prop_assert!(!span.text().is_empty());
                if let Some(term) = span.term() {
                    prop_assert!(v.contains(term));
                }
            }
            // Adjacent plain runs would mean a split that claimed nothing.
            for pair in spans.windows(2) {
                prop_assert!(!(pair[0].term().is_none() && pair[1].term().is_none()));
            }
        }
    }
}
