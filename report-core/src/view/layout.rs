//! Section layout of a report as a small element tree.
//!
//! The tree is toolkit-agnostic: a front end walks it and turns each
//! [`Element::Term`] into an interactive element. Clicks are reported back as
//! index paths from the root, see [`term_at`].

use crate::report::{
    AccidentHistory, BasicInfo, MaintenancePrediction, PredictedPrice, ReportSource, RiskBand,
    RiskScore, RisksAndAdvice,
};
use crate::term_scanner::{AnnotatedSpan, annotate};
use crate::vocabulary::Vocabulary;

/// Placeholder for a missing field.
pub const NOT_AVAILABLE: &str = "정보 없음";
/// Notice when nothing usable was supplied.
pub const NO_DATA_NOTICE: &str = "분석 데이터를 표시할 수 없습니다.";
/// Notice for a well-formed report without sections.
pub const EMPTY_NOTICE: &str = "분석된 내용이 없습니다.";
/// Stand-in when an error report has no raw text.
pub const NO_RAW_TEXT: &str = "No raw text available.";

/// What a view renders; exactly one variant at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportLayout {
    NoData { notice: &'static str },
    Failed { error: String, raw_text: String },
    Empty { notice: &'static str },
    Sections(Vec<Element>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    RiskScore,
    BasicInfo,
    AccidentHistory,
    RisksAndAdvice,
    PredictedPrice,
    Maintenance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Section(SectionKind),
    Score(RiskBand),
    /// `label: value` pair.
    Field,
    Paragraph,
    List,
    Item,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Group {
        kind: GroupKind,
        children: Vec<Element>,
    },
    Heading(String),
    Text(String),
    /// Clickable explainable term; children are the term text and a hint marker.
    Term {
        term: String,
        children: Vec<Element>,
    },
    Hint,
}

impl Element {
    pub fn children(&self) -> &[Element] {
        match self {
            Element::Group { children, .. } | Element::Term { children, .. } => children,
            _ => &[],
        }
    }

    /// Concatenated visible text of the subtree (hint markers excluded).
    pub fn text_content(&self) -> String {
        match self {
            Element::Text(s) | Element::Heading(s) => s.clone(),
            Element::Hint => String::new(),
            Element::Group { children, .. } | Element::Term { children, .. } => {
                children.iter().map(Element::text_content).collect()
            }
        }
    }

    /// Every term in the subtree, in document order.
    pub fn terms(&self) -> Vec<&str> {
        let mut out = Vec::new();
        collect_terms(self, &mut out);
        out
    }
}

fn collect_terms<'a>(el: &'a Element, out: &mut Vec<&'a str>) {
    if let Element::Term { term, .. } = el {
        out.push(term);
    }
    for child in el.children() {
        collect_terms(child, out);
    }
}

/// Resolves a click path to the nearest enclosing term.
///
/// `path[0]` indexes the top-level elements, every further index a child of
/// the previous node. Indices past the end of the tree are ignored, so a click
/// on any descendant of a term (or a stale deeper path) still finds it.
pub fn term_at<'a>(roots: &'a [Element], path: &[usize]) -> Option<&'a str> {
    let mut level = roots;
    let mut nearest = None;
    for &i in path {
        let Some(node) = level.get(i) else {
            break;
        };
        if let Element::Term { term, .. } = node {
            nearest = Some(term.as_str());
        }
        level = node.children();
    }
    nearest
}

/// Builds the layout for `source`.
pub fn compose(source: &ReportSource, vocabulary: &Vocabulary) -> ReportLayout {
    let report = match source {
        ReportSource::Missing => {
            return ReportLayout::NoData {
                notice: NO_DATA_NOTICE,
            };
        }
        ReportSource::Failed(e) => {
            return ReportLayout::Failed {
                error: e.error.clone(),
                raw_text: e
                    .raw_text
                    .clone()
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| NO_RAW_TEXT.to_string()),
            };
        }
        ReportSource::Analysed(report) if report.is_empty() => {
            return ReportLayout::Empty {
                notice: EMPTY_NOTICE,
            };
        }
        ReportSource::Analysed(report) => report,
    };

    let b = Builder { vocabulary };
    let mut sections = Vec::new();
    if let Some(s) = &report.risk_score {
        sections.push(b.risk_score(s));
    }
    if let Some(s) = &report.basic_info {
        sections.push(b.basic_info(s));
    }
    if let Some(s) = &report.accident_history {
        sections.push(b.accident_history(s));
    }
    if let Some(s) = &report.risks_and_advice {
        sections.push(b.risks_and_advice(s));
    }
    if let Some(s) = &report.predicted_price {
        sections.push(b.predicted_price(s));
    }
    if let Some(s) = &report.maintenance_prediction {
        sections.push(b.maintenance(s));
    }
    ReportLayout::Sections(sections)
}

struct Builder<'v> {
    vocabulary: &'v Vocabulary,
}

impl Builder<'_> {
    fn prose(&self, text: &str) -> Vec<Element> {
        annotate(text, self.vocabulary)
            .into_iter()
            .map(|span| match span {
                AnnotatedSpan::Plain(s) => Element::Text(s),
                AnnotatedSpan::Explainable(term) => Element::Term {
                    children: vec![Element::Text(term.clone()), Element::Hint],
                    term,
                },
            })
            .collect()
    }

    fn annotated_field(&self, label: &str, value: Option<&str>) -> Element {
        let mut children = vec![Element::Text(format!("{label} "))];
        children.extend(self.prose(value.unwrap_or(NOT_AVAILABLE)));
        group(GroupKind::Field, children)
    }

    fn risk_score(&self, s: &RiskScore) -> Element {
        section(
            SectionKind::RiskScore,
            "AI 위험도 평가",
            vec![
                group(
                    GroupKind::Score(s.band()),
                    vec![
                        text(s.score.as_deref().unwrap_or("?")),
                        text(" / 100점"),
                    ],
                ),
                plain_field("평가 근거:", s.summary.as_deref()),
            ],
        )
    }

    fn basic_info(&self, s: &BasicInfo) -> Element {
        section(
            SectionKind::BasicInfo,
            "차량 기본 정보",
            vec![
                plain_field("차명:", s.model_name.as_deref()),
                plain_field("차량번호:", s.car_number.as_deref()),
                plain_field("연식:", s.year.as_deref()),
                plain_field("주행거리:", s.mileage.as_deref()),
            ],
        )
    }

    fn accident_history(&self, s: &AccidentHistory) -> Element {
        let mut body = Vec::new();
        if let Some(summary) = &s.summary {
            body.push(group(GroupKind::Paragraph, self.prose(summary)));
        }
        if !s.details.is_empty() {
            let items = s
                .details
                .iter()
                .map(|d| group(GroupKind::Item, self.prose(d)))
                .collect();
            body.push(group(GroupKind::List, items));
        }
        section(SectionKind::AccidentHistory, "사고 및 수리 이력 분석", body)
    }

    fn risks_and_advice(&self, s: &RisksAndAdvice) -> Element {
        let mut body = Vec::new();
        if let Some(summary) = &s.summary {
            body.push(group(GroupKind::Paragraph, self.prose(summary)));
        }
        if !s.details.is_empty() {
            let items = s
                .details
                .iter()
                .map(|item| {
                    let mut children = vec![text(&format!(
                        "{}:",
                        item.item.as_deref().unwrap_or(NOT_AVAILABLE)
                    ))];
                    children.extend(self.prose(item.status.as_deref().unwrap_or_default()));
                    children.push(text(item.advice.as_deref().unwrap_or_default()));
                    children.push(cost(item.estimated_cost.as_deref()));
                    group(GroupKind::Item, children)
                })
                .collect();
            body.push(group(GroupKind::List, items));
        }
        body.push(self.annotated_field("가격 가이드:", s.price_guidance.as_deref()));
        section(
            SectionKind::RisksAndAdvice,
            "현재 잠재적 리스크 및 조언",
            body,
        )
    }

    fn predicted_price(&self, s: &PredictedPrice) -> Element {
        section(
            SectionKind::PredictedPrice,
            "AI 예측 적정 시세",
            vec![
                group(
                    GroupKind::Paragraph,
                    vec![text(s.range.as_deref().unwrap_or(NOT_AVAILABLE))],
                ),
                self.annotated_field("예측 근거:", s.basis.as_deref()),
            ],
        )
    }

    fn maintenance(&self, s: &MaintenancePrediction) -> Element {
        let mut body = Vec::new();
        if !s.major_items.is_empty() {
            body.push(Element::Heading("예상 주요 정비 항목:".into()));
            let items = s
                .major_items
                .iter()
                .map(|item| {
                    let mut children = self.prose(item.item.as_deref().unwrap_or(NOT_AVAILABLE));
                    children.push(text(&format!(
                        "시기: {}",
                        item.timing.as_deref().unwrap_or(NOT_AVAILABLE)
                    )));
                    children.push(cost(item.estimated_cost.as_deref()));
                    group(GroupKind::Item, children)
                })
                .collect();
            body.push(group(GroupKind::List, items));
        }
        if !s.common_issues.is_empty() {
            body.push(Element::Heading("해당 차종 주의사항 (고질병):".into()));
            let items = s
                .common_issues
                .iter()
                .map(|issue| group(GroupKind::Item, self.prose(issue)))
                .collect();
            body.push(group(GroupKind::List, items));
        }
        if let Some(advice) = &s.overall_advice {
            body.push(self.annotated_field("종합 조언:", Some(advice)));
        }
        section(SectionKind::Maintenance, "AI 향후 유지보수 예측", body)
    }
}

fn section(kind: SectionKind, title: &str, body: Vec<Element>) -> Element {
    let mut children = Vec::with_capacity(body.len() + 1);
    children.push(Element::Heading(title.to_string()));
    children.extend(body);
    group(GroupKind::Section(kind), children)
}

fn group(kind: GroupKind, children: Vec<Element>) -> Element {
    Element::Group { kind, children }
}

fn text(s: &str) -> Element {
    Element::Text(s.to_string())
}

fn plain_field(label: &str, value: Option<&str>) -> Element {
    group(
        GroupKind::Field,
        vec![text(&format!("{label} {}", value.unwrap_or(NOT_AVAILABLE)))],
    )
}

fn cost(value: Option<&str>) -> Element {
    text(&format!("(예상 비용: {})", value.unwrap_or(NOT_AVAILABLE)))
}
