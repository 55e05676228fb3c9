//! Pairing of design nodes with implementation nodes.
//!
//! There is no shared identifier between the two trees, so each candidate is
//! scored on four weighted signals:
//!
//! | Signal | Weight | Applies when |
//! |---|---|---|
//! | name vs visible text | 0.3 | both non-empty |
//! | type compatibility | 0.2 | always |
//! | dimensions | 0.3 | both sides report width and height |
//! | color | 0.2 | a background (or text) color parses on both sides |
//!
//! The score is the weighted sum over the signals that applied, divided by
//! their total weight. Pairing is greedy: design nodes are visited in input
//! order and the chosen implementation node leaves the pool immediately, so
//! an earlier design node can take a candidate a later one would fit better.

use tracing::debug;

use crate::color::css_color_distance;
use crate::config::MatchingConfig;
use crate::similarity::string_similarity;
use crate::types::{DesignNode, ImplementationNode, MatchedFactors, NormalizedAttributes};

const NAME_WEIGHT: f64 = 0.3;
const TYPE_WEIGHT: f64 = 0.2;
const DIMENSION_WEIGHT: f64 = 0.3;
const COLOR_WEIGHT: f64 = 0.2;

/// Type score for a known kind rendered with an unexpected tag.
const UNEXPECTED_TAG_SCORE: f64 = 0.3;
/// Type score when the design kind is not in the table.
const UNKNOWN_KIND_SCORE: f64 = 0.5;

/// Design node kinds with a known set of implementation tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesignKind {
    Frame,
    Text,
    Rectangle,
    Instance,
    Component,
    Button,
    Input,
    Image,
    Unknown,
}

impl DesignKind {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "frame" => DesignKind::Frame,
            "text" => DesignKind::Text,
            "rectangle" => DesignKind::Rectangle,
            "instance" => DesignKind::Instance,
            "component" => DesignKind::Component,
            "button" => DesignKind::Button,
            "input" => DesignKind::Input,
            "image" => DesignKind::Image,
            _ => DesignKind::Unknown,
        }
    }

    pub fn accepted_tags(self) -> &'static [&'static str] {
        match self {
            DesignKind::Frame => &["div", "section", "article", "main", "header", "footer", "nav"],
            DesignKind::Text => &["p", "span", "h1", "h2", "h3", "h4", "h5", "h6", "label"],
            DesignKind::Rectangle => &["div", "span"],
            DesignKind::Instance | DesignKind::Component => &["div", "section"],
            DesignKind::Button => &["button", "a"],
            DesignKind::Input => &["input", "textarea"],
            DesignKind::Image => &["img", "picture", "svg"],
            DesignKind::Unknown => &[],
        }
    }

    /// Compatibility of an implementation tag with this kind, never zero.
    pub fn compatibility(self, tag: &str) -> f64 {
        if self == DesignKind::Unknown {
            return UNKNOWN_KIND_SCORE;
        }
        if self.accepted_tags().contains(&tag) {
            1.0
        } else {
            UNEXPECTED_TAG_SCORE
        }
    }
}

/// A node together with its normalized attributes.
#[derive(Debug)]
pub struct Subject<'a, N> {
    pub node: &'a N,
    pub attrs: &'a NormalizedAttributes,
}

impl<N> Clone for Subject<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N> Copy for Subject<'_, N> {}

impl<'a, N> Subject<'a, N> {
    pub fn new(node: &'a N, attrs: &'a NormalizedAttributes) -> Self {
        Self { node, attrs }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchCandidate {
    pub design_index: usize,
    pub implementation_index: usize,
    pub score: f64,
    pub factors: MatchedFactors,
}

/// Result of pairing one design node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairingOutcome {
    pub design_index: usize,
    pub candidate: Option<MatchCandidate>,
}

fn dimension_similarity(design: &NormalizedAttributes, implementation: &NormalizedAttributes) -> Option<f64> {
    let (dw, dh) = (design.layout.width?, design.layout.height?);
    let (iw, ih) = (implementation.layout.width?, implementation.layout.height?);
    let relative = |a: f64, b: f64| {
        let max = a.abs().max(b.abs());
        if max == 0.0 {
            0.0
        } else {
            (a - b).abs() / max
        }
    };
    let diff = (relative(dw, iw) + relative(dh, ih)) / 2.0;
    Some((1.0 - diff).clamp(0.0, 1.0))
}

fn color_similarity(
    design: &NormalizedAttributes,
    implementation: &NormalizedAttributes,
    tolerance: f64,
) -> Option<f64> {
    let pairs = [
        (&design.colors.background, &implementation.colors.background),
        (&design.colors.text, &implementation.colors.text),
    ];
    pairs.into_iter().find_map(|(d, i)| {
        let distance = css_color_distance(d.as_deref()?, i.as_deref()?)?;
        Some((1.0 - distance / tolerance).max(0.0))
    })
}

/// Score one candidate. Returns the composite score and the factors that applied.
pub fn score_candidate(
    design: Subject<'_, DesignNode>,
    implementation: Subject<'_, ImplementationNode>,
    config: &MatchingConfig,
) -> (f64, MatchedFactors) {
    let mut factors = MatchedFactors::default();
    let mut weighted = 0.0;
    let mut used = 0.0;

    let name = design.node.name.trim().to_lowercase();
    if let Some(text) = implementation.node.visible_text() {
        if !name.is_empty() {
            let similarity = string_similarity(&name, &text.to_lowercase());
            factors.name = Some(similarity);
            weighted += NAME_WEIGHT * similarity;
            used += NAME_WEIGHT;
        }
    }

    let tag = implementation.node.tag().unwrap_or_default();
    let compatibility = DesignKind::parse(&design.node.node_type).compatibility(&tag);
    factors.type_compatibility = Some(compatibility);
    weighted += TYPE_WEIGHT * compatibility;
    used += TYPE_WEIGHT;

    if let Some(similarity) = dimension_similarity(design.attrs, implementation.attrs) {
        factors.dimensions = Some(similarity);
        weighted += DIMENSION_WEIGHT * similarity;
        used += DIMENSION_WEIGHT;
    }

    if let Some(similarity) =
        color_similarity(design.attrs, implementation.attrs, config.color_tolerance)
    {
        factors.color = Some(similarity);
        weighted += COLOR_WEIGHT * similarity;
        used += COLOR_WEIGHT;
    }

    let score = if used > 0.0 { weighted / used } else { 0.0 };
    (score, factors)
}

/// Best-scoring candidate above the acceptance floor. Ties keep the first.
pub fn find_best_match<'a>(
    design_index: usize,
    design: Subject<'a, DesignNode>,
    pool: impl IntoIterator<Item = (usize, Subject<'a, ImplementationNode>)>,
    config: &MatchingConfig,
) -> Option<MatchCandidate> {
    let mut best: Option<MatchCandidate> = None;
    for (implementation_index, implementation) in pool {
        let (score, factors) = score_candidate(design, implementation, config);
        if best.map_or(true, |b| score > b.score) {
            best = Some(MatchCandidate {
                design_index,
                implementation_index,
                score,
                factors,
            });
        }
    }
    best.filter(|b| b.score > config.acceptance_floor)
}

/// Greedy pairing in design order; matched implementation nodes leave the pool.
pub fn pair_nodes(
    design: &[Subject<'_, DesignNode>],
    implementation: &[Subject<'_, ImplementationNode>],
    config: &MatchingConfig,
) -> Vec<PairingOutcome> {
    let mut pool: Vec<usize> = (0..implementation.len()).collect();
    let mut outcomes = Vec::with_capacity(design.len());

    for (design_index, subject) in design.iter().enumerate() {
        let candidate = find_best_match(
            design_index,
            *subject,
            pool.iter().map(|&i| (i, implementation[i])),
            config,
        );
        match candidate {
            Some(c) => {
                pool.retain(|&i| i != c.implementation_index);
                debug!(
                    design = %subject.node.id,
                    implementation = c.implementation_index,
                    score = c.score,
                    "paired design node"
                );
            }
            None => debug!(design = %subject.node.id, "no candidate above acceptance floor"),
        }
        outcomes.push(PairingOutcome {
            design_index,
            candidate,
        });
    }

    outcomes
}
