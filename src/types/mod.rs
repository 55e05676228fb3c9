//! Data types for design/implementation inputs and comparison results.

pub mod core;
pub mod design;
pub mod dom;
pub mod normalized;
pub mod report;

pub use self::core::{BoundingRect, Dimensions, StyleValue};
pub use design::{
    BoxSides, DesignBorder, DesignColors, DesignEffect, DesignLayout, DesignNode, DesignPaint,
    DesignProperties, DesignRadius, DesignShadow, DesignSpacing, DesignTree, DesignTypography,
    EffectOffset, PaintColor, SidesInput,
};
pub use dom::{ImplementationNode, ImplementationTree};
pub use normalized::{
    Border, ColorSet, Layout, NormalizedAttributes, Radius, Shadow, ShadowSet, Sides, Spacing,
    TypographyStyle,
};
pub use report::{
    AccessibilityDetail, AccessibilitySummary, ComparisonRecord, ComparisonReport,
    ComparisonStatus, ComponentFailure, DesignSourceInfo, Deviation, ImplementationSourceInfo,
    Match, MatchedFactors, NodeCounts, ProcessingStats, PropertyOutcome, RegressionRisk,
    ReportMetadata, RiskCounts, Severity, SeverityCounts, Summary,
};
