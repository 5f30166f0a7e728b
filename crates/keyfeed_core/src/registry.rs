use crate::extract::SourceFormat;

/// How far a single source's word goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustTier {
    /// One report from this source is sufficient for publication.
    Authoritative,
    /// Requires independent agreement from at least one other
    /// corroborating source.
    Corroborating,
}

/// One configured source page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub url: String,
    pub format: SourceFormat,
    pub tier: TrustTier,
}

impl Source {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        format: SourceFormat,
        tier: TrustTier,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            format,
            tier,
        }
    }
}

/// The hand-maintained source list. Configuration, not discovery: adding
/// a source means adding a line here and nothing else.
///
/// Fetch order within a tier does not matter; the pipeline drains the
/// authoritative tier completely before the corroborating one.
pub fn sources() -> Vec<Source> {
    vec![
        Source::new(
            "MentalMars",
            "https://mentalmars.com/game-news/borderlands-3-golden-keys/",
            SourceFormat::LineWindow,
            TrustTier::Authoritative,
        ),
        Source::new(
            "Gearbox",
            "https://shift.gearboxsoftware.com/code_streams",
            SourceFormat::StrictRange,
            TrustTier::Authoritative,
        ),
        Source::new(
            "TryHardGuides",
            "https://tryhardguides.com/borderlands-3-shift-codes/",
            SourceFormat::ProximityWindow,
            TrustTier::Corroborating,
        ),
        Source::new(
            "GosuNoob",
            "https://www.gosunoob.com/borderlands-3/shift-codes-golden-keys/",
            SourceFormat::ProximityWindow,
            TrustTier::Corroborating,
        ),
        Source::new(
            "ProGameGuides",
            "https://progameguides.com/borderlands/borderlands-3-shift-codes/",
            SourceFormat::LineWindow,
            TrustTier::Corroborating,
        ),
        Source::new(
            "Orcz",
            "http://orcz.com/Borderlands_3:_Shift_Codes",
            SourceFormat::ProximityWindow,
            TrustTier::Corroborating,
        ),
    ]
}
