//! Filter dimensions: administrative level, nitrogen variable, land use

use serde::{Deserialize, Serialize};

// ============================================================================
// ADMINISTRATIVE LEVEL
// ============================================================================

/// Administrative/hydrological aggregation level of the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdminLevel {
    #[serde(rename = "national")]
    National,
    #[serde(rename = "region")]
    Region,
    #[serde(rename = "kommune")]
    Kommune,
    #[serde(rename = "treparter")]
    Treparter,
    #[serde(rename = "coastal_catchment")]
    CoastalCatchment,
    #[serde(rename = "id15_catchment")]
    Id15Catchment,
}

impl AdminLevel {
    /// Query-string / path value understood by the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::National => "national",
            Self::Region => "region",
            Self::Kommune => "kommune",
            Self::Treparter => "treparter",
            Self::CoastalCatchment => "coastal_catchment",
            Self::Id15Catchment => "id15_catchment",
        }
    }

    /// GeoJSON property holding the region key at this level.
    /// Must match the backend's property naming exactly.
    pub fn property_key(&self) -> &'static str {
        match self {
            Self::National => "NAME_0",
            Self::Region => "REGIONNAVN",
            Self::Kommune => "NAME_2",
            Self::Treparter => "ogc_fid",
            Self::CoastalCatchment => "IdKystvand",
            Self::Id15Catchment => "Id15_oplan",
        }
    }

    /// Prefix used in popup titles
    pub fn title_prefix(&self) -> &'static str {
        match self {
            Self::National | Self::Region | Self::Kommune => "",
            Self::Treparter => "Treparter:",
            Self::CoastalCatchment => "Coastal Catchment:",
            Self::Id15Catchment => "ID15:",
        }
    }

    /// Selector label
    pub fn label(&self) -> &'static str {
        match self {
            Self::National => "National",
            Self::Region => "Region",
            Self::Kommune => "Kommune",
            Self::Treparter => "Treparter",
            Self::CoastalCatchment => "Coastal Catchment",
            Self::Id15Catchment => "ID15 Catchment",
        }
    }

    /// National totals are reported in kilotonnes, everything else in tonnes
    pub fn is_national(&self) -> bool {
        matches!(self, Self::National)
    }

    pub fn all() -> &'static [Self] {
        &[
            Self::National,
            Self::Region,
            Self::Kommune,
            Self::Treparter,
            Self::CoastalCatchment,
            Self::Id15Catchment,
        ]
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|l| l.as_str() == s)
    }
}

impl Default for AdminLevel {
    fn default() -> Self {
        Self::Kommune
    }
}

impl std::fmt::Display for AdminLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// LAND USE
// ============================================================================

/// Land-use category the statistics are filtered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LandUse {
    #[serde(rename = "cropgrass")]
    CropGrass,
    #[serde(rename = "forest")]
    Forest,
    #[serde(rename = "livestock")]
    Livestock,
}

impl LandUse {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CropGrass => "cropgrass",
            Self::Forest => "forest",
            Self::Livestock => "livestock",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::CropGrass => "Crop & Grass Category",
            Self::Forest => "Forest Category",
            Self::Livestock => "Livestock Category",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::CropGrass, Self::Forest, Self::Livestock]
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|l| l.as_str() == s)
    }
}

impl Default for LandUse {
    fn default() -> Self {
        Self::CropGrass
    }
}

impl std::fmt::Display for LandUse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// VARIABLE
// ============================================================================

/// A single nitrogen flux variable reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variable {
    N2O,
    NO3,
    N2,
    #[serde(rename = "DON_NH4")]
    DonNh4,
    NH3,
    Dep,
    BNF,
    Fert,
    Harv,
    NO,
}

impl Variable {
    /// Backend column name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::N2O => "N2O",
            Self::NO3 => "NO3",
            Self::N2 => "N2",
            Self::DonNh4 => "DON_NH4",
            Self::NH3 => "NH3",
            Self::Dep => "Dep",
            Self::BNF => "BNF",
            Self::Fert => "Fert",
            Self::Harv => "Harv",
            Self::NO => "NO",
        }
    }

    /// Chemical label shown in front of the axis/legend suffix.
    /// Inputs and harvest carry their meaning in the suffix instead.
    pub fn axis_label(&self) -> &'static str {
        match self {
            Self::N2O => "N₂O",
            Self::NO3 => "NO₃",
            Self::DonNh4 => "DON + NH₄",
            Self::N2 => "N₂",
            Self::NH3 => "NH₃",
            Self::NO => "NO",
            Self::Dep | Self::BNF | Self::Fert | Self::Harv => "",
        }
    }

    /// Unit suffix for sub-national levels
    pub fn unit_suffix(&self) -> &'static str {
        match self {
            Self::N2O | Self::N2 | Self::NO => "Emissions (t N₂O-N yr⁻¹)",
            Self::NO3 | Self::DonNh4 => "Leaching (t N₂O-N yr⁻¹)",
            Self::NH3 => "Volatilization (t N₂O-N yr⁻¹)",
            Self::Dep => "N-Deposition (t N₂O-N yr⁻¹)",
            Self::BNF => "Biological N Fixation (kt N₂O-N yr⁻¹)",
            Self::Fert => "N-Fertilized (t N₂O-N yr⁻¹)",
            Self::Harv => "N-Harvested (t N₂O-N yr⁻¹)",
        }
    }

    /// Selector label
    pub fn label(&self) -> &'static str {
        match self {
            Self::N2O => "N₂O emission",
            Self::NO3 => "NO₃ leaching",
            Self::N2 => "N₂ emission",
            Self::DonNh4 => "DON + NH₄ leaching",
            Self::NH3 => "NH₃ volatilization",
            Self::Dep => "N deposition",
            Self::BNF => "Biological N fixation",
            Self::Fert => "N fertilization",
            Self::Harv => "N harvest",
            Self::NO => "NO emission",
        }
    }

    pub fn all() -> &'static [Self] {
        &[
            Self::N2O,
            Self::NO3,
            Self::N2,
            Self::DonNh4,
            Self::NH3,
            Self::Dep,
            Self::BNF,
            Self::Fert,
            Self::Harv,
            Self::NO,
        ]
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|v| v.as_str() == s)
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// National values are aggregated to kilotonnes
pub const NATIONAL_UNIT_SUFFIX: &str = "(kt N yr⁻¹)";
/// Legend suffix for the full budget (N surplus) view
pub const SURPLUS_UNIT_SUFFIX: &str = "(t N ha⁻¹ yr⁻¹)";

// ============================================================================
// MAP VIEW
// ============================================================================

/// What the choropleth shows: one variable, or the full N budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapView {
    Variable(Variable),
    FullBudget,
}

impl MapView {
    pub const FULL_BUDGET_KEY: &'static str = "full_n_budget";

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Variable(v) => v.as_str(),
            Self::FullBudget => Self::FULL_BUDGET_KEY,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        if s == Self::FULL_BUDGET_KEY {
            Some(Self::FullBudget)
        } else {
            Variable::parse(s).map(Self::Variable)
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Variable(v) => v.label(),
            Self::FullBudget => "Full N budget",
        }
    }

    /// Legend heading, e.g. "Average Cumulative NO₃"
    pub fn legend_title(&self) -> String {
        let label = match self {
            Self::FullBudget => "N Surplus",
            Self::Variable(v) if v.axis_label().is_empty() => "Variable",
            Self::Variable(v) => v.axis_label(),
        };
        format!("Average Cumulative {}", label)
    }

    /// Unit suffix for the legend at the given level
    pub fn legend_suffix(&self, level: AdminLevel) -> &'static str {
        match self {
            Self::FullBudget => SURPLUS_UNIT_SUFFIX,
            Self::Variable(_) if level.is_national() => NATIONAL_UNIT_SUFFIX,
            Self::Variable(v) => v.unit_suffix(),
        }
    }

    /// Every selectable view, full budget first
    pub fn all() -> Vec<Self> {
        std::iter::once(Self::FullBudget)
            .chain(Variable::all().iter().copied().map(Self::Variable))
            .collect()
    }
}

impl Default for MapView {
    fn default() -> Self {
        Self::Variable(Variable::N2O)
    }
}

/// Y-axis title for a variable's time series
pub fn series_axis_title(variable: Variable, level: AdminLevel) -> String {
    let suffix = if level.is_national() {
        NATIONAL_UNIT_SUFFIX
    } else {
        variable.unit_suffix()
    };
    let label = variable.axis_label();
    if label.is_empty() {
        suffix.to_string()
    } else {
        format!("{} {}", label, suffix)
    }
}

/// Popup title: land-use label over the level-prefixed region name
pub fn popup_title(landuse: LandUse, level: AdminLevel, name: &str) -> (String, String) {
    (
        landuse.label().to_string(),
        format!("{}{}", level.title_prefix(), name),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_keys_match_backend() {
        assert_eq!(AdminLevel::National.property_key(), "NAME_0");
        assert_eq!(AdminLevel::Region.property_key(), "REGIONNAVN");
        assert_eq!(AdminLevel::Kommune.property_key(), "NAME_2");
        assert_eq!(AdminLevel::Treparter.property_key(), "ogc_fid");
        assert_eq!(AdminLevel::CoastalCatchment.property_key(), "IdKystvand");
        assert_eq!(AdminLevel::Id15Catchment.property_key(), "Id15_oplan");
    }

    #[test]
    fn test_level_roundtrip_through_str() {
        for level in AdminLevel::all() {
            assert_eq!(AdminLevel::parse(level.as_str()), Some(*level));
        }
        assert_eq!(AdminLevel::parse("county"), None);
    }

    #[test]
    fn test_map_view_parse() {
        assert_eq!(MapView::parse("full_n_budget"), Some(MapView::FullBudget));
        assert_eq!(MapView::parse("DON_NH4"), Some(MapView::Variable(Variable::DonNh4)));
        assert_eq!(MapView::parse("CO2"), None);
        assert_eq!(MapView::all().len(), 11);
    }

    #[test]
    fn test_legend_suffix_by_level() {
        let view = MapView::Variable(Variable::NO3);
        assert_eq!(view.legend_suffix(AdminLevel::National), NATIONAL_UNIT_SUFFIX);
        assert_eq!(view.legend_suffix(AdminLevel::Kommune), "Leaching (t N₂O-N yr⁻¹)");
        assert_eq!(
            MapView::FullBudget.legend_suffix(AdminLevel::National),
            SURPLUS_UNIT_SUFFIX
        );
    }

    #[test]
    fn test_legend_title() {
        assert_eq!(MapView::FullBudget.legend_title(), "Average Cumulative N Surplus");
        assert_eq!(
            MapView::Variable(Variable::NH3).legend_title(),
            "Average Cumulative NH₃"
        );
        assert_eq!(
            MapView::Variable(Variable::Fert).legend_title(),
            "Average Cumulative Variable"
        );
    }

    #[test]
    fn test_popup_title() {
        let (top, bottom) = popup_title(LandUse::Forest, AdminLevel::CoastalCatchment, "42");
        assert_eq!(top, "Forest Category");
        assert_eq!(bottom, "Coastal Catchment:42");
    }

    #[test]
    fn test_series_axis_title() {
        assert_eq!(
            series_axis_title(Variable::N2O, AdminLevel::Region),
            "N₂O Emissions (t N₂O-N yr⁻¹)"
        );
        assert_eq!(
            series_axis_title(Variable::Fert, AdminLevel::National),
            NATIONAL_UNIT_SUFFIX
        );
    }
}
