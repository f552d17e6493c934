//! Region popup content: what was asked for and what came back

use nbudget_charts::FlowLayout;
use nbudget_core::{
    AVERAGE_COLUMN, AdminLevel, DashError, FluxBudget, FluxOrdering, JsonRow, LandUse, MapView,
    RegionKey, TimeSeries, Variable, popup_title, series_axis_title,
};

/// A region's popup as requested by a click or search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupRequest {
    pub level: AdminLevel,
    pub key: RegionKey,
    pub view: MapView,
    pub landuse: LandUse,
}

impl PopupRequest {
    /// Region name sent to the backend
    pub fn name(&self) -> &str {
        self.key.as_str()
    }

    /// "{land use label} / {level prefix}{name}"
    pub fn title(&self) -> String {
        let (landuse, region) = popup_title(self.landuse, self.level, self.name());
        format!("{} / {}", landuse, region)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PopupBody {
    Loading,
    Series {
        series: TimeSeries,
        variable: Variable,
        y_title: String,
    },
    Budget(FlowLayout),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PopupContent {
    pub request: PopupRequest,
    pub title: String,
    pub body: PopupBody,
}

impl PopupContent {
    pub fn loading(request: PopupRequest) -> Self {
        Self {
            title: request.title(),
            request,
            body: PopupBody::Loading,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.body, PopupBody::Loading)
    }
}

/// Popup body for `/chart-data` rows
pub fn series_body(
    rows: &[JsonRow],
    variable: Variable,
    level: AdminLevel,
) -> Result<PopupBody, DashError> {
    let series = TimeSeries::from_rows(rows, variable)?;
    if series.is_empty() {
        return Err(DashError::data(format!("no yearly {} values", variable.as_str())));
    }
    Ok(PopupBody::Series {
        series,
        variable,
        y_title: series_axis_title(variable, level),
    })
}

/// Popup body for a `/full-n-chart-data` budget, averaged over years
pub fn budget_body(budget: &FluxBudget) -> Result<PopupBody, DashError> {
    if budget.is_empty() {
        return Err(DashError::data("no nitrogen budget for this region"));
    }
    let layout = FlowLayout::compute(budget, &FluxOrdering::default(), AVERAGE_COLUMN)?;
    Ok(PopupBody::Budget(layout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nbudget_core::LayoutError;

    fn request() -> PopupRequest {
        PopupRequest {
            level: AdminLevel::CoastalCatchment,
            key: RegionKey::new("DK_1_123"),
            view: MapView::Variable(Variable::NO3),
            landuse: LandUse::Forest,
        }
    }

    #[test]
    fn test_popup_title() {
        assert_eq!(request().title(), "Forest Category / Coastal Catchment:DK_1_123");

        let kommune = PopupRequest {
            level: AdminLevel::Kommune,
            key: RegionKey::new("Aarhus"),
            ..request()
        };
        assert_eq!(kommune.title(), "Forest Category / Aarhus");
    }

    #[test]
    fn test_loading_then_body() {
        let mut content = PopupContent::loading(request());
        assert!(content.is_loading());
        let rows: Vec<JsonRow> =
            serde_json::from_str(r#"[{"year": 2015, "NO3": 1.0}, {"year": 2014, "NO3": 2.0}]"#)
                .unwrap();
        let body = series_body(&rows, Variable::NO3, AdminLevel::CoastalCatchment).unwrap();
        content.body = body;
        assert!(!content.is_loading());

        match content.body {
            PopupBody::Series { series, y_title, .. } => {
                assert_eq!(series.points[0].year, 2014);
                assert!(y_title.starts_with("NO₃"));
            }
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_empty_series_is_an_error() {
        assert!(series_body(&[], Variable::NH3, AdminLevel::Kommune).is_err());
    }

    #[test]
    fn test_empty_budget_is_a_data_error() {
        assert_eq!(
            budget_body(&FluxBudget::default()),
            Err(DashError::data("no nitrogen budget for this region"))
        );
    }

    #[test]
    fn test_budget_body_requires_harvest() {
        let budget = FluxBudget::from_pairs(&[("Fert", 5.0)], &[("NO3", 1.0)]);
        assert_eq!(
            budget_body(&budget),
            Err(DashError::Layout(LayoutError::MissingCheckpoint {
                category: "Harv".into()
            }))
        );

        let budget = FluxBudget::from_pairs(&[("Fert", 5.0)], &[("Harv", 1.0)]);
        match budget_body(&budget).unwrap() {
            PopupBody::Budget(layout) => assert_eq!(layout.metrics.surplus, 4.0),
            other => panic!("unexpected body {:?}", other),
        }
    }
}
