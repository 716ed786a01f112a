//! Pipeline stages shown in the helper status panel. Static data, not fetched.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelperStatus {
    Working,
    Idle,
}

impl HelperStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            HelperStatus::Working => "working",
            HelperStatus::Idle => "idle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Helper {
    pub name: &'static str,
    pub status: HelperStatus,
}

pub const HELPERS: &[Helper] = &[
    Helper { name: "Data Collector", status: HelperStatus::Working },
    Helper { name: "Performance Analyzer", status: HelperStatus::Working },
    Helper { name: "Form Calculator", status: HelperStatus::Working },
    Helper { name: "Weather Analyst", status: HelperStatus::Idle },
    Helper { name: "Injury Monitor", status: HelperStatus::Working },
    Helper { name: "Transfer Impact", status: HelperStatus::Idle },
    Helper { name: "Odds Analyzer", status: HelperStatus::Working },
];

const HELPER_ICONS: &[(&str, &str)] = &[
    ("Data Collector", "database"),
    ("Performance Analyzer", "chart-line"),
    ("Form Calculator", "bolt"),
    ("Weather Analyst", "cloud-sun-rain"),
    ("Injury Monitor", "user-injured"),
    ("Transfer Impact", "people-arrows"),
    ("Odds Analyzer", "balance-scale"),
];

const DEFAULT_ICON: &str = "cog";

pub fn helper_icon(name: &str) -> &'static str {
    HELPER_ICONS
        .iter()
        .find(|(helper, _)| *helper == name)
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_ICON)
}
