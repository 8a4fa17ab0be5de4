use crate::domain::model::{DisasterZone, Resource};
use std::collections::HashSet;
use std::fmt;

/// 災害類型。未列在內建表中的類型以 `Other` 表示。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DisasterKind {
    Flood,
    Wildfire,
    Earthquake,
    Cyclone,
    HeatWave,
    Landslide,
    Other(String),
}

impl DisasterKind {
    pub const BUILT_IN: [DisasterKind; 6] = [
        DisasterKind::Flood,
        DisasterKind::Wildfire,
        DisasterKind::Earthquake,
        DisasterKind::Cyclone,
        DisasterKind::HeatWave,
        DisasterKind::Landslide,
    ];

    pub fn label(&self) -> &str {
        match self {
            DisasterKind::Flood => "Flood",
            DisasterKind::Wildfire => "Wildfire",
            DisasterKind::Earthquake => "Earthquake",
            DisasterKind::Cyclone => "Cyclone",
            DisasterKind::HeatWave => "Heat Wave",
            DisasterKind::Landslide => "Landslide",
            DisasterKind::Other(name) => name,
        }
    }

    fn default_responders(&self) -> &'static [&'static str] {
        match self {
            DisasterKind::Flood => &[
                "Helicopter",
                "Ambulance",
                "NDRF Team",
                "Fire Truck",
                "Police",
                "NDRF Rescue Team",
                "Medical Unit",
            ],
            DisasterKind::Wildfire => &[
                "Fire Truck",
                "Helicopter",
                "Ambulance",
                "Police",
                "NDRF Team",
                "NDRF Rescue Team",
                "Medical Unit",
            ],
            DisasterKind::Earthquake => &[
                "NDRF Team",
                "Ambulance",
                "Helicopter",
                "Police",
                "Fire Truck",
                "NDRF Rescue Team",
                "Medical Unit",
            ],
            DisasterKind::Cyclone => &[
                "Helicopter",
                "NDRF Team",
                "Ambulance",
                "Police",
                "Fire Truck",
                "NDRF Rescue Team",
                "Medical Unit",
            ],
            DisasterKind::HeatWave => &[
                "Ambulance",
                "Police",
                "Helicopter",
                "NDRF Team",
                "Medical Unit",
            ],
            DisasterKind::Landslide => &[
                "NDRF Team",
                "Rescue Team",
                "Helicopter",
                "Ambulance",
                "Police",
                "JCB",
                "Bulldozer",
                "Excavator",
                "NDRF Rescue Team",
                "Medical Unit",
            ],
            DisasterKind::Other(_) => &[],
        }
    }
}

impl From<&str> for DisasterKind {
    fn from(value: &str) -> Self {
        DisasterKind::BUILT_IN
            .into_iter()
            .find(|kind| kind.label() == value)
            .unwrap_or_else(|| DisasterKind::Other(value.to_string()))
    }
}

impl fmt::Display for DisasterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 找不到任何對應時使用的通用救援單位
pub const UNIVERSAL_RESPONDERS: [&str; 8] = [
    "Helicopter",
    "Ambulance",
    "Police",
    "Fire Truck",
    "NDRF Team",
    "NDRF Rescue Team",
    "Medical Unit",
    "Rescue Team",
];

#[derive(Debug, Clone)]
struct Label {
    text: String,
    lower: String,
    tokens: Vec<String>,
}

impl Label {
    fn new(text: &str) -> Self {
        let lower = text.to_lowercase();
        let tokens = lower.split_whitespace().map(str::to_string).collect();
        Self {
            text: text.to_string(),
            lower,
            tokens,
        }
    }
}

fn labels(texts: &[impl AsRef<str>]) -> Vec<Label> {
    texts.iter().map(|t| Label::new(t.as_ref())).collect()
}

fn contains_either(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

/// 災區類型對應到可接受資源類型的解析結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    Direct(&'a DisasterKind),
    Fuzzy(&'a DisasterKind),
    Universal,
}

#[derive(Debug, Clone)]
pub struct CompatibilityTable {
    // 順序有意義: 模糊比對會取第一個命中的 key
    entries: Vec<(DisasterKind, Vec<Label>)>,
    universal: Vec<Label>,
}

impl Default for CompatibilityTable {
    fn default() -> Self {
        let entries = DisasterKind::BUILT_IN
            .into_iter()
            .map(|kind| {
                let responders = labels(kind.default_responders());
                (kind, responders)
            })
            .collect();

        Self {
            entries,
            universal: labels(&UNIVERSAL_RESPONDERS),
        }
    }
}

impl CompatibilityTable {
    /// 空表: 每個災區都會落到通用清單
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            universal: labels(&UNIVERSAL_RESPONDERS),
        }
    }

    /// 新增或覆寫一個災害類型的可接受資源清單
    pub fn with_entry(mut self, disaster: &str, responders: &[impl AsRef<str>]) -> Self {
        let kind = DisasterKind::from(disaster);
        let responders = labels(responders);

        match self.entries.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, existing)) => *existing = responders,
            None => self.entries.push((kind, responders)),
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn resolve_labels(&self, zone_type: &str) -> (Resolution<'_>, &[Label]) {
        if let Some((kind, responders)) = self
            .entries
            .iter()
            .find(|(kind, responders)| kind.label() == zone_type && !responders.is_empty())
        {
            return (Resolution::Direct(kind), responders);
        }

        // e.g. "Major Landslide" -> "Landslide"
        let zone_lower = zone_type.to_lowercase();
        if let Some((kind, responders)) = self.entries.iter().find(|(kind, responders)| {
            !responders.is_empty() && contains_either(&zone_lower, &kind.label().to_lowercase())
        }) {
            return (Resolution::Fuzzy(kind), responders);
        }

        (Resolution::Universal, &self.universal)
    }

    pub fn resolve(&self, zone_type: &str) -> Resolution<'_> {
        self.resolve_labels(zone_type).0
    }

    pub fn acceptable_types(&self, zone_type: &str) -> Vec<&str> {
        self.resolve_labels(zone_type)
            .1
            .iter()
            .map(|l| l.text.as_str())
            .collect()
    }
}

/// 判斷資源能否支援某個災區。寧可多派，不可漏派。
#[derive(Debug, Clone, Default)]
pub struct CompatibilityMatcher {
    table: CompatibilityTable,
}

impl CompatibilityMatcher {
    pub fn new(table: CompatibilityTable) -> Self {
        Self { table }
    }

    pub fn compatible(&self, resource: &Resource, zone: &DisasterZone) -> bool {
        let (_, acceptable) = self.table.resolve_labels(&zone.kind);
        let kind_lower = resource.kind.to_lowercase();

        if acceptable
            .iter()
            .any(|label| contains_either(&kind_lower, &label.lower))
        {
            return true;
        }

        // e.g. "NDRF Rescue Team" vs "NDRF Team" share "ndrf"
        let kind_tokens: HashSet<&str> = kind_lower.split_whitespace().collect();
        let shares_token = acceptable.iter().any(|label| {
            label
                .tokens
                .iter()
                .any(|t| t.chars().count() > 3 && kind_tokens.contains(t.as_str()))
        });
        if shares_token {
            return true;
        }

        resource.specialization.iter().any(|spec| {
            let spec_lower = spec.to_lowercase();
            acceptable
                .iter()
                .any(|label| contains_either(&spec_lower, &label.lower))
        })
    }
}
