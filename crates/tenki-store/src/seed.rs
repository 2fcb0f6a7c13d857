//! Static catalog of monitored locations.

use crate::types::MonitorPoint;

/// Seed entries as (office_code, area_code, name, pos_y, pos_x).
///
/// The office and area codes must align with the identifiers of the
/// JMA region-hierarchy document; the positions place each card on the
/// dashboard map canvas.
pub const MONITOR_POINTS: &[(&str, &str, &str, i32, i32)] = &[
    ("016000", "016010", "札幌", 40, 620),
    ("015000", "015010", "釧路", 70, 730),
    ("040000", "040010", "仙台", 230, 590),
    ("150000", "150010", "新潟", 250, 480),
    ("130000", "130010", "東京", 360, 560),
    ("230000", "230010", "名古屋", 390, 450),
    ("170000", "170010", "金沢", 290, 380),
    ("270000", "270000", "大阪", 410, 360),
    ("340000", "340010", "広島", 410, 240),
    ("390000", "390010", "高知", 520, 280),
    ("400000", "400010", "福岡", 410, 100),
    ("460100", "460100", "鹿児島", 530, 80),
    ("471000", "471010", "那覇", 630, 210),
];

/// Materialize the default seed list.
pub fn default_monitor_points() -> Vec<MonitorPoint> {
    MONITOR_POINTS
        .iter()
        .map(|(office, area, name, y, x)| MonitorPoint::new(office, area, name, *y, *x))
        .collect()
}
