//! Terminal rendering of lookup results and history

use std::collections::BTreeSet;

use chrono::Local;
use colored::Colorize;

use crate::services::geoip::GeoResult;
use crate::storage::HistoryEntry;

/// 地图缩放级别
const MAP_ZOOM: u8 = 10;

/// OpenStreetMap link centred on the coordinates
pub fn map_link(lat: f64, lon: f64) -> String {
    format!(
        "https://www.openstreetmap.org/?mlat={lat}&mlon={lon}#map={MAP_ZOOM}/{lat}/{lon}"
    )
}

fn field(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

pub fn render_geo(geo: &GeoResult) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "{} {}",
        "IP:".bold(),
        field(geo.queried_ip.as_deref()).cyan()
    ));

    let country = match (geo.country.as_deref(), geo.country_code.as_deref()) {
        (Some(name), Some(code)) => format!("{} ({})", name, code),
        (Some(name), None) => name.to_string(),
        (None, Some(code)) => code.to_string(),
        (None, None) => "-".to_string(),
    };
    lines.push(format!("{} {}", "Country:".bold(), country));
    lines.push(format!(
        "{} {}",
        "Region:".bold(),
        field(geo.region_name.as_deref().or(geo.region.as_deref()))
    ));
    lines.push(format!("{} {}", "City:".bold(), field(geo.city.as_deref())));
    lines.push(format!("{} {}", "ZIP:".bold(), field(geo.zip.as_deref())));
    lines.push(format!("{} {}", "ISP:".bold(), field(geo.isp.as_deref())));
    lines.push(format!(
        "{} {}",
        "Timezone:".bold(),
        field(geo.timezone.as_deref())
    ));

    match geo.coordinates() {
        Some((lat, lon)) => {
            lines.push(format!("{} {:.4}, {:.4}", "Coordinates:".bold(), lat, lon));
            lines.push(format!("{} {}", "Map:".bold(), map_link(lat, lon).underline()));
        }
        None => lines.push(format!("{} -", "Coordinates:".bold())),
    }

    lines.join("\n")
}

pub fn render_history(entries: &[HistoryEntry], selected: &BTreeSet<i64>) -> String {
    if entries.is_empty() {
        return "No search history yet.".dimmed().to_string();
    }

    entries
        .iter()
        .map(|entry| {
            let marker = if selected.contains(&entry.id) { "[x]" } else { "[ ]" };
            let place = match (entry.city.as_deref(), entry.country.as_deref()) {
                (Some(city), Some(country)) => format!("{}, {}", city, country),
                (Some(city), None) => city.to_string(),
                (None, Some(country)) => country.to_string(),
                (None, None) => "-".to_string(),
            };
            format!(
                "{} {:>5}  {:<15}  {:<30}  {}",
                marker,
                entry.id,
                entry.ip_address.cyan(),
                place,
                entry
                    .searched_at
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
                    .dimmed()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
