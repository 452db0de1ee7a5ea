//! Plain-text listings of what a prefecture's caches hold, grouped the way
//! the search form presents them. Used to give downstream prompt builders
//! the options that are actually selectable.

use crate::model::{Line, Location};

const TOWNS_PER_WARD: usize = 30;

/// Towns grouped by ward, in first-seen ward order.
pub fn location_summary(prefecture: &str, locations: &[Location]) -> String {
    let groups = group_in_order(locations.iter().filter_map(|location| {
        let town = location.town.as_deref()?;
        let ward = location.ward.as_deref().or(location.city.as_deref())?;
        Some((ward, town))
    }));

    let total: usize = groups.iter().map(|(_, towns)| towns.len()).sum();
    if total == 0 {
        return format!(
            "【{prefecture}の町丁目キャッシュ】\nキャッシュが空です。REINSから取得した選択肢を使用してください。"
        );
    }

    let mut summary = format!("【{prefecture}の町丁目キャッシュ】（{total}件）\n");
    summary.push_str("以下はREINSで実際に選択可能な町丁目です。推薦する際はこのリストから選んでください。\n\n");

    for (ward, towns) in &groups {
        let shown = &towns[..towns.len().min(TOWNS_PER_WARD)];
        summary.push_str(&format!("■ {ward}\n  {}", shown.join(", ")));
        if towns.len() > TOWNS_PER_WARD {
            summary.push_str(&format!(" ... 他{}件", towns.len() - TOWNS_PER_WARD));
        }
        summary.push('\n');
    }

    summary
}

/// Stations grouped by line, each line in travel order as given.
pub fn line_summary(prefecture: &str, lines: &[Line]) -> String {
    let groups = group_in_order(lines.iter().filter_map(|line| {
        let station = line.station.as_deref()?;
        Some((line.line_name.as_str(), station))
    }));

    let total: usize = groups.iter().map(|(_, stations)| stations.len()).sum();
    if total == 0 {
        return format!(
            "【{prefecture}の沿線キャッシュ】\nキャッシュが空です。REINSから取得した選択肢を使用してください。"
        );
    }

    let mut summary = format!("【{prefecture}の沿線キャッシュ】（{}路線、{total}駅）\n", groups.len());
    summary.push_str("以下はREINSで実際に選択可能な沿線・駅です。推薦する際はこのリストから選んでください。\n\n");

    for (line_name, stations) in &groups {
        summary.push_str(&format!("■ {line_name}\n  {}\n", stations.join(", ")));
    }

    summary
}

fn group_in_order<'a>(pairs: impl Iterator<Item = (&'a str, &'a str)>) -> Vec<(&'a str, Vec<&'a str>)> {
    let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
    for (group, item) in pairs {
        match groups.iter_mut().find(|(name, _)| *name == group) {
            Some((_, items)) => items.push(item),
            None => groups.push((group, vec![item])),
        }
    }
    groups
}
