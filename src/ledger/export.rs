// CSV rendering for payout summaries

/// One resolved row of a payout summary export. Username resolution happens
/// at the caller; the store only knows ids.
#[derive(Debug, Clone)]
pub struct CsvRow {
    pub discord_id: i64,
    pub username: String,
    pub total_views: i64,
    pub total_earnings: f64,
}

pub fn export_csv(rows: &[CsvRow]) -> String {
    let mut csv = String::from("Discord ID, Username, Total Views, Total Earnings\n");
    for row in rows {
        let username = row.username.replace('"', "\"\"");
        // Earnings keep full precision; sub-cent aggregates must parse back
        // to the exact stored value.
        csv.push_str(&format!(
            "{},\"{}\",{},{}\n",
            row.discord_id, username, row.total_views, row.total_earnings
        ));
    }
    csv
}
