use anyhow::Result;
use birdnews_lib::SearchReport;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl OutputFormat {
    /// Unknown names fall back to a table.
    pub fn parse(name: &str) -> Self {
        match name {
            "json" => OutputFormat::Json,
            "csv" => OutputFormat::Csv,
            "markdown" | "md" => OutputFormat::Markdown,
            _ => OutputFormat::Table,
        }
    }
}

#[derive(Tabled, Serialize, Debug, PartialEq, Eq)]
struct SightingRow {
    #[tabled(rename = "Species")]
    #[serde(rename = "Species")]
    species: String,
    #[tabled(rename = "Site")]
    #[serde(rename = "Site")]
    site: String,
    #[tabled(rename = "Date")]
    #[serde(rename = "Date")]
    date: String,
    #[tabled(rename = "Time")]
    #[serde(rename = "Time")]
    time: String,
    #[tabled(rename = "Count")]
    #[serde(rename = "Count")]
    count: String,
    #[tabled(rename = "Observer")]
    #[serde(rename = "Observer")]
    observer: String,
    #[tabled(rename = "Notes")]
    #[serde(rename = "Notes")]
    notes: String,
}

#[derive(Tabled, Serialize)]
struct SpeciesNameRow {
    #[tabled(rename = "#")]
    #[serde(rename = "Position")]
    position: usize,
    #[tabled(rename = "Species")]
    #[serde(rename = "Species")]
    species: String,
}

/// Flattens a report into one row per sighting, in display order.
///
/// With `grouped`, species and site are only written on the first row of
/// their group, which reads better in a terminal table.
fn build_report_rows(report: &SearchReport, grouped: bool) -> Vec<SightingRow> {
    let mut rows = Vec::new();
    for entry in &report.records {
        let mut first_in_species = true;
        for site in &entry.sites {
            let mut first_in_site = true;
            for sighting in &site.sightings {
                let show_species = !grouped || first_in_species;
                let show_site = !grouped || first_in_site;
                rows.push(SightingRow {
                    species: if show_species { entry.species.clone() } else { String::new() },
                    site: if show_site { site.site.clone() } else { String::new() },
                    date: sighting.date.clone(),
                    time: sighting.time.clone(),
                    count: sighting.count.clone(),
                    observer: sighting.observer.clone(),
                    notes: sighting.notes.clone(),
                });
                first_in_species = false;
                first_in_site = false;
            }
        }
    }
    rows
}

fn build_name_rows(names: &[String]) -> Vec<SpeciesNameRow> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| SpeciesNameRow {
            position: i + 1,
            species: name.clone(),
        })
        .collect()
}

// -- Table output --

pub fn print_report_table(report: &SearchReport) {
    println!("{}", Table::new(build_report_rows(report, true)));
}

pub fn print_birdlist_table(names: &[String]) {
    println!("{}", Table::new(build_name_rows(names)));
}

// -- Markdown output --

pub fn print_report_markdown(report: &SearchReport) {
    let mut table = Table::new(build_report_rows(report, true));
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_birdlist_markdown(names: &[String]) {
    let mut table = Table::new(build_name_rows(names));
    table.with(Style::markdown());
    println!("{}", table);
}

// -- CSV output --

pub fn print_report_csv(report: &SearchReport) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_report_rows(report, false) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_birdlist_csv(names: &[String]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_name_rows(names) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}
