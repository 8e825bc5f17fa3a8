use colored::*;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use super::fit::Fit;
use super::report::Report;

fn header_cell(text: &str) -> Cell {
    Cell::new(text).fg(Color::Cyan).add_attribute(Attribute::Bold)
}

fn fit_cell(fit: &Fit) -> Cell {
    let color = match fit {
        Fit::Accelerator => Color::Green,
        Fit::Hybrid { .. } => Color::Yellow,
        Fit::DoesNotFit => Color::Red,
    };
    Cell::new(fit.to_string()).fg(color)
}

/// Builds the variant table for a report.
pub fn report_table(report: &Report) -> Table {
    let mut table = Table::new();
    table
        .set_header(vec![
            header_cell("Model / Quant"),
            header_cell("Total Size"),
            header_cell("Req. Memory (+Ctx)"),
            header_cell("Local"),
            header_cell("Fit"),
        ])
        .load_preset(comfy_table::presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    for row in &report.rows {
        table.add_row(vec![
            Cell::new(&row.variant.display_name).fg(Color::Cyan),
            Cell::new(format!("{:.2} GB", row.size_gb)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2} GB", row.required_gb))
                .fg(Color::Magenta)
                .set_alignment(CellAlignment::Right),
            Cell::new(if row.local { "✅" } else { "" }).set_alignment(CellAlignment::Center),
            fit_cell(&row.fit),
        ]);
    }
    table
}

/// Prints the analysis table followed by the recommendation panel.
pub fn print_report(report: &Report) {
    println!("\n{}", format!("Memory analysis: {}", report.repo_id).bold());
    println!(
        "{}",
        format!(
            "Hardware: RAM {:.1} GB | VRAM {:.1} GB",
            report.hardware.system_memory_gb, report.hardware.accelerator_memory_gb
        )
        .bright_black()
    );
    println!("{}", report_table(report));

    if let Some(best) = report.recommended() {
        let mut panel = Table::new();
        panel
            .set_header(vec![Cell::new("🎯 Recommendation").fg(Color::Green).add_attribute(Attribute::Bold)])
            .load_preset(comfy_table::presets::UTF8_FULL)
            .add_row(vec![Cell::new(format!(
                "Best fit for your hardware: {}",
                best.variant.display_name
            ))
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold)]);
        println!("{}", panel);
    } else {
        println!("{}", "No variant fits this machine.".red());
    }
}

/// Notice for repositories without any model file left after filtering.
pub fn print_no_qualifying_files(repo_id: &str) {
    println!("{}", format!("{} does not contain any GGUF model files.", repo_id).yellow());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use crate::analyzer::build_report;
    use crate::hardware::HardwareProfile;
    use crate::hub::RemoteFile;

    #[test]
    fn table_lists_every_variant() {
        let files = vec![
            RemoteFile::new("a.Q4_K_M.gguf", 4 << 30),
            RemoteFile::new("a.Q8_0.gguf", 8 << 30),
        ];
        let report = build_report("o/a", &files, &HardwareProfile::new(32.0, 8.0), &HashSet::new()).unwrap();
        let rendered = report_table(&report).to_string();
        assert!(rendered.contains("a.Q4_K_M.gguf"));
        assert!(rendered.contains("a.Q8_0.gguf"));
        assert!(rendered.contains("4.00 GB"));
        assert!(rendered.contains("4.60 GB"));
    }
}
