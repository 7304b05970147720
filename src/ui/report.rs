use colored::*;
use crate::config::{Preset, ScanProfile};
use crate::metadata::Rule;
use crate::pipeline::RunSummary;

pub fn print_summary(summary: &RunSummary) {
    if !summary.skipped.is_empty() {
        println!("\n{}", format!("Skipped {} unreadable file(s):", summary.skipped.len()).yellow());
        for skipped in &summary.skipped {
            println!("  {} {}", "•".yellow(), skipped.reason);
        }
    }

    match &summary.output {
        Some(path) => {
            println!("\n{}", "✓ Extraction complete!".green().bold());
            println!("Results saved to: {}", path.display());
            println!("Total files processed: {}", summary.processed());
        }
        None => {
            println!(
                "\n{} No data extracted. Check that your .log files contain the expected energy block format.",
                "⚠".yellow()
            );
        }
    }
}

pub fn print_presets() {
    for preset in Preset::all() {
        print_profile(preset, &preset.profile());
    }
}

fn print_profile(preset: Preset, profile: &ScanProfile) {
    println!("{}", format!("Preset: {}", preset).bold().blue());
    println!("  Files:     *{}", profile.filter.suffix);
    if !profile.filter.exclude_substrings.is_empty() {
        println!("  Skip if name contains: {}", profile.filter.exclude_substrings.join(", "));
    }
    if !profile.filter.exclude_names.is_empty() {
        println!("  Skip names: {}", profile.filter.exclude_names.join(", "));
    }
    println!("  Encoding:  {}", profile.encoding);

    println!("  Fields:");
    for field in profile.fields.patterns() {
        println!("    {:<26} {}", field.label.cyan(), field.pattern().dimmed());
    }

    println!("  Folder labels:");
    for rule in profile.metadata.rules() {
        let kind = match rule.rule {
            Rule::Positional(_) => "position",
            Rule::FirstMatch { .. } => "content",
        };
        println!("    {:<26} {} ({})", rule.label.cyan(), rule.rule, kind);
    }

    println!("  Columns:   {}", profile.columns.join(", "));
    println!();
}
