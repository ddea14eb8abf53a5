use crate::core::SearchReport;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::collections::BTreeMap;
use std::time::Duration;

pub fn print_banner() {
    println!();
    println!(
        "   {}  {}",
        "LARDER".green().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("   {}", "Pantry-Driven Recipe Finder".white());
    println!();
}

pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn log_error(msg: &str) {
    println!("{} {}", "✖ Error:".red().bold(), msg);
}

pub fn log_warning(msg: &str) {
    println!("{} {}", "⚠ Warning:".yellow().bold(), msg);
}

pub fn log_success(msg: &str) {
    println!("{} {}", "✔ Success:".green().bold(), msg);
}

pub fn print_results(report: &SearchReport) {
    println!("{}", "TOP MATCHES".bold().underline());

    if report.results.is_empty() {
        println!("No recipes matched your pantry.");
    }

    for (pos, entry) in report.results.iter().enumerate() {
        let percent = format!(
            "{}% match ({}/{})",
            entry.match_score, entry.matched_count, entry.total_ingredients
        );
        let percent = if entry.match_score >= 70.0 {
            percent.green().to_string()
        } else if entry.match_score >= 40.0 {
            percent.yellow().to_string()
        } else {
            percent.red().to_string()
        };

        println!(
            "{}. {} - {}",
            pos + 1,
            entry.recipe.name.green().bold(),
            percent
        );

        let diet = if entry.recipe.dietary.is_empty() {
            "any diet"
        } else {
            entry.recipe.dietary.as_str()
        };
        println!(
            "   {} | {} | {} min | serves {}",
            diet,
            entry.recipe.difficulty,
            entry.recipe.cook_time,
            entry.recipe.servings
        );

        if !entry.missing_ingredients.is_empty() {
            println!(
                "   Missing: {}",
                entry.missing_ingredients.join(", ").red()
            );
        }

        if !entry.recipe.nutrition.is_empty() {
            let facts: Vec<String> = entry
                .recipe
                .nutrition
                .iter()
                .map(|(name, amount)| format!("{} {}", name, amount))
                .collect();
            let label = match entry.serving_ratio {
                Some(ratio) => format!("Nutrition (x{}):", ratio),
                None => "Nutrition:".to_string(),
            };
            println!("   {} {}", label.dimmed(), facts.join(", ").dimmed());
        }

        if entry.recipe.rating_count > 0 {
            println!(
                "   Rated {} across {} ratings",
                entry.recipe.rating, entry.recipe.rating_count
            );
        }
    }

    println!();
    println!(
        "{}",
        format!(
            "{} passed filters, {} matched at least one ingredient",
            report.total_filtered, report.total_scored
        )
        .dimmed()
    );

    for warning in &report.warnings {
        log_warning(warning);
    }
    println!();
}

pub fn print_substitutions(subs: &BTreeMap<String, Vec<String>>) {
    println!("{}", "SUBSTITUTIONS".bold().underline());

    if subs.is_empty() {
        println!("No substitutions recorded for this recipe.");
    } else {
        for (ingredient, alternatives) in subs {
            println!(
                "{} -> {}",
                ingredient.green().bold(),
                alternatives.join(", ")
            );
        }
    }
    println!();
}
