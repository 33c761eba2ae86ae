use anyhow::Result;
use chrono::NaiveDate;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;

use spiritlog_core::{CharacterStatRow, Dashboard, ParticipantSummary};

#[derive(Serialize)]
struct JsonReport<'a> {
    seed: u64,
    #[serde(flatten)]
    dashboard: &'a Dashboard,
}

fn date_cell(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "-".to_string(), |d| d.to_string())
}

fn favorite_text(summary: &ParticipantSummary) -> String {
    summary.favorite.as_ref().map_or_else(
        || "none yet".to_string(),
        |f| format!("{} ({} plays)", f.spirit, f.plays),
    )
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn generate_console_report(
    writer: &mut dyn Write,
    dashboard: &Dashboard,
    seed: u64,
) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "📊 Participant Summary".bright_cyan().bold())?;
    writeln!(writer, "{}", "======================".cyan())?;
    if dashboard.summaries.is_empty() {
        writeln!(writer, "No tracked participants in the play log.")?;
    }
    for summary in &dashboard.summaries {
        writeln!(
            writer,
            "{:6} {} plays, favorite: {}",
            summary.participant.bold(),
            summary.total_plays.to_string().green(),
            favorite_text(summary)
        )?;
    }
    writeln!(writer)?;

    writeln!(
        writer,
        "{}",
        format!(
            "🌿 Spirits (by {}, {:?})",
            dashboard.sort.key, dashboard.sort.direction
        )
        .bright_green()
        .bold()
    )?;
    writeln!(writer, "{}", "-".repeat(30).green())?;
    for row in dashboard.projected() {
        write!(
            writer,
            "{:42} {:10} {:26}",
            row.spirit.id,
            row.spirit.complexity.label(),
            row.spirit.source
        )?;
        for participant in &dashboard.participants {
            write!(
                writer,
                "  {participant}: {:>3} / {:10}",
                row.plays(participant),
                date_cell(row.last_played(participant))
            )?;
        }
        writeln!(writer)?;
    }
    writeln!(writer)?;

    writeln!(writer, "{}", "🎯 Spirit Suggestions".bright_yellow().bold())?;
    writeln!(writer, "{}", "-".repeat(30).yellow())?;
    for recs in &dashboard.spirit_recommendations {
        writeln!(writer, "{}", recs.participant.bold())?;
        for pick in &recs.picks {
            writeln!(
                writer,
                "   {:10} {} ({})",
                pick.tier.label(),
                pick.spirit.green(),
                pick.reason
            )?;
        }
    }
    writeln!(writer)?;

    writeln!(writer, "{}", "⚔️  Adversary Suggestions".bright_red().bold())?;
    writeln!(writer, "{}", "-".repeat(30).red())?;
    for pick in &dashboard.adversary_recommendations {
        writeln!(
            writer,
            "   {:40} level {} (difficulty {}) - {}",
            pick.adversary, pick.level, pick.difficulty, pick.reason
        )?;
    }
    writeln!(writer)?;
    writeln!(writer, "🎲 Seed: {seed}")?;
    Ok(())
}

pub fn generate_json_report(
    writer: &mut dyn Write,
    dashboard: &Dashboard,
    seed: u64,
) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &JsonReport { seed, dashboard })?;
    writeln!(writer)?;
    Ok(())
}

pub fn generate_markdown_report(
    writer: &mut dyn Write,
    dashboard: &Dashboard,
    seed: u64,
) -> Result<()> {
    writeln!(writer, "# Spirit Island Play Report\n")?;

    writeln!(writer, "## Summary\n")?;
    if dashboard.summaries.is_empty() {
        writeln!(writer, "_No tracked participants in the play log._")?;
    }
    for summary in &dashboard.summaries {
        writeln!(
            writer,
            "- **{}**: {} plays, favorite: {}",
            summary.participant,
            summary.total_plays,
            favorite_text(summary)
        )?;
    }
    writeln!(writer)?;

    writeln!(
        writer,
        "## Spirits\n\n_Sorted by {} ({:?})._\n",
        dashboard.sort.key, dashboard.sort.direction
    )?;
    write!(writer, "| Spirit | Complexity | Source |")?;
    for participant in &dashboard.participants {
        write!(writer, " {participant} plays | {participant} last played |")?;
    }
    writeln!(writer)?;
    write!(writer, "|---|---|---|")?;
    for _ in &dashboard.participants {
        write!(writer, "---:|---|")?;
    }
    writeln!(writer)?;
    for row in dashboard.projected() {
        write_markdown_row(writer, row, &dashboard.participants)?;
    }
    writeln!(writer)?;

    writeln!(writer, "## Spirit Suggestions\n")?;
    for recs in &dashboard.spirit_recommendations {
        writeln!(writer, "### {}\n", recs.participant)?;
        for pick in &recs.picks {
            writeln!(
                writer,
                "- **{}**: {} ({})",
                pick.tier, pick.spirit, pick.reason
            )?;
        }
        writeln!(writer)?;
    }

    writeln!(writer, "## Adversary Suggestions\n")?;
    writeln!(writer, "| Adversary | Level | Difficulty | Reason |")?;
    writeln!(writer, "|---|---:|---:|---|")?;
    for pick in &dashboard.adversary_recommendations {
        writeln!(
            writer,
            "| {} | {} | {} | {} |",
            pick.adversary, pick.level, pick.difficulty, pick.reason
        )?;
    }
    writeln!(writer)?;
    writeln!(writer, "_Seed: {seed}_")?;
    Ok(())
}

fn write_markdown_row(
    writer: &mut dyn Write,
    row: &CharacterStatRow,
    participants: &[String],
) -> Result<()> {
    write!(
        writer,
        "| {} | {} | {} |",
        row.spirit.id, row.spirit.complexity, row.spirit.source
    )?;
    for participant in participants {
        write!(
            writer,
            " {} | {} |",
            row.plays(participant),
            date_cell(row.last_played(participant))
        )?;
    }
    writeln!(writer)?;
    Ok(())
}

pub fn generate_csv_report(writer: &mut dyn Write, dashboard: &Dashboard) -> Result<()> {
    write!(writer, "spirit,complexity,source")?;
    for participant in &dashboard.participants {
        let id = csv_field(participant);
        write!(writer, ",{id}_plays,{id}_last_played")?;
    }
    writeln!(writer)?;

    for row in dashboard.projected() {
        write!(
            writer,
            "{},{},{}",
            csv_field(&row.spirit.id),
            csv_field(row.spirit.complexity.label()),
            csv_field(&row.spirit.source)
        )?;
        for participant in &dashboard.participants {
            let last = row
                .last_played(participant)
                .map(|d| d.to_string())
                .unwrap_or_default();
            write!(writer, ",{},{last}", row.plays(participant))?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_fields_are_quoted_when_needed() {
        assert_eq!(csv_field("Thunderspeaker"), "Thunderspeaker");
        assert_eq!(csv_field("Branch & Claw"), "Branch & Claw");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn missing_dates_render_as_dash() {
        assert_eq!(date_cell(None), "-");
        assert_eq!(
            date_cell(NaiveDate::from_ymd_opt(2024, 4, 1)),
            "2024-04-01"
        );
    }
}
