use crate::errors::ChecklistError;
use crate::models::{Planned, Presence, ReportMetadata, TaskRecord, TaskStatus};
use crate::stats::Stats;
use chrono::NaiveDate;
use csv::{QuoteStyle, WriterBuilder};

const CSV_HEADER: [&str; 8] = [
    "Hall",
    "Lieu",
    "Désignation",
    "Planifié",
    "Statut",
    "Photo avant",
    "Photo après",
    "Commentaire",
];

const UNSET_STATUS: &str = "Non défini";
const SHARE_BASE_URL: &str = "https://wa.me/?text=";

pub fn csv_filename(date: NaiveDate) -> String {
    format!("checklist_nettoyage_{}.csv", date.format("%Y-%m-%d"))
}

/// Header plus one row per task, every field quoted.
pub fn to_csv(tasks: &[TaskRecord]) -> Result<String, ChecklistError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for task in tasks {
        writer.write_record([
            task.facility.as_str(),
            task.zone_group.as_str(),
            task.location.as_str(),
            planned_label(task.planned),
            task.status.map_or(UNSET_STATUS, status_label),
            presence_label(task.photo_before),
            presence_label(task.photo_after),
            task.comment.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ChecklistError::Export(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| ChecklistError::Export(err.to_string()))
}

/// Message body for sharing the report through a chat app.
pub fn to_share_text(
    metadata: &ReportMetadata,
    facility: &str,
    stats: &Stats,
    tasks: &[TaskRecord],
) -> String {
    let responsible = or_placeholder(&metadata.responsible, "Non spécifié");
    let start_time = or_placeholder(&metadata.start_time, "Non spécifiée");
    let end_time = or_placeholder(&metadata.end_time, "Non spécifiée");

    let planned: Vec<&TaskRecord> = tasks.iter().filter(|task| task.is_planned()).collect();
    let details = if planned.is_empty() {
        "Aucune tâche planifiée pour ce rapport.\n".to_string()
    } else {
        planned
            .iter()
            .map(|task| format!("{} {}\n", status_glyph(task.status), task.location))
            .collect()
    };

    format!(
        "*Rapport de nettoyage*\n\
         \n\
         Hall: {facility}\n\
         Date: {date}\n\
         Responsable: {responsible}\n\
         Effectif: {staff} personne(s)\n\
         Heure de début: {start_time}\n\
         Heure de fin: {end_time}\n\
         \n\
         *Statistiques:*\n\
         Taux de réalisation: {rate}%\n\
         Tâches planifiées: {planned_count}\n\
         Tâches réalisées: {done_count}\n\
         \n\
         *Détails des travaux:*\n\
         {details}\
         \n\
         ---\n\
         Rapport généré automatiquement par l'application Checklist Nettoyage",
        date = metadata.date.format("%d/%m/%Y"),
        staff = metadata.staff_count,
        rate = stats.completion_rate,
        planned_count = stats.planned_count,
        done_count = stats.done_count,
    )
}

pub fn share_url(text: &str) -> String {
    format!("{SHARE_BASE_URL}{}", urlencoding::encode(text))
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() { placeholder } else { value }
}

fn planned_label(planned: Planned) -> &'static str {
    match planned {
        Planned::Yes => "Oui",
        Planned::No => "Non",
    }
}

fn status_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Done => "Fait",
        TaskStatus::NotDone => "Non fait",
        TaskStatus::Partial => "Partiel",
    }
}

fn presence_label(presence: Presence) -> &'static str {
    match presence {
        Presence::Present => "Oui",
        Presence::Absent => "Non",
    }
}

fn status_glyph(status: Option<TaskStatus>) -> &'static str {
    match status {
        Some(TaskStatus::Done) => "✅",
        Some(TaskStatus::NotDone) => "❌",
        Some(TaskStatus::Partial) => "⚠️",
        None => "⏳",
    }
}
