//! Terminal rendering for wizard screens and proxy answers
//!
//! Every function returns the text instead of printing it so the binary
//! decides where it goes.

use chrono::{DateTime, Local};
use colored::Colorize;
use domain_schema::{ModelStatus, PredictionResult, TrainingResponse, UploadEnvelope};

use crate::wizard::Progress;

/// `dd/mm/yyyy HH:MM:SS` in local time, or the raw text when it does not parse
pub fn format_timestamp(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|t| t.with_timezone(&Local).format("%d/%m/%Y %H:%M:%S").to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}

/// Percentage with one decimal, hidden when the backend gave no probability
fn probability_line(probabilidade: f64) -> Option<String> {
    (probabilidade > 0.0).then(|| format!("Probabilidade: {:.1}%", probabilidade * 100.0))
}

pub fn progress_header(title: &str, progress: Progress) -> String {
    format!(
        "{}\n{} {}",
        title.bold().cyan(),
        format!("Passo {} de {}", progress.step, progress.total).dimmed(),
        format!("({}%)", progress.percent).bold()
    )
}

pub fn prediction_report(result: &PredictionResult) -> String {
    let mut lines = vec![format!("{}", "Resultado da Análise".bold())];

    if result.is_error() {
        lines.push(format!("{}", "Erro na análise".red().bold()));
        lines.push(format!("  {}", result.error.as_deref().unwrap_or_default().red()));
        return lines.join("\n");
    }

    lines.push(format!("{}", "Tempo de Cura Previsto".green()));
    lines.push(format!("  {}", result.tempo_cura.green().bold()));
    if let Some(probability) = probability_line(result.probabilidade) {
        lines.push(format!("  {}", probability));
    }
    lines.push(format!(
        "{} {}",
        "Análise realizada em:".dimmed(),
        format_timestamp(&result.timestamp)
    ));
    lines.join("\n")
}

/// Answers shown on the confirmation screen before submission
pub fn summary_table(summary: &[(&str, String)]) -> String {
    let width = summary.iter().map(|(title, _)| title.chars().count()).max().unwrap_or(0);
    summary
        .iter()
        .map(|(title, value)| {
            let padding = width.saturating_sub(title.chars().count());
            format!("  {}{} {}", title.dimmed(), " ".repeat(padding), value)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn upload_report(envelope: &UploadEnvelope) -> String {
    match envelope.encrypted_file_reference() {
        Some(reference) if envelope.is_created() => format!(
            "{} {}",
            "Arquivo enviado:".green().bold(),
            reference
        ),
        _ => format!(
            "{} {}",
            format!("Falha no upload ({}):", envelope.status).red().bold(),
            envelope.error.as_deref().unwrap_or("resposta sem referência do arquivo")
        ),
    }
}

pub fn training_report(response: &TrainingResponse) -> String {
    let mut lines = Vec::new();
    if response.success {
        lines.push(format!("{}", response.message.green().bold()));
        if let Some(model_id) = &response.model_id {
            lines.push(format!("  {} {}", "Modelo:".dimmed(), model_id.cyan()));
        }
    } else {
        lines.push(format!("{}", response.message.red().bold()));
        if let Some(error) = &response.error {
            lines.push(format!("  {}", error.red()));
        }
    }
    lines.push(format!(
        "  {} {} ({})",
        "Concluído em:".dimmed(),
        format_timestamp(&response.timestamp),
        response.status
    ));
    lines.join("\n")
}

pub fn model_status_report(status: &ModelStatus) -> String {
    if let Some(error) = &status.error {
        return format!("{} {}", "Status do modelo indisponível:".red().bold(), error);
    }
    if !status.is_trained {
        return format!(
            "{}",
            "Modelo não treinado. Envie um arquivo e treine a rede antes de analisar.".yellow()
        );
    }

    let mut lines = vec![format!("{}", "Modelo treinado".green().bold())];
    if let Some(model_id) = &status.model_id {
        lines.push(format!("  {} {}", "Modelo:".dimmed(), model_id.cyan()));
    }
    if let Some(trained_at) = &status.trained_at {
        lines.push(format!("  {} {}", "Treinado em:".dimmed(), format_timestamp(trained_at)));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success(tempo_cura: &str, probabilidade: f64) -> PredictionResult {
        PredictionResult {
            tempo_cura: tempo_cura.into(),
            probabilidade,
            timestamp: "2024-03-05T14:07:09.000Z".into(),
            status: 200,
            error: None,
            entrada_neuronio: None,
            saida_recognize: None,
        }
    }

    #[test]
    fn test_prediction_report_hides_zero_probability() {
        let report = prediction_report(&success("6 meses", 0.0));
        assert!(report.contains("6 meses"));
        assert!(!report.contains("Probabilidade"));

        let report = prediction_report(&success("6 meses", 0.873));
        assert!(report.contains("Probabilidade: 87.3%"));
    }

    #[test]
    fn test_prediction_report_for_errors() {
        let report = prediction_report(&PredictionResult::failure(400, "Rede neural não treinada."));
        assert!(report.contains("Erro na análise"));
        assert!(report.contains("Rede neural não treinada."));
        assert!(!report.contains("Tempo de Cura"));
    }

    #[test]
    fn test_unparseable_timestamp_is_shown_raw() {
        assert_eq!(format_timestamp("ontem"), "ontem");
        assert_eq!(format_timestamp("2024-03-05T14:07:09.000Z").len(), "05/03/2024 14:07:09".len());
    }

    #[test]
    fn test_summary_table_aligns_titles() {
        let table = summary_table(&[("Idade", "45".into()), ("Baciloscopia", "Positiva".into())]);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" 45"));
        assert!(lines[1].ends_with(" Positiva"));
    }

    #[test]
    fn test_model_status_variants() {
        assert!(model_status_report(&ModelStatus::untrained()).contains("não treinado"));

        let mut trained = ModelStatus::trained_at("2024-03-05T14:07:09.000Z");
        trained.model_id = Some("rna-7".into());
        let report = model_status_report(&trained);
        assert!(report.contains("Modelo treinado"));
        assert!(report.contains("rna-7"));
    }
}
