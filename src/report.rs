// Narrative analysis report.
//
// Renders a markdown document ranking teams per metric, worst first, from
// the per-team summary rows of the averages tables. Daily rows never feed
// the rankings.
use std::path::PathBuf;

use chrono::Local;
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing::{info, warn};

use crate::aggregator::{AveragesRow, AveragesTable};
use crate::config::Settings;
use crate::error::PipelineError;
use crate::pipeline::ProcessingResult;
use crate::temporal::fmt2;

pub struct ReportGenerator<'a> {
    settings: &'a Settings,
}

impl<'a> ReportGenerator<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Render and save the report. Returns the written path, or `None` when
    /// there is nothing to analyse.
    pub fn generate(&self, result: &ProcessingResult) -> Result<Option<PathBuf>, PipelineError> {
        let Some(body) = self.render(result) else {
            warn!("no aggregated data available, skipping report");
            return Ok(None);
        };
        let path = self.settings.output_path(&self.settings.files.report);
        std::fs::write(&path, body).map_err(|source| PipelineError::Write {
            path: path.clone(),
            source,
        })?;
        info!("analysis report saved to {}", path.display());
        Ok(Some(path))
    }

    /// Build the full markdown document, or `None` if neither averages table
    /// has rows.
    pub fn render(&self, result: &ProcessingResult) -> Option<String> {
        if !result.has_productive_data() && !result.has_unproductive_data() {
            return None;
        }

        let mut doc = String::new();
        doc.push_str("# RELATÓRIO DE ANÁLISE DE DESEMPENHO DAS EQUIPES\n\n");
        doc.push_str(&format!("Data: {}\n\n", Local::now().format("%d/%m/%Y")));
        self.push_introduction(&mut doc);
        self.push_methodology(&mut doc);

        let mut section = 3;
        if let Some(averages) = result.productive_averages.as_ref() {
            if !averages.rows.is_empty() {
                self.push_analysis_section(&mut doc, averages, "PRODUTIVAS", section);
                section += 1;
            }
        }
        if let Some(averages) = result.unproductive_averages.as_ref() {
            if !averages.rows.is_empty() {
                self.push_analysis_section(&mut doc, averages, "IMPRODUTIVAS", section);
                section += 1;
            }
        }
        push_conclusions(&mut doc, section);
        Some(doc)
    }

    fn push_introduction(&self, doc: &mut String) {
        doc.push_str("## 1. INTRODUÇÃO\n\n");
        doc.push_str(
            "Este relatório apresenta uma análise detalhada do desempenho das equipes \
             operacionais, com foco nos principais indicadores de produtividade e \
             eficiência. A análise é dividida em registros produtivos e registros \
             improdutivos, conforme classificação do sistema. Para cada métrica, as \
             equipes são classificadas da pior para a melhor performance, com destaque \
             para aquelas que apresentam desvios em relação às metas estabelecidas.\n\n",
        );
    }

    fn push_methodology(&self, doc: &mut String) {
        let targets = &self.settings.targets;
        doc.push_str("## 2. METODOLOGIA\n\n");
        doc.push_str(
            "As métricas foram calculadas com base nos registros de apontamento das \
             equipes, considerando os seguintes parâmetros:\n\n",
        );
        doc.push_str(&format!(
            "- *TempExe_min: tempo de execução (Liberada - No_Local) - Meta: {}min \
             (produtivo) / {}min (improdutivo)*\n",
            targets.temp_exe_productive, targets.temp_exe_unproductive
        ));
        doc.push_str("- *TempDesl_min: tempo de deslocamento (No_Local - A_Caminho)*\n");
        doc.push_str(
            "- *TempPrepEquipe_min: tempo de preparação da equipe entre ordens*\n",
        );
        doc.push_str(&format!(
            "- *Tempo de utilização: TempExe_min + TempDesl_min - Meta: {:.0}% de \
             {}min ({:.1}min)*\n",
            targets.utilizacao_meta * 100.0,
            targets.jornada_total,
            targets.tempo_util_meta()
        ));
        doc.push_str("- *AtrasLogin_min: atraso de login em relação ao início do calendário*\n");
        doc.push_str("- *TempSemOrdem: tempo da jornada sem ordem atribuída*\n\n");
    }

    fn push_analysis_section(
        &self,
        doc: &mut String,
        averages: &AveragesTable,
        tipo: &str,
        section: usize,
    ) {
        doc.push_str(&format!("## {section}. ANÁLISE DE REGISTROS {tipo}\n\n"));

        let summary: Vec<&AveragesRow> =
            averages.rows.iter().filter(|r| r.is_summary).collect();
        if summary.is_empty() {
            doc.push_str(&format!(
                "Nenhum dado disponível para análise de registros {tipo}.\n\n"
            ));
            return;
        }

        let calc = &self.settings.calculated;
        let mut subsection = 1;

        if let Some(ranking) = ranking(averages, &summary, &calc.temp_exe) {
            let meta = if tipo == "PRODUTIVAS" {
                self.settings.targets.temp_exe_productive
            } else {
                self.settings.targets.temp_exe_unproductive
            };
            push_ranking_table(
                doc,
                &format!("{section}.{subsection} Tempo de Execução (TempExe_min)"),
                Some(&format!("Meta: {meta} min")),
                "Tempo médio de execução das atividades. Valores muito baixos podem \
                 indicar erro de apontamento nos momentos 'No_Local' e 'Liberada'.",
                &ranking,
            );
            subsection += 1;
        }

        if let Some(ranking) = ranking(averages, &summary, &calc.temp_desl) {
            push_ranking_table(
                doc,
                &format!("{section}.{subsection} Tempo de Deslocamento (TempDesl_min)"),
                None,
                "Tempo médio de deslocamento. Valores muito baixos podem indicar erro \
                 de apontamento nos momentos 'A_Caminho' e 'No_Local'.",
                &ranking,
            );
            subsection += 1;
        }

        if self.push_utilization_table(doc, averages, &summary, section, subsection) {
            subsection += 1;
        }

        if let Some(ranking) = ranking(averages, &summary, &calc.temp_prep_equipe) {
            push_ranking_table(
                doc,
                &format!("{section}.{subsection} Tempo de Preparação (TempPrepEquipe_min)"),
                None,
                "Tempo de preparação da equipe. Valores elevados indicam possível \
                 ociosidade entre atividades.",
                &ranking,
            );
            subsection += 1;
        }

        if let Some(ranking) = ranking(averages, &summary, &calc.atras_login) {
            push_ranking_table(
                doc,
                &format!("{section}.{subsection} Atraso de Login (AtrasLogin_min)"),
                None,
                "Atraso médio entre o início do calendário e o primeiro login. \
                 Valores elevados reduzem a jornada efetiva.",
                &ranking,
            );
            subsection += 1;
        }

        if let Some(ranking) = ranking(averages, &summary, &calc.temp_sem_ordem) {
            push_ranking_table(
                doc,
                &format!("{section}.{subsection} Tempo Sem Ordem (TempSemOrdem)"),
                None,
                "Tempo médio da jornada sem ordem atribuída. Valores elevados indicam \
                 ociosidade operacional significativa.",
                &ranking,
            );
        }
    }

    /// Utilization = execution + displacement against the shift target, sorted
    /// worst (lowest) first. Returns whether the table was emitted.
    fn push_utilization_table(
        &self,
        doc: &mut String,
        averages: &AveragesTable,
        summary: &[&AveragesRow],
        section: usize,
        subsection: usize,
    ) -> bool {
        let calc = &self.settings.calculated;
        let (Some(exe_idx), Some(desl_idx)) = (
            metric_index(averages, &calc.temp_exe),
            metric_index(averages, &calc.temp_desl),
        ) else {
            return false;
        };

        let targets = &self.settings.targets;
        let mut entries: Vec<(String, f64, f64)> = summary
            .iter()
            .filter_map(|row| {
                let total = row.means[exe_idx]? + row.means[desl_idx]?;
                let percent = total / targets.jornada_total * 100.0;
                Some((row.team.clone(), total, percent))
            })
            .collect();
        if entries.is_empty() {
            return false;
        }
        entries.sort_by(|a, b| a.2.total_cmp(&b.2));

        doc.push_str(&format!("### {section}.{subsection} Tempo de Utilização\n\n"));
        doc.push_str(&format!(
            "**Meta: {:.0}% de {}min ({:.1}min)**\n\n",
            targets.utilizacao_meta * 100.0,
            targets.jornada_total,
            targets.tempo_util_meta()
        ));
        doc.push_str(
            "Tempo total de trabalho produtivo (execução + deslocamento). Valores \
             abaixo da meta indicam subutilização da jornada.\n\n",
        );

        let mut builder = Builder::default();
        builder.push_record(["Posição", "Equipe", "Tempo (min)", "Utilização (%)"]);
        for (pos, (team, total, percent)) in entries.iter().enumerate() {
            builder.push_record([
                (pos + 1).to_string(),
                team.clone(),
                fmt2(*total),
                format!("{percent:.1}%"),
            ]);
        }
        doc.push_str(&builder.build().with(Style::markdown()).to_string());
        doc.push_str("\n\n");
        true
    }
}

fn metric_index(averages: &AveragesTable, column: &str) -> Option<usize> {
    averages.metric_columns.iter().position(|c| c == column)
}

/// (team, mean) pairs for one metric, sorted worst (highest) first. `None`
/// when the metric column is absent or no summary row carries a value.
fn ranking(
    averages: &AveragesTable,
    summary: &[&AveragesRow],
    column: &str,
) -> Option<Vec<(String, f64)>> {
    let idx = metric_index(averages, column)?;
    let mut entries: Vec<(String, f64)> = summary
        .iter()
        .filter_map(|row| row.means[idx].map(|v| (row.team.clone(), v)))
        .collect();
    if entries.is_empty() {
        return None;
    }
    entries.sort_by(|a, b| b.1.total_cmp(&a.1));
    Some(entries)
}

fn push_ranking_table(
    doc: &mut String,
    heading: &str,
    meta: Option<&str>,
    description: &str,
    entries: &[(String, f64)],
) {
    doc.push_str(&format!("### {heading}\n\n"));
    if let Some(meta) = meta {
        doc.push_str(&format!("**{meta}**\n\n"));
    }
    doc.push_str(description);
    doc.push_str("\n\n");

    let mut builder = Builder::default();
    builder.push_record(["Posição", "Equipe", "Média (min)"]);
    for (pos, (team, value)) in entries.iter().enumerate() {
        builder.push_record([(pos + 1).to_string(), team.clone(), fmt2(*value)]);
    }
    doc.push_str(&builder.build().with(Style::markdown()).to_string());
    doc.push_str("\n\n");
}

fn push_conclusions(doc: &mut String, section: usize) {
    doc.push_str(&format!("## {section}. CONCLUSÕES E RECOMENDAÇÕES\n\n"));
    doc.push_str("Com base na análise realizada, observa-se que:\n\n");
    let conclusions = [
        "As equipes com pior desempenho nas métricas de tempo devem receber atenção especial;",
        "Valores muito abaixo do padrão em TempExe_min e TempDesl_min sugerem necessidade \
         de treinamento sobre apontamento correto;",
        "Tempos sem ordem elevados indicam oportunidades de melhoria na gestão operacional;",
        "Atrasos de login recorrentes requerem verificação do cumprimento da jornada;",
        "Recomenda-se acompanhamento periódico destes indicadores para melhoria contínua.",
    ];
    for (i, conclusion) in conclusions.iter().enumerate() {
        doc.push_str(&format!("{}. {conclusion}\n", i + 1));
    }
    doc.push_str(
        "\nEste relatório deve ser utilizado como base para planos de ação corretivos \
         e preventivos.\n",
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn averages(rows: Vec<AveragesRow>) -> AveragesTable {
        AveragesTable {
            team_header: "Equipe".to_string(),
            metric_columns: vec![
                "TempPrepEquipe_min".to_string(),
                "TempExe_min".to_string(),
                "TempDesl_min".to_string(),
                "TempoPadrao_min".to_string(),
                "Jornada_min".to_string(),
                "AtrasLogin_min".to_string(),
                "TempSemOrdem".to_string(),
            ],
            has_return_to_base: false,
            rows,
        }
    }

    fn summary_row(team: &str, exe: f64, desl: f64) -> AveragesRow {
        AveragesRow {
            team: team.to_string(),
            date: None,
            is_summary: true,
            means: vec![
                Some(10.0),
                Some(exe),
                Some(desl),
                None,
                Some(468.0),
                Some(5.0),
                Some(30.0),
            ],
            order_count: 4,
            return_to_base: None,
        }
    }

    fn daily_row(team: &str) -> AveragesRow {
        AveragesRow {
            team: team.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1),
            is_summary: false,
            means: vec![Some(999.0); 7],
            order_count: 2,
            return_to_base: None,
        }
    }

    fn result_with(productive: Vec<AveragesRow>) -> ProcessingResult {
        ProcessingResult {
            productive_averages: Some(averages(productive)),
            success: true,
            ..Default::default()
        }
    }

    #[test]
    fn no_data_means_no_report() {
        let generator_settings = Settings::default();
        let generator = ReportGenerator::new(&generator_settings);
        assert!(generator.render(&ProcessingResult::default()).is_none());
    }

    #[test]
    fn rankings_use_summary_rows_only_worst_first() {
        let settings = Settings::default();
        let result = result_with(vec![
            daily_row("T1"),
            summary_row("T1", 30.0, 12.0),
            daily_row("T2"),
            summary_row("T2", 55.0, 8.0),
        ]);
        let doc = ReportGenerator::new(&settings).render(&result).unwrap();

        // Daily means never leak into the rankings.
        assert!(!doc.contains("999.00"));
        // Worst execution time ranks first.
        let t2 = doc.find("55.00").unwrap();
        let t1 = doc.find("30.00").unwrap();
        assert!(t2 < t1);
        assert!(doc.contains("| T2"));
        assert!(doc.contains("## 3. ANÁLISE DE REGISTROS PRODUTIVAS"));
        assert!(doc.contains("## 4. CONCLUSÕES E RECOMENDAÇÕES"));
    }

    #[test]
    fn utilization_compares_against_the_shift_target() {
        let settings = Settings::default();
        let result = result_with(vec![summary_row("T1", 300.0, 97.8)]);
        let doc = ReportGenerator::new(&settings).render(&result).unwrap();
        assert!(doc.contains("Meta: 85% de 468min (397.8min)"));
        // 397.80 of 468 = 85.0%
        assert!(doc.contains("397.80"));
        assert!(doc.contains("85.0%"));
    }

    #[test]
    fn generate_writes_the_report_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::default().with_output_dir(dir.path());
        let result = result_with(vec![summary_row("T1", 30.0, 12.0)]);
        let path = ReportGenerator::new(&settings)
            .generate(&result)
            .unwrap()
            .unwrap();
        let body = std::fs::read_to_string(path).unwrap();
        assert!(body.starts_with("# RELATÓRIO DE ANÁLISE DE DESEMPENHO DAS EQUIPES"));
    }
}
