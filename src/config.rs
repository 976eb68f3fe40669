// Application configuration.
//
// Everything configurable lives in one `Settings` value that is built in
// `main` and passed by reference into each component. Every field has an
// explicit default; nothing probes for optional fields at runtime.
use std::path::{Path, PathBuf};

/// Directory layout for a run.
#[derive(Debug, Clone)]
pub struct Paths {
    pub output_dir: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("result"),
        }
    }
}

/// Input/output file names, resolved against `Paths::output_dir`.
#[derive(Debug, Clone)]
pub struct FileNames {
    pub input: String,
    pub calculated: String,
    pub productive_averages: String,
    pub unproductive_averages: String,
    pub report: String,
    pub summary: String,
}

impl Default for FileNames {
    fn default() -> Self {
        Self {
            input: "deslocamento.csv".to_string(),
            calculated: "deslocamento_calculado.csv".to_string(),
            productive_averages: "medias_por_equipe_dia.csv".to_string(),
            unproductive_averages: "medias_Improdutivas_por_equipe_dia.csv".to_string(),
            report: "relatorio_analise_equipes.md".to_string(),
            summary: "resumo_execucao.json".to_string(),
        }
    }
}

/// Ordered candidate header spellings for each canonical field.
///
/// Source files have gone through several header revisions (accented and
/// unaccented, space and underscore variants); the first candidate present in
/// the loaded table wins.
#[derive(Debug, Clone)]
pub struct ColumnAliases {
    pub despachada: Vec<String>,
    pub a_caminho: Vec<String>,
    pub no_local: Vec<String>,
    pub liberada: Vec<String>,
    pub inicio_intervalo: Vec<String>,
    pub fim_intervalo: Vec<String>,
    pub inicio_calendario: Vec<String>,
    pub fim_calendario: Vec<String>,
    pub primeiro_login: Vec<String>,
    pub login_alt: Vec<String>,
    pub equipe: Vec<String>,
    pub status: Vec<String>,
    pub tr_ordem: Vec<String>,
    pub tl_ordem: Vec<String>,
    pub tempo_padrao: Vec<String>,
    pub total_horas: Vec<String>,
    pub retorno_base: Vec<String>,
    pub data_referencia: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for ColumnAliases {
    fn default() -> Self {
        Self {
            despachada: strings(&["Despachada"]),
            a_caminho: strings(&["A_Caminho"]),
            no_local: strings(&["No_Local"]),
            liberada: strings(&["Liberada"]),
            inicio_intervalo: strings(&[
                "Inicio Intervalo",
                "Início Intervalo",
                "Inicio_Intervalo",
                "Início_Intervalo",
            ]),
            fim_intervalo: strings(&["Fim Intervalo", "Fim_Intervalo"]),
            inicio_calendario: strings(&[
                "Inicio Calendario",
                "Início Calendario",
                "Inicio_Calendario",
                "Início_Calendario",
            ]),
            fim_calendario: strings(&["Fim Calendario", "Fim Calendário", "Fim_Calendario"]),
            primeiro_login: strings(&["1º Login", "1º LogIn", "1º Login Corrigido"]),
            login_alt: strings(&["Log In", "Login"]),
            equipe: strings(&["Equipe"]),
            status: strings(&[
                "status",
                "Status",
                "Situação",
                "Estado",
                "Tipo",
                "Classificação",
                "Categoria",
            ]),
            tr_ordem: strings(&["TR Ordem", "TR_Ordem"]),
            tl_ordem: strings(&["TL Ordem", "TL_Ordem"]),
            tempo_padrao: strings(&["tempo_padrao", "Tempo Padrão", "Tempo_Padrao"]),
            total_horas: strings(&["Total Horas", "Total_Horas"]),
            retorno_base: strings(&["Retorno a base", "Retorno à base", "Retorno_Base"]),
            data_referencia: strings(&["Data Referência", "Data Referencia", "Data_Referencia"]),
        }
    }
}

/// Names of the columns the calculator appends to the table.
#[derive(Debug, Clone)]
pub struct CalculatedColumns {
    pub temp_prep_equipe: String,
    pub temp_exe: String,
    pub temp_desl: String,
    pub tempo_padrao: String,
    pub jornada: String,
    pub atras_login: String,
    pub temp_sem_ordem: String,
}

impl Default for CalculatedColumns {
    fn default() -> Self {
        Self {
            temp_prep_equipe: "TempPrepEquipe_min".to_string(),
            temp_exe: "TempExe_min".to_string(),
            temp_desl: "TempDesl_min".to_string(),
            tempo_padrao: "TempoPadrao_min".to_string(),
            jornada: "Jornada_min".to_string(),
            atras_login: "AtrasLogin_min".to_string(),
            temp_sem_ordem: "TempSemOrdem".to_string(),
        }
    }
}

impl CalculatedColumns {
    /// Canonical column order used for rounding, repositioning and averaging.
    pub fn all(&self) -> [&str; 7] {
        [
            &self.temp_prep_equipe,
            &self.temp_exe,
            &self.temp_desl,
            &self.tempo_padrao,
            &self.jornada,
            &self.atras_login,
            &self.temp_sem_ordem,
        ]
    }
}

/// Target values used by the narrative report.
#[derive(Debug, Clone)]
pub struct MetricTargets {
    /// Execution-time target for productive orders, in minutes.
    pub temp_exe_productive: f64,
    /// Execution-time target for unproductive orders, in minutes.
    pub temp_exe_unproductive: f64,
    /// Full shift length, in minutes (7h48min).
    pub jornada_total: f64,
    /// Target share of the shift spent on execution + displacement.
    pub utilizacao_meta: f64,
}

impl Default for MetricTargets {
    fn default() -> Self {
        Self {
            temp_exe_productive: 50.0,
            temp_exe_unproductive: 20.0,
            jornada_total: 468.0,
            utilizacao_meta: 0.85,
        }
    }
}

impl MetricTargets {
    pub fn tempo_util_meta(&self) -> f64 {
        self.jornada_total * self.utilizacao_meta
    }
}

#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub paths: Paths,
    pub files: FileNames,
    pub columns: ColumnAliases,
    pub calculated: CalculatedColumns,
    pub targets: MetricTargets,
}

impl Settings {
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.paths.output_dir.join(file_name)
    }

    pub fn with_output_dir(mut self, dir: &Path) -> Self {
        self.paths.output_dir = dir.to_path_buf();
        self
    }
}
