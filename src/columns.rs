// Canonical field keys and the header resolver.
//
// Downstream stages never hard-code header text (the preparation-time and
// idle-time algorithms excepted, see `calculator`): they ask the `ColumnMap`
// built once per loaded table. Resolution tries each configured candidate
// spelling in order and keeps the first one present in the header set; a key
// with no match is structurally missing, not an error.
use std::collections::HashMap;

use tracing::debug;

use crate::config::ColumnAliases;
use crate::table::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKey {
    /// Dispatch timestamp.
    Despachada,
    /// En-route timestamp.
    ACaminho,
    /// On-site timestamp.
    NoLocal,
    /// Release timestamp.
    Liberada,
    /// Break start timestamp.
    InicioIntervalo,
    /// Break end timestamp.
    FimIntervalo,
    /// Shift start timestamp.
    InicioCalendario,
    /// Shift end timestamp.
    FimCalendario,
    /// First login timestamp ("0" and empty are sentinel missing values).
    PrimeiroLogin,
    /// Fallback login timestamp.
    LoginAlt,
    /// Team identifier.
    Equipe,
    /// Productive/unproductive status.
    Status,
    /// Execution time in minutes, supplied by the source system.
    TrOrdem,
    /// Displacement time in minutes, supplied by the source system.
    TlOrdem,
    /// Standard time in minutes, supplied by the source system.
    TempoPadrao,
    /// Total worked hours, carried through for the export layer.
    TotalHoras,
    /// Return-to-base figure.
    RetornoBase,
    /// Reference date pairing with the team to identify a shift.
    DataReferencia,
}

impl ColumnKey {
    pub const ALL: [ColumnKey; 18] = [
        ColumnKey::Despachada,
        ColumnKey::ACaminho,
        ColumnKey::NoLocal,
        ColumnKey::Liberada,
        ColumnKey::InicioIntervalo,
        ColumnKey::FimIntervalo,
        ColumnKey::InicioCalendario,
        ColumnKey::FimCalendario,
        ColumnKey::PrimeiroLogin,
        ColumnKey::LoginAlt,
        ColumnKey::Equipe,
        ColumnKey::Status,
        ColumnKey::TrOrdem,
        ColumnKey::TlOrdem,
        ColumnKey::TempoPadrao,
        ColumnKey::TotalHoras,
        ColumnKey::RetornoBase,
        ColumnKey::DataReferencia,
    ];

    fn candidates<'a>(&self, aliases: &'a ColumnAliases) -> &'a [String] {
        match self {
            ColumnKey::Despachada => &aliases.despachada,
            ColumnKey::ACaminho => &aliases.a_caminho,
            ColumnKey::NoLocal => &aliases.no_local,
            ColumnKey::Liberada => &aliases.liberada,
            ColumnKey::InicioIntervalo => &aliases.inicio_intervalo,
            ColumnKey::FimIntervalo => &aliases.fim_intervalo,
            ColumnKey::InicioCalendario => &aliases.inicio_calendario,
            ColumnKey::FimCalendario => &aliases.fim_calendario,
            ColumnKey::PrimeiroLogin => &aliases.primeiro_login,
            ColumnKey::LoginAlt => &aliases.login_alt,
            ColumnKey::Equipe => &aliases.equipe,
            ColumnKey::Status => &aliases.status,
            ColumnKey::TrOrdem => &aliases.tr_ordem,
            ColumnKey::TlOrdem => &aliases.tl_ordem,
            ColumnKey::TempoPadrao => &aliases.tempo_padrao,
            ColumnKey::TotalHoras => &aliases.total_horas,
            ColumnKey::RetornoBase => &aliases.retorno_base,
            ColumnKey::DataReferencia => &aliases.data_referencia,
        }
    }
}

/// Canonical key → literal header actually present in the table.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    resolved: HashMap<ColumnKey, String>,
}

impl ColumnMap {
    /// Resolve every canonical key against the table's header set.
    ///
    /// Must be rebuilt whenever a new table is loaded.
    pub fn resolve(table: &Table, aliases: &ColumnAliases) -> Self {
        let mut resolved = HashMap::new();
        for key in ColumnKey::ALL {
            let hit = key
                .candidates(aliases)
                .iter()
                .find(|candidate| table.has_column(candidate));
            match hit {
                Some(header) => {
                    resolved.insert(key, header.clone());
                }
                None => debug!(?key, "column not resolved"),
            }
        }
        Self { resolved }
    }

    pub fn get(&self, key: ColumnKey) -> Option<&str> {
        self.resolved.get(&key).map(String::as_str)
    }

    pub fn is_resolved(&self, key: ColumnKey) -> bool {
        self.resolved.contains_key(&key)
    }

    /// Cell lookup routed through the resolved header.
    pub fn cell<'t>(&self, table: &'t Table, row: usize, key: ColumnKey) -> Option<&'t str> {
        let header = self.get(key)?;
        table.cell(row, header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with(headers: &[&str]) -> Table {
        Table::new(headers.iter().map(|h| h.to_string()).collect())
    }

    #[test]
    fn first_present_candidate_wins() {
        let aliases = ColumnAliases::default();
        // Accented variant only; it is second in the candidate list.
        let table = table_with(&["Equipe", "Início Intervalo", "Fim_Intervalo"]);
        let map = ColumnMap::resolve(&table, &aliases);
        assert_eq!(map.get(ColumnKey::InicioIntervalo), Some("Início Intervalo"));
        assert_eq!(map.get(ColumnKey::FimIntervalo), Some("Fim_Intervalo"));
    }

    #[test]
    fn unmatched_keys_stay_unresolved() {
        let aliases = ColumnAliases::default();
        let table = table_with(&["Equipe"]);
        let map = ColumnMap::resolve(&table, &aliases);
        assert!(map.is_resolved(ColumnKey::Equipe));
        assert!(!map.is_resolved(ColumnKey::Status));
        assert_eq!(map.get(ColumnKey::Despachada), None);
    }

    #[test]
    fn cell_reads_through_the_resolved_header() {
        let aliases = ColumnAliases::default();
        let mut table = table_with(&["Equipe", "Log In"]);
        table.push_row(vec!["T1".into(), "01/02/2024 08:00".into()]);
        let map = ColumnMap::resolve(&table, &aliases);
        assert_eq!(map.cell(&table, 0, ColumnKey::LoginAlt), Some("01/02/2024 08:00"));
        assert_eq!(map.cell(&table, 0, ColumnKey::Status), None);
    }
}
