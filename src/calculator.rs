// Metric derivation engine.
//
// Works on the loaded table as a whole: parses the timestamp columns, runs
// the sequential per-(team, reference-date) algorithms for preparation time
// and no-order idle time, copies the pass-through minute columns, and derives
// shift duration and login delay. Every failure is local: a row missing the
// inputs for one metric gets a missing cell for that metric and nothing else;
// no row is ever dropped.
use std::cmp::Ordering;

use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::columns::{ColumnKey, ColumnMap};
use crate::config::Settings;
use crate::table::Table;
use crate::temporal::{diff_minutes, fmt2, parse_datetime, parse_login_datetime, parse_minutes, round2};

// The preparation-time and idle-time rules are tied to these exact header
// spellings and intentionally bypass the alias resolver.
pub const COL_EQUIPE: &str = "Equipe";
pub const COL_DATA_REF: &str = "Data Referência";
pub const COL_A_CAMINHO: &str = "A_Caminho";
pub const COL_DESPACHADA: &str = "Despachada";
pub const COL_LIBERADA: &str = "Liberada";
pub const COL_PRIMEIRO_DESLOC: &str = "1º Desloc";
pub const COL_PRIMEIRO_DESPACHO: &str = "1º Despacho";
pub const COL_INTERVALO: &str = "Intervalo";
pub const COL_INICIO_INTERVALO: &str = "Inicio Intervalo";
pub const COL_FIM_INTERVALO: &str = "Fim Intervalo";

pub struct Calculator<'a> {
    settings: &'a Settings,
}

impl<'a> Calculator<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Derive all metrics over a copy of `table`.
    ///
    /// The returned table is sorted by (team, reference date, en-route
    /// instant) and carries the calculated columns repositioned immediately
    /// before the dispatch column.
    pub fn process(&self, table: &Table, columns: &ColumnMap) -> Table {
        info!("starting metric calculations over {} rows", table.row_count());

        let mut out = table.clone();
        sort_for_groups(&mut out);

        let n = out.row_count();
        let mut prep = vec![None; n];
        let mut idle = vec![None; n];
        for group in group_ranges(&out) {
            compute_group(&out, &group, &mut prep, &mut idle);
        }

        let exe = self.pass_through(&out, columns, ColumnKey::TrOrdem, "TempExe");
        let desl = self.pass_through(&out, columns, ColumnKey::TlOrdem, "TempDesl");
        let padrao = self.pass_through(&out, columns, ColumnKey::TempoPadrao, "TempoPadrao");
        let jornada = self.shift_duration(&out, columns);
        let atras = self.login_delay(&out, columns);

        let calc = &self.settings.calculated;
        write_metric(&mut out, &calc.temp_prep_equipe, &prep);
        write_metric(&mut out, &calc.temp_exe, &exe);
        write_metric(&mut out, &calc.temp_desl, &desl);
        write_metric(&mut out, &calc.tempo_padrao, &padrao);
        write_metric(&mut out, &calc.jornada, &jornada);
        write_metric(&mut out, &calc.atras_login, &atras);
        write_metric(&mut out, &calc.temp_sem_ordem, &idle);

        if let Some(despachada) = columns.get(ColumnKey::Despachada) {
            let all = calc.all();
            out.move_columns_before(&all, despachada);
        }

        info!("metric calculations completed");
        out
    }

    /// Copy a minutes column supplied by the source system, coercing decimal
    /// commas. Unresolvable source column → all missing, with a warning.
    fn pass_through(
        &self,
        table: &Table,
        columns: &ColumnMap,
        key: ColumnKey,
        label: &str,
    ) -> Vec<Option<f64>> {
        let Some(header) = columns.get(key) else {
            warn!("{label}: source column not found, values will be missing");
            return vec![None; table.row_count()];
        };
        info!("{label} copied from '{header}'");
        (0..table.row_count())
            .map(|i| parse_minutes(table.cell(i, header)))
            .collect()
    }

    /// Shift duration = shift end − shift start, in minutes.
    fn shift_duration(&self, table: &Table, columns: &ColumnMap) -> Vec<Option<f64>> {
        if !columns.is_resolved(ColumnKey::InicioCalendario)
            || !columns.is_resolved(ColumnKey::FimCalendario)
        {
            warn!("shift bound columns not found, Jornada will be missing");
            return vec![None; table.row_count()];
        }
        (0..table.row_count())
            .map(|i| {
                let start = parse_datetime(columns.cell(table, i, ColumnKey::InicioCalendario));
                let end = parse_datetime(columns.cell(table, i, ColumnKey::FimCalendario));
                diff_minutes(end, start)
            })
            .collect()
    }

    /// Login delay = first login − shift start, in minutes.
    ///
    /// The first-login column gets the "0"/empty sentinel treatment; when it
    /// is absent entirely the alternate login column is used as-is.
    fn login_delay(&self, table: &Table, columns: &ColumnMap) -> Vec<Option<f64>> {
        let use_primary = columns.is_resolved(ColumnKey::PrimeiroLogin);
        if !use_primary && !columns.is_resolved(ColumnKey::LoginAlt) {
            warn!("login columns not found, AtrasLogin will be missing");
            return vec![None; table.row_count()];
        }
        (0..table.row_count())
            .map(|i| {
                let login = if use_primary {
                    parse_login_datetime(columns.cell(table, i, ColumnKey::PrimeiroLogin))
                } else {
                    parse_datetime(columns.cell(table, i, ColumnKey::LoginAlt))
                };
                let start = parse_datetime(columns.cell(table, i, ColumnKey::InicioCalendario));
                diff_minutes(login, start)
            })
            .collect()
    }
}

/// Instant a row sorts on inside its group: en-route, falling back to
/// dispatch when en-route is absent.
fn sort_instant(table: &Table, row: usize) -> Option<NaiveDateTime> {
    parse_datetime(table.cell(row, COL_A_CAMINHO))
        .or_else(|| parse_datetime(table.cell(row, COL_DESPACHADA)))
}

/// Sort rows by (team, reference date, en-route instant), missing instants
/// last, stably. The sequential algorithms depend on this exact order.
fn sort_for_groups(table: &mut Table) {
    let n = table.row_count();
    let mut keys: Vec<(String, String, Option<NaiveDateTime>)> = Vec::with_capacity(n);
    for i in 0..n {
        keys.push((
            table.cell(i, COL_EQUIPE).unwrap_or_default().to_string(),
            table.cell(i, COL_DATA_REF).unwrap_or_default().to_string(),
            sort_instant(table, i),
        ));
    }
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        let (ka, kb) = (&keys[a], &keys[b]);
        ka.0.cmp(&kb.0)
            .then_with(|| ka.1.cmp(&kb.1))
            .then_with(|| match (ka.2, kb.2) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
    });
    table.permute_rows(&order);
}

/// Contiguous row ranges sharing a (team, reference date) pair. Rows missing
/// either key stay out of every group and keep missing sequential metrics.
fn group_ranges(table: &Table) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut current_key: Option<(String, String)> = None;
    for i in 0..table.row_count() {
        let (Some(team), Some(dataref)) = (table.cell(i, COL_EQUIPE), table.cell(i, COL_DATA_REF))
        else {
            current_key = None;
            continue;
        };
        let key = (team.to_string(), dataref.to_string());
        if current_key.as_ref() == Some(&key) {
            if let Some(last) = groups.last_mut() {
                last.push(i);
                continue;
            }
        }
        current_key = Some(key);
        groups.push(vec![i]);
    }
    groups
}

/// One pass over a sorted group computing preparation time per order and the
/// group's no-order idle figure.
///
/// The break is charged at most once per group across both deduction sites;
/// the preparation-time site is evaluated first on each order.
fn compute_group(table: &Table, rows: &[usize], prep: &mut [Option<f64>], idle: &mut [Option<f64>]) {
    let first = rows[0];

    // Order 0 seeds come from pre-shift literal columns, not timestamps.
    prep[first] = parse_minutes(table.cell(first, COL_PRIMEIRO_DESLOC));
    let idle_seed = parse_minutes(table.cell(first, COL_PRIMEIRO_DESPACHO));
    let idle_break_start = parse_datetime(table.cell(first, COL_INICIO_INTERVALO));
    let idle_break_end = parse_datetime(table.cell(first, COL_FIM_INTERVALO));
    let idle_break_minutes = parse_minutes(table.cell(first, COL_INTERVALO));

    let mut break_charged = false;
    let mut idle_charged = false;
    let mut between_orders = 0.0;

    for w in rows.windows(2) {
        let (prev, cur) = (w[0], w[1]);
        let a_caminho = parse_datetime(table.cell(cur, COL_A_CAMINHO));
        let despachada = parse_datetime(table.cell(cur, COL_DESPACHADA));
        let liberada = parse_datetime(table.cell(prev, COL_LIBERADA));
        let break_start = parse_datetime(table.cell(cur, COL_INICIO_INTERVALO));
        let break_end = parse_datetime(table.cell(cur, COL_FIM_INTERVALO));
        let break_minutes = parse_minutes(table.cell(cur, COL_INTERVALO));

        // Redispatched before release is the anomaly branch: measure from the
        // current dispatch instead of the stale previous release.
        let overlap = matches!((despachada, liberada), (Some(d), Some(l)) if d > l);
        let mut temp_prep = if overlap {
            diff_minutes(a_caminho, despachada)
        } else {
            diff_minutes(a_caminho, liberada)
        };

        let window_before_departure = matches!(
            (break_start, break_end, a_caminho),
            (Some(s), Some(e), Some(ac)) if s <= ac && e <= ac
        );
        if window_before_departure && !break_charged {
            break_charged = true;
            if let Some(minutes) = break_minutes.filter(|m| *m >= 0.0) {
                temp_prep = temp_prep.map(|t| t - minutes);
            }
        }
        prep[cur] = temp_prep;

        // Idle accumulation only counts real gaps between release and the
        // next dispatch.
        if let (Some(d), Some(l)) = (despachada, liberada) {
            if d > l {
                between_orders += d.signed_duration_since(l).num_seconds() as f64 / 60.0;
                let window_before_dispatch = matches!(
                    (idle_break_start, idle_break_end),
                    (Some(s), Some(e)) if s <= d && e <= d
                );
                if window_before_dispatch && !break_charged {
                    break_charged = true;
                    idle_charged = true;
                }
            }
        }
    }

    let group_idle = idle_seed.map(|seed| {
        match idle_break_minutes.filter(|m| idle_charged && *m >= 0.0) {
            Some(minutes) => seed + between_orders - minutes,
            None => seed + between_orders,
        }
    });
    // Every order in the shift carries the same idle figure.
    for &row in rows {
        idle[row] = group_idle;
    }
}

/// Append a calculated column, rounding to 2 decimals; missing stays blank.
fn write_metric(table: &mut Table, name: &str, values: &[Option<f64>]) {
    table.add_column(name);
    for (i, value) in values.iter().enumerate() {
        if let Some(v) = value {
            table.set_cell(i, name, fmt2(round2(*v)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    const HEADERS: &[&str] = &[
        "Equipe",
        "Data Referência",
        "Despachada",
        "A_Caminho",
        "No_Local",
        "Liberada",
        "1º Desloc",
        "1º Despacho",
        "Intervalo",
        "Inicio Intervalo",
        "Fim Intervalo",
        "Inicio Calendario",
        "Fim Calendario",
        "1º Login",
        "TR Ordem",
        "TL Ordem",
        "tempo_padrao",
        "Status",
    ];

    fn empty_row() -> Vec<String> {
        vec![String::new(); HEADERS.len()]
    }

    fn set(row: &mut [String], header: &str, value: &str) {
        let idx = HEADERS.iter().position(|h| *h == header).unwrap();
        row[idx] = value.to_string();
    }

    fn table(rows: Vec<Vec<String>>) -> Table {
        let mut t = Table::new(HEADERS.iter().map(|h| h.to_string()).collect());
        for r in rows {
            t.push_row(r);
        }
        t
    }

    fn run(t: &Table) -> (Table, Settings) {
        let settings = Settings::default();
        let columns = crate::columns::ColumnMap::resolve(t, &settings.columns);
        let out = Calculator::new(&settings).process(t, &columns);
        (out, settings)
    }

    fn order(team: &str, dataref: &str, fields: &[(&str, &str)]) -> Vec<String> {
        let mut row = empty_row();
        set(&mut row, "Equipe", team);
        set(&mut row, "Data Referência", dataref);
        for (h, v) in fields {
            set(&mut row, h, v);
        }
        row
    }

    #[test]
    fn normal_branch_measures_from_previous_release() {
        let t = table(vec![
            order(
                "T1",
                "01/03/2024",
                &[
                    ("Despachada", "01/03/2024 07:40"),
                    ("A_Caminho", "01/03/2024 08:00"),
                    ("Liberada", "01/03/2024 09:00"),
                    ("1º Desloc", "5"),
                    ("1º Despacho", "10"),
                ],
            ),
            order(
                "T1",
                "01/03/2024",
                &[
                    ("Despachada", "01/03/2024 08:55"),
                    ("A_Caminho", "01/03/2024 10:00"),
                    ("Liberada", "01/03/2024 11:00"),
                ],
            ),
        ]);
        let (out, settings) = run(&t);
        // dispatch 08:55 <= release 09:00 → normal branch: 10:00 - 09:00.
        assert_eq!(out.cell(1, &settings.calculated.temp_prep_equipe), Some("60.00"));
        assert_eq!(out.cell(0, &settings.calculated.temp_prep_equipe), Some("5.00"));
    }

    #[test]
    fn overlap_branch_measures_from_current_dispatch() {
        let t = table(vec![
            order(
                "T1",
                "01/03/2024",
                &[
                    ("A_Caminho", "01/03/2024 08:00"),
                    ("Liberada", "01/03/2024 09:00"),
                    ("1º Desloc", "5"),
                ],
            ),
            order(
                "T1",
                "01/03/2024",
                &[
                    ("Despachada", "01/03/2024 09:30"),
                    ("A_Caminho", "01/03/2024 10:00"),
                ],
            ),
        ]);
        let (out, settings) = run(&t);
        // dispatch 09:30 > release 09:00 → anomaly branch: 10:00 - 09:30.
        assert_eq!(out.cell(1, &settings.calculated.temp_prep_equipe), Some("30.00"));
    }

    #[test]
    fn break_fully_before_departure_is_deducted_once() {
        let t = table(vec![
            order(
                "T1",
                "01/03/2024",
                &[
                    ("A_Caminho", "01/03/2024 08:00"),
                    ("Liberada", "01/03/2024 09:00"),
                    ("1º Desloc", "5"),
                ],
            ),
            order(
                "T1",
                "01/03/2024",
                &[
                    ("Despachada", "01/03/2024 08:55"),
                    ("A_Caminho", "01/03/2024 10:00"),
                    ("Liberada", "01/03/2024 10:30"),
                    ("Intervalo", "10"),
                    ("Inicio Intervalo", "01/03/2024 09:10"),
                    ("Fim Intervalo", "01/03/2024 09:20"),
                ],
            ),
            order(
                "T1",
                "01/03/2024",
                &[
                    ("Despachada", "01/03/2024 10:45"),
                    ("A_Caminho", "01/03/2024 11:30"),
                    ("Intervalo", "10"),
                    ("Inicio Intervalo", "01/03/2024 09:10"),
                    ("Fim Intervalo", "01/03/2024 09:20"),
                ],
            ),
        ]);
        let (out, settings) = run(&t);
        // 60 minutes minus the 10-minute break, charged on the second order.
        assert_eq!(out.cell(1, &settings.calculated.temp_prep_equipe), Some("50.00"));
        // Third order would match the window too but the group already
        // charged: 11:30 - 10:30 = 60, dispatch 10:45 > release 10:30 →
        // overlap branch 11:30 - 10:45 = 45, no further deduction.
        assert_eq!(out.cell(2, &settings.calculated.temp_prep_equipe), Some("45.00"));
    }

    #[test]
    fn first_order_preparation_accepts_decimal_comma() {
        let t = table(vec![order(
            "T1",
            "01/03/2024",
            &[
                ("A_Caminho", "01/03/2024 08:00"),
                ("1º Desloc", "15,5"),
            ],
        )]);
        let (out, settings) = run(&t);
        assert_eq!(out.cell(0, &settings.calculated.temp_prep_equipe), Some("15.50"));
    }

    #[test]
    fn idle_time_broadcasts_seed_plus_gaps() {
        let t = table(vec![
            order(
                "T2",
                "02/03/2024",
                &[
                    ("A_Caminho", "02/03/2024 08:00"),
                    ("Liberada", "02/03/2024 09:00"),
                    ("1º Despacho", "12"),
                ],
            ),
            order(
                "T2",
                "02/03/2024",
                &[
                    ("Despachada", "02/03/2024 09:30"),
                    ("A_Caminho", "02/03/2024 09:40"),
                    ("Liberada", "02/03/2024 10:00"),
                ],
            ),
            order(
                "T2",
                "02/03/2024",
                &[
                    ("Despachada", "02/03/2024 10:20"),
                    ("A_Caminho", "02/03/2024 10:25"),
                ],
            ),
        ]);
        let (out, settings) = run(&t);
        // 12 + (09:30-09:00) + (10:20-10:00) = 62, on every order of the shift.
        for i in 0..3 {
            assert_eq!(out.cell(i, &settings.calculated.temp_sem_ordem), Some("62.00"));
        }
    }

    #[test]
    fn break_charged_by_prep_site_is_not_charged_again_by_idle() {
        // Window qualifies for both sites; only the preparation-time site
        // (evaluated first) deducts.
        let t = table(vec![
            order(
                "T1",
                "01/03/2024",
                &[
                    ("A_Caminho", "01/03/2024 08:00"),
                    ("Liberada", "01/03/2024 09:00"),
                    ("1º Despacho", "0"),
                    ("1º Desloc", "5"),
                    ("Intervalo", "10"),
                    ("Inicio Intervalo", "01/03/2024 09:05"),
                    ("Fim Intervalo", "01/03/2024 09:15"),
                ],
            ),
            order(
                "T1",
                "01/03/2024",
                &[
                    ("Despachada", "01/03/2024 09:20"),
                    ("A_Caminho", "01/03/2024 10:00"),
                    ("Intervalo", "10"),
                    ("Inicio Intervalo", "01/03/2024 09:05"),
                    ("Fim Intervalo", "01/03/2024 09:15"),
                ],
            ),
        ]);
        let (out, settings) = run(&t);
        // Prep: overlap branch (09:20 > 09:00) → 10:00 - 09:20 = 40, minus 10.
        assert_eq!(out.cell(1, &settings.calculated.temp_prep_equipe), Some("30.00"));
        // Idle: gap 09:20 - 09:00 = 20; break already charged → no deduction.
        assert_eq!(out.cell(0, &settings.calculated.temp_sem_ordem), Some("20.00"));
        assert_eq!(out.cell(1, &settings.calculated.temp_sem_ordem), Some("20.00"));
    }

    #[test]
    fn idle_site_deducts_when_prep_site_never_matched() {
        // Break window ends before the second dispatch but after en-route, so
        // the prep-site window test (<= en-route) fails and the idle site
        // takes the charge.
        let t = table(vec![
            order(
                "T1",
                "01/03/2024",
                &[
                    ("A_Caminho", "01/03/2024 08:00"),
                    ("Liberada", "01/03/2024 09:00"),
                    ("1º Despacho", "6"),
                    ("1º Desloc", "5"),
                    ("Intervalo", "15"),
                    ("Inicio Intervalo", "01/03/2024 09:10"),
                    ("Fim Intervalo", "01/03/2024 09:25"),
                ],
            ),
            order(
                "T1",
                "01/03/2024",
                &[
                    ("Despachada", "01/03/2024 09:30"),
                    ("A_Caminho", "01/03/2024 09:20"),
                    ("Liberada", "01/03/2024 10:30"),
                ],
            ),
        ]);
        let (out, settings) = run(&t);
        // Idle: 6 + (09:30-09:00=30) - 15 = 21.
        assert_eq!(out.cell(0, &settings.calculated.temp_sem_ordem), Some("21.00"));
    }

    #[test]
    fn missing_shift_bounds_blank_duration_and_login_delay() {
        let t = table(vec![order(
            "T1",
            "01/03/2024",
            &[
                ("A_Caminho", "01/03/2024 08:00"),
                ("1º Login", "01/03/2024 07:50"),
            ],
        )]);
        let (out, settings) = run(&t);
        assert_eq!(out.cell(0, &settings.calculated.jornada), None);
        assert_eq!(out.cell(0, &settings.calculated.atras_login), None);
    }

    #[test]
    fn shift_duration_and_login_delay() {
        let t = table(vec![order(
            "T1",
            "01/03/2024",
            &[
                ("A_Caminho", "01/03/2024 08:00"),
                ("Inicio Calendario", "01/03/2024 07:30"),
                ("Fim Calendario", "01/03/2024 15:18"),
                ("1º Login", "01/03/2024 07:42"),
            ],
        )]);
        let (out, settings) = run(&t);
        assert_eq!(out.cell(0, &settings.calculated.jornada), Some("468.00"));
        assert_eq!(out.cell(0, &settings.calculated.atras_login), Some("12.00"));
    }

    #[test]
    fn login_sentinel_zero_reads_as_missing() {
        let t = table(vec![order(
            "T1",
            "01/03/2024",
            &[
                ("A_Caminho", "01/03/2024 08:00"),
                ("Inicio Calendario", "01/03/2024 07:30"),
                ("1º Login", "0"),
            ],
        )]);
        let (out, settings) = run(&t);
        assert_eq!(out.cell(0, &settings.calculated.atras_login), None);
    }

    #[test]
    fn pass_through_columns_coerce_decimal_commas() {
        let t = table(vec![order(
            "T1",
            "01/03/2024",
            &[
                ("A_Caminho", "01/03/2024 08:00"),
                ("TR Ordem", "42,5"),
                ("TL Ordem", "13.25"),
                ("tempo_padrao", "oops"),
            ],
        )]);
        let (out, settings) = run(&t);
        assert_eq!(out.cell(0, &settings.calculated.temp_exe), Some("42.50"));
        assert_eq!(out.cell(0, &settings.calculated.temp_desl), Some("13.25"));
        assert_eq!(out.cell(0, &settings.calculated.tempo_padrao), None);
    }

    #[test]
    fn rows_resort_by_team_date_and_en_route() {
        let t = table(vec![
            order("T2", "01/03/2024", &[("A_Caminho", "01/03/2024 08:00")]),
            order("T1", "01/03/2024", &[("A_Caminho", "01/03/2024 10:00")]),
            order("T1", "01/03/2024", &[("A_Caminho", "01/03/2024 08:00")]),
            // No en-route: falls back to dispatch for ordering.
            order("T1", "01/03/2024", &[("Despachada", "01/03/2024 09:00")]),
        ]);
        let (out, _) = run(&t);
        let teams: Vec<_> = (0..4).map(|i| out.cell(i, "Equipe").unwrap().to_string()).collect();
        assert_eq!(teams, ["T1", "T1", "T1", "T2"]);
        assert_eq!(out.cell(0, "A_Caminho"), Some("01/03/2024 08:00"));
        assert_eq!(out.cell(1, "Despachada"), Some("01/03/2024 09:00"));
        assert_eq!(out.cell(2, "A_Caminho"), Some("01/03/2024 10:00"));
    }

    #[test]
    fn calculated_columns_sit_before_dispatch() {
        let t = table(vec![order(
            "T1",
            "01/03/2024",
            &[("Despachada", "01/03/2024 08:00")],
        )]);
        let (out, settings) = run(&t);
        let headers = out.headers();
        let despachada = headers.iter().position(|h| h == "Despachada").unwrap();
        let first_calc = headers
            .iter()
            .position(|h| h == &settings.calculated.temp_prep_equipe)
            .unwrap();
        assert_eq!(first_calc + settings.calculated.all().len(), despachada);
    }

    #[test]
    fn rows_outside_any_group_keep_missing_sequential_metrics() {
        let mut row = empty_row();
        set(&mut row, "A_Caminho", "01/03/2024 08:00");
        set(&mut row, "1º Desloc", "5");
        // No team, no reference date.
        let t = table(vec![row]);
        let (out, settings) = run(&t);
        assert_eq!(out.cell(0, &settings.calculated.temp_prep_equipe), None);
        assert_eq!(out.cell(0, &settings.calculated.temp_sem_ordem), None);
    }
}
