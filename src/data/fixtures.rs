//! In-memory networks shared by unit tests.

use super::model::{Network, TimeseriesTable};

pub fn labels(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

pub fn table(index: &[&str], columns: &[(&str, &[f64])]) -> TimeseriesTable {
    TimeseriesTable::new(
        labels(index),
        columns.iter().map(|(name, _)| name.to_string()).collect(),
        columns.iter().map(|(_, values)| values.to_vec()).collect(),
    )
    .expect("fixture table is well formed")
}

pub const SNAPSHOTS: [&str; 3] = [
    "2013-01-01 00:00:00",
    "2013-01-01 01:00:00",
    "2013-01-01 02:00:00",
];

/// A three-snapshot network carrying every attribute the built-in input and
/// output schemas ask for. `lines_t.mu_upper` has a missing value on `l2`,
/// `links_t.mu_lower` is missing on every row.
pub fn solved_network() -> Network {
    let s = &SNAPSHOTS;
    let mut n = Network::new("elec_s_5_ec_lcopt_Co2L-24H", labels(s));

    n.insert("buses_t", "p", table(s, &[("b1", &[1.0, 2.0, 3.0]), ("b2", &[-1.0, -2.0, -3.0])]));
    n.insert("buses_t", "v_ang", table(s, &[("b1", &[0.0, 0.0, 0.0]), ("b2", &[0.1, 0.2, 0.3])]));
    n.insert(
        "buses_t",
        "marginal_price",
        table(s, &[("b1", &[20.0, 21.0, 22.0]), ("b2", &[30.0, 31.0, 32.0])]),
    );

    n.insert("generators_t", "p", table(s, &[("g1", &[5.0, 6.0, 7.0]), ("g2", &[1.0, 1.0, 1.0])]));
    n.insert(
        "generators_t",
        "p_max_pu",
        table(s, &[("g1", &[1.0, 1.0, 1.0]), ("g2", &[0.2, 0.5, 0.1])]),
    );

    n.insert("loads_t", "p_set", table(s, &[("l1", &[4.0, 5.0, 6.0])]));

    n.insert("storage_units_t", "p", table(s, &[("su1", &[0.5, -0.5, 0.0])]));
    n.insert("storage_units_t", "state_of_charge", table(s, &[("su1", &[1.0, 1.5, 1.5])]));
    n.insert("storage_units_t", "spill", table(s, &[("su1", &[0.0, 0.0, 0.0])]));
    n.insert("storage_units_t", "inflow", TimeseriesTable::empty(labels(s)));

    n.insert("lines_t", "p0", table(s, &[("l1", &[1.0, 2.0, 3.0]), ("l2", &[0.5, 0.5, 0.5])]));
    n.insert(
        "lines_t",
        "p1",
        table(s, &[("l1", &[-1.0, -2.0, -3.0]), ("l2", &[-0.5, -0.5, -0.5])]),
    );
    n.insert(
        "lines_t",
        "mu_lower",
        table(s, &[("l1", &[0.0, 0.0, 0.0]), ("l2", &[0.0, 0.0, 0.0])]),
    );
    n.insert(
        "lines_t",
        "mu_upper",
        table(s, &[("l1", &[0.0, 3.0, 0.0]), ("l2", &[0.0, f64::NAN, 0.0])]),
    );

    n.insert("links_t", "p0", table(s, &[("k1", &[2.0, 2.0, 2.0])]));
    n.insert("links_t", "p1", table(s, &[("k1", &[-2.0, -2.0, -2.0])]));
    n.insert("links_t", "mu_lower", table(s, &[("k1", &[f64::NAN, f64::NAN, f64::NAN])]));
    n.insert("links_t", "mu_upper", table(s, &[("k1", &[0.0, 0.0, 1.0])]));

    n
}
