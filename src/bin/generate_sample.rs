use std::path::PathBuf;

use network_ml_export::TimeseriesTable;
use network_ml_export::data::writer::write_table;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in `[lo, hi)`
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

const HOURS: usize = 48;

/// Daily load shape, peaking in the evening.
fn daily_profile(hour: usize) -> f64 {
    let h = (hour % 24) as f64;
    0.7 + 0.3 * (-(h - 18.0).powi(2) / 18.0).exp()
}

fn series(
    snapshots: &[String],
    names: &[&str],
    mut value: impl FnMut(usize, usize) -> f64,
) -> TimeseriesTable {
    let data = (0..names.len())
        .map(|col| (0..snapshots.len()).map(|row| value(row, col)).collect())
        .collect();
    TimeseriesTable::new(
        snapshots.to_vec(),
        names.iter().map(|s| s.to_string()).collect(),
        data,
    )
    .expect("Failed to build table")
}

fn main() {
    let out_dir = PathBuf::from(
        std::env::args()
            .nth(1)
            .unwrap_or_else(|| "sample_network".to_string()),
    );
    let mut rng = SimpleRng::new(42);

    let snapshots: Vec<String> = (0..HOURS)
        .map(|h| format!("2013-01-{:02} {:02}:00:00", 1 + h / 24, h % 24))
        .collect();

    let buses = ["b1", "b2", "b3"];
    let generators = ["b1 wind", "b2 solar", "b3 gas"];
    let loads = ["b1", "b2", "b3"];
    let storage = ["b2 battery"];
    let lines = ["l12", "l23"];
    let links = ["b1-b3 dc"];

    let demand: Vec<Vec<f64>> = loads
        .iter()
        .map(|_| {
            let base = rng.uniform(50.0, 150.0);
            (0..HOURS).map(|h| base * daily_profile(h)).collect()
        })
        .collect();
    let wind: Vec<f64> = (0..HOURS).map(|_| rng.uniform(0.0, 1.0)).collect();
    let solar: Vec<f64> = (0..HOURS)
        .map(|h| {
            let h = (h % 24) as f64;
            (((h - 6.0) / 12.0 * std::f64::consts::PI).sin()).max(0.0)
        })
        .collect();

    let mut tables: Vec<(&str, &str, TimeseriesTable)> = Vec::new();

    // Inputs
    tables.push(("loads", "p_set", series(&snapshots, &loads, |r, c| demand[c][r])));
    tables.push((
        "generators",
        "p_max_pu",
        series(&snapshots, &generators, |r, c| match c {
            0 => wind[r],
            1 => solar[r],
            _ => 1.0,
        }),
    ));
    tables.push(("storage_units", "inflow", series(&snapshots, &[], |_, _| 0.0)));

    // Outputs
    let total: Vec<f64> = (0..HOURS).map(|r| demand.iter().map(|d| d[r]).sum()).collect();
    let dispatch: Vec<[f64; 3]> = (0..HOURS)
        .map(|r| {
            let w = 120.0 * wind[r];
            let s = 80.0 * solar[r];
            [w, s, (total[r] - w - s).max(0.0)]
        })
        .collect();
    tables.push(("generators", "p", series(&snapshots, &generators, |r, c| dispatch[r][c])));
    tables.push((
        "buses",
        "p",
        series(&snapshots, &buses, |r, c| dispatch[r][c] - demand[c][r]),
    ));
    tables.push((
        "buses",
        "v_ang",
        series(&snapshots, &buses, |r, c| c as f64 * 0.01 * daily_profile(r)),
    ));
    tables.push((
        "buses",
        "marginal_price",
        series(&snapshots, &buses, |r, _| if dispatch[r][2] > 0.0 { 45.0 } else { 0.0 }),
    ));
    // Charge overnight, discharge in the afternoon and evening.
    let charging = |hour: usize| hour % 24 < 12;
    tables.push((
        "storage_units",
        "p",
        series(&snapshots, &storage, |r, _| if charging(r) { -5.0 } else { 5.0 }),
    ));
    tables.push((
        "storage_units",
        "state_of_charge",
        series(&snapshots, &storage, |r, _| {
            let h = (r % 24) as f64;
            if charging(r) {
                5.0 * (h + 1.0)
            } else {
                60.0 - 5.0 * (h - 11.0)
            }
        }),
    ));
    tables.push(("storage_units", "spill", series(&snapshots, &storage, |_, _| 0.0)));
    let flow: Vec<Vec<f64>> = (0..lines.len())
        .map(|c| {
            (0..HOURS)
                .map(|r| rng.uniform(-50.0, 50.0) + (r + c) as f64)
                .collect()
        })
        .collect();
    tables.push(("lines", "p0", series(&snapshots, &lines, |r, c| flow[c][r])));
    tables.push(("lines", "p1", series(&snapshots, &lines, |r, c| -flow[c][r])));
    tables.push(("lines", "mu_lower", series(&snapshots, &lines, |_, _| 0.0)));
    // Shadow prices of constraints never built for l23 stay missing.
    tables.push((
        "lines",
        "mu_upper",
        series(&snapshots, &lines, |r, c| {
            if c == 1 {
                f64::NAN
            } else if r % 24 == 18 {
                3.5
            } else {
                0.0
            }
        }),
    ));
    tables.push(("links", "p0", series(&snapshots, &links, |r, _| 10.0 * daily_profile(r))));
    tables.push(("links", "p1", series(&snapshots, &links, |r, _| -9.5 * daily_profile(r))));
    tables.push(("links", "mu_lower", series(&snapshots, &links, |_, _| f64::NAN)));
    tables.push(("links", "mu_upper", series(&snapshots, &links, |_, _| 0.0)));

    std::fs::create_dir_all(&out_dir).expect("Failed to create output directory");
    let snapshot_csv: String = std::iter::once("snapshot".to_string())
        .chain(snapshots.iter().cloned())
        .map(|line| line + "\n")
        .collect();
    std::fs::write(out_dir.join("snapshots.csv"), snapshot_csv)
        .expect("Failed to write snapshots.csv");

    for (list, attribute, table) in &tables {
        let path = out_dir.join(format!("{list}-{attribute}.parquet"));
        write_table(table, &path).expect("Failed to write table");
    }

    println!(
        "Wrote {} timeseries tables ({} snapshots each) to {}",
        tables.len(),
        HOURS,
        out_dir.display()
    );
}
