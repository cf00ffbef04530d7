use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

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

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len())]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// (chain, categories, relative weight)
const CHAINS: [(&str, &str, usize); 8] = [
    ("McDonald's", "Fast Food Restaurant, Burgers", 10),
    ("Subway", "Fast Food, Sandwich Shop", 8),
    ("Taco Bell", "Fast Food Restaurant, Mexican Restaurant", 6),
    ("Burger King", "Fast Food Restaurant, Burgers", 5),
    ("Wendy's", "Fast Food Restaurant, Burgers", 4),
    ("Pizza Hut", "Pizza Place, Fast Food", 4),
    ("Arby's", "Fast Food Restaurant, Sandwich Shop", 3),
    ("Chick-fil-A", "Fast Food, Chicken Joint", 3),
];

/// (state, city, latitude, longitude)
const CITIES: [(&str, &str, f64, f64); 12] = [
    ("TX", "Austin", 30.27, -97.74),
    ("TX", "Dallas", 32.78, -96.80),
    ("TX", "Houston", 29.76, -95.37),
    ("CA", "Fresno", 36.74, -119.79),
    ("CA", "Los Angeles", 34.05, -118.24),
    ("CA", "Sacramento", 38.58, -121.49),
    ("NY", "Albany", 42.65, -73.75),
    ("NY", "Buffalo", 42.89, -78.88),
    ("OH", "Columbus", 39.96, -83.00),
    ("OH", "Toledo", 41.65, -83.54),
    ("FL", "Orlando", 28.54, -81.38),
    ("FL", "Tampa", 27.95, -82.46),
];

const STREETS: [&str; 6] = ["Main St", "Oak Ave", "Elm St", "Highway 9", "Park Blvd", "Market St"];

#[derive(Serialize)]
struct Row {
    name: String,
    address: String,
    city: String,
    province: String,
    #[serde(rename = "postalCode")]
    postal_code: String,
    categories: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

fn generate(rng: &mut SimpleRng, count: usize) -> Vec<Row> {
    let weighted: Vec<usize> = CHAINS
        .iter()
        .enumerate()
        .flat_map(|(i, &(_, _, w))| std::iter::repeat(i).take(w))
        .collect();

    (0..count)
        .map(|i| {
            let (name, categories, _) = CHAINS[*rng.pick(&weighted)];
            let (province, city, lat, lon) = *rng.pick(&CITIES);
            let has_coordinates = !rng.chance(0.05);
            Row {
                name: name.to_string(),
                address: format!("{} {}", 100 + rng.below(9900), rng.pick(&STREETS)),
                city: city.to_string(),
                province: province.to_string(),
                postal_code: format!("{:05}", 10000 + i * 7 % 89999),
                categories: (!rng.chance(0.08)).then(|| categories.to_string()),
                latitude: has_coordinates.then(|| lat + (rng.next_f64() - 0.5) * 0.3),
                longitude: has_coordinates.then(|| lon + (rng.next_f64() - 0.5) * 0.3),
            }
        })
        .collect()
}

fn write_csv(path: &str, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn text_column<'a>(rows: &'a [Row], f: impl Fn(&'a Row) -> Option<&'a str>) -> ArrayRef {
    Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
}

fn number_column(rows: &[Row], f: impl Fn(&Row) -> Option<f64>) -> ArrayRef {
    Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
}

fn write_parquet(path: &str, rows: &[Row]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("name", DataType::Utf8, false),
        Field::new("address", DataType::Utf8, false),
        Field::new("city", DataType::Utf8, false),
        Field::new("province", DataType::Utf8, false),
        Field::new("postalCode", DataType::Utf8, false),
        Field::new("categories", DataType::Utf8, true),
        Field::new("latitude", DataType::Float64, true),
        Field::new("longitude", DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            text_column(rows, |r| Some(r.name.as_str())),
            text_column(rows, |r| Some(r.address.as_str())),
            text_column(rows, |r| Some(r.city.as_str())),
            text_column(rows, |r| Some(r.province.as_str())),
            text_column(rows, |r| Some(r.postal_code.as_str())),
            text_column(rows, |r| r.categories.as_deref()),
            number_column(rows, |r| r.latitude),
            number_column(rows, |r| r.longitude),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng, 2000);

    write_csv("fast_food_usa.csv", &rows)?;
    write_parquet("fast_food_usa.parquet", &rows)?;

    println!(
        "Wrote {} restaurants across {} cities to fast_food_usa.csv and fast_food_usa.parquet",
        rows.len(),
        CITIES.len()
    );
    Ok(())
}
