use std::sync::Arc;

use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use seqclust_explorer::data::export::write_csv;
use seqclust_explorer::data::model::{CellValue, MethodCatalog, MethodRecord};

const COLUMNS: [&str; 17] = [
    "Method Name",
    "Year",
    "Community (standardized)",
    "Data type (standardized)",
    "Method Family",
    "Subfamily (standardized)",
    "Main Algorithm (standardized)",
    "Dependency order",
    "Continuous time",
    "Covariates",
    "Various lengths",
    "Missing data",
    "Multivariate",
    "Original Article",
    "Publication name",
    "Article found",
    "Public Implementation",
];

/// (family, subfamily, main algorithm) triples the generator draws from.
const TAXONOMY: [(&str, &str, &str); 8] = [
    ("Model-based", "Mixture of Markov chains", "EM"),
    ("Model-based", "Hidden Markov models", "Baum-Welch"),
    ("Feature-based", "Embeddings", "k-means"),
    ("Feature-based", "Pattern mining", "Hierarchical clustering"),
    ("Distance-based", "Optimal matching", "PAM"),
    ("Distance-based", " Edit distances ", "Hierarchical clustering"),
    ("Distance-based", "Dynamic time warping", "k-medoids"),
    ("Hybrid", "Ensembles", "Consensus"),
];

const DATA_TYPES: [&str; 6] = [
    "Care trajectories",
    "Life course",
    "DNA",
    "Web logs",
    "Care trajectories, Life course",
    "DNA, Proteins",
];

const COMMUNITIES: [&str; 5] = [
    "Statistics",
    "Social Science",
    "Healthcare",
    "Biology",
    "Computer Science",
];

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

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn yes_no(&mut self) -> &'static str {
        if self.next_u64() % 3 == 0 {
            "Yes"
        } else {
            "No"
        }
    }
}

fn generate(rng: &mut SimpleRng, n: usize) -> Vec<MethodRecord> {
    (0..n)
        .map(|i| {
            let (family, subfamily, algorithm) = TAXONOMY[i % TAXONOMY.len()];
            let order = match rng.next_u64() % 4 {
                0 => CellValue::from("All"),
                1 => CellValue::from("Fixed"),
                2 => CellValue::Null,
                k => CellValue::Integer(k as i64),
            };
            let implementation = if rng.next_u64() % 2 == 0 {
                format!("Yes (https://example.org/methods/{i})")
            } else {
                "No".to_string()
            };

            MethodRecord::new()
                .with("Method Name", format!("Method {i:02}").as_str())
                .with("Year", CellValue::Integer(1995 + (rng.next_u64() % 30) as i64))
                .with("Community (standardized)", rng.pick(&COMMUNITIES))
                .with("Data type (standardized)", rng.pick(&DATA_TYPES))
                .with("Method Family", family)
                .with("Subfamily (standardized)", subfamily)
                .with("Main Algorithm (standardized)", algorithm)
                .with("Dependency order", order)
                .with("Continuous time", rng.yes_no())
                .with("Covariates", rng.yes_no())
                .with("Various lengths", rng.yes_no())
                .with("Missing data", rng.yes_no())
                .with("Multivariate", rng.yes_no())
                .with("Original Article", format!("Author{i} et al.").as_str())
                .with("Publication name", "Journal of Classification")
                .with("Article found", "Scoping review")
                .with("Public Implementation", implementation.as_str())
        })
        .collect()
}

fn text_column(catalog: &MethodCatalog, col: &str) -> ArrayRef {
    let values: Vec<Option<String>> = catalog
        .records
        .iter()
        .map(|r| r.get(col).as_text())
        .collect();
    Arc::new(StringArray::from(values))
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let columns: Vec<String> = COLUMNS.iter().map(|c| c.to_string()).collect();
    let catalog = MethodCatalog::from_records(columns, generate(&mut rng, 40));

    // Write CSV
    let csv_path = "sample_catalog.csv";
    let file = std::fs::File::create(csv_path).expect("Failed to create CSV file");
    write_csv(file, &catalog, &(0..catalog.len()).collect::<Vec<_>>())
        .expect("Failed to write CSV");

    // Build Arrow arrays; Year stays numeric, everything else is text.
    let fields: Vec<Field> = COLUMNS
        .iter()
        .map(|&c| {
            let dt = if c == "Year" { DataType::Int64 } else { DataType::Utf8 };
            Field::new(c, dt, true)
        })
        .collect();
    let arrays: Vec<ArrayRef> = COLUMNS
        .iter()
        .map(|&c| {
            if c == "Year" {
                let years: Vec<Option<i64>> = catalog
                    .records
                    .iter()
                    .map(|r| match r.get(c) {
                        CellValue::Integer(y) => Some(*y),
                        _ => None,
                    })
                    .collect();
                Arc::new(Int64Array::from(years)) as ArrayRef
            } else {
                text_column(&catalog, c)
            }
        })
        .collect();

    let schema = Arc::new(Schema::new(fields));
    let batch =
        RecordBatch::try_new(schema.clone(), arrays).expect("Failed to create RecordBatch");

    // Write Parquet
    let output_path = "sample_catalog.parquet";
    let file = std::fs::File::create(output_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!(
        "Wrote {} methods to {output_path} and {csv_path}",
        catalog.len()
    );
}
