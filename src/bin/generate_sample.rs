use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde_json::json;

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
        (self.next_f64() * n as f64) as usize
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

struct Subject {
    id: i64,
    first_name: &'static str,
    gender: &'static str,
    email: String,
    age: Option<f64>,
    grades: [Option<f64>; 5],
}

const FIRST_NAMES: [&str; 8] = ["Ada", "Ben", "Cleo", "Dov", "Eli", "Fay", "Gil", "Hana"];
const GENDERS: [&str; 3] = ["Female", "Male", "Other"];
const DOMAINS: [&str; 4] = ["example.com", "mail.org", "uni.edu", "corp.net"];

/// Addresses that fail exactly one validation rule each.
const BROKEN_EMAILS: [&str; 6] = [
    "no-at-sign.com",
    "two@@signs.com",
    "dot@.after.com",
    "@leading.com",
    "trailing@dot.com.",
    "zoë@umlaut.com",
];

fn generate_subject(id: i64, rng: &mut SimpleRng) -> Subject {
    let first_name = FIRST_NAMES[rng.below(FIRST_NAMES.len())];
    let gender = GENDERS[rng.below(GENDERS.len())];

    let email = if rng.chance(0.1) {
        BROKEN_EMAILS[rng.below(BROKEN_EMAILS.len())].to_string()
    } else {
        format!(
            "{}.{id}@{}",
            first_name.to_ascii_lowercase(),
            DOMAINS[rng.below(DOMAINS.len())]
        )
    };

    let age = (!rng.chance(0.05)).then(|| (rng.next_f64() * 100.0).round());

    // Each subject has a base grade; individual answers scatter around it.
    let base = 40.0 + rng.next_f64() * 50.0;
    let grades = std::array::from_fn(|_| {
        (!rng.chance(0.08))
            .then(|| (base + (rng.next_f64() - 0.5) * 20.0).clamp(0.0, 100.0).round())
    });

    Subject {
        id,
        first_name,
        gender,
        email,
        age,
        grades,
    }
}

fn write_json(subjects: &[Subject], output_path: &str) {
    let records: Vec<_> = subjects
        .iter()
        .map(|s| {
            json!({
                "id": s.id,
                "first_name": s.first_name,
                "gender": s.gender,
                "email": s.email,
                "age": s.age,
                "q1": s.grades[0],
                "q2": s.grades[1],
                "q3": s.grades[2],
                "q4": s.grades[3],
                "q5": s.grades[4],
            })
        })
        .collect();

    let text = serde_json::to_string_pretty(&records).expect("Failed to serialize JSON");
    std::fs::write(output_path, text).expect("Failed to write JSON file");
}

fn write_parquet(subjects: &[Subject], output_path: &str) {
    let grade_field = |name: &str| Field::new(name, DataType::Float64, true);
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("first_name", DataType::Utf8, false),
        Field::new("gender", DataType::Utf8, false),
        Field::new("email", DataType::Utf8, false),
        Field::new("age", DataType::Float64, true),
        grade_field("q1"),
        grade_field("q2"),
        grade_field("q3"),
        grade_field("q4"),
        grade_field("q5"),
    ]));

    let grade_column = |q: usize| {
        Arc::new(Float64Array::from(
            subjects.iter().map(|s| s.grades[q]).collect::<Vec<_>>(),
        ))
    };

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(subjects.iter().map(|s| s.id).collect::<Vec<_>>())),
            Arc::new(StringArray::from(
                subjects.iter().map(|s| s.first_name).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                subjects.iter().map(|s| s.gender).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                subjects.iter().map(|s| s.email.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                subjects.iter().map(|s| s.age).collect::<Vec<_>>(),
            )),
            grade_column(0),
            grade_column(1),
            grade_column(2),
            grade_column(3),
            grade_column(4),
        ],
    )
    .expect("Failed to create RecordBatch");

    let file = std::fs::File::create(output_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let subjects: Vec<Subject> = (0..500).map(|id| generate_subject(id, &mut rng)).collect();

    write_json(&subjects, "sample_survey.json");
    write_parquet(&subjects, "sample_survey.parquet");

    let missing: usize = subjects
        .iter()
        .map(|s| s.grades.iter().filter(|g| g.is_none()).count())
        .sum();
    println!(
        "Wrote {} subjects ({missing} missing grades) to sample_survey.{{json,parquet}}",
        subjects.len()
    );
}
