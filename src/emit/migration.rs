use crate::config::TierCaps;
use crate::constants::output::TABLE_NAME;
use crate::data::{Level, PracticeSentence, Purpose, TierBuckets};

/// Quote `value` as a SQL string literal, doubling embedded single quotes.
pub fn sql_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn check_list(values: impl IntoIterator<Item = &'static str>) -> String {
    values
        .into_iter()
        .map(sql_literal)
        .collect::<Vec<_>>()
        .join(", ")
}

/// `CREATE TABLE IF NOT EXISTS` statement for the practice sentence table.
pub fn create_table_statement(source_label: &str) -> String {
    let levels = check_list(Level::ALL.iter().map(Level::as_str));
    let purposes = check_list(Purpose::ALL.iter().map(Purpose::as_str));
    format!(
        "CREATE TABLE IF NOT EXISTS {TABLE_NAME} (
    id SERIAL PRIMARY KEY,
    text TEXT NOT NULL,
    level TEXT NOT NULL CHECK (level IN ({levels})),
    purpose TEXT NOT NULL CHECK (purpose IN ({purposes})),
    word_count INTEGER,
    target_accuracy DECIMAL(3,2),
    target_fluency DECIMAL(3,2),
    source TEXT DEFAULT {source},
    created_at TIMESTAMP WITH TIME ZONE DEFAULT NOW()
);
",
        source = sql_literal(source_label),
    )
}

/// `INSERT` statement seeding one sentence. The id and timestamp are left to the database.
pub fn insert_statement(sentence: &PracticeSentence) -> String {
    format!(
        "INSERT INTO {TABLE_NAME} (text, level, purpose, word_count, target_accuracy, target_fluency, source)\nVALUES ({}, {}, {}, {}, {}, {}, {});\n",
        sql_literal(&sentence.text),
        sql_literal(sentence.level.as_str()),
        sql_literal(sentence.purpose.as_str()),
        sentence.word_count,
        sentence.target_accuracy,
        sentence.target_fluency,
        sql_literal(&sentence.source),
    )
}

/// Render the schema statement followed by up to `caps` inserts per tier, easiest tier first.
pub fn render(buckets: &TierBuckets, caps: &TierCaps, source_label: &str) -> String {
    let mut out = format!("-- Practice sentences seeded from the {source_label} dataset\n");
    out.push_str(&create_table_statement(source_label));
    out.push_str("\n-- Seed rows\n");
    for level in Level::ALL {
        let selected = buckets.head(level, caps.for_level(level));
        out.push_str(&format!("-- {level}: {} row(s)\n", selected.len()));
        for sentence in selected {
            out.push_str(&insert_statement(sentence));
        }
    }
    out
}
