use schemars::schema_for;
use seqforge_core::RecordConfig;

fn main() {
    let schema = schema_for!(RecordConfig);
    let json = serde_json::to_string_pretty(&schema).expect("serialize json schema");
    println!("{json}");
}
