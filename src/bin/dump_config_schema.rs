use anyhow::Result;

fn main() -> Result<()> {
    let schema = chart_annotations::Config::json_schema();
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
