use serde::Serialize;

const RULER: &str = "-----------------------------------";

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Print `body` between horizontal rulers under a heading.
pub fn print_ruled(heading: &str, body: &str) {
    println!("\n{heading}");
    println!("{RULER}");
    println!("{}", body.trim_end());
    println!("{RULER}");
}
