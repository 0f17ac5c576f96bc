use crate::context::Context;
use crate::output::print_json;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn run(ctx: &Context) -> anyhow::Result<()> {
    if ctx.json {
        return print_json(&serde_json::json!({ "version": VERSION }));
    }
    println!("Kube-AI Version: {VERSION}");
    Ok(())
}
