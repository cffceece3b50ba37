use super::{json_pretty, EXIT_FAILURE, EXIT_SUCCESS};
use parvula_core::ComponentResolver;

pub fn run(resolver: &ComponentResolver, package: &str, json: bool) -> Result<u8, String> {
    let exists = resolver.exists(package);
    if json {
        println!(
            "{}",
            json_pretty(&serde_json::json!({
                "package": package,
                "exists": exists,
            }))?
        );
    } else {
        println!("{exists}");
    }
    Ok(if exists { EXIT_SUCCESS } else { EXIT_FAILURE })
}
